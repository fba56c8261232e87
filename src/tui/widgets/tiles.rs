use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::ApprovalStatus;
use crate::report::{DailyTotals, MaintenanceTotals, StatusCounts};
use crate::tui::theme;
use crate::utils::format::{arabic_number, progress_bar};

fn tile(frame: &mut Frame, area: Rect, label: &str, value: u64, style: Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let text = vec![
        Line::from(Span::styled(format!("  {}", label), theme::dim())),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", arabic_number(value)),
            style.add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn row_of(area: Rect, n: u32) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Ratio(1, n)).collect::<Vec<_>>())
        .split(area)
        .to_vec()
}

pub fn render_daily(frame: &mut Frame, area: Rect, totals: &DailyTotals) {
    let cells = row_of(area, 3);
    tile(frame, cells[0], "إجمالي المصلين", totals.worshippers, theme::blue());
    tile(frame, cells[1], "وجبات الإفطار", totals.iftar_meals, theme::gold());
    tile(frame, cells[2], "طلاب الحلقات", totals.circle_students, theme::green());
}

pub fn render_maintenance(frame: &mut Frame, area: Rect, totals: &MaintenanceTotals) {
    let cells = row_of(area, 3);
    tile(frame, cells[0], "أعمال النظافة", totals.cleaning_jobs, theme::blue());
    tile(frame, cells[1], "أعمال الصيانة", totals.maintenance_jobs, theme::amber());
    tile(frame, cells[2], "كراتين الماء", totals.water_cartons, theme::gold());
}

/// Review progress: one bar per status, scaled to the report count.
pub fn render_statuses(frame: &mut Frame, area: Rect, title: &str, counts: &StatusCounts, total: u64) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let mut lines = vec![Line::from("")];
    for status in ApprovalStatus::all() {
        let n = counts.get(status);
        lines.push(Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(progress_bar(n, total, 16), theme::status(status)),
            Span::styled(format!("  {:>4}  ", n), theme::bold()),
            Span::styled(status.as_str(), theme::status(status)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
