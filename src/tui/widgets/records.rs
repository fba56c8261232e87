use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{MaintenanceRecord, MosqueRecord};
use crate::tui::theme;
use crate::utils::format::pad;

fn block(title: &str, count: usize) -> Block<'static> {
    Block::default()
        .title(Span::styled(format!(" {} ({}) ", title, count), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface())
}

fn render_list<'a>(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    header: Line<'a>,
    mut items: Vec<ListItem<'a>>,
    selected: usize,
) {
    let empty = items.is_empty();
    if empty {
        items.push(ListItem::new(Line::from(Span::styled(
            "  لا توجد سجلات مطابقة",
            theme::dim(),
        ))));
    }
    items.insert(0, ListItem::new(header));

    let mut state = ListState::default();
    if !empty {
        state.select(Some(selected + 1));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::gold().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_daily(frame: &mut Frame, area: Rect, rows: &[&MosqueRecord], selected: usize, admin: bool) {
    let action = if admin { "مراجعة واعتماد" } else { "تعديل" };
    let header = Line::from(Span::styled(
        format!("  {}{}{}{}", pad("المسجد", 26), pad("اليوم", 18), pad("المصلين", 10), "الحالة"),
        theme::dim().add_modifier(Modifier::UNDERLINED),
    ));

    let items = rows
        .iter()
        .map(|r| {
            let status = r.status();
            let label = r.approval.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(status.as_str());
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {}", pad(&r.mosque_name, 26)), theme::bold()),
                Span::styled(pad(&r.label_day, 18), theme::blue()),
                Span::styled(pad(&r.worshippers().to_string(), 10), theme::bold()),
                Span::styled(label.to_string(), theme::status(status)),
            ]))
        })
        .collect();

    render_list(frame, area, block(&format!("سجلات الأنشطة الميدانية · Enter {}", action), rows.len()), header, items, selected);
}

pub fn render_maintenance(frame: &mut Frame, area: Rect, rows: &[&MaintenanceRecord], selected: usize, admin: bool) {
    let action = if admin { "اعتماد" } else { "تعديل" };
    let header = Line::from(Span::styled(
        format!("  {}{}{}{}", pad("المسجد", 26), pad("اليوم", 18), pad("أعمال صيانة", 12), "الحالة"),
        theme::dim().add_modifier(Modifier::UNDERLINED),
    ));

    let items = rows
        .iter()
        .map(|r| {
            let status = r.status();
            let label = r.approval.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("تحت التدقيق");
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {}", pad(&r.mosque_name, 26)), theme::bold()),
                Span::styled(pad(&r.day_label, 18), theme::blue()),
                Span::styled(pad(&r.maintenance_jobs.to_string(), 12), theme::bold()),
                Span::styled(label.to_string(), theme::status(status)),
            ]))
        })
        .collect();

    render_list(frame, area, block(&format!("لوحة تحكم الصيانة · Enter {}", action), rows.len()), header, items, selected);
}

pub fn render_search(frame: &mut Frame, area: Rect, term: &str, active: bool) {
    let mut spans = vec![Span::styled("  🔍 ", theme::dim())];
    if term.is_empty() && !active {
        spans.push(Span::styled("[/] بحث باسم المسجد", theme::dim()));
    } else {
        spans.push(Span::styled(term.to_string(), theme::gold().add_modifier(Modifier::BOLD)));
        if active {
            spans.push(Span::styled("█", theme::amber()));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(active))
        .style(theme::surface());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn lists_render_with_header_and_rows() {
        let row = MosqueRecord {
            mosque_name: "Noor".into(),
            label_day: "Day 3".into(),
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
        terminal
            .draw(|f| render_daily(f, f.area(), &[&row], 0, false))
            .unwrap();
        let text = screen(&terminal);
        assert!(text.contains("(1)"));
        assert!(text.contains("Noor"));

        terminal
            .draw(|f| render_maintenance(f, f.area(), &[], 0, true))
            .unwrap();
        assert!(screen(&terminal).contains("(0)"));
    }
}
