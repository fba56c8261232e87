use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, title: &str, season_year: u32, hijri_str: &str, admin: bool) {
    let gregorian_str = Local::now().format("%A, %b %d, %Y").to_string();

    let mut title_spans = vec![
        Span::styled(format!("  {}  ", title), theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled(format!("رمضان {}هـ", season_year), theme::blue()),
    ];
    if admin {
        title_spans.push(Span::styled("  ·  وضع المسؤول مفعل 🔐", theme::amber()));
    }

    let date_line = Line::from(vec![
        Span::styled(hijri_str, theme::gold()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian_str, theme::dim()),
    ]);

    let text = vec![Line::from(title_spans), Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
