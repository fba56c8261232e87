use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;
use crate::utils::format::pad;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Cycled with ◀ ▶ rather than typed.
    Select,
    Text,
    Number,
}

#[derive(Debug, Clone)]
pub enum FormLine {
    Section(String),
    Field {
        label: String,
        value: String,
        kind: FieldKind,
        focused: bool,
        style: Style,
    },
}

const LABEL_WIDTH: usize = 28;

fn field_line(label: &str, value: &str, kind: FieldKind, focused: bool, style: Style) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused { theme::gold() } else { theme::dim() };
    let value_style = if focused { style.add_modifier(Modifier::BOLD) } else { style };

    let mut spans = vec![
        Span::styled(marker.to_string(), theme::gold()),
        Span::styled(pad(label, LABEL_WIDTH), label_style),
    ];
    match kind {
        FieldKind::Select => {
            spans.push(Span::styled("◀ ", theme::dim()));
            spans.push(Span::styled(value.to_string(), value_style));
            spans.push(Span::styled(" ▶", theme::dim()));
        }
        FieldKind::Text | FieldKind::Number => {
            spans.push(Span::styled(value.to_string(), value_style));
            if focused {
                spans.push(Span::styled("█", theme::amber()));
            }
        }
    }
    Line::from(spans)
}

pub fn render(frame: &mut Frame, area: Rect, title: &str, lines: &[FormLine], error: Option<&str>) {
    let mut text = vec![Line::from("")];
    let mut focused_at = 0;

    for line in lines {
        match line {
            FormLine::Section(name) => {
                text.push(Line::from(""));
                text.push(Line::from(Span::styled(
                    format!("  ─── {} ───", name),
                    theme::blue().add_modifier(Modifier::BOLD),
                )));
            }
            FormLine::Field { label, value, kind, focused, style } => {
                if *focused {
                    focused_at = text.len();
                }
                text.push(field_line(label, value, *kind, *focused, *style));
            }
        }
    }

    if let Some(err) = error {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
    }

    // keep the focused row inside the box
    let inner = area.height.saturating_sub(2) as usize;
    let scroll = (focused_at + 2).saturating_sub(inner) as u16;

    let border = if error.is_some() { theme::red() } else { theme::border(true) };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(theme::surface());

    frame.render_widget(Paragraph::new(text).block(block).scroll((scroll, 0)), area);
}
