//! Popups drawn on top of whatever view is active.

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::theme;

fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        x: area.width / 4,
        y: area.height.saturating_sub(height) / 2,
        width: area.width / 2,
        height,
    }
}

pub fn render_loading(frame: &mut Frame) {
    let popup_area = centered(frame.area(), 5);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⏳ جاري معالجة البيانات...",
            theme::gold().add_modifier(Modifier::BOLD),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        popup_area,
    );
}

/// Transient message pinned to the bottom-right corner.
pub fn render_toast(frame: &mut Frame, message: &str, success: bool) {
    let area = frame.area();
    let width = (area.width / 2).max(20).min(area.width);
    let popup_area = Rect {
        x: area.width.saturating_sub(width + 1),
        y: area.height.saturating_sub(4),
        width,
        height: 3.min(area.height),
    };
    frame.render_widget(Clear, popup_area);

    let (icon, style) = if success {
        ("✓", theme::green())
    } else {
        ("✗", theme::red())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .style(theme::surface());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {} {}", icon, message), style)))
            .block(block),
        popup_area,
    );
}

pub fn render_admin_login(frame: &mut Frame, typed: &str) {
    let popup_area = centered(frame.area(), 6);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  كلمة مرور المسؤول: ", theme::dim()),
            Span::styled("•".repeat(typed.chars().count()), theme::gold().add_modifier(Modifier::BOLD)),
            Span::styled("█", theme::amber()),
        ]),
        Line::from(""),
        Line::from(Span::styled("  [Enter] دخول  ·  [Esc] إلغاء", theme::dim())),
    ];
    let block = Block::default()
        .title(Span::styled(" دخول المسؤول ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::amber())
        .style(theme::surface());

    frame.render_widget(Paragraph::new(text).block(block), popup_area);
}

pub fn render_help(frame: &mut Frame) {
    let area = frame.area();
    let popup_area = Rect {
        x: area.width / 4,
        y: area.height / 6,
        width: area.width / 2,
        height: (area.height * 2 / 3).min(22),
    };
    frame.render_widget(Clear, popup_area);

    let bindings = [
        ("[d]", "رفع تقرير يومي"),
        ("[m]", "رفع تقرير نظافة وصيانة"),
        ("[l]", "سجلات الأنشطة الميدانية"),
        ("[w]", "سجلات الصيانة"),
        ("[g]", "تحديث البيانات"),
        ("[a]", "دخول/خروج المسؤول"),
        ("[/]", "بحث في السجلات"),
        ("[Enter]", "فتح السجل / حفظ النموذج"),
        ("[◀ ▶]", "تغيير الاختيار"),
        ("[↑ ↓ Tab]", "التنقل بين الحقول"),
        ("[Esc]", "رجوع / خروج"),
    ];

    let mut lines = vec![
        Line::from(Span::styled("  اختصارات لوحة المفاتيح", theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    for (key, label) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), theme::gold()),
            Span::styled(label, theme::dim()),
        ]));
    }

    let block = Block::default()
        .title(Span::styled(" مساعدة ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
