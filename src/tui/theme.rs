use ratatui::style::{Color, Modifier, Style};

// Navy, field blue and gold of the program's printed material
pub const BG: Color = Color::Rgb(8, 20, 36);
pub const SURFACE: Color = Color::Rgb(14, 32, 56);
pub const BORDER: Color = Color::Rgb(40, 70, 104);
pub const TEXT: Color = Color::Rgb(226, 232, 240);
pub const TEXT_DIM: Color = Color::Rgb(122, 146, 172);
pub const GOLD: Color = Color::Rgb(197, 160, 89);
pub const BLUE: Color = Color::Rgb(64, 140, 220);
pub const GREEN: Color = Color::Rgb(74, 170, 120);
pub const AMBER: Color = Color::Rgb(224, 150, 60);
pub const RED: Color = Color::Rgb(210, 80, 70);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn blue() -> Style {
    Style::default().fg(BLUE)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border(focused: bool) -> Style {
    if focused {
        gold()
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn status(status: crate::models::ApprovalStatus) -> Style {
    use crate::models::ApprovalStatus;
    match status {
        ApprovalStatus::Approved => green(),
        ApprovalStatus::Rejected => red(),
        ApprovalStatus::Resubmit => amber(),
        ApprovalStatus::Pending => dim(),
    }
}
