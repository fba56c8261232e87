use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Arabic-Indic digits with `٬` thousands grouping, the way the dashboard
/// tiles show counts.
pub fn arabic_number(n: u64) -> String {
    let ascii = n.to_string();
    let mut out = String::new();
    for (i, c) in ascii.chars().enumerate() {
        if i > 0 && (ascii.len() - i) % 3 == 0 {
            out.push('٬');
        }
        let digit = c.to_digit(10).unwrap_or(0);
        out.push(char::from_u32(0x0660 + digit).unwrap_or(c));
    }
    out
}

/// Left-align `s` in a column of `width` terminal cells, truncating with
/// an ellipsis if it does not fit.
pub fn pad(s: &str, width: usize) -> String {
    let w = s.width();
    if w <= width {
        return format!("{}{}", s, " ".repeat(width - w));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw + 1 > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push('…');
    used += 1;
    format!("{}{}", out, " ".repeat(width.saturating_sub(used)))
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u64, total: u64, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// "2026-02-20T17:30:00.042+00:00" → "2026-02-20 17:30". Unknown shapes pass through.
pub fn short_timestamp(s: &str) -> String {
    match crate::report::filter::parse_timestamp(s) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arabic_digits_with_grouping() {
        assert_eq!(arabic_number(0), "٠");
        assert_eq!(arabic_number(999), "٩٩٩");
        assert_eq!(arabic_number(1234567), "١٬٢٣٤٬٥٦٧");
    }

    #[test]
    fn pad_fits_column() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abc…");
        assert_eq!(pad("جامع", 6).width(), 6);
    }

    #[test]
    fn progress_bar_handles_empty_total() {
        assert_eq!(progress_bar(0, 0, 4), "░░░░");
        assert_eq!(progress_bar(1, 2, 4), "██░░");
        assert_eq!(progress_bar(5, 2, 2), "██");
    }

    #[test]
    fn short_timestamp_formats_known_shapes() {
        assert_eq!(short_timestamp("2026-02-20T17:30:00.042+00:00"), "2026-02-20 17:30");
        assert_eq!(short_timestamp("أمس"), "أمس");
    }
}
