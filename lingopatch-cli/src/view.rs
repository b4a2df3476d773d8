use lingopatch::github::Issue;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest value shown before truncating, in terminal columns.
pub const DEFAULT_MAX_WIDTH: usize = 50;

/// Cut `value` to at most `max_width` columns, marking the cut with `...`.
pub fn truncate_to_width(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut out = String::new();
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Pad `value` with spaces to `width` columns.
pub fn pad_to_width(value: &str, width: usize) -> String {
    let current = value.width();
    if current >= width {
        value.to_string()
    } else {
        format!("{}{}", value, " ".repeat(width - current))
    }
}

fn shown(value: &str, full: bool) -> String {
    if full {
        value.to_string()
    } else {
        truncate_to_width(value, DEFAULT_MAX_WIDTH)
    }
}

/// One line per issue: number, title.
pub fn print_issues(issues: &[Issue], full: bool) {
    if issues.is_empty() {
        println!("No matching issues");
        return;
    }
    let number_width = issues
        .iter()
        .map(|issue| format!("#{}", issue.number).width())
        .max()
        .unwrap_or(0);
    for issue in issues {
        println!(
            "{}  {}",
            pad_to_width(&format!("#{}", issue.number), number_width),
            shown(&issue.title, full)
        );
    }
    println!("\n{} issue(s)", issues.len());
}

/// One requested string next to its current translation.
pub struct StringRow {
    pub string_id: String,
    pub requested: String,
    pub current: Option<String>,
    /// Whether `current` comes from the local edit cache.
    pub edited: bool,
    pub removal: bool,
}

pub fn print_string_rows(rows: &[StringRow], full: bool) {
    for row in rows {
        let marker = match (row.removal, row.edited) {
            (true, _) => " (remove)",
            (false, true) => " (edited)",
            (false, false) => "",
        };
        println!("\n{}{}", row.string_id, marker);
        println!("    Source: {}", shown(&row.requested, full));
        match &row.current {
            Some(current) => println!("    Current: {}", shown(current, full)),
            None => println!("    Current: <missing>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("0123456789abc", 10), "0123456...");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character takes two columns.
        let value = "中文字符串很长";
        let truncated = truncate_to_width(value, 8);
        assert_eq!(truncated, "中文...");
        assert!(truncated.width() <= 8);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("#1", 4), "#1  ");
        assert_eq!(pad_to_width("#1234", 4), "#1234");
    }
}
