//! Small shared helpers.

pub mod encoding;
pub mod hashing;

use unicode_width::UnicodeWidthStr;

pub use encoding::decode_bytes;
pub use hashing::content_digest;

/// `1234567` -> `"1,234,567"`.
pub fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Right-pad `text` to `width` terminal columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(pad))
}

/// Cut `text` to at most `width` columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1000), "1,000");
        assert_eq!(format_with_commas(1234567), "1,234,567");
    }

    #[test]
    fn padding_counts_wide_characters() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(display_width(&pad_right("日本", 6)), 6);
        assert_eq!(pad_right("toolong", 3), "toolong");
    }

    #[test]
    fn truncation_marks_the_cut() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("a very long comment", 8);
        assert_eq!(cut, "a very …");
        assert!(display_width(&cut) <= 8);
    }
}
