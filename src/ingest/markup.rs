//! HTML cleanup for free-text columns.
//!
//! Comments and facility updates arrive as rich-text HTML fragments. They
//! are flattened to plain text with one line per paragraph or break, and a
//! blank line in front of each timestamped comment entry.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::{Column, ProjectRecord};

/// Free-text columns that may carry markup.
pub const MARKUP_COLUMNS: [Column; 2] = [Column::Comments, Column::FacilityUpdates];

static BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p\s*>").expect("valid break regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex"));
// "jdoe 08-01-25 14:03:22" at the start of a line opens a new comment entry.
static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(\w+\s+\d{2}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})").expect("valid entry regex")
});

fn decode_entity(caps: &Captures<'_>) -> String {
    let name = &caps[1];
    let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => None,
        }
    };
    decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
}

/// Flatten an HTML fragment to plain text.
pub fn clean_markup(raw: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(raw, "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, "");
    let text = ENTITY_RE.replace_all(&without_tags, decode_entity);

    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    ENTRY_RE.replace_all(&joined, "\n\n$1").trim().to_string()
}

/// Clean every markup column of a record in place; empty results become null.
pub fn clean_record(record: &mut ProjectRecord) {
    for column in MARKUP_COLUMNS {
        if let Some(slot) = record.text_mut(column) {
            if let Some(value) = slot.take() {
                let cleaned = clean_markup(&value);
                *slot = (!cleaned.is_empty()).then_some(cleaned);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_and_paragraphs_become_lines() {
        let raw = "<p>First line</p><p>Second<br>Third<BR/>Fourth</p>";
        assert_eq!(clean_markup(raw), "First line\nSecond\nThird\nFourth");
    }

    #[test]
    fn entities_are_decoded_after_tags_are_removed() {
        let raw = "<div>a &lt;b&gt; &amp; c&nbsp;&#39;d&#x27;</div>";
        assert_eq!(clean_markup(raw), "a <b> & c 'd'");
    }

    #[test]
    fn unknown_entities_pass_through() {
        assert_eq!(clean_markup("x &bogus; y"), "x &bogus; y");
    }

    #[test]
    fn blank_lines_and_padding_are_dropped() {
        assert_eq!(clean_markup("  one  \n\n   \n two "), "one\ntwo");
    }

    #[test]
    fn comment_entries_are_separated() {
        let raw = "<p>jdoe 08-01-25 09:15:00</p><p>Sent config</p><p>asmith 08-04-25 10:00:01</p><p>Rules pushed</p>";
        assert_eq!(
            clean_markup(raw),
            "jdoe 08-01-25 09:15:00\nSent config\n\nasmith 08-04-25 10:00:01\nRules pushed"
        );
    }

    #[test]
    fn clean_record_touches_only_markup_columns() {
        let mut record = ProjectRecord {
            comments: Some("<p>hello</p>".to_string()),
            facility_updates: Some("<br/>".to_string()),
            facility: Some("<b>Main</b>".to_string()),
            ..ProjectRecord::new("1", "Design")
        };
        clean_record(&mut record);
        assert_eq!(record.comments.as_deref(), Some("hello"));
        assert_eq!(record.facility_updates, None);
        assert_eq!(record.facility.as_deref(), Some("<b>Main</b>"));
    }
}
