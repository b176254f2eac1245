//! Encoding detection for snapshot files.
//!
//! Spreadsheet tools and database exporters save CSV in whatever encoding the
//! host prefers. Reading handles:
//! - BOM detection (UTF-8, UTF-16 LE/BE), with the BOM removed from the text
//! - UTF-8 fast path with strict validation
//! - Fallback detection using chardetng
//! - Replacement characters as the last resort

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

const DEFAULT_SAMPLE_SIZE: usize = 8192;
const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// Detect the encoding label of a byte buffer.
///
/// Strategy:
/// 1. BOM markers first
/// 2. Strict UTF-8 on a leading sample
/// 3. chardetng guess for everything else
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if valid_utf8_prefix(sample) {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// A sample cut mid-character is still UTF-8 if only the tail is incomplete.
fn valid_utf8_prefix(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// Decode file bytes to text, returning the content and the encoding name used.
///
/// An explicit `encoding` label wins when it is known to encoding_rs;
/// otherwise the encoding is detected. Invalid sequences are replaced
/// rather than failing the read.
pub fn decode_bytes(bytes: &[u8], encoding: Option<&str>) -> (String, String) {
    // Strict UTF-8 first (most exports are UTF-8)
    if encoding.is_none() {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if let Ok(text) = std::str::from_utf8(body) {
            return (text.to_string(), "utf-8".to_string());
        }
    }

    let chosen = encoding
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or_else(|| detect_encoding(bytes));

    // `decode` sniffs and strips any BOM itself.
    let (decoded, used, _had_errors) = chosen.decode(bytes);
    (decoded.into_owned(), used.name().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8() {
        assert_eq!(detect_encoding("Defect ID,Project State".as_bytes()), UTF_8);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Defect ID,Project State\n".as_bytes());

        let (content, encoding) = decode_bytes(&bytes, None);
        assert!(content.starts_with("Defect ID"));
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_windows_1252_fallback() {
        let text = "Facility,Comments\nMontréal,Le café était déjà fermé à côté de l'hôpital\n";
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(text);
        let (content, encoding) = decode_bytes(&bytes, None);
        assert_eq!(content, text);
        assert_eq!(encoding, "windows-1252");
    }

    #[test]
    fn test_explicit_encoding() {
        let bytes = [b'C', b'a', b'f', 0xe9];
        let (content, encoding) = decode_bytes(&bytes, Some("latin1"));
        assert_eq!(content, "Café");
        assert_eq!(encoding, "windows-1252");
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let bytes = [b'O', b'K', 0xff, 0xfe, 0xfd];
        let (content, _) = decode_bytes(&bytes, Some("utf-8"));
        assert!(content.starts_with("OK"));
        assert!(content.contains('\u{fffd}'));
    }
}
