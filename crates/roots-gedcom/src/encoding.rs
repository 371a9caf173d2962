//! Character set detection and decoding
//!
//! Order of precedence: byte-order mark, then the header's `1 CHAR` value,
//! then plain UTF-8. Bytes that are not valid in the chosen set fall back
//! to Windows-1252, the encoding most desktop genealogy tools actually
//! wrote when they claimed otherwise.

use roots_model::{Finding, FindingCode, Outcome, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character set a file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    /// UTF-8
    Utf8,
    /// UTF-16 little endian
    Utf16Le,
    /// UTF-16 big endian
    Utf16Be,
    /// Windows code page 1252
    Windows1252,
    /// ISO-8859-1
    Latin1,
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Windows1252 => "Windows-1252",
            Self::Latin1 => "ISO-8859-1",
        };
        f.write_str(name)
    }
}

/// Decoded text plus the set it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Text without byte-order mark
    pub text: String,
    /// Set used
    pub charset: Charset,
}

/// Windows-1252 code points for bytes 0x80..=0x9F
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decode raw bytes
///
/// Never fails; lossy paths leave a finding behind.
#[must_use]
pub fn decode(bytes: &[u8]) -> Outcome<Decoded> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return decode_utf8_or_fallback(rest, "byte-order mark");
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return decode_utf16(rest, Charset::Utf16Le);
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return decode_utf16(rest, Charset::Utf16Be);
    }
    if let Some(charset) = sniff_utf16(bytes) {
        return decode_utf16(bytes, charset);
    }

    let declared = declared_charset(bytes);
    match declared.as_deref() {
        Some("ANSI" | "IBM WINDOWS" | "IBMPC" | "WINDOWS-1252" | "WINDOWS" | "CP1252") => Outcome::new(Decoded {
            text: decode_single_byte(bytes, Charset::Windows1252),
            charset: Charset::Windows1252,
        }),
        Some("ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1") => Outcome::new(Decoded {
            text: decode_single_byte(bytes, Charset::Latin1),
            charset: Charset::Latin1,
        }),
        Some("ANSEL") => {
            // Many exporters write UTF-8 under an ANSEL header
            if let Ok(text) = std::str::from_utf8(bytes) {
                return Outcome::new(Decoded {
                    text: text.to_string(),
                    charset: Charset::Utf8,
                });
            }
            let mut out = Outcome::new(Decoded {
                text: decode_single_byte(bytes, Charset::Latin1),
                charset: Charset::Latin1,
            });
            out.push(
                Finding::new(
                    FindingCode::MalformedStructure,
                    "ANSEL text decoded as ISO-8859-1; combining diacritics may be misplaced",
                )
                .with_severity(Severity::Info),
            );
            out
        }
        Some(other) => decode_utf8_or_fallback(bytes, &format!("declared charset {other}")),
        None => decode_utf8_or_fallback(bytes, "undeclared charset"),
    }
}

fn decode_utf8_or_fallback(bytes: &[u8], context: &str) -> Outcome<Decoded> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Outcome::new(Decoded {
            text: text.to_string(),
            charset: Charset::Utf8,
        }),
        Err(err) => {
            tracing::warn!(offset = err.valid_up_to(), "invalid UTF-8, decoding as Windows-1252");
            let mut out = Outcome::new(Decoded {
                text: decode_single_byte(bytes, Charset::Windows1252),
                charset: Charset::Windows1252,
            });
            out.push(Finding::new(
                FindingCode::MalformedStructure,
                format!(
                    "invalid UTF-8 at byte {} ({context}); decoded as Windows-1252",
                    err.valid_up_to()
                ),
            ));
            out
        }
    }
}

fn decode_utf16(bytes: &[u8], charset: Charset) -> Outcome<Decoded> {
    let units = bytes.chunks_exact(2).map(|pair| match charset {
        Charset::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
        _ => u16::from_le_bytes([pair[0], pair[1]]),
    });

    let mut lossy = bytes.len() % 2 != 0;
    let text: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    let text = text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text);
    let mut out = Outcome::new(Decoded { text, charset });
    if lossy {
        out.push(Finding::new(
            FindingCode::MalformedStructure,
            format!("invalid {charset} sequences replaced"),
        ));
    }
    out
}

/// UTF-16 without BOM: `0` at an ASCII position of the first line
fn sniff_utf16(bytes: &[u8]) -> Option<Charset> {
    match bytes {
        [b'0', 0, ..] => Some(Charset::Utf16Le),
        [0, b'0', ..] => Some(Charset::Utf16Be),
        _ => None,
    }
}

fn decode_single_byte(bytes: &[u8], charset: Charset) -> String {
    bytes
        .iter()
        .map(|&b| match (charset, b) {
            (Charset::Windows1252, 0x80..=0x9F) => CP1252_HIGH[usize::from(b - 0x80)],
            _ => char::from(b),
        })
        .collect()
}

/// Upper-cased `1 CHAR` value from the header, if present
///
/// Scans ASCII-compatible bytes only up to the end of the header record.
#[must_use]
pub fn declared_charset(bytes: &[u8]) -> Option<String> {
    for (idx, raw) in bytes.split(|&b| b == b'\n' || b == b'\r').enumerate() {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, char::is_whitespace);
        let level = parts.next().unwrap_or_default();
        let tag = parts.next().unwrap_or_default();

        if level == "0" && idx > 0 && !tag.eq_ignore_ascii_case("HEAD") {
            break;
        }
        if level == "1" && tag.eq_ignore_ascii_case("CHAR") {
            return parts
                .next()
                .map(|v| v.trim().to_ascii_uppercase())
                .filter(|v| !v.is_empty());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8() {
        let out = decode("0 HEAD\n1 CHAR UTF-8\n1 NOTE Zoë\n".as_bytes());
        assert_eq!(out.value.charset, Charset::Utf8);
        assert!(out.value.text.contains("Zoë"));
        assert!(out.is_clean());
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"0 HEAD\n");
        let out = decode(&bytes);
        assert_eq!(out.value.text, "0 HEAD\n");
    }

    #[test]
    fn utf16_le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "0 HEAD\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let out = decode(&bytes);
        assert_eq!(out.value.charset, Charset::Utf16Le);
        assert_eq!(out.value.text, "0 HEAD\n");
    }

    #[test]
    fn utf16_be_without_bom() {
        let mut bytes = Vec::new();
        for unit in "0 HEAD\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        let out = decode(&bytes);
        assert_eq!(out.value.charset, Charset::Utf16Be);
        assert_eq!(out.value.text, "0 HEAD\n");
    }

    #[test]
    fn ansi_header_uses_cp1252() {
        let mut bytes = b"0 HEAD\n1 CHAR ANSI\n0 @I1@ INDI\n1 NAME Ren".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" \x93Q\x94\n");
        let out = decode(&bytes);
        assert_eq!(out.value.charset, Charset::Windows1252);
        assert!(out.value.text.contains("René \u{201C}Q\u{201D}"));
    }

    #[test]
    fn invalid_utf8_falls_back_with_warning() {
        let bytes = b"0 HEAD\n1 CHAR UTF-8\n1 NOTE caf\xE9\n";
        let out = decode(bytes);
        assert_eq!(out.value.charset, Charset::Windows1252);
        assert!(out.value.text.contains("café"));
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].severity, Severity::Warning);
    }

    #[test]
    fn ansel_falls_back_to_latin1_with_info() {
        let bytes = b"0 HEAD\n1 CHAR ANSEL\n1 NOTE \xE2\n";
        let out = decode(bytes);
        assert_eq!(out.value.charset, Charset::Latin1);
        assert_eq!(out.findings[0].severity, Severity::Info);
    }

    #[test]
    fn declared_charset_stops_after_header() {
        let bytes = b"0 HEAD\n1 SOUR X\n0 @I1@ INDI\n1 CHAR ANSI\n";
        assert_eq!(declared_charset(bytes), None);
        assert_eq!(
            declared_charset(b"0 HEAD\r\n1 CHAR ansi\r\n"),
            Some("ANSI".to_string())
        );
    }
}
