//! Physical line tokenizer
//!
//! Splits decoded text into [`GedcomLine`]s of shape
//! `LEVEL [@XREF@ ] TAG [VALUE]`. Lines that do not match are treated as
//! stray text belonging to the previous line's value (the most common
//! real-world breakage: an editor wrapped a long value without `CONT`).

use once_cell::sync::Lazy;
use regex::Regex;
use roots_model::{Finding, FindingCode, Outcome};

/// Continuation tag joined without separator
pub const CONC: &str = "CONC";
/// Continuation tag joined with a newline
pub const CONT: &str = "CONT";

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)[ \t]+(?:(@[^@\s]+@)[ \t]+)?([A-Za-z0-9_]+)(?:[ \t](.*))?$")
        .unwrap_or_else(|e| unreachable!("line grammar is a valid regex: {e}"))
});

/// One tokenized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomLine {
    /// 1-based line number in the decoded text
    pub number: usize,
    /// Nesting level
    pub level: u32,
    /// Defining cross-reference id (`@I1@`), when present
    pub xref: Option<String>,
    /// Tag, upper-cased
    pub tag: String,
    /// Value after the tag, when non-empty
    pub value: Option<String>,
}

impl GedcomLine {
    /// Create line
    #[must_use]
    pub fn new(level: u32, tag: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            number: 0,
            level,
            xref: None,
            tag: tag.into(),
            value: value.map(str::to_string),
        }
    }

    /// Set defining cross-reference id
    #[inline]
    #[must_use]
    pub fn with_xref(mut self, xref: impl Into<String>) -> Self {
        self.xref = Some(xref.into());
        self
    }

    /// Set line number
    #[inline]
    #[must_use]
    pub fn at(mut self, number: usize) -> Self {
        self.number = number;
        self
    }

    /// Parse one physical line; `None` when it does not match the grammar
    #[must_use]
    pub fn parse(raw: &str, number: usize) -> Option<Self> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        let caps = LINE_RE.captures(raw)?;
        let level = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let value = caps
            .get(4)
            .map(|m| m.as_str().trim_end_matches('\r'))
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Some(Self {
            number,
            level,
            xref: caps.get(2).map(|m| m.as_str().to_string()),
            tag: caps.get(3)?.as_str().to_ascii_uppercase(),
            value,
        })
    }

    /// Whether this is a `CONC` or `CONT` line
    #[inline]
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.tag == CONC || self.tag == CONT
    }

    /// Value as `&str` (empty when absent)
    #[inline]
    #[must_use]
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Render as a single physical line (value newlines are not split)
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.level.to_string();
        if let Some(xref) = &self.xref {
            out.push(' ');
            out.push_str(xref);
        }
        out.push(' ');
        out.push_str(&self.tag);
        if let Some(value) = &self.value {
            out.push(' ');
            out.push_str(value);
        }
        out
    }

    /// Render with `CONT` for embedded newlines and `CONC` for long values
    ///
    /// Normalizing the result reproduces this line's value exactly.
    #[must_use]
    pub fn to_physical_lines(&self, max_value_len: usize) -> Vec<String> {
        let max = max_value_len.max(1);
        let value = self.value_str();
        let mut out = Vec::new();

        for (i, segment) in value.split('\n').enumerate() {
            let chunks = split_chars(segment, max);
            for (j, chunk) in chunks.iter().enumerate() {
                let line = match (i, j) {
                    (0, 0) => {
                        let mut head = self.clone();
                        head.value = Some(chunk.clone()).filter(|c| !c.is_empty());
                        head
                    }
                    (_, 0) => GedcomLine::new(self.level + 1, CONT, Some(chunk.as_str())),
                    _ => GedcomLine::new(self.level + 1, CONC, Some(chunk.as_str())),
                };
                out.push(line.render());
            }
        }
        out
    }
}

/// Split into chunks of at most `max` chars, keeping at least one chunk
fn split_chars(s: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}

/// Extract the id from a pointer value (`@F1@` → `@F1@`)
///
/// Escaped at-signs (`@@`) and values with text around the pointer are not
/// pointers.
#[must_use]
pub fn as_pointer(value: &str) -> Option<&str> {
    let v = value.trim();
    let inner = v.strip_prefix('@')?.strip_suffix('@')?;
    if inner.is_empty() || inner.contains('@') || inner.contains(char::is_whitespace) {
        return None;
    }
    Some(v)
}

/// Tokenize decoded text
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings. Blank lines are
/// skipped; non-matching lines are appended to the previous value with a
/// `MalformedStructure` warning, or dropped when nothing precedes them.
#[must_use]
pub fn tokenize(text: &str) -> Outcome<Vec<GedcomLine>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut out = Outcome::new(Vec::<GedcomLine>::new());

    for (idx, raw) in split_lines(text).enumerate() {
        let number = idx + 1;
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        if raw.trim().is_empty() {
            continue;
        }

        if let Some(line) = GedcomLine::parse(raw, number) {
            out.value.push(line);
            continue;
        }

        let stray = raw.trim();
        match out.value.last_mut() {
            Some(prev) => {
                let joined = match prev.value.take() {
                    Some(v) => format!("{v}\n{stray}"),
                    None => stray.to_string(),
                };
                prev.value = Some(joined);
                let prev_number = prev.number;
                out.push(
                    Finding::new(
                        FindingCode::MalformedStructure,
                        format!("line does not match the record grammar; appended to line {}", prev_number),
                    )
                    .with_line(number),
                );
            }
            None => out.push(
                Finding::new(
                    FindingCode::MalformedStructure,
                    "text before the first record line was dropped",
                )
                .with_line(number),
            ),
        }
    }

    out
}

/// `lines()` covers `\n` and `\r\n`; old Mac exports use bare `\r`
fn split_lines(text: &str) -> Box<dyn Iterator<Item = &str> + '_> {
    if text.contains('\n') {
        Box::new(text.lines())
    } else {
        Box::new(text.split('\r'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_definition() {
        let line = GedcomLine::parse("0 @I1@ INDI", 1).unwrap();
        assert_eq!(line.level, 0);
        assert_eq!(line.xref.as_deref(), Some("@I1@"));
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.value, None);
    }

    #[test]
    fn parses_value_and_keeps_leading_space() {
        let line = GedcomLine::parse("2 CONC  world", 4).unwrap();
        assert_eq!(line.tag, "CONC");
        assert_eq!(line.value.as_deref(), Some(" world"));
        assert_eq!(line.number, 4);
    }

    #[test]
    fn lowercase_tags_are_upcased() {
        let line = GedcomLine::parse("1 name John /Smith/", 1).unwrap();
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value.as_deref(), Some("John /Smith/"));
    }

    #[test]
    fn rejects_non_grammar() {
        assert!(GedcomLine::parse("John Smith", 1).is_none());
        assert!(GedcomLine::parse("X NAME", 1).is_none());
    }

    #[test]
    fn pointer_detection() {
        assert_eq!(as_pointer("@F1@"), Some("@F1@"));
        assert_eq!(as_pointer(" @N12@ "), Some("@N12@"));
        assert_eq!(as_pointer("@@"), None);
        assert_eq!(as_pointer("see @F1@"), None);
        assert_eq!(as_pointer("@a b@"), None);
    }

    #[test]
    fn stray_line_joins_previous_value() {
        let out = tokenize("0 @N1@ NOTE first\nsecond part\n0 TRLR\n");
        assert_eq!(out.value.len(), 2);
        assert_eq!(out.value[0].value.as_deref(), Some("first\nsecond part"));
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].line, Some(2));
    }

    #[test]
    fn leading_garbage_is_dropped() {
        let out = tokenize("garbage\n0 HEAD\n");
        assert_eq!(out.value.len(), 1);
        assert_eq!(out.findings[0].code, FindingCode::MalformedStructure);
    }

    #[test]
    fn handles_crlf_and_bom() {
        let out = tokenize("\u{feff}0 HEAD\r\n1 CHAR UTF-8\r\n");
        assert_eq!(out.value.len(), 2);
        assert_eq!(out.value[1].value.as_deref(), Some("UTF-8"));
        assert!(out.is_clean());
        assert_eq!(out.value[1].number, 2);
    }

    #[test]
    fn bare_carriage_returns_split_lines() {
        let out = tokenize("0 HEAD\r1 CHAR ANSI\r0 TRLR");
        assert_eq!(out.value.len(), 3);
        assert_eq!(out.value[2].number, 3);
    }

    #[test]
    fn physical_lines_split_newlines_and_long_values() {
        let line = GedcomLine::new(1, "NOTE", Some("abcdef\nxy"));
        let lines = line.to_physical_lines(4);
        assert_eq!(lines, vec!["1 NOTE abcd", "2 CONC ef", "2 CONT xy"]);
    }
}
