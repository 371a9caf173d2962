//! Textual link parsing
//!
//! Accepts wikilinks (`[[People/John Smith|Dad]]`), bare names
//! (`John Smith`) and relative paths (`People/John Smith.md`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static WIKILINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\[\]]+)\]\]").unwrap_or_else(|e| unreachable!("wikilink pattern is a valid regex: {e}"))
});

/// Parsed link target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkText {
    /// Target without brackets, alias, heading or `.md` extension
    pub target: String,
    /// Display override after `|`
    pub alias: Option<String>,
}

impl LinkText {
    /// Parse one link; `None` for blank input
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut text = raw.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
        if let Some(inner) = text.strip_prefix("[[").and_then(|t| t.strip_suffix("]]")) {
            text = inner;
        }

        let (target, alias) = match text.split_once('|') {
            Some((target, alias)) => (target, Some(alias.trim().to_string()).filter(|a| !a.is_empty())),
            None => (text, None),
        };
        let target = target.split('#').next().unwrap_or_default().trim();
        let target = strip_md(&target.replace('\\', "/"));
        let target = target.trim_start_matches("./").trim_matches('/').trim().to_string();

        if target.is_empty() {
            return None;
        }
        Some(Self { target, alias })
    }

    /// Every link in a field value
    ///
    /// Values holding one or more `[[...]]` yield each of them; any other
    /// value is a single bare link.
    #[must_use]
    pub fn parse_all(raw: &str) -> Vec<Self> {
        let embedded: Vec<Self> = WIKILINK_RE
            .captures_iter(raw)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| Self::parse(m.as_str()))
            .collect();
        if embedded.is_empty() {
            Self::parse(raw).into_iter().collect()
        } else {
            embedded
        }
    }

    /// Whether the target names a folder path
    #[inline]
    #[must_use]
    pub fn has_path(&self) -> bool {
        self.target.contains('/')
    }

    /// Last path segment (the document's base name)
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.target.rsplit('/').next().unwrap_or(&self.target)
    }
}

impl fmt::Display for LinkText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "[[{}|{}]]", self.target, alias),
            None => write!(f, "[[{}]]", self.target),
        }
    }
}

/// Wikilink for a target
#[must_use]
pub fn wikilink(target: &str) -> String {
    format!("[[{}]]", strip_md(target.trim()))
}

/// Lookup key for names: trimmed, lower-cased, single-spaced
#[must_use]
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_md(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    if lower.ends_with(".md") {
        s.get(..s.len() - 3).unwrap_or(s).to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wikilink_with_alias_and_heading() {
        let link = LinkText::parse("[[People/John Smith#Early life|Dad]]").unwrap();
        assert_eq!(link.target, "People/John Smith");
        assert_eq!(link.alias.as_deref(), Some("Dad"));
        assert!(link.has_path());
        assert_eq!(link.base_name(), "John Smith");
    }

    #[test]
    fn bare_name_and_extension() {
        let link = LinkText::parse("  John Smith.MD ").unwrap();
        assert_eq!(link.target, "John Smith");
        assert!(!link.has_path());
    }

    #[test]
    fn quoted_wikilink() {
        let link = LinkText::parse("\"[[Jane Doe]]\"").unwrap();
        assert_eq!(link.target, "Jane Doe");
    }

    #[test]
    fn blank_is_none() {
        assert!(LinkText::parse("   ").is_none());
        assert!(LinkText::parse("[[]]").is_none());
        assert!(LinkText::parse("[[#heading]]").is_none());
    }

    #[test]
    fn several_links_in_one_value() {
        let links = LinkText::parse_all("[[A]], [[B|bee]]");
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].target, "B");
    }

    #[test]
    fn name_keys_fold_case_and_space() {
        assert_eq!(name_key("  John   SMITH "), "john smith");
    }

    #[test]
    fn display_round_trip() {
        let link = LinkText::parse("[[X|y]]").unwrap();
        assert_eq!(link.to_string(), "[[X|y]]");
        assert_eq!(wikilink("People/A.md"), "[[People/A]]");
    }
}
