//! Tag tree parser
//!
//! Builds a tree from normalized lines with a stack of open nodes under a
//! virtual root at level -1. Every child ends up exactly one level below
//! its parent: a line that skips levels is pulled up to `parent + 1` and
//! reported.

use crate::line::{as_pointer, GedcomLine};
use roots_model::{Finding, FindingCode, Outcome};

/// One node of the tag tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    /// Level (-1 for the virtual root)
    pub level: i32,
    /// Defining cross-reference id
    pub xref: Option<String>,
    /// Tag
    pub tag: String,
    /// Normalized value
    pub value: Option<String>,
    /// Source line number
    pub line: usize,
    /// Child records in file order
    pub children: Vec<TagRecord>,
}

impl TagRecord {
    fn root() -> Self {
        Self {
            level: -1,
            xref: None,
            tag: String::new(),
            value: None,
            line: 0,
            children: Vec::new(),
        }
    }

    fn from_line(line: GedcomLine, level: i32) -> Self {
        Self {
            level,
            xref: line.xref,
            tag: line.tag,
            value: line.value,
            line: line.number,
            children: Vec::new(),
        }
    }

    /// First child with tag
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&TagRecord> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with tag
    pub fn children_with<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TagRecord> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Trimmed value of the first child with tag, if non-empty
    #[must_use]
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(TagRecord::text)
    }

    /// Trimmed value, if non-empty
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Value as a pointer (`@X1@`)
    #[must_use]
    pub fn pointer(&self) -> Option<&str> {
        self.value.as_deref().and_then(as_pointer)
    }

    /// Depth-first lines of this node and its descendants
    ///
    /// The virtual root itself is not emitted.
    #[must_use]
    pub fn to_lines(&self) -> Vec<GedcomLine> {
        let mut out = Vec::new();
        self.collect_lines(&mut out);
        out
    }

    fn collect_lines(&self, out: &mut Vec<GedcomLine>) {
        if let Ok(level) = u32::try_from(self.level) {
            out.push(GedcomLine {
                number: self.line,
                level,
                xref: self.xref.clone(),
                tag: self.tag.clone(),
                value: self.value.clone(),
            });
        }
        for child in &self.children {
            child.collect_lines(out);
        }
    }
}

/// Parsed tag tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTree {
    root: TagRecord,
}

impl TagTree {
    /// Top-level records in file order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TagRecord] {
        &self.root.children
    }

    /// Virtual root (level -1)
    #[inline]
    #[must_use]
    pub fn root(&self) -> &TagRecord {
        &self.root
    }

    /// Number of top-level records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.children.len()
    }

    /// No records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Depth-first serialization back to lines
    #[must_use]
    pub fn to_lines(&self) -> Vec<GedcomLine> {
        self.root.to_lines()
    }
}

/// Build the tag tree from normalized lines
#[must_use]
pub fn parse(lines: Vec<GedcomLine>) -> Outcome<TagTree> {
    let mut findings = Vec::new();
    let mut stack: Vec<TagRecord> = vec![TagRecord::root()];

    for line in lines {
        let declared = i32::try_from(line.level).unwrap_or(i32::MAX);

        while stack.len() > 1 && stack.last().is_some_and(|top| top.level >= declared) {
            close_top(&mut stack);
        }

        let parent_level = stack.last().map_or(-1, |top| top.level);
        let level = if declared > parent_level + 1 {
            findings.push(
                Finding::new(
                    FindingCode::MalformedStructure,
                    format!(
                        "level {declared} {} follows level {parent_level}; treated as level {}",
                        line.tag,
                        parent_level + 1
                    ),
                )
                .with_line(line.number),
            );
            parent_level + 1
        } else {
            declared
        };

        stack.push(TagRecord::from_line(line, level));
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }

    let root = stack.pop().unwrap_or_else(TagRecord::root);
    tracing::debug!(records = root.children.len(), "parsed tag tree");
    Outcome::with_findings(TagTree { root }, findings)
}

fn close_top(stack: &mut Vec<TagRecord>) {
    if let Some(node) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        }
    }
}
