//! File-system document store
//!
//! Person documents are Markdown files under a root folder, metadata in a
//! YAML frontmatter block:
//!
//! ```text
//! ---
//! cr_type: person
//! cr_id: 7d0c...
//! ---
//! # John Smith
//! ```
//!
//! Changes are found by comparing modification times against the last
//! scan; the store's own writes are queued directly so they are never
//! missed on coarse-grained clocks. A rename shows up as a delete plus a
//! create.

use roots_model::{ChangeEvent, ChangeKind, Document, DocumentSink, DocumentStore, Location, Metadata, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const FENCE: &str = "---";

/// Markdown documents under a root folder
#[derive(Debug)]
pub(crate) struct FsStore {
    root: PathBuf,
    seen: BTreeMap<Location, Option<SystemTime>>,
    pending: Vec<ChangeEvent>,
}

impl FsStore {
    /// Open a store, creating the root folder if needed
    pub(crate) fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io_error(Location::new(root.to_string_lossy()), e))?;
        let mut store = Self {
            root,
            seen: BTreeMap::new(),
            pending: Vec::new(),
        };
        store.seen = store.scan()?;
        Ok(store)
    }

    fn path_of(&self, location: &Location) -> PathBuf {
        location
            .as_str()
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    fn scan(&self) -> Result<BTreeMap<Location, Option<SystemTime>>, StoreError> {
        let mut found = BTreeMap::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let entries = fs::read_dir(&dir).map_err(|e| StoreError::io_error(self.location_of(&dir), e))?;
            for entry in entries {
                let entry = entry.map_err(|e| StoreError::io_error(self.location_of(&dir), e))?;
                let path = entry.path();
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                if hidden {
                    continue;
                }
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "md") {
                    let modified = entry.metadata().and_then(|m| m.modified()).ok();
                    found.insert(self.location_of(&path), modified);
                }
            }
        }
        Ok(found)
    }

    fn location_of(&self, path: &Path) -> Location {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Location::new(parts.join("/"))
    }

    fn read_text(&self, location: &Location) -> Result<String, StoreError> {
        fs::read_to_string(self.path_of(location)).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(location.clone()),
            _ => StoreError::io_error(location.clone(), e),
        })
    }

    fn write_text(&mut self, location: &Location, text: &str) -> Result<(), StoreError> {
        let path = self.path_of(location);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io_error(location.clone(), e))?;
        }
        let existed = path.exists();
        fs::write(&path, text).map_err(|e| StoreError::io_error(location.clone(), e))?;

        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
        self.seen.insert(location.clone(), modified);
        let kind = if existed { ChangeKind::Modified } else { ChangeKind::Created };
        self.pending.push(ChangeEvent::new(location.clone(), kind));
        Ok(())
    }
}

impl DocumentStore for FsStore {
    fn list_documents(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.scan()?.into_keys().collect())
    }

    fn read_metadata(&self, location: &Location) -> Result<Metadata, StoreError> {
        let text = self.read_text(location)?;
        parse_frontmatter(location, split_frontmatter(&text).0)
    }

    fn read_body(&self, location: &Location) -> Result<String, StoreError> {
        let text = self.read_text(location)?;
        Ok(split_frontmatter(&text).1.to_string())
    }

    fn read_document(&self, location: &Location) -> Result<Document, StoreError> {
        let text = self.read_text(location)?;
        let (frontmatter, body) = split_frontmatter(&text);
        Ok(Document::new(
            location.clone(),
            parse_frontmatter(location, frontmatter)?,
            body,
        ))
    }

    fn poll_changes(&mut self) -> Vec<ChangeEvent> {
        let mut events = std::mem::take(&mut self.pending);
        let current = match self.scan() {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(error = %e, "cannot scan document folder");
                return events;
            }
        };

        for (location, modified) in &current {
            match self.seen.get(location) {
                None => events.push(ChangeEvent::new(location.clone(), ChangeKind::Created)),
                Some(before) if before != modified => {
                    events.push(ChangeEvent::new(location.clone(), ChangeKind::Modified));
                }
                Some(_) => {}
            }
        }
        for location in self.seen.keys().filter(|l| !current.contains_key(*l)) {
            events.push(ChangeEvent::new(location.clone(), ChangeKind::Deleted));
        }
        self.seen = current;

        let mut unique: Vec<ChangeEvent> = Vec::with_capacity(events.len());
        for event in events {
            if !unique.contains(&event) {
                unique.push(event);
            }
        }
        unique
    }
}

impl DocumentSink for FsStore {
    fn write_document(&mut self, document: Document) -> Result<(), StoreError> {
        let text = render(&document)?;
        self.write_text(&document.location, &text)
    }

    fn write_metadata(&mut self, location: &Location, metadata: Metadata) -> Result<(), StoreError> {
        let body = self.read_body(location)?;
        let text = render(&Document::new(location.clone(), metadata, body))?;
        self.write_text(location, &text)
    }

    fn exists(&self, location: &Location) -> bool {
        self.path_of(location).is_file()
    }
}

/// Frontmatter block (without fences) and body
fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let body = &rest[offset + line.len()..];
            return (Some(&rest[..offset]), body);
        }
        offset += line.len();
    }
    (None, text)
}

fn parse_frontmatter(location: &Location, frontmatter: Option<&str>) -> Result<Metadata, StoreError> {
    let Some(yaml) = frontmatter.filter(|y| !y.trim().is_empty()) else {
        return Ok(Metadata::new());
    };
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| StoreError::malformed(location.clone(), e.to_string()))?;
    let json = serde_json::to_value(value).map_err(|e| StoreError::malformed(location.clone(), e.to_string()))?;
    if !json.is_object() {
        return Err(StoreError::malformed(location.clone(), "frontmatter is not a mapping"));
    }
    Ok(Metadata::from_json(&json))
}

fn render(document: &Document) -> Result<String, StoreError> {
    let mut text = String::new();
    if !document.metadata.is_empty() {
        let yaml = serde_yaml::to_string(&document.metadata.to_json())
            .map_err(|e| StoreError::malformed(document.location.clone(), e.to_string()))?;
        text.push_str(FENCE);
        text.push('\n');
        text.push_str(&yaml);
        if !yaml.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(FENCE);
        text.push('\n');
    }
    text.push_str(&document.body);
    Ok(text)
}
