//! Configuration
//!
//! [`RootsConfig`] is loaded from TOML; every key is optional.
//!
//! ```toml
//! people_folder = "Family/People"
//! wikilinks = true
//!
//! [aliases]
//! dad = "father"
//! mum = "mother"
//! ```

use crate::error::{Result, RootsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootsConfig {
    /// Folder imported person documents are written to
    pub people_folder: String,
    /// User metadata key → canonical key
    pub aliases: BTreeMap<String, String>,
    /// Imported documents carry wikilink fields next to the id fields
    pub wikilinks: bool,
    /// Imported documents get resolved notes in their body
    pub notes_in_body: bool,
}

impl RootsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With people folder
    #[inline]
    #[must_use]
    pub fn with_people_folder(mut self, folder: impl Into<String>) -> Self {
        self.people_folder = folder.into();
        self
    }

    /// With one property alias
    #[inline]
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    /// With or without wikilink fields on import
    #[inline]
    #[must_use]
    pub fn with_wikilinks(mut self, wikilinks: bool) -> Self {
        self.wikilinks = wikilinks;
        self
    }

    /// With or without notes in imported bodies
    #[inline]
    #[must_use]
    pub fn with_notes_in_body(mut self, notes: bool) -> Self {
        self.notes_in_body = notes;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`RootsError::Config`] for malformed TOML or mistyped keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// Returns [`RootsError::Io`] when the file cannot be read and
    /// [`RootsError::Config`] when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RootsError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            people_folder: "People".to_string(),
            aliases: BTreeMap::new(),
            wikilinks: true,
            notes_in_body: true,
        }
    }
}

/// Per-run import settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Target folder
    pub people_folder: String,
    /// Write wikilink fields
    pub wikilinks: bool,
    /// Write notes into bodies
    pub notes_in_body: bool,
}

impl ImportOptions {
    /// Options taken from a configuration
    #[must_use]
    pub fn from_config(config: &RootsConfig) -> Self {
        Self {
            people_folder: config.people_folder.clone(),
            wikilinks: config.wikilinks,
            notes_in_body: config.notes_in_body,
        }
    }

    /// With target folder
    #[inline]
    #[must_use]
    pub fn with_people_folder(mut self, folder: impl Into<String>) -> Self {
        self.people_folder = folder.into();
        self
    }

    /// With or without wikilink fields
    #[inline]
    #[must_use]
    pub fn with_wikilinks(mut self, wikilinks: bool) -> Self {
        self.wikilinks = wikilinks;
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from_config(&RootsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RootsConfig::from_toml_str("wikilinks = false\n[aliases]\ndad = \"father\"\n").unwrap();
        assert!(!config.wikilinks);
        assert_eq!(config.people_folder, "People");
        assert_eq!(config.aliases.get("dad").map(String::as_str), Some("father"));
    }

    #[test]
    fn mistyped_key_is_an_error() {
        let err = RootsConfig::from_toml_str("wikilinks = \"yes\"").unwrap_err();
        assert!(matches!(err, RootsError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "people_folder = \"Tree\"").unwrap();
        let config = RootsConfig::load(file.path()).unwrap();
        assert_eq!(config, RootsConfig::new().with_people_folder("Tree"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RootsConfig::load(Path::new("/nonexistent/roots.toml")).unwrap_err();
        assert!(matches!(err, RootsError::Io { .. }));
    }

    #[test]
    fn options_follow_config() {
        let options = ImportOptions::from_config(&RootsConfig::new().with_wikilinks(false));
        assert!(!options.wikilinks);
        assert_eq!(ImportOptions::default().with_people_folder("X").people_folder, "X");
    }
}
