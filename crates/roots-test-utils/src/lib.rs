//! Testing utilities for Roots workspace
//!
//! GEDCOM fixtures and person-document builders.

#![allow(missing_docs)]

use roots_model::{Document, FieldValue, Location, Metadata};
use serde_json::Value;

/// Two individuals and a family making I1 the parent of I2
pub const BASIC_IMPORT: &str = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 FAMS @F1@
0 @I2@ INDI
1 NAME Jane /Doe/
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 CHIL @I2@
0 TRLR
";

/// [`BASIC_IMPORT`] with a `step` pedigree on the child link
pub const STEP_IMPORT: &str = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 FAMS @F1@
0 @I2@ INDI
1 NAME Jane /Doe/
1 FAMC @F1@
2 PEDI step
0 @F1@ FAM
1 HUSB @I1@
1 CHIL @I2@
0 TRLR
";

/// A small family with shared note and source, continuation lines and events
pub const FAMILY: &str = "\
0 HEAD
1 SOUR Fixture
1 CHAR UTF-8
0 @I1@ INDI
1 NAME William /Hart/
1 SEX M
1 BIRT
2 DATE 3 MAR 1850
2 PLAC York, England
1 NOTE @N1@
1 FAMS @F1@
0 @I2@ INDI
1 NAME Mary /Lee/
1 SEX F
1 DEAT
2 DATE 1921
1 FAMS @F1@
0 @I3@ INDI
1 NAME Thomas /Hart/
1 SEX M
1 SOUR @S1@
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 MARR
2 DATE 1875
0 @N1@ NOTE Worked as a carpenter
1 CONT and later as a joiner
0 @S1@ SOUR
1 TITL Parish register
0 TRLR
";

/// Builder for person documents
#[derive(Debug, Clone)]
pub struct PersonDoc {
    location: Location,
    metadata: Metadata,
    body: String,
}

impl PersonDoc {
    pub fn new(path: &str) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("cr_type", "person");
        Self {
            location: Location::new(path),
            metadata,
            body: String::new(),
        }
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.text("cr_id", id)
    }

    #[must_use]
    pub fn name(self, name: &str) -> Self {
        self.text("name", name)
    }

    #[must_use]
    pub fn sex(self, sex: &str) -> Self {
        self.text("sex", sex)
    }

    #[must_use]
    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key, value);
        self
    }

    #[must_use]
    pub fn list(mut self, key: &str, values: &[&str]) -> Self {
        self.metadata.insert(
            key,
            FieldValue::List(values.iter().map(|v| (*v).to_string()).collect()),
        );
        self
    }

    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn build(self) -> Document {
        Document::new(self.location, self.metadata, self.body)
    }
}

/// Document from a JSON metadata object
pub fn doc_from_json(path: &str, metadata: &Value) -> Document {
    Document::new(Location::new(path), Metadata::from_json(metadata), "")
}
