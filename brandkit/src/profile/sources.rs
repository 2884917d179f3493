//! Source records produced by extractors.

use super::{Attribute, AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// PDF document.
    Pdf,
    /// Word-processor document.
    Document,
    /// Plain text or markdown.
    PlainText,
    /// Image (text recovered via OCR, when available).
    Image,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Document => write!(f, "document"),
            Self::PlainText => write!(f, "plain_text"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// The origin of a source record, carrying an implicit trust rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "file_kind")]
pub enum SourceKind {
    /// The brand questionnaire filled by the user.
    Form,
    /// Scraped from the company website.
    Website,
    /// Extracted from an uploaded file.
    File(FileKind),
}

impl SourceKind {
    /// Trust rank for identity attributes: form > file > website.
    ///
    /// Lower ranks win.
    #[must_use]
    pub fn identity_rank(self) -> u8 {
        match self {
            Self::Form => 0,
            Self::File(_) => 1,
            Self::Website => 2,
        }
    }

    /// Trust rank for descriptive attributes: file > website > form.
    ///
    /// Files are typically curated brand documents; form input for
    /// descriptive fields is often a placeholder.
    #[must_use]
    pub fn descriptive_rank(self) -> u8 {
        match self {
            Self::File(_) => 0,
            Self::Website => 1,
            Self::Form => 2,
        }
    }

    /// Rank for the given attribute's precedence class.
    #[must_use]
    pub fn rank_for(self, attribute: Attribute) -> u8 {
        if attribute.is_identity() {
            self.identity_rank()
        } else {
            self.descriptive_rank()
        }
    }

    /// A stable discriminant used to break ties among equally-ranked
    /// sources.
    #[must_use]
    pub(crate) fn ordinal(self) -> u8 {
        match self {
            Self::Form => 0,
            Self::Website => 1,
            Self::File(FileKind::Pdf) => 2,
            Self::File(FileKind::Document) => 3,
            Self::File(FileKind::PlainText) => 4,
            Self::File(FileKind::Image) => 5,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form => write!(f, "form"),
            Self::Website => write!(f, "website"),
            Self::File(kind) => write!(f, "file:{kind}"),
        }
    }
}

/// One extractor invocation's worth of candidate attribute values.
///
/// Created by an extractor call, consumed exactly once by the synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Where the candidates came from.
    pub kind: SourceKind,
    /// A stable human-readable label (URL, filename, "questionnaire").
    pub label: String,
    /// Partial mapping from attribute to candidate value.
    pub attributes: AttributeMap,
}

impl SourceRecord {
    /// Creates an empty record for a source.
    #[must_use]
    pub fn new(kind: SourceKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Adds a scalar candidate.
    #[must_use]
    pub fn with_text(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.attributes
            .insert(attribute, AttributeValue::Text(value.into()));
        self
    }

    /// Adds a list candidate.
    #[must_use]
    pub fn with_list<I, S>(mut self, attribute: Attribute, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.insert(
            attribute,
            AttributeValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Returns whether the record carries no candidates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
