//! Extractor boundaries: website and file sources.
//!
//! Extractors never talk to each other and never see the merged profile;
//! their one job is to turn a raw source into a [`SourceRecord`] of
//! candidate attribute values for the synthesizer. Failures are
//! best-effort by design — an unreachable website or an unsupported file
//! yields a diagnostic variant, not an error that stops the pipeline.

mod text;

#[cfg(feature = "scrape")]
mod scrape;

pub use text::mine_text;

#[cfg(feature = "scrape")]
pub use scrape::{ScrapeConfig, WebsiteScraper};

use crate::profile::{Attribute, FileKind, SourceKind, SourceRecord};
use serde::{Deserialize, Serialize};

/// Structured content recovered from one website.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebsitePage {
    /// The URL the page was fetched from.
    pub url: String,
    /// Company name, usually from the page title.
    pub company_name: Option<String>,
    /// Tagline or hero headline.
    pub tagline: Option<String>,
    /// About/company description section.
    pub about: Option<String>,
    /// The page's meta description.
    pub meta_description: Option<String>,
    /// Mission statement, when a mission section exists.
    pub mission: Option<String>,
    /// Service or product names.
    pub services: Vec<String>,
    /// Stated company values.
    pub values: Vec<String>,
}

impl WebsitePage {
    /// Converts the page into a website-ranked source record.
    ///
    /// Only fields that were actually found become candidates; an empty
    /// page produces an empty record, which the synthesizer skips.
    #[must_use]
    pub fn into_record(self) -> SourceRecord {
        let mut record = SourceRecord::new(SourceKind::Website, &self.url);
        if let Some(name) = self.company_name {
            record = record.with_text(Attribute::CompanyName, name);
        }
        if let Some(mission) = self.mission.or(self.tagline) {
            record = record.with_text(Attribute::MissionStatement, mission);
        }
        if let Some(about) = self.about.or(self.meta_description) {
            record = record.with_text(Attribute::TargetAudience, about);
        }
        if !self.services.is_empty() {
            record = record.with_list(Attribute::Services, self.services);
        }
        if !self.values.is_empty() {
            record = record.with_list(Attribute::CoreValues, self.values);
        }
        record
    }
}

/// Outcome of a website extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum WebsiteExtraction {
    /// The page was fetched and parsed.
    Page(WebsitePage),
    /// The site could not be fetched; synthesis proceeds without it.
    Unreachable {
        /// Human-readable fetch failure.
        reason: String,
    },
}

impl WebsiteExtraction {
    /// Converts the extraction into a source record, if the site was
    /// reachable.
    #[must_use]
    pub fn into_record(self) -> Option<SourceRecord> {
        match self {
            Self::Page(page) => Some(page.into_record()),
            Self::Unreachable { .. } => None,
        }
    }
}

/// Outcome of extracting text from one uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum FileExtraction {
    /// Text was recovered from the file.
    Text(String),
    /// The file type or content could not be processed.
    Unsupported {
        /// Why the file was skipped.
        reason: String,
    },
}

impl FileExtraction {
    /// Mines the recovered text into a file-ranked source record, if the
    /// file was readable.
    #[must_use]
    pub fn into_record(self, label: &str, kind: FileKind) -> Option<SourceRecord> {
        match self {
            Self::Text(text) => Some(mine_text(label, kind, &text)),
            Self::Unsupported { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AttributeValue;

    #[test]
    fn test_page_into_record_maps_found_fields() {
        let page = WebsitePage {
            url: "https://acme.example".to_string(),
            company_name: Some("Acme Corp".to_string()),
            mission: Some("Ship better widgets".to_string()),
            services: vec!["Widgets".to_string(), "Support".to_string()],
            values: vec!["Quality".to_string()],
            ..WebsitePage::default()
        };

        let record = page.into_record();
        assert_eq!(record.kind, SourceKind::Website);
        assert_eq!(record.label, "https://acme.example");
        assert_eq!(
            record.attributes.get(&Attribute::CompanyName),
            Some(&AttributeValue::Text("Acme Corp".to_string()))
        );
        assert!(record.attributes.contains_key(&Attribute::Services));
        assert!(record.attributes.contains_key(&Attribute::CoreValues));
    }

    #[test]
    fn test_tagline_backfills_mission() {
        let page = WebsitePage {
            url: "https://acme.example".to_string(),
            tagline: Some("Widgets that work".to_string()),
            ..WebsitePage::default()
        };

        let record = page.into_record();
        assert_eq!(
            record.attributes.get(&Attribute::MissionStatement),
            Some(&AttributeValue::Text("Widgets that work".to_string()))
        );
    }

    #[test]
    fn test_empty_page_yields_empty_record() {
        let page = WebsitePage {
            url: "https://acme.example".to_string(),
            ..WebsitePage::default()
        };
        assert!(page.into_record().is_empty());
    }

    #[test]
    fn test_file_extraction_feeds_text_mining() {
        let extraction = FileExtraction::Text("Mission: Build tools people trust.".to_string());
        let record = extraction
            .into_record("brand.pdf", FileKind::Pdf)
            .expect("record");

        assert_eq!(record.kind, SourceKind::File(FileKind::Pdf));
        assert!(record.attributes.contains_key(&Attribute::MissionStatement));

        let skipped = FileExtraction::Unsupported {
            reason: "encrypted".to_string(),
        };
        assert!(skipped.into_record("locked.pdf", FileKind::Pdf).is_none());
    }

    #[test]
    fn test_unreachable_yields_no_record() {
        let extraction = WebsiteExtraction::Unreachable {
            reason: "dns failure".to_string(),
        };
        assert!(extraction.into_record().is_none());
    }
}
