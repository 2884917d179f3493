//! Multi-source profile synthesis.
//!
//! Merges the questionnaire with extractor records into one canonical
//! [`CompanyProfile`]. Conflicts are resolved once, here, by source
//! precedence; the result carries no per-field provenance.

use super::{Attribute, AttributeValue, CompanyProfile, SourceKind, SourceRecord};
use crate::errors::MissingInputError;
use std::collections::BTreeMap;
use tracing::debug;

/// Placeholder sentinels the form layer uses for skipped fields.
///
/// Matched case-insensitively, exact or prefix.
const PLACEHOLDER_SENTINELS: &[&str] = &["to be determined", "to be defined", "to be researched"];

/// Merges form input and extractor records into a canonical profile.
///
/// Synthesis is pure and deterministic: the precedence rule, not record
/// arrival order, decides winners, so the same inputs always produce the
/// same profile regardless of extractor latency or retry order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer;

impl Synthesizer {
    /// Creates a synthesizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Merges all sources into a profile.
    ///
    /// `form` is the one required input; `records` are best-effort
    /// enrichers and may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`MissingInputError`] when no form record is supplied.
    pub fn synthesize(
        &self,
        form: Option<SourceRecord>,
        records: Vec<SourceRecord>,
    ) -> Result<CompanyProfile, MissingInputError> {
        let form = form.ok_or_else(MissingInputError::new)?;

        let mut sources: Vec<SourceRecord> = Vec::with_capacity(records.len() + 1);
        sources.push(form);
        sources.extend(records);

        let mut resolved: BTreeMap<Attribute, AttributeValue> = BTreeMap::new();
        for attribute in Attribute::ALL {
            if let Some(value) = resolve_attribute(*attribute, &sources) {
                resolved.insert(*attribute, value);
            }
        }

        let profile = CompanyProfile::from_resolved(resolved);
        debug!(
            attributes_set = profile.set_count(),
            sources = sources.len(),
            company = profile.company_name(),
            "synthesized company profile"
        );
        Ok(profile)
    }
}

/// Resolves one attribute across all sources.
///
/// Candidates are ordered by the attribute's precedence class, then by a
/// stable source discriminant and label, so equally-ranked sources (two
/// uploaded files, say) merge identically whatever order they arrived in.
fn resolve_attribute(attribute: Attribute, sources: &[SourceRecord]) -> Option<AttributeValue> {
    let mut candidates: Vec<&SourceRecord> = sources
        .iter()
        .filter(|record| record.attributes.contains_key(&attribute))
        .collect();
    candidates.sort_by(|a, b| {
        a.kind
            .rank_for(attribute)
            .cmp(&b.kind.rank_for(attribute))
            .then(a.kind.ordinal().cmp(&b.kind.ordinal()))
            .then(a.label.cmp(&b.label))
    });

    if attribute.is_list() {
        resolve_list(attribute, &candidates)
    } else {
        resolve_scalar(attribute, &candidates)
    }
}

/// Picks the highest-precedence accepted scalar candidate.
fn resolve_scalar(attribute: Attribute, candidates: &[&SourceRecord]) -> Option<AttributeValue> {
    for record in candidates {
        let accepted = match record.attributes.get(&attribute) {
            Some(AttributeValue::Text(text)) => accept(text),
            // A list offered for a scalar slot: first usable entry stands in.
            Some(AttributeValue::List(items)) => items.iter().find_map(|item| accept(item)),
            _ => None,
        };
        if let Some(text) = accepted {
            return Some(AttributeValue::Text(text));
        }
    }
    None
}

/// Unions accepted list entries from every candidate, in precedence order,
/// collapsing duplicates case-insensitively with whitespace normalized.
fn resolve_list(attribute: Attribute, candidates: &[&SourceRecord]) -> Option<AttributeValue> {
    let mut merged: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for record in candidates {
        let entries: Vec<String> = match record.attributes.get(&attribute) {
            Some(AttributeValue::List(items)) => {
                items.iter().filter_map(|item| accept(item)).collect()
            }
            // Scalar offered for a list slot: comma-separated entries.
            Some(AttributeValue::Text(text)) => text
                .split(',')
                .filter_map(accept)
                .collect(),
            _ => Vec::new(),
        };
        for entry in entries {
            let key = normalize(&entry);
            if !seen.contains(&key) {
                seen.push(key);
                merged.push(entry);
            }
        }
    }

    if merged.is_empty() {
        None
    } else {
        Some(AttributeValue::List(merged))
    }
}

/// Accepts a candidate string: non-empty and not a placeholder sentinel.
///
/// Returns the trimmed value on acceptance.
fn accept(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if PLACEHOLDER_SENTINELS
        .iter()
        .any(|sentinel| lowered.starts_with(sentinel))
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Normalization key for duplicate collapsing: lowercased with interior
/// whitespace collapsed to single spaces.
fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FileKind, Questionnaire};
    use pretty_assertions::assert_eq;

    fn website(label: &str) -> SourceRecord {
        SourceRecord::new(SourceKind::Website, label)
    }

    fn file(label: &str) -> SourceRecord {
        SourceRecord::new(SourceKind::File(FileKind::Pdf), label)
    }

    #[test]
    fn test_missing_form_fails() {
        let result = Synthesizer::new().synthesize(None, vec![website("https://acme.example")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_records_never_fail() {
        let form = Questionnaire::new("Acme").into_record();
        let profile = Synthesizer::new()
            .synthesize(Some(form), Vec::new())
            .expect("synthesize");
        assert_eq!(profile.text(Attribute::CompanyName), Some("Acme"));
    }

    #[test]
    fn test_placeholder_yields_to_extracted_value() {
        // Scenario: form industry is a placeholder, website knows better.
        let mut form = Questionnaire::new("Acme");
        form.industry = Some("To be determined".to_string());
        let site = website("https://acme.example").with_text(Attribute::Industry, "Manufacturing");

        let profile = Synthesizer::new()
            .synthesize(Some(form.into_record()), vec![site])
            .expect("synthesize");
        assert_eq!(profile.text(Attribute::Industry), Some("Manufacturing"));
    }

    #[test]
    fn test_placeholder_never_survives_when_alternative_exists() {
        let form = Questionnaire::new("Acme").with_defaults();
        let site = website("https://acme.example")
            .with_text(Attribute::MissionStatement, "Ship great tools");

        let profile = Synthesizer::new()
            .synthesize(Some(form.into_record()), vec![site])
            .expect("synthesize");
        assert_eq!(
            profile.text(Attribute::MissionStatement),
            Some("Ship great tools")
        );
    }

    #[test]
    fn test_all_placeholders_leave_attribute_unset() {
        // No source yields an accepted value: unset, never fabricated.
        let mut form = Questionnaire::new("Acme");
        form.industry = Some("To be determined".to_string());

        let profile = Synthesizer::new()
            .synthesize(Some(form.into_record()), Vec::new())
            .expect("synthesize");
        assert!(profile.get(Attribute::Industry).is_unset());
    }

    #[test]
    fn test_company_name_form_beats_website() {
        // Identity attribute: the user is authoritative over the <title>.
        let form = Questionnaire::new("Acme").into_record();
        let site = website("https://acme.example")
            .with_text(Attribute::CompanyName, "Acme Corp | Home of Widgets");

        let profile = Synthesizer::new()
            .synthesize(Some(form), vec![site])
            .expect("synthesize");
        assert_eq!(profile.text(Attribute::CompanyName), Some("Acme"));
    }

    #[test]
    fn test_descriptive_file_beats_website_and_form() {
        let mut form = Questionnaire::new("Acme");
        form.mission_statement = Some("We sell things".to_string());
        let site = website("https://acme.example")
            .with_text(Attribute::MissionStatement, "From the site");
        let doc = file("brand.pdf").with_text(Attribute::MissionStatement, "From the brand deck");

        let profile = Synthesizer::new()
            .synthesize(Some(form.into_record()), vec![site, doc])
            .expect("synthesize");
        assert_eq!(
            profile.text(Attribute::MissionStatement),
            Some("From the brand deck")
        );
    }

    #[test]
    fn test_list_union_dedup_case_and_whitespace() {
        let form = Questionnaire::new("Acme").into_record();
        let a = file("a.pdf").with_list(Attribute::Services, ["CRM"]);
        let b = file("b.pdf").with_list(Attribute::Services, ["crm ", "Analytics"]);

        let profile = Synthesizer::new()
            .synthesize(Some(form), vec![a, b])
            .expect("synthesize");
        assert_eq!(
            profile.list(Attribute::Services),
            Some(&["CRM".to_string(), "Analytics".to_string()][..])
        );
    }

    #[test]
    fn test_overlapping_file_values_union() {
        // Scenario: two files with overlapping values lists.
        let form = Questionnaire::new("Acme").into_record();
        let a = file("a.pdf").with_list(Attribute::CoreValues, ["Quality", "Trust"]);
        let b = file("b.pdf").with_list(Attribute::CoreValues, ["trust", "Innovation"]);

        let profile = Synthesizer::new()
            .synthesize(Some(form), vec![a, b])
            .expect("synthesize");
        assert_eq!(
            profile.list(Attribute::CoreValues),
            Some(
                &[
                    "Quality".to_string(),
                    "Trust".to_string(),
                    "Innovation".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn test_arrival_order_is_irrelevant() {
        let make = |records: Vec<SourceRecord>| {
            Synthesizer::new()
                .synthesize(Some(Questionnaire::example().into_record()), records)
                .expect("synthesize")
        };

        let a = file("a.pdf")
            .with_list(Attribute::CoreValues, ["Quality", "Trust"])
            .with_text(Attribute::MissionStatement, "From file A");
        let b = file("b.pdf").with_list(Attribute::CoreValues, ["trust", "Innovation"]);
        let site = website("https://example.com")
            .with_text(Attribute::Industry, "Technology")
            .with_list(Attribute::Services, ["Consulting"]);

        let forward = make(vec![a.clone(), b.clone(), site.clone()]);
        let reversed = make(vec![site, b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_comma_separated_text_feeds_list_attribute() {
        let form = Questionnaire::new("Acme").into_record();
        let site = website("https://acme.example")
            .with_text(Attribute::Services, "Widgets, Support, Training");

        let profile = Synthesizer::new()
            .synthesize(Some(form), vec![site])
            .expect("synthesize");
        assert_eq!(
            profile.list(Attribute::Services),
            Some(
                &[
                    "Widgets".to_string(),
                    "Support".to_string(),
                    "Training".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let run = || {
            Synthesizer::new()
                .synthesize(
                    Some(Questionnaire::example().into_record()),
                    vec![
                        website("https://example.com").with_text(Attribute::Industry, "Tech"),
                        file("deck.pdf").with_list(Attribute::ProofPoints, ["500 clients"]),
                    ],
                )
                .expect("synthesize")
        };
        assert_eq!(run(), run());
    }
}
