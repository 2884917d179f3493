//! The brand questionnaire form.

use super::{Attribute, SourceKind, SourceRecord};
use serde::{Deserialize, Serialize};

/// The brand questionnaire filled in by the user.
///
/// Only the company name is required; every other field may be skipped and
/// later enriched by the website and file extractors. [`with_defaults`]
/// fills skipped fields with placeholder sentinels so validation never
/// blocks a submission — the synthesizer rejects those sentinels when a
/// real candidate exists.
///
/// [`with_defaults`]: Questionnaire::with_defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Questionnaire {
    /// Company name.
    pub company_name: String,
    /// Primary industry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Mission statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_statement: Option<String>,
    /// Core company values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub core_values: Vec<String>,
    /// Main products and services.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    /// Who the ideal customers are.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// Problems the company solves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pain_points: Vec<String>,
    /// Main competitors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<String>,
    /// Key advantages over competitors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitive_advantages: Vec<String>,
    /// Adjectives describing the brand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personality_adjectives: Vec<String>,
    /// Desired tone of voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_preference: Option<String>,
    /// Business model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_model: Option<String>,
    /// Primary business goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    /// Target markets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_markets: Vec<String>,
    /// Business growth stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_stage: Option<String>,
    /// Stats, case studies and wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proof_points: Vec<String>,
    /// Marketing channels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
}

impl Questionnaire {
    /// Creates a questionnaire with just the company name.
    #[must_use]
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Self::default()
        }
    }

    /// Fills every skipped field with a placeholder or conventional
    /// default, so a minimal submission still carries a full attribute set.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        fn fill(slot: &mut Option<String>, default: &str) {
            if slot.as_deref().map_or(true, |s| s.trim().is_empty()) {
                *slot = Some(default.to_string());
            }
        }
        fn fill_list(slot: &mut Vec<String>, defaults: &[&str]) {
            if slot.is_empty() {
                *slot = defaults.iter().map(ToString::to_string).collect();
            }
        }

        fill(&mut self.industry, "To be determined");
        fill(&mut self.mission_statement, "To be defined");
        fill(&mut self.target_audience, "To be defined");
        fill(&mut self.tone_preference, "Professional and approachable");
        fill(&mut self.business_model, "B2B");
        fill(&mut self.primary_goal, "Growth and market leadership");
        fill(&mut self.growth_stage, "Growth");
        fill_list(&mut self.core_values, &["Quality", "Innovation", "Customer Focus"]);
        fill_list(&mut self.services, &["To be defined"]);
        fill_list(&mut self.pain_points, &["To be researched"]);
        fill_list(&mut self.competitive_advantages, &["To be defined"]);
        fill_list(
            &mut self.personality_adjectives,
            &["Professional", "Reliable", "Innovative"],
        );
        fill_list(&mut self.target_markets, &["To be researched"]);
        fill_list(&mut self.channels, &["Website", "Social Media"]);
        self
    }

    /// Converts the form into a synthesis source record.
    #[must_use]
    pub fn into_record(self) -> SourceRecord {
        let mut record = SourceRecord::new(SourceKind::Form, "questionnaire")
            .with_text(Attribute::CompanyName, self.company_name);

        fn text(record: SourceRecord, attr: Attribute, value: Option<String>) -> SourceRecord {
            match value {
                Some(v) if !v.trim().is_empty() => record.with_text(attr, v),
                _ => record,
            }
        }
        fn list(record: SourceRecord, attr: Attribute, values: Vec<String>) -> SourceRecord {
            if values.is_empty() {
                record
            } else {
                record.with_list(attr, values)
            }
        }

        record = text(record, Attribute::Industry, self.industry);
        record = text(record, Attribute::MissionStatement, self.mission_statement);
        record = list(record, Attribute::CoreValues, self.core_values);
        record = list(record, Attribute::Services, self.services);
        record = text(record, Attribute::TargetAudience, self.target_audience);
        record = list(record, Attribute::PainPoints, self.pain_points);
        record = list(record, Attribute::Competitors, self.competitors);
        record = list(
            record,
            Attribute::CompetitiveAdvantages,
            self.competitive_advantages,
        );
        record = list(
            record,
            Attribute::PersonalityAdjectives,
            self.personality_adjectives,
        );
        record = text(record, Attribute::TonePreference, self.tone_preference);
        record = text(record, Attribute::BusinessModel, self.business_model);
        record = text(record, Attribute::PrimaryGoal, self.primary_goal);
        record = list(record, Attribute::TargetMarkets, self.target_markets);
        record = text(record, Attribute::GrowthStage, self.growth_stage);
        record = list(record, Attribute::ProofPoints, self.proof_points);
        record = list(record, Attribute::Channels, self.channels);
        record
    }

    /// A fully-populated example questionnaire for tests and benchmarks.
    #[must_use]
    pub fn example() -> Self {
        Self {
            company_name: "Example Corp".to_string(),
            industry: Some("Technology Services".to_string()),
            mission_statement: Some(
                "To help businesses grow through integrated execution.".to_string(),
            ),
            core_values: vec![
                "Quality".to_string(),
                "Innovation".to_string(),
                "Customer Focus".to_string(),
            ],
            services: vec![
                "Marketing Teams".to_string(),
                "Product Development".to_string(),
                "CRM Platform".to_string(),
            ],
            target_audience: Some("Mid-market B2B companies ($5M-$50M)".to_string()),
            pain_points: vec![
                "Managing multiple vendors".to_string(),
                "Slow execution".to_string(),
            ],
            competitors: vec![
                "Traditional agencies".to_string(),
                "Consulting firms".to_string(),
            ],
            competitive_advantages: vec![
                "Integrated model".to_string(),
                "All disciplines unified".to_string(),
            ],
            personality_adjectives: vec![
                "Professional".to_string(),
                "Reliable".to_string(),
                "Innovative".to_string(),
            ],
            tone_preference: Some("Professional and approachable".to_string()),
            business_model: Some("B2B".to_string()),
            primary_goal: Some(
                "Become the go-to partner for mid-market B2B companies".to_string(),
            ),
            target_markets: vec!["North America".to_string()],
            growth_stage: Some("Growth".to_string()),
            proof_points: vec!["98% client retention".to_string()],
            channels: vec!["Website".to_string(), "Social Media".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AttributeValue;

    #[test]
    fn test_minimal_questionnaire_record() {
        let record = Questionnaire::new("Acme").into_record();

        assert_eq!(record.kind, SourceKind::Form);
        assert_eq!(
            record.attributes.get(&Attribute::CompanyName),
            Some(&AttributeValue::Text("Acme".to_string()))
        );
        assert_eq!(record.attributes.len(), 1);
    }

    #[test]
    fn test_defaults_fill_skipped_fields() {
        let form = Questionnaire::new("Acme").with_defaults();

        assert_eq!(form.industry.as_deref(), Some("To be determined"));
        assert_eq!(form.mission_statement.as_deref(), Some("To be defined"));
        assert_eq!(form.pain_points, vec!["To be researched"]);
        assert_eq!(form.business_model.as_deref(), Some("B2B"));
    }

    #[test]
    fn test_defaults_do_not_overwrite_real_values() {
        let mut form = Questionnaire::new("Acme");
        form.industry = Some("Manufacturing".to_string());
        form.core_values = vec!["Trust".to_string()];

        let form = form.with_defaults();
        assert_eq!(form.industry.as_deref(), Some("Manufacturing"));
        assert_eq!(form.core_values, vec!["Trust"]);
    }

    #[test]
    fn test_example_is_complete() {
        let record = Questionnaire::example().into_record();
        assert_eq!(record.attributes.len(), Attribute::ALL.len());
    }
}
