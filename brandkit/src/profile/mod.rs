//! Company profile data model and multi-source synthesis.
//!
//! A [`CompanyProfile`] is the merged, canonical description of a company
//! used as generation input. It is produced once by
//! [`synthesize`](synthesizer::Synthesizer::synthesize) from the
//! questionnaire plus any extractor records, and never mutated afterwards.

mod questionnaire;
mod sources;
mod synthesizer;

pub use questionnaire::Questionnaire;
pub use sources::{FileKind, SourceKind, SourceRecord};
pub use synthesizer::Synthesizer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of recognized profile attributes.
///
/// The set is closed: adding an attribute is a code change, and every
/// attribute is always present in a profile (unset rather than absent), so
/// downstream stages never branch on missing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Legal or trading name of the company.
    CompanyName,
    /// Primary industry.
    Industry,
    /// Mission statement.
    MissionStatement,
    /// Core company values.
    CoreValues,
    /// Main products and services.
    Services,
    /// Description of the ideal customer.
    TargetAudience,
    /// Problems the company solves for its customers.
    PainPoints,
    /// Main competitors.
    Competitors,
    /// Key competitive advantages.
    CompetitiveAdvantages,
    /// Adjectives describing the brand personality.
    PersonalityAdjectives,
    /// Desired tone of voice.
    TonePreference,
    /// Business model (e.g. B2B, B2C).
    BusinessModel,
    /// Primary business goal.
    PrimaryGoal,
    /// Target markets.
    TargetMarkets,
    /// Business growth stage.
    GrowthStage,
    /// Stats, case studies and wins.
    ProofPoints,
    /// Marketing channels.
    Channels,
}

/// Attributes where the form is authoritative over extracted data.
const IDENTITY_ATTRIBUTES: &[Attribute] = &[Attribute::CompanyName];

impl Attribute {
    /// All recognized attributes, in canonical order.
    pub const ALL: &'static [Self] = &[
        Self::CompanyName,
        Self::Industry,
        Self::MissionStatement,
        Self::CoreValues,
        Self::Services,
        Self::TargetAudience,
        Self::PainPoints,
        Self::Competitors,
        Self::CompetitiveAdvantages,
        Self::PersonalityAdjectives,
        Self::TonePreference,
        Self::BusinessModel,
        Self::PrimaryGoal,
        Self::TargetMarkets,
        Self::GrowthStage,
        Self::ProofPoints,
        Self::Channels,
    ];

    /// Returns whether this attribute holds an ordered list of entries.
    #[must_use]
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Self::CoreValues
                | Self::Services
                | Self::PainPoints
                | Self::Competitors
                | Self::CompetitiveAdvantages
                | Self::PersonalityAdjectives
                | Self::TargetMarkets
                | Self::ProofPoints
                | Self::Channels
        )
    }

    /// Returns whether the form outranks extracted sources for this
    /// attribute.
    ///
    /// Identity facts (the company name) are facts the user is
    /// authoritative on. For descriptive facts the form is ranked last,
    /// since form input there is often a placeholder.
    #[must_use]
    pub fn is_identity(self) -> bool {
        IDENTITY_ATTRIBUTES.contains(&self)
    }

    /// Returns the attribute's snake_case wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::Industry => "industry",
            Self::MissionStatement => "mission_statement",
            Self::CoreValues => "core_values",
            Self::Services => "services",
            Self::TargetAudience => "target_audience",
            Self::PainPoints => "pain_points",
            Self::Competitors => "competitors",
            Self::CompetitiveAdvantages => "competitive_advantages",
            Self::PersonalityAdjectives => "personality_adjectives",
            Self::TonePreference => "tone_preference",
            Self::BusinessModel => "business_model",
            Self::PrimaryGoal => "primary_goal",
            Self::TargetMarkets => "target_markets",
            Self::GrowthStage => "growth_stage",
            Self::ProofPoints => "proof_points",
            Self::Channels => "channels",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a single profile attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AttributeValue {
    /// No accepted candidate from any source.
    Unset,
    /// A scalar text value.
    Text(String),
    /// An ordered sequence of entries.
    List(Vec<String>),
}

impl AttributeValue {
    /// Returns whether the value is unset.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns the scalar text, if set.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list entries, if set.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A partial attribute-to-candidate mapping, as produced by one source.
pub type AttributeMap = BTreeMap<Attribute, AttributeValue>;

/// The merged, canonical description of a company.
///
/// Every recognized attribute is present; conflict resolution happened at
/// merge time and individual values carry no provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    attributes: BTreeMap<Attribute, AttributeValue>,
}

impl CompanyProfile {
    /// Creates a profile with every attribute unset.
    #[must_use]
    pub fn empty() -> Self {
        let attributes = Attribute::ALL
            .iter()
            .map(|attr| (*attr, AttributeValue::Unset))
            .collect();
        Self { attributes }
    }

    pub(crate) fn from_resolved(resolved: BTreeMap<Attribute, AttributeValue>) -> Self {
        let mut profile = Self::empty();
        for (attr, value) in resolved {
            profile.attributes.insert(attr, value);
        }
        profile
    }

    /// Returns the value of an attribute. Always present.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> &AttributeValue {
        self.attributes
            .get(&attribute)
            .unwrap_or(&AttributeValue::Unset)
    }

    /// Returns the scalar text for an attribute, if set.
    #[must_use]
    pub fn text(&self, attribute: Attribute) -> Option<&str> {
        self.get(attribute).as_text()
    }

    /// Returns the list entries for an attribute, if set.
    #[must_use]
    pub fn list(&self, attribute: Attribute) -> Option<&[String]> {
        self.get(attribute).as_list()
    }

    /// Returns the company name, or a neutral fallback for display.
    #[must_use]
    pub fn company_name(&self) -> &str {
        self.text(Attribute::CompanyName).unwrap_or("the company")
    }

    /// Iterates over all attributes and their values.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeValue)> {
        self.attributes.iter().map(|(attr, value)| (*attr, value))
    }

    /// Returns the number of attributes with an accepted value.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.attributes.values().filter(|v| !v.is_unset()).count()
    }
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_has_every_attribute() {
        let profile = CompanyProfile::empty();
        assert_eq!(profile.iter().count(), Attribute::ALL.len());
        for attr in Attribute::ALL {
            assert!(profile.get(*attr).is_unset());
        }
    }

    #[test]
    fn test_list_attributes() {
        assert!(Attribute::CoreValues.is_list());
        assert!(Attribute::Services.is_list());
        assert!(!Attribute::MissionStatement.is_list());
        assert!(!Attribute::CompanyName.is_list());
    }

    #[test]
    fn test_identity_attributes() {
        assert!(Attribute::CompanyName.is_identity());
        assert!(!Attribute::MissionStatement.is_identity());
        assert!(!Attribute::Industry.is_identity());
    }

    #[test]
    fn test_attribute_wire_names() {
        assert_eq!(Attribute::CompanyName.as_str(), "company_name");
        assert_eq!(Attribute::PersonalityAdjectives.to_string(), "personality_adjectives");
    }

    #[test]
    fn test_profile_serializes() {
        let mut resolved = BTreeMap::new();
        resolved.insert(
            Attribute::CompanyName,
            AttributeValue::Text("Acme".to_string()),
        );
        let profile = CompanyProfile::from_resolved(resolved);

        let json = serde_json::to_string(&profile).expect("serialize");
        let back: CompanyProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.text(Attribute::CompanyName), Some("Acme"));
    }
}
