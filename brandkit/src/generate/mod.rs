//! The pluggable text-generation capability.
//!
//! Each stage hands a directive and a [`GenerationContext`] to a
//! [`Generator`]. Any conformant implementation satisfies the same
//! contract — the bundled [`TemplateGenerator`] fills deterministic
//! templates, and a caller may substitute a client for an external text
//! service without touching the synthesizer, graph, or executor.

mod template;

pub use template::TemplateGenerator;

use crate::errors::GenerationError;
use crate::profile::{Attribute, AttributeValue, CompanyProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// The context handed to a generation call: the profile plus the outputs
/// of the stage's declared dependencies only.
///
/// A stage never sees outputs of stages it did not declare, even if they
/// ran earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationContext {
    /// The canonical company profile.
    pub profile: CompanyProfile,
    /// Prior section content, keyed by stage id. Restricted to declared
    /// dependencies.
    pub prior: BTreeMap<String, String>,
}

impl GenerationContext {
    /// Creates a context with no prior outputs.
    #[must_use]
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            prior: BTreeMap::new(),
        }
    }

    /// Adds a dependency's output.
    #[must_use]
    pub fn with_prior(mut self, stage_id: impl Into<String>, content: impl Into<String>) -> Self {
        self.prior.insert(stage_id.into(), content.into());
        self
    }

    /// Returns a declared dependency's output.
    #[must_use]
    pub fn prior(&self, stage_id: &str) -> Option<&str> {
        self.prior.get(stage_id).map(String::as_str)
    }

    /// Renders the context as a prompt-style text block: set profile
    /// attributes first, then prior sections.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("COMPANY PROFILE\n");
        for (attribute, value) in self.profile.iter() {
            match value {
                AttributeValue::Text(text) => {
                    let _ = writeln!(out, "- {attribute}: {text}");
                }
                AttributeValue::List(items) => {
                    let _ = writeln!(out, "- {attribute}: {}", items.join(", "));
                }
                AttributeValue::Unset => {}
            }
        }
        if !self.prior.is_empty() {
            out.push_str("\nPRIOR SECTIONS\n");
            for (stage_id, content) in &self.prior {
                let _ = writeln!(out, "## {stage_id}\n{content}");
            }
        }
        out
    }
}

/// A text-generation capability invoked once per stage.
///
/// Implementations must be safe to call concurrently; no shared mutable
/// state beyond connection-level resources.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates section content for a directive and context.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] on provider-side failure. Retryable
    /// failures may be reattempted by the executor with the same context.
    async fn generate(
        &self,
        directive: &str,
        context: &GenerationContext,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Questionnaire, Synthesizer};

    fn example_profile() -> CompanyProfile {
        Synthesizer::new()
            .synthesize(Some(Questionnaire::example().into_record()), Vec::new())
            .expect("synthesize")
    }

    #[test]
    fn test_render_includes_set_attributes_only() {
        let profile = Synthesizer::new()
            .synthesize(Some(Questionnaire::new("Acme").into_record()), Vec::new())
            .expect("synthesize");
        let rendered = GenerationContext::new(profile).render();

        assert!(rendered.contains("company_name: Acme"));
        assert!(!rendered.contains("industry"));
    }

    #[test]
    fn test_render_includes_prior_sections() {
        let ctx = GenerationContext::new(example_profile())
            .with_prior("key_findings_researcher", "Finding one.");
        let rendered = ctx.render();

        assert!(rendered.contains("PRIOR SECTIONS"));
        assert!(rendered.contains("## key_findings_researcher"));
        assert!(rendered.contains("Finding one."));
    }

    #[test]
    fn test_prior_lookup() {
        let ctx = GenerationContext::new(example_profile()).with_prior("a", "text");
        assert_eq!(ctx.prior("a"), Some("text"));
        assert_eq!(ctx.prior("b"), None);
    }
}
