//! Deterministic rule-based generation.

use super::{GenerationContext, Generator};
use crate::errors::GenerationError;
use crate::profile::Attribute;
use async_trait::async_trait;
use std::fmt::Write as _;

/// A rule-based generation capability that fills section templates from
/// the profile.
///
/// Deterministic, computation-only, and infallible; the default capability
/// when no external text service is configured, and the workhorse of the
/// test suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Creates a template generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn overview(ctx: &GenerationContext) -> String {
        let profile = &ctx.profile;
        let company = profile.company_name();
        let industry = profile.text(Attribute::Industry).unwrap_or("its industry");
        let goal = profile
            .text(Attribute::PrimaryGoal)
            .unwrap_or("growth and market presence");

        format!(
            "**Purpose of This Marketing Kit**\n\n\
             This marketing kit is the strategic foundation for all of \
             {company}'s marketing activities. It captures the research, \
             insights, and frameworks needed to guide growth and positioning \
             in {industry}.\n\n\
             **How to Use This Kit**\n\n\
             Every campaign, creative asset, and sales conversation should \
             reflect the positioning and voice documented here.\n\n\
             **The Goal**\n\n{goal}\n"
        )
    }

    fn key_findings(ctx: &GenerationContext) -> String {
        let profile = &ctx.profile;
        let company = profile.company_name();
        let industry = profile.text(Attribute::Industry).unwrap_or("the market");
        let advantages = join_or(
            profile.list(Attribute::CompetitiveAdvantages),
            "a distinct value proposition",
        );
        let pains = join_or(
            profile.list(Attribute::PainPoints),
            "operational inefficiencies",
        );
        let audience = profile
            .text(Attribute::TargetAudience)
            .unwrap_or("the target market");

        format!(
            "**01 | Market Opportunity**\n\
             The {industry} market is shifting, and {company} is positioned \
             to capture emerging demand.\n\n\
             **02 | Competitive Differentiation**\n\
             {company} stands out through: {advantages}.\n\n\
             **03 | Target Market Clarity**\n\
             {audience} face challenges including {pains}.\n\n\
             **04 | Growth Trajectory**\n\
             {company} has the offerings and focus to expand within its \
             current stage.\n"
        )
    }

    fn personas(ctx: &GenerationContext) -> String {
        let profile = &ctx.profile;
        let audience = profile
            .text(Attribute::TargetAudience)
            .unwrap_or("business decision makers");
        let pains = join_or(profile.list(Attribute::PainPoints), "inefficiency");

        format!(
            "**Primary Persona: The Strategic Buyer**\n\n\
             Profile: {audience}\n\
             Motivation: overcome {pains}\n\
             Messaging: lead with outcomes and measurable results.\n\n\
             **Secondary Persona: The Hands-On User**\n\n\
             Profile: day-to-day users implementing the solution\n\
             Needs: simple tools, support, and integration with existing \
             workflows.\n"
        )
    }

    fn brand_voice(ctx: &GenerationContext) -> String {
        let profile = &ctx.profile;
        let company = profile.company_name();
        let adjectives = join_or(
            profile.list(Attribute::PersonalityAdjectives),
            "professional, reliable, innovative",
        );
        let tone = profile
            .text(Attribute::TonePreference)
            .unwrap_or("clear, direct, and results-focused");
        let mission = profile
            .text(Attribute::MissionStatement)
            .unwrap_or("deliver outstanding results");

        format!(
            "**Brand Purpose**\n\n{mission}\n\n\
             **Brand Personality**\n\n\
             Adjectives: {adjectives}\n\
             Expression: {tone}\n\n\
             **Do's & Don'ts**\n\n\
             Do: lead with outcomes, use straightforward language, show proof.\n\
             Don't: use jargon, overpromise, or speak in generic claims.\n\n\
             {company} voice check: every sentence should sound {tone}.\n"
        )
    }

    fn generic(directive: &str, ctx: &GenerationContext) -> String {
        let profile = &ctx.profile;
        let mut out = String::new();
        let _ = writeln!(out, "**{}**\n", profile.company_name());
        let _ = writeln!(out, "{directive}\n");
        if let Some(services) = profile.list(Attribute::Services) {
            let _ = writeln!(out, "Offerings in focus: {}.", services.join(", "));
        }
        if let Some(channels) = profile.list(Attribute::Channels) {
            let _ = writeln!(out, "Active channels: {}.", channels.join(", "));
        }
        for (stage_id, content) in &ctx.prior {
            let snippet: String = content.chars().take(160).collect();
            let _ = writeln!(out, "\nBuilding on {stage_id}: {snippet}");
        }
        out
    }
}

fn join_or(items: Option<&[String]>, fallback: &str) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => fallback.to_string(),
    }
}

#[async_trait]
impl Generator for TemplateGenerator {
    async fn generate(
        &self,
        directive: &str,
        context: &GenerationContext,
    ) -> Result<String, GenerationError> {
        let lowered = directive.to_lowercase();
        let content = if lowered.contains("overview") {
            Self::overview(context)
        } else if lowered.contains("key findings") {
            Self::key_findings(context)
        } else if lowered.contains("persona") {
            Self::personas(context)
        } else if lowered.contains("brand essence") || lowered.contains("brand voice")
            || lowered.contains("taglines")
        {
            Self::brand_voice(context)
        } else {
            Self::generic(directive, context)
        };
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Questionnaire, Synthesizer};

    fn example_context() -> GenerationContext {
        let profile = Synthesizer::new()
            .synthesize(Some(Questionnaire::example().into_record()), Vec::new())
            .expect("synthesize");
        GenerationContext::new(profile)
    }

    #[tokio::test]
    async fn test_overview_uses_profile_fields() {
        let content = TemplateGenerator::new()
            .generate("Write the kit overview for the company.", &example_context())
            .await
            .expect("generate");

        assert!(content.contains("Example Corp"));
        assert!(content.contains("Technology Services"));
    }

    #[tokio::test]
    async fn test_generic_quotes_prior_sections() {
        let ctx = example_context().with_prior("campaign_architect", "Campaign framework text");
        let content = TemplateGenerator::new()
            .generate("Define the measurement framework.", &ctx)
            .await
            .expect("generate");

        assert!(content.contains("Building on campaign_architect"));
    }

    #[tokio::test]
    async fn test_generation_is_deterministic() {
        let ctx = example_context();
        let gen = TemplateGenerator::new();
        let a = gen.generate("Produce key findings.", &ctx).await.expect("generate");
        let b = gen.generate("Produce key findings.", &ctx).await.expect("generate");
        assert_eq!(a, b);
    }
}
