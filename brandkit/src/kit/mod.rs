//! Kit assembly: turns a completed run into the final document.

use crate::errors::IncompleteRunError;
use crate::pipeline::PipelineRun;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Metadata attached to an assembled kit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitMetadata {
    /// The company the kit was generated for.
    pub company_name: String,
    /// The run that produced this kit.
    pub run_id: uuid::Uuid,
    /// When the kit was assembled.
    pub generated_at: DateTime<Utc>,
}

/// One section of the assembled kit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitSection {
    /// The stage that produced this section.
    pub stage_id: String,
    /// Section heading.
    pub title: String,
    /// Section body.
    pub content: String,
}

/// The assembled marketing kit: every section in stage order.
///
/// Only built from completed runs; a kit never has gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kit {
    /// Provenance and timing.
    pub metadata: KitMetadata,
    /// Sections in static stage order.
    pub sections: Vec<KitSection>,
}

impl Kit {
    /// Assembles the kit from a completed run.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteRunError`] when the run is not in the completed
    /// state. Partial runs are diagnostic material, not kits.
    pub fn assemble(run: &PipelineRun) -> Result<Self, IncompleteRunError> {
        if !run.is_completed() {
            return Err(IncompleteRunError::new(run.status));
        }

        let sections = run
            .outputs
            .iter()
            .map(|output| KitSection {
                stage_id: output.stage_id.clone(),
                title: output.title.clone(),
                content: output.content.clone(),
            })
            .collect();

        Ok(Self {
            metadata: KitMetadata {
                company_name: run.profile.company_name().to_string(),
                run_id: run.id,
                generated_at: Utc::now(),
            },
            sections,
        })
    }

    /// Looks up a section by stage id.
    #[must_use]
    pub fn section(&self, stage_id: &str) -> Option<&KitSection> {
        self.sections.iter().find(|s| s.stage_id == stage_id)
    }

    /// Renders the kit as a single markdown document.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Marketing Kit: {}\n", self.metadata.company_name);
        let _ = writeln!(
            out,
            "_Generated {}_\n",
            self.metadata.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        for section in &self.sections {
            let _ = writeln!(out, "## {}\n", section.title);
            let _ = writeln!(out, "{}\n", section.content.trim_end());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::TemplateGenerator;
    use crate::graph::StageGraph;
    use crate::pipeline::{PipelineExecutor, RunStatus};
    use crate::profile::{Questionnaire, Synthesizer};
    use std::sync::Arc;

    async fn completed_run() -> PipelineRun {
        let profile = Synthesizer::new()
            .synthesize(Some(Questionnaire::example().into_record()), Vec::new())
            .expect("synthesize");
        PipelineExecutor::new()
            .run(
                profile,
                StageGraph::marketing_kit(),
                Arc::new(TemplateGenerator::new()),
            )
            .await
    }

    #[tokio::test]
    async fn test_assemble_preserves_stage_order() {
        let run = completed_run().await;
        let kit = Kit::assemble(&run).expect("assemble");

        let expected: Vec<&str> = StageGraph::marketing_kit().topological_order();
        let actual: Vec<&str> = kit.sections.iter().map(|s| s.stage_id.as_str()).collect();
        assert_eq!(actual, expected);
        assert_eq!(kit.metadata.company_name, "Example Corp");
        assert_eq!(kit.metadata.run_id, run.id);
    }

    #[tokio::test]
    async fn test_assemble_rejects_incomplete_run() {
        let mut run = completed_run().await;
        run.status = RunStatus::Failed;

        let err = Kit::assemble(&run).expect_err("must reject");
        assert_eq!(err.status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_markdown_contains_every_section_title() {
        let run = completed_run().await;
        let markdown = Kit::assemble(&run).expect("assemble").to_markdown();

        assert!(markdown.starts_with("# Marketing Kit: Example Corp"));
        for stage in StageGraph::marketing_kit().topological_order() {
            let title = &StageGraph::marketing_kit().stage(stage).expect("stage").title;
            assert!(markdown.contains(&format!("## {title}")));
        }
    }

    #[tokio::test]
    async fn test_kit_serde_round_trip() {
        let run = completed_run().await;
        let kit = Kit::assemble(&run).expect("assemble");

        let json = serde_json::to_string(&kit).expect("serialize");
        let back: Kit = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.sections.len(), kit.sections.len());
        assert_eq!(back.metadata.run_id, kit.metadata.run_id);
    }
}
