//! # Brandkit
//!
//! A marketing-kit generation pipeline: merges company data from a
//! questionnaire, an optional website, and uploaded brand documents into a
//! canonical profile, then generates the kit's sections through a static
//! stage graph.
//!
//! - **Profile synthesis**: precedence-based merge of form, file, and
//!   website sources with placeholder rejection
//! - **Static stage graph**: nine sections with explicit dependencies,
//!   validated once and shared process-wide
//! - **Pipeline execution**: bounded retries, halt-on-failure,
//!   cooperative cancellation, optional concurrency
//! - **Kit assembly**: completed runs only; a kit never has gaps
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use brandkit::prelude::*;
//! use std::sync::Arc;
//!
//! let profile = Synthesizer::new()
//!     .synthesize(Some(questionnaire.into_record()), extractor_records)?;
//!
//! let run = PipelineExecutor::new()
//!     .run(profile, StageGraph::marketing_kit(), Arc::new(TemplateGenerator::new()))
//!     .await;
//!
//! let kit = Kit::assemble(&run)?;
//! println!("{}", kit.to_markdown());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod extract;
pub mod generate;
pub mod graph;
pub mod kit;
pub mod logging;
pub mod pipeline;
pub mod profile;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::{
        CyclicDependencyError, GenerationError, IncompleteRunError, KitError,
        MissingInputError, UnknownDependencyError,
    };
    pub use crate::extract::{FileExtraction, WebsiteExtraction, WebsitePage, mine_text};
    pub use crate::generate::{GenerationContext, Generator, TemplateGenerator};
    pub use crate::graph::{StageGraph, StageSpec};
    pub use crate::kit::{Kit, KitMetadata, KitSection};
    pub use crate::pipeline::{
        Backoff, CancellationToken, ExecutorConfig, PipelineExecutor, PipelineRun,
        RetryPolicy, RunStatus, StageOutput,
    };
    pub use crate::profile::{
        Attribute, AttributeValue, CompanyProfile, FileKind, Questionnaire, SourceKind,
        SourceRecord, Synthesizer,
    };

    #[cfg(feature = "scrape")]
    pub use crate::extract::{ScrapeConfig, WebsiteScraper};
}
