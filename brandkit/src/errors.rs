//! Error types for the brandkit pipeline.
//!
//! The taxonomy separates configuration defects (cycles, unknown
//! dependencies — fatal at load time), input defects (missing form data),
//! per-stage generation failures (retried, then fatal for the run), and
//! caller usage errors (assembling an incomplete run).

use crate::pipeline::RunStatus;
use thiserror::Error;

/// The main error type for brandkit operations.
#[derive(Debug, Error)]
pub enum KitError {
    /// No form data was supplied to synthesis.
    #[error("{0}")]
    MissingInput(#[from] MissingInputError),

    /// The stage graph contains a dependency cycle.
    #[error("{0}")]
    CyclicDependency(#[from] CyclicDependencyError),

    /// A stage references a dependency that is not in the graph.
    #[error("{0}")]
    UnknownDependency(#[from] UnknownDependencyError),

    /// A stage's generation call failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// Assembly was attempted on a run that has not completed.
    #[error("{0}")]
    IncompleteRun(#[from] IncompleteRunError),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error raised when synthesis is invoked without form data.
///
/// Extractor records are best-effort enrichers and may be empty; the form
/// is the one required input.
#[derive(Debug, Clone, Default, Error)]
#[error("No form data supplied; a questionnaire is required for synthesis")]
pub struct MissingInputError;

impl MissingInputError {
    /// Creates a new missing input error.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Error raised when the stage graph contains a cycle.
///
/// A configuration defect, detected once at graph construction and never
/// recovered at runtime.
#[derive(Debug, Clone, Error)]
#[error("Cycle detected in stage graph: {}", cycle_path.join(" -> "))]
pub struct CyclicDependencyError {
    /// The path of stage ids forming the cycle.
    pub cycle_path: Vec<String>,
}

impl CyclicDependencyError {
    /// Creates a new cyclic dependency error.
    #[must_use]
    pub fn new(cycle_path: Vec<String>) -> Self {
        Self { cycle_path }
    }
}

/// Error raised when a stage declares a dependency on an id not present in
/// the graph.
#[derive(Debug, Clone, Error)]
#[error("Stage '{stage}' depends on unknown stage '{dependency}'")]
pub struct UnknownDependencyError {
    /// The stage with the bad declaration.
    pub stage: String,
    /// The dependency id that does not exist.
    pub dependency: String,
}

impl UnknownDependencyError {
    /// Creates a new unknown dependency error.
    #[must_use]
    pub fn new(stage: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            dependency: dependency.into(),
        }
    }
}

/// Error raised by a generation capability for a single stage call.
#[derive(Debug, Clone, Error)]
#[error("Generation failed: {message}")]
pub struct GenerationError {
    /// Provider-side failure description.
    pub message: String,
    /// Whether another attempt with the same context may succeed.
    pub retryable: bool,
}

impl GenerationError {
    /// Creates a retryable generation error.
    #[must_use]
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a permanent generation error.
    #[must_use]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }
}

/// Error raised when assembling a run that is not in the completed state.
///
/// Always a caller usage error; never retried.
#[derive(Debug, Clone, Error)]
#[error("Cannot assemble kit from a run in status '{status}'")]
pub struct IncompleteRunError {
    /// The status the run was actually in.
    pub status: RunStatus,
}

impl IncompleteRunError {
    /// Creates a new incomplete run error.
    #[must_use]
    pub fn new(status: RunStatus) -> Self {
        Self { status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dependency_message() {
        let err = CyclicDependencyError::new(vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ]);
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_unknown_dependency_message() {
        let err = UnknownDependencyError::new("persona_creator", "nonexistent");
        assert!(err.to_string().contains("persona_creator"));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_generation_error_retryable() {
        assert!(GenerationError::retryable("rate limited").retryable);
        assert!(!GenerationError::permanent("invalid key").retryable);
    }

    #[test]
    fn test_kit_error_from_missing_input() {
        let err: KitError = MissingInputError::new().into();
        assert!(matches!(err, KitError::MissingInput(_)));
    }

    #[test]
    fn test_incomplete_run_message() {
        let err = IncompleteRunError::new(RunStatus::Failed);
        assert!(err.to_string().contains("failed"));
    }
}
