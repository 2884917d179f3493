//! The pipeline executor.
//!
//! Walks the stage graph in topological order, builds each stage's
//! generation context from its declared dependencies only, and invokes the
//! generation capability with bounded retries. A stage failure halts the
//! run; partial kits are never silently assembled with gaps.

use super::{CancellationToken, PipelineRun, RetryPolicy, RunFailure, RunStatus, StageOutput};
use crate::generate::{GenerationContext, Generator};
use crate::graph::{StageGraph, StageSpec};
use crate::profile::CompanyProfile;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Executor configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Retry policy applied to every stage's generation call.
    pub retry: RetryPolicy,
    /// Maximum stages in flight at once. 1 (the default) executes
    /// sequentially; higher values dispatch dependency-free stages
    /// concurrently while preserving per-stage context isolation and
    /// static output ordering.
    pub max_concurrency: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_concurrency: 1,
        }
    }
}

/// Drives one pipeline run over an immutable stage graph.
#[derive(Debug, Clone, Default)]
pub struct PipelineExecutor {
    config: ExecutorConfig,
}

impl PipelineExecutor {
    /// Creates an executor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor with an explicit configuration.
    #[must_use]
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Executes all stages for a profile.
    ///
    /// Always returns the run; failure and cancellation are reported
    /// through its status and error record, with all outputs produced
    /// before the halt retained for diagnostics.
    pub async fn run(
        &self,
        profile: CompanyProfile,
        graph: &StageGraph,
        generator: Arc<dyn Generator>,
    ) -> PipelineRun {
        let token = CancellationToken::new();
        self.run_with_cancellation(profile, graph, generator, &token)
            .await
    }

    /// Executes all stages, honoring a cancellation token between stages.
    pub async fn run_with_cancellation(
        &self,
        profile: CompanyProfile,
        graph: &StageGraph,
        generator: Arc<dyn Generator>,
        cancel: &CancellationToken,
    ) -> PipelineRun {
        let mut run = PipelineRun::new(profile);
        run.status = RunStatus::Running;
        info!(run_id = %run.id, stages = graph.len(), "pipeline run started");

        if self.config.max_concurrency > 1 {
            self.run_concurrent(&mut run, graph, generator, cancel).await;
        } else {
            self.run_sequential(&mut run, graph, generator, cancel).await;
        }

        run.finished_at = Some(chrono::Utc::now());
        info!(
            run_id = %run.id,
            status = %run.status,
            completed = run.completed_stages(),
            "pipeline run finished"
        );
        run
    }

    async fn run_sequential(
        &self,
        run: &mut PipelineRun,
        graph: &StageGraph,
        generator: Arc<dyn Generator>,
        cancel: &CancellationToken,
    ) {
        for stage in graph.ordered_stages() {
            if cancel.is_cancelled() {
                run.status = RunStatus::Cancelled;
                info!(run_id = %run.id, stage = %stage.id, "run cancelled before stage");
                return;
            }

            let context = build_context(&run.profile, stage, &run.outputs);
            match execute_stage(stage, &context, generator.as_ref(), self.config.retry).await {
                Ok(output) => run.outputs.push(output),
                Err(failure) => {
                    run.status = RunStatus::Failed;
                    run.error = Some(failure);
                    return;
                }
            }
        }
        run.status = RunStatus::Completed;
    }

    /// Dependency-driven dispatch: a stage is spawned as soon as its
    /// declared dependencies completed, bounded by `max_concurrency`.
    /// Assembly order still follows the static topological order, not
    /// completion order.
    async fn run_concurrent(
        &self,
        run: &mut PipelineRun,
        graph: &StageGraph,
        generator: Arc<dyn Generator>,
        cancel: &CancellationToken,
    ) {
        let specs: Vec<StageSpec> = graph.ordered_stages().cloned().collect();
        let total = specs.len();

        let mut completed: HashMap<String, StageOutput> = HashMap::new();
        let mut scheduled: HashSet<String> = HashSet::new();
        let mut failure: Option<RunFailure> = None;
        let mut cancelled = cancel.is_cancelled();

        let mut active: FuturesUnordered<
            tokio::task::JoinHandle<Result<StageOutput, RunFailure>>,
        > = FuturesUnordered::new();

        if !cancelled {
            schedule_ready(
                &specs,
                &completed,
                &mut scheduled,
                &mut active,
                &run.profile,
                &generator,
                self.config,
            );
        }

        while let Some(joined) = active.next().await {
            match joined {
                Ok(Ok(output)) => {
                    completed.insert(output.stage_id.clone(), output);
                }
                Ok(Err(stage_failure)) => {
                    failure.get_or_insert(stage_failure);
                }
                Err(join_err) => {
                    failure.get_or_insert(RunFailure {
                        stage_id: String::new(),
                        message: format!("stage task join error: {join_err}"),
                        attempts: 0,
                    });
                }
            }

            if cancel.is_cancelled() {
                cancelled = true;
            }
            // Stop scheduling on failure or cancellation, but drain what is
            // already in flight so their outputs are retained.
            if failure.is_none() && !cancelled {
                schedule_ready(
                    &specs,
                    &completed,
                    &mut scheduled,
                    &mut active,
                    &run.profile,
                    &generator,
                    self.config,
                );
            }
        }

        // Retained outputs follow the static stage order.
        for spec in &specs {
            if let Some(output) = completed.remove(&spec.id) {
                run.outputs.push(output);
            }
        }

        if let Some(failure) = failure {
            run.status = RunStatus::Failed;
            run.error = Some(failure);
        } else if cancelled {
            run.status = RunStatus::Cancelled;
        } else if run.outputs.len() == total {
            run.status = RunStatus::Completed;
        } else {
            // Unreachable with a validated acyclic graph.
            run.status = RunStatus::Failed;
            run.error = Some(RunFailure {
                stage_id: String::new(),
                message: "stage graph stalled with stages unscheduled".to_string(),
                attempts: 0,
            });
        }
    }
}

/// Spawns every stage whose dependencies are satisfied, up to the
/// concurrency bound. Candidates are considered in static order.
fn schedule_ready(
    specs: &[StageSpec],
    completed: &HashMap<String, StageOutput>,
    scheduled: &mut HashSet<String>,
    active: &mut FuturesUnordered<tokio::task::JoinHandle<Result<StageOutput, RunFailure>>>,
    profile: &CompanyProfile,
    generator: &Arc<dyn Generator>,
    config: ExecutorConfig,
) {
    for spec in specs {
        if active.len() >= config.max_concurrency {
            break;
        }
        if scheduled.contains(&spec.id) {
            continue;
        }
        let ready = spec
            .dependencies
            .iter()
            .all(|dep| completed.contains_key(dep));
        if !ready {
            continue;
        }

        scheduled.insert(spec.id.clone());
        // The context is fully determined before the stage starts; the
        // task owns its copy and never observes later completions.
        let mut context = GenerationContext::new(profile.clone());
        for dep in &spec.dependencies {
            if let Some(output) = completed.get(dep) {
                context = context.with_prior(dep.clone(), output.content.clone());
            }
        }

        let spec = spec.clone();
        let generator = Arc::clone(generator);
        let retry = config.retry;
        active.push(tokio::spawn(async move {
            execute_stage(&spec, &context, generator.as_ref(), retry).await
        }));
    }
}

/// Builds a stage's context from the profile and its declared
/// dependencies' outputs.
fn build_context(
    profile: &CompanyProfile,
    stage: &StageSpec,
    outputs: &[StageOutput],
) -> GenerationContext {
    let mut context = GenerationContext::new(profile.clone());
    for dep in &stage.dependencies {
        if let Some(output) = outputs.iter().find(|o| &o.stage_id == dep) {
            context = context.with_prior(dep.clone(), output.content.clone());
        }
    }
    context
}

/// Runs one stage's generation call with bounded retries.
///
/// Permanent errors fail immediately; retryable errors are reattempted
/// with the same context until the attempt budget is spent.
async fn execute_stage(
    stage: &StageSpec,
    context: &GenerationContext,
    generator: &dyn Generator,
    retry: RetryPolicy,
) -> Result<StageOutput, RunFailure> {
    let started = Instant::now();
    let mut attempt = 0_u32;

    loop {
        attempt += 1;
        match generator.generate(&stage.directive, context).await {
            Ok(content) => {
                let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
                info!(stage = %stage.id, attempt, duration_ms, "stage completed");
                return Ok(StageOutput {
                    stage_id: stage.id.clone(),
                    title: stage.title.clone(),
                    content,
                    attempts: attempt,
                    duration_ms,
                });
            }
            Err(err) if err.retryable && attempt < retry.max_attempts => {
                let delay = retry.delay(attempt);
                warn!(
                    stage = %stage.id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err.message,
                    "stage generation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                warn!(stage = %stage.id, attempt, error = %err.message, "stage failed permanently");
                return Err(RunFailure {
                    stage_id: stage.id.clone(),
                    message: err.message,
                    attempts: attempt,
                });
            }
        }
    }
}
