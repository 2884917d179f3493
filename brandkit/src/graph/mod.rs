//! Static stage graph with cached topological order.
//!
//! Stages are declared once, validated at load time, and never created or
//! destroyed at runtime. The executor walks the computed order and never
//! special-cases a stage id; adding or removing a stage is an edit to the
//! static declaration only.

use crate::errors::{CyclicDependencyError, KitError, UnknownDependencyError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Declaration of a single content-generation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSpec {
    /// Unique stage identifier.
    pub id: String,
    /// Human-readable section title used in the assembled kit.
    pub title: String,
    /// Instructions passed to the generation capability.
    pub directive: String,
    /// Ids of stages whose output this stage may read.
    pub dependencies: Vec<String>,
}

impl StageSpec {
    /// Creates a stage with no dependencies.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, directive: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            directive: directive.into(),
            dependencies: Vec::new(),
        }
    }

    /// Declares the stages whose output this stage may read.
    #[must_use]
    pub fn with_dependencies(
        mut self,
        deps: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A validated, acyclic graph of stages with a cached topological order.
///
/// Immutable after construction; safe to share across concurrent runs.
#[derive(Debug, Clone)]
pub struct StageGraph {
    stages: Vec<StageSpec>,
    order: Vec<usize>,
}

impl StageGraph {
    /// Builds and validates a graph from static declarations.
    ///
    /// The topological order is computed once here; ties among independent
    /// stages are broken by declaration order so runs stay reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownDependencyError`] when a stage references an id not
    /// present in the graph, and [`CyclicDependencyError`] when the
    /// declarations contain a cycle. Both indicate configuration defects
    /// and are fatal at load time.
    pub fn new(stages: Vec<StageSpec>) -> Result<Self, KitError> {
        let mut ids: HashSet<&str> = HashSet::new();
        for stage in &stages {
            if !ids.insert(&stage.id) {
                return Err(KitError::Internal(format!(
                    "duplicate stage id '{}'",
                    stage.id
                )));
            }
        }
        for stage in &stages {
            for dep in &stage.dependencies {
                if !ids.contains(dep.as_str()) {
                    return Err(UnknownDependencyError::new(&stage.id, dep).into());
                }
                if dep == &stage.id {
                    return Err(CyclicDependencyError::new(vec![
                        stage.id.clone(),
                        stage.id.clone(),
                    ])
                    .into());
                }
            }
        }

        let order = topological_order(&stages)?;
        Ok(Self { stages, order })
    }

    /// Returns the stage ids in execution order.
    #[must_use]
    pub fn topological_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&idx| self.stages[idx].id.as_str())
            .collect()
    }

    /// Returns the stages in execution order.
    pub(crate) fn ordered_stages(&self) -> impl Iterator<Item = &StageSpec> {
        self.order.iter().map(|&idx| &self.stages[idx])
    }

    /// Looks up a stage by id.
    #[must_use]
    pub fn stage(&self, id: &str) -> Option<&StageSpec> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns whether the graph has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The canonical marketing-kit graph: nine sections with explicit
    /// dependencies, shared process-wide.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn marketing_kit() -> &'static Self {
        static GRAPH: OnceLock<StageGraph> = OnceLock::new();
        GRAPH.get_or_init(|| {
            Self::new(marketing_kit_stages())
                .expect("built-in marketing kit stage declarations are valid")
        })
    }
}

/// The static declaration of the marketing-kit sections.
fn marketing_kit_stages() -> Vec<StageSpec> {
    vec![
        StageSpec::new(
            "overview_writer",
            "Overview",
            "Write the kit overview: the purpose of this marketing kit, how to \
             use it, and the company's primary goal.",
        ),
        StageSpec::new(
            "key_findings_researcher",
            "Key Findings",
            "Produce six numbered key findings covering market opportunity, \
             competitive differentiation, target market clarity, positioning, \
             growth trajectory, and customer focus.",
        ),
        StageSpec::new(
            "market_landscape_analyzer",
            "Market Landscape",
            "Describe macro trends, the competitive landscape, and buying \
             behavior in the company's industry, building on the key findings.",
        )
        .with_dependencies(["key_findings_researcher"]),
        StageSpec::new(
            "persona_creator",
            "Audience & Personas",
            "Define the primary and secondary buyer personas with profile, \
             motivation, needs, and messaging, consistent with the market \
             landscape.",
        )
        .with_dependencies(["market_landscape_analyzer"]),
        StageSpec::new(
            "brand_voice_definer",
            "Brand Voice",
            "Define the brand essence, purpose, personality, tone and voice \
             examples, evaluated taglines, and do's and don'ts, speaking to \
             the defined personas.",
        )
        .with_dependencies(["persona_creator"]),
        StageSpec::new(
            "keyword_strategist",
            "Content Strategy",
            "Lay out the content strategy: topic hubs, keyword themes, and \
             content formats aligned to the personas and brand voice.",
        )
        .with_dependencies(["persona_creator", "brand_voice_definer"]),
        StageSpec::new(
            "social_strategist",
            "Social Strategy",
            "Plan the social presence: platforms, cadence, and example posts \
             in the brand voice.",
        )
        .with_dependencies(["brand_voice_definer"]),
        StageSpec::new(
            "campaign_architect",
            "Campaign Structure",
            "Design the campaign framework: evergreen, prospecting, and event \
             campaigns with their assets, grounded in the content strategy \
             and personas.",
        )
        .with_dependencies(["keyword_strategist", "persona_creator"]),
        StageSpec::new(
            "engagement_framework_builder",
            "Engagement Framework",
            "Define the strategic initiatives and measurement framework that \
             operationalize the campaigns.",
        )
        .with_dependencies(["campaign_architect"]),
    ]
}

/// Kahn's algorithm with declaration-order tie-breaking.
fn topological_order(stages: &[StageSpec]) -> Result<Vec<usize>, CyclicDependencyError> {
    let index_of = |id: &str| stages.iter().position(|s| s.id == id);

    let mut in_degree: Vec<usize> = stages.iter().map(|s| s.dependencies.len()).collect();
    let mut emitted = vec![false; stages.len()];
    let mut order = Vec::with_capacity(stages.len());

    while order.len() < stages.len() {
        // First ready stage in declaration order keeps runs reproducible.
        let Some(next) = (0..stages.len()).find(|&i| !emitted[i] && in_degree[i] == 0) else {
            return Err(CyclicDependencyError::new(find_cycle(stages)));
        };
        emitted[next] = true;
        order.push(next);

        for (i, stage) in stages.iter().enumerate() {
            if !emitted[i] {
                let satisfied = stage
                    .dependencies
                    .iter()
                    .filter(|dep| index_of(dep) == Some(next))
                    .count();
                in_degree[i] -= satisfied;
            }
        }
    }
    Ok(order)
}

/// Recovers one cycle path for the error message.
fn find_cycle(stages: &[StageSpec]) -> Vec<String> {
    fn visit(
        id: &str,
        stages: &[StageSpec],
        path: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) -> Option<Vec<String>> {
        if let Some(pos) = path.iter().position(|p| p == id) {
            let mut cycle: Vec<String> = path[pos..].to_vec();
            cycle.push(id.to_string());
            return Some(cycle);
        }
        if done.contains(id) {
            return None;
        }
        path.push(id.to_string());
        if let Some(stage) = stages.iter().find(|s| s.id == id) {
            for dep in &stage.dependencies {
                if let Some(cycle) = visit(dep, stages, path, done) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        done.insert(id.to_string());
        None
    }

    let mut done = HashSet::new();
    for stage in stages {
        let mut path = Vec::new();
        if let Some(cycle) = visit(&stage.id, stages, &mut path, &mut done) {
            return cycle;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, deps: &[&str]) -> StageSpec {
        StageSpec::new(id, id, format!("generate {id}")).with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_order_respects_dependencies() {
        let graph = StageGraph::new(vec![
            spec("c", &["b"]),
            spec("a", &[]),
            spec("b", &["a"]),
        ])
        .expect("valid graph");

        let order = graph.topological_order();
        let pos = |id: &str| order.iter().position(|s| *s == id).expect("present");
        assert!(pos("a") < pos("b"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn test_independent_stages_keep_declaration_order() {
        let graph = StageGraph::new(vec![spec("z", &[]), spec("a", &[]), spec("m", &[])])
            .expect("valid graph");
        assert_eq!(graph.topological_order(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let err = StageGraph::new(vec![spec("a", &["ghost"])]).expect_err("must fail");
        assert!(matches!(err, KitError::UnknownDependency(_)));
    }

    #[test]
    fn test_cycle_rejected_with_path() {
        let err = StageGraph::new(vec![spec("a", &["b"]), spec("b", &["a"])])
            .expect_err("must fail");
        match err {
            KitError::CyclicDependency(e) => {
                assert!(e.cycle_path.len() >= 3);
                assert_eq!(e.cycle_path.first(), e.cycle_path.last());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_dependency_rejected() {
        let err = StageGraph::new(vec![spec("a", &["a"])]).expect_err("must fail");
        assert!(matches!(err, KitError::CyclicDependency(_)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err =
            StageGraph::new(vec![spec("a", &[]), spec("a", &[])]).expect_err("must fail");
        assert!(matches!(err, KitError::Internal(_)));
    }

    #[test]
    fn test_marketing_kit_graph_is_valid() {
        let graph = StageGraph::marketing_kit();
        assert_eq!(graph.len(), 9);

        let order = graph.topological_order();
        let pos = |id: &str| order.iter().position(|s| *s == id).expect("present");
        for stage in graph.ordered_stages() {
            for dep in &stage.dependencies {
                assert!(pos(dep) < pos(&stage.id), "{dep} must precede {}", stage.id);
            }
        }
    }

    #[test]
    fn test_marketing_kit_graph_is_shared() {
        let a = StageGraph::marketing_kit() as *const StageGraph;
        let b = StageGraph::marketing_kit() as *const StageGraph;
        assert_eq!(a, b);
    }
}
