use crate::context::ScenarioContext;
use crate::scenario::{
    AggregateScenario, PartnerScenario, ScenarioError, ScenarioNode, ScenarioOutcome,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, info, warn};

const ABORTED_MESSAGE: &str = "aborted after earlier failure";
const MUTATIONS_DISABLED_MESSAGE: &str =
    "mutating scenario skipped; set features.allow_mutations to run it";

/// Runs scenario trees depth-first, recording one entry per visited node.
#[derive(Debug, Default)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, root: &ScenarioNode, context: &ScenarioContext) -> ExecutionOutcome {
        let started_at = now_rfc3339();
        let mut steps = Vec::new();
        let result = self.run_node(root, context, "", 0, &mut steps);
        ExecutionOutcome {
            report: ExecutionReport { started_at, steps },
            error: result.err(),
        }
    }

    pub fn execute_aggregate(
        &self,
        aggregate: &AggregateScenario,
        context: &ScenarioContext,
    ) -> ExecutionOutcome {
        let started_at = now_rfc3339();
        let mut steps = Vec::new();
        let result = self.run_aggregate(aggregate, context, "", 0, &mut steps);
        ExecutionOutcome {
            report: ExecutionReport { started_at, steps },
            error: result.err(),
        }
    }

    fn run_node(
        &self,
        node: &ScenarioNode,
        context: &ScenarioContext,
        parent: &str,
        depth: usize,
        steps: &mut Vec<ScenarioExecution>,
    ) -> Result<(), ScenarioError> {
        match node {
            ScenarioNode::Leaf(scenario) => {
                self.run_leaf(scenario.as_ref(), context, parent, depth, steps)
            }
            ScenarioNode::Aggregate(group) => {
                self.run_aggregate(group, context, parent, depth, steps)
            }
        }
    }

    fn run_aggregate(
        &self,
        aggregate: &AggregateScenario,
        context: &ScenarioContext,
        parent: &str,
        depth: usize,
        steps: &mut Vec<ScenarioExecution>,
    ) -> Result<(), ScenarioError> {
        let path = join_path(parent, aggregate.title());
        let slot = steps.len();
        steps.push(ScenarioExecution::new(
            path.clone(),
            aggregate.title(),
            NodeKind::Aggregate,
            depth,
        ));
        let timer = Instant::now();
        info!(scenario = %path, children = aggregate.children().len(), "running scenario group");

        let result = context
            .console()
            .header(aggregate.title())
            .map_err(ScenarioError::from)
            .and_then(|()| self.run_children(aggregate, context, &path, depth, steps));

        let entry = &mut steps[slot];
        entry.duration_ms = timer.elapsed().as_millis();
        match &result {
            Ok(()) => entry.status = ExecutionStatus::Completed,
            Err(err) => {
                entry.status = ExecutionStatus::Failed;
                entry.message = Some(err.to_string());
            }
        }
        result
    }

    fn run_children(
        &self,
        aggregate: &AggregateScenario,
        context: &ScenarioContext,
        path: &str,
        depth: usize,
        steps: &mut Vec<ScenarioExecution>,
    ) -> Result<(), ScenarioError> {
        let children = aggregate.children();
        for (idx, child) in children.iter().enumerate() {
            if let Err(err) = self.run_node(child, context, path, depth + 1, steps) {
                for skipped in &children[idx + 1..] {
                    warn!(scenario = %join_path(path, skipped.title()), "not run after earlier failure");
                    steps.push(ScenarioExecution::skipped(
                        join_path(path, skipped.title()),
                        skipped.title(),
                        kind_of(skipped),
                        depth + 1,
                        ABORTED_MESSAGE,
                    ));
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn run_leaf(
        &self,
        scenario: &dyn PartnerScenario,
        context: &ScenarioContext,
        parent: &str,
        depth: usize,
        steps: &mut Vec<ScenarioExecution>,
    ) -> Result<(), ScenarioError> {
        let path = join_path(parent, scenario.title());

        if scenario.mutates() && !context.config().features.allow_mutations {
            warn!(scenario = %path, "skipping mutating scenario");
            steps.push(ScenarioExecution::skipped(
                path,
                scenario.title(),
                NodeKind::Leaf,
                depth,
                MUTATIONS_DISABLED_MESSAGE,
            ));
            return Ok(());
        }

        let mut entry = ScenarioExecution::new(path.clone(), scenario.title(), NodeKind::Leaf, depth);
        info!(scenario = %path, "running scenario");
        let timer = Instant::now();

        let result = context
            .console()
            .header(scenario.title())
            .map_err(ScenarioError::from)
            .and_then(|()| scenario.run(context));
        // Leave no dangling progress marker behind a failed scenario.
        let _ = context.console().stop_progress();
        entry.duration_ms = timer.elapsed().as_millis();

        let result = match result {
            Ok(ScenarioOutcome::Completed) => {
                info!(scenario = %path, elapsed_ms = entry.duration_ms as u64, "scenario completed");
                entry.status = ExecutionStatus::Completed;
                Ok(())
            }
            Ok(ScenarioOutcome::Skipped(reason)) => {
                warn!(scenario = %path, %reason, "scenario skipped");
                entry.status = ExecutionStatus::Skipped;
                entry.message = Some(reason);
                Ok(())
            }
            Err(err) => {
                error!(scenario = %path, error = %err, "scenario failed");
                entry.status = ExecutionStatus::Failed;
                entry.message = Some(err.to_string());
                Err(err)
            }
        };
        steps.push(entry);
        result
    }
}

fn join_path(parent: &str, title: &str) -> String {
    if parent.is_empty() {
        title.to_string()
    } else {
        format!("{parent}/{title}")
    }
}

fn kind_of(node: &ScenarioNode) -> NodeKind {
    match node {
        ScenarioNode::Leaf(_) => NodeKind::Leaf,
        ScenarioNode::Aggregate(_) => NodeKind::Aggregate,
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

#[derive(Debug)]
pub struct ExecutionOutcome {
    pub report: ExecutionReport,
    /// First error that reached the root, if any.
    pub error: Option<ScenarioError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub started_at: String,
    pub steps: Vec<ScenarioExecution>,
}

impl ExecutionReport {
    pub fn has_failures(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.status == ExecutionStatus::Failed)
    }

    pub fn count(&self, kind: NodeKind, status: ExecutionStatus) -> usize {
        self.steps
            .iter()
            .filter(|step| step.kind == kind && step.status == status)
            .count()
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            writeln!(f, "No scenarios were run.")?;
            return Ok(());
        }

        writeln!(f, "Execution results ({}):", self.started_at)?;
        for step in &self.steps {
            let status = match step.status {
                ExecutionStatus::Completed => "completed",
                ExecutionStatus::Skipped => "skipped",
                ExecutionStatus::Failed => "failed",
            };
            let indent = "  ".repeat(step.depth + 1);
            writeln!(
                f,
                "{indent}- [{status}] {} ({} ms)",
                step.name, step.duration_ms
            )?;
            if let Some(message) = &step.message {
                for line in message.lines() {
                    writeln!(f, "{indent}    {line}")?;
                }
            }
        }
        writeln!(
            f,
            "Scenarios: {} completed, {} skipped, {} failed",
            self.count(NodeKind::Leaf, ExecutionStatus::Completed),
            self.count(NodeKind::Leaf, ExecutionStatus::Skipped),
            self.count(NodeKind::Leaf, ExecutionStatus::Failed),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioExecution {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub status: ExecutionStatus,
    pub message: Option<String>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Aggregate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExecutionStatus {
    Completed,
    Skipped,
    Failed,
}

impl ScenarioExecution {
    fn new(path: String, name: &str, kind: NodeKind, depth: usize) -> Self {
        Self {
            path,
            name: name.to_string(),
            kind,
            depth,
            status: ExecutionStatus::Completed,
            message: None,
            duration_ms: 0,
        }
    }

    fn skipped(path: String, name: &str, kind: NodeKind, depth: usize, message: &str) -> Self {
        Self {
            status: ExecutionStatus::Skipped,
            message: Some(message.to_string()),
            ..Self::new(path, name, kind, depth)
        }
    }
}
