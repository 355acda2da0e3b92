use crate::client::ApiError;
use crate::console::ConsoleError;
use crate::context::ScenarioContext;
use crate::runtime::Executor;
use std::fmt;

/// How a scenario finished when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    Completed,
    Skipped(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error("{0}")]
    Precondition(String),
}

/// A named unit of demo work against the partner API.
pub trait PartnerScenario {
    fn title(&self) -> &str;

    /// Whether the scenario creates or changes partner data.
    fn mutates(&self) -> bool {
        false
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError>;
}

pub enum ScenarioNode {
    Leaf(Box<dyn PartnerScenario>),
    Aggregate(AggregateScenario),
}

impl ScenarioNode {
    pub fn leaf(scenario: impl PartnerScenario + 'static) -> Self {
        ScenarioNode::Leaf(Box::new(scenario))
    }

    pub fn aggregate(title: impl Into<String>, children: Vec<ScenarioNode>) -> Self {
        ScenarioNode::Aggregate(AggregateScenario::new(title, children))
    }

    pub fn title(&self) -> &str {
        match self {
            ScenarioNode::Leaf(scenario) => scenario.title(),
            ScenarioNode::Aggregate(group) => group.title(),
        }
    }

    /// Resolves a `/`-separated path of child titles below this node. An empty
    /// path resolves to the node itself.
    pub fn find(&self, path: &str) -> Option<&ScenarioNode> {
        let mut current = self;
        for segment in path.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            let ScenarioNode::Aggregate(group) = current else {
                return None;
            };
            current = group
                .children()
                .iter()
                .find(|child| child.title().eq_ignore_ascii_case(segment))?;
        }
        Some(current)
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            ScenarioNode::Leaf(_) => 1,
            ScenarioNode::Aggregate(group) => {
                group.children().iter().map(ScenarioNode::leaf_count).sum()
            }
        }
    }

    pub fn outline(&self) -> ScenarioOutline<'_> {
        ScenarioOutline { root: self }
    }
}

/// An ordered group of scenarios run one after another. The first error
/// aborts the remaining children and is returned to the caller.
pub struct AggregateScenario {
    title: String,
    children: Vec<ScenarioNode>,
}

impl AggregateScenario {
    pub fn new(title: impl Into<String>, children: Vec<ScenarioNode>) -> Self {
        Self {
            title: title.into(),
            children,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> &[ScenarioNode] {
        &self.children
    }

    pub fn run(&self, context: &ScenarioContext) -> Result<(), ScenarioError> {
        match Executor::new().execute_aggregate(self, context).error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Indented listing of a scenario tree; mutating leaves are marked with `*`.
pub struct ScenarioOutline<'a> {
    root: &'a ScenarioNode,
}

impl fmt::Display for ScenarioOutline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_outline(f, self.root, 0)
    }
}

fn write_outline(f: &mut fmt::Formatter<'_>, node: &ScenarioNode, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        ScenarioNode::Leaf(scenario) => {
            let marker = if scenario.mutates() { " *" } else { "" };
            writeln!(f, "{indent}- {}{marker}", scenario.title())
        }
        ScenarioNode::Aggregate(group) => {
            writeln!(f, "{indent}{}/", group.title())?;
            for child in group.children() {
                write_outline(f, child, depth + 1)?;
            }
            Ok(())
        }
    }
}
