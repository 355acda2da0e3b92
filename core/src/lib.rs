pub mod client;
pub mod config;
pub mod console;
pub mod context;
pub mod models;
pub mod runtime;
pub mod samples;
pub mod scenario;
pub mod validation;

#[cfg(test)]
mod testing;

pub use client::{follow_link_as, ApiError, HttpPartnerClient, PartnerOperations};
pub use config::{
    ConfigError, FeatureFlags, PartnerServiceConfig, SamplesConfig, ScenarioSettings,
    DEFAULT_CONFIG_FILE,
};
pub use console::{ConsoleError, ConsoleHelper};
pub use context::ScenarioContext;
pub use runtime::{
    ExecutionOutcome, ExecutionReport, ExecutionStatus, Executor, NodeKind, ScenarioExecution,
};
pub use samples::build_scenario_tree;
pub use scenario::{
    AggregateScenario, PartnerScenario, ScenarioError, ScenarioNode, ScenarioOutcome,
    ScenarioOutline,
};
pub use validation::{validate_config, Diagnostic, DiagnosticLevel};
