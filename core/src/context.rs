use crate::client::PartnerOperations;
use crate::config::{SamplesConfig, ScenarioSettings};
use crate::console::{ConsoleError, ConsoleHelper};

/// Everything a scenario needs: configuration, the API handle and the console.
/// Built once before the run and only ever shared by reference.
pub struct ScenarioContext {
    config: SamplesConfig,
    operations: Box<dyn PartnerOperations>,
    console: ConsoleHelper,
}

impl ScenarioContext {
    pub fn new(
        config: SamplesConfig,
        operations: Box<dyn PartnerOperations>,
        console: ConsoleHelper,
    ) -> Self {
        Self {
            config,
            operations,
            console,
        }
    }

    pub fn config(&self) -> &SamplesConfig {
        &self.config
    }

    pub fn settings(&self) -> &ScenarioSettings {
        &self.config.scenario
    }

    pub fn operations(&self) -> &dyn PartnerOperations {
        self.operations.as_ref()
    }

    pub fn console(&self) -> &ConsoleHelper {
        &self.console
    }

    pub fn obtain_customer_id(&self, prompt: &str) -> Result<String, ConsoleError> {
        self.obtain(&self.config.scenario.default_customer_id, "customer ID", prompt)
    }

    pub fn obtain_customer_user_id(&self, prompt: &str) -> Result<String, ConsoleError> {
        self.obtain(
            &self.config.scenario.default_customer_user_id,
            "customer user ID",
            prompt,
        )
    }

    pub fn obtain_subscription_id(&self, prompt: &str) -> Result<String, ConsoleError> {
        self.obtain(
            &self.config.scenario.default_subscription_id,
            "subscription ID",
            prompt,
        )
    }

    /// Uses the configured value when present, otherwise prompts.
    pub fn obtain(
        &self,
        configured: &str,
        label: &str,
        prompt: &str,
    ) -> Result<String, ConsoleError> {
        let configured = configured.trim();
        if configured.is_empty() {
            self.console.read_non_empty_string(prompt)
        } else {
            self.console
                .write_line(&format!("Found {label} {configured} in configuration."))?;
            Ok(configured.to_string())
        }
    }
}
