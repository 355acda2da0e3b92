use crate::context::ScenarioContext;
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};

pub struct GetCustomerSubscribedSkus;

impl PartnerScenario for GetCustomerSubscribedSkus {
    fn title(&self) -> &str {
        "Get customer subscribed SKUs"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id =
            context.obtain_customer_id("Enter the ID of the customer to get subscribed SKUs for")?;

        let console = context.console();
        console.start_progress("Getting customer subscribed SKUs")?;
        let skus = context.operations().subscribed_skus(&customer_id)?;
        console.stop_progress()?;

        console.write_object(&skus, Some("Customer subscribed SKUs"))?;
        Ok(ScenarioOutcome::Completed)
    }
}
