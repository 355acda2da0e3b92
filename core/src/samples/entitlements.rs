use crate::context::ScenarioContext;
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};
use tracing::warn;

/// Lists a customer's entitlements and, where the entitlement type has one,
/// the details behind its artifact link. Artifact lookups are best effort:
/// a failure is printed and the loop moves on to the next entitlement.
pub struct GetEntitlements;

impl PartnerScenario for GetEntitlements {
    fn title(&self) -> &str {
        "Get entitlements"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id =
            context.obtain_customer_id("Enter the ID of the customer to retrieve entitlements for")?;
        let operations = context.operations();
        let console = context.console();

        console.start_progress("Retrieving customer entitlements")?;
        let entitlements = operations.entitlements(&customer_id)?;
        console.stop_progress()?;

        if entitlements.items.is_empty() {
            console.write_line("The customer has no entitlements.")?;
            return Ok(ScenarioOutcome::Completed);
        }

        for entitlement in &entitlements.items {
            console.write_object(entitlement, Some("Entitlement details"))?;

            let Some(link) = entitlement.artifact_details_link() else {
                continue;
            };
            match operations.follow_link(link) {
                Ok(details) => console.write_object(&details, None)?,
                Err(err) => {
                    warn!(uri = %link.uri, error = %err, "artifact details unavailable");
                    console.write_object(&err.to_string(), Some("Artifact details"))?;
                }
            }
        }
        Ok(ScenarioOutcome::Completed)
    }
}
