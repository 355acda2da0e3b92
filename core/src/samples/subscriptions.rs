use crate::context::ScenarioContext;
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};

const SAMPLE_SUFFIX: &str = " (sample)";

pub struct GetSubscriptions;

impl PartnerScenario for GetSubscriptions {
    fn title(&self) -> &str {
        "Get customer subscriptions"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id =
            context.obtain_customer_id("Enter the ID of the customer to list subscriptions for")?;

        let console = context.console();
        console.start_progress("Querying subscriptions")?;
        let subscriptions = context.operations().subscriptions(&customer_id)?;
        console.stop_progress()?;

        if subscriptions.items.is_empty() {
            console.write_line("The customer has no subscriptions.")?;
        } else {
            console.write_object(&subscriptions.items, Some("Customer subscriptions"))?;
        }
        Ok(ScenarioOutcome::Completed)
    }
}

pub struct GetSubscription;

impl PartnerScenario for GetSubscription {
    fn title(&self) -> &str {
        "Get subscription details"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id = context.obtain_customer_id("Enter the ID of the customer")?;
        let subscription_id =
            context.obtain_subscription_id("Enter the ID of the subscription to retrieve")?;

        let console = context.console();
        console.start_progress("Retrieving subscription")?;
        let subscription = context
            .operations()
            .subscription(&customer_id, &subscription_id)?;
        console.stop_progress()?;

        console.write_object(&subscription, Some("Subscription details"))?;
        Ok(ScenarioOutcome::Completed)
    }
}

/// Toggles a marker suffix on the subscription's friendly name so repeated
/// runs do not keep growing it.
pub struct UpdateSubscription;

impl PartnerScenario for UpdateSubscription {
    fn title(&self) -> &str {
        "Update subscription friendly name"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id = context.obtain_customer_id("Enter the ID of the customer")?;
        let subscription_id =
            context.obtain_subscription_id("Enter the ID of the subscription to update")?;
        let operations = context.operations();
        let console = context.console();

        console.start_progress("Retrieving subscription")?;
        let mut subscription = operations.subscription(&customer_id, &subscription_id)?;
        console.stop_progress()?;
        console.write_object(&subscription, Some("Subscription before update"))?;

        subscription.friendly_name = Some(toggle_sample_suffix(
            subscription
                .friendly_name
                .as_deref()
                .or(subscription.offer_name.as_deref())
                .unwrap_or(&subscription.id),
        ));

        console.start_progress("Updating subscription")?;
        let updated = operations.update_subscription(&customer_id, &subscription)?;
        console.stop_progress()?;

        console.write_object(&updated, Some("Subscription after update"))?;
        Ok(ScenarioOutcome::Completed)
    }
}

fn toggle_sample_suffix(name: &str) -> String {
    match name.strip_suffix(SAMPLE_SUFFIX) {
        Some(original) => original.to_string(),
        None => format!("{name}{SAMPLE_SUFFIX}"),
    }
}
