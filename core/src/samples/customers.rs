use super::print_linked_pages;
use crate::context::ScenarioContext;
use crate::models::{CustomerFilter, CustomerSearchField};
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};

/// Pages through the partner's customers.
pub struct GetPagedCustomers;

impl PartnerScenario for GetPagedCustomers {
    fn title(&self) -> &str {
        "Get paged customers"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let console = context.console();
        let page_size = context.settings().customer_page_size;

        console.start_progress("Querying customers")?;
        let first = context.operations().customers(page_size, None)?;
        console.stop_progress()?;

        let printed = print_linked_pages(context, first, "Customer")?;
        console.success(&format!("Listed {printed} customer(s)."))?;
        Ok(ScenarioOutcome::Completed)
    }
}

pub struct FilterCustomers {
    title: String,
    field: CustomerSearchField,
}

impl FilterCustomers {
    pub fn new(title: impl Into<String>, field: CustomerSearchField) -> Self {
        Self {
            title: title.into(),
            field,
        }
    }
}

impl PartnerScenario for FilterCustomers {
    fn title(&self) -> &str {
        &self.title
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let settings = context.settings();
        let value = match self.field {
            CustomerSearchField::CompanyName => context.obtain(
                &settings.customer_filter_company_name,
                "company name filter",
                "Enter the company name prefix to search for",
            )?,
            CustomerSearchField::Domain => context.obtain(
                &settings.customer_filter_domain,
                "domain filter",
                "Enter the domain prefix to search for",
            )?,
        };
        let filter = CustomerFilter {
            field: self.field,
            value,
        };

        let console = context.console();
        console.start_progress("Filtering customers")?;
        let matches = context
            .operations()
            .customers(settings.customer_page_size, Some(&filter))?;
        console.stop_progress()?;

        if matches.items.is_empty() {
            console.warning(&format!("No customers matched '{}'.", filter.value))?;
        } else {
            console.write_object(&matches.items, Some("Matching customers"))?;
        }
        Ok(ScenarioOutcome::Completed)
    }
}

pub struct GetCustomerDetails;

impl PartnerScenario for GetCustomerDetails {
    fn title(&self) -> &str {
        "Get customer details"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id = context.obtain_customer_id("Enter the ID of the customer to retrieve")?;

        let console = context.console();
        console.start_progress("Retrieving customer")?;
        let customer = context.operations().customer(&customer_id)?;
        console.stop_progress()?;

        console.write_object(&customer, Some("Customer details"))?;
        Ok(ScenarioOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleError;
    use crate::testing::{collection, from_json, test_context, test_context_with_input, FakePartner};
    use serde_json::json;

    #[test]
    fn paged_customers_uses_configured_page_size() {
        let mut partner = FakePartner::default();
        partner.customers = collection(vec![from_json(json!({ "id": "c-1" }))]);
        let log = partner.log.clone();
        let (context, output) = test_context(partner, |config| {
            config.scenario.customer_page_size = 25;
        });

        let outcome = GetPagedCustomers.run(&context).expect("scenario runs");

        assert_eq!(outcome, ScenarioOutcome::Completed);
        assert_eq!(log.calls(), vec!["customers(25)"]);
        assert!(output.contents().contains("[ok] Listed 1 customer(s)."));
    }

    #[test]
    fn filter_prompts_for_missing_value() {
        let partner = FakePartner::default();
        let log = partner.log.clone();
        let (context, output) = test_context_with_input(partner, "fab\n", |_| {});

        FilterCustomers::new("Filter by domain name", CustomerSearchField::Domain)
            .run(&context)
            .expect("scenario runs");

        assert_eq!(log.calls(), vec!["customers(100, Domain=fab)"]);
        assert!(output.contents().contains("No customers matched 'fab'."));
    }

    #[test]
    fn customer_details_propagates_not_found() {
        let partner = FakePartner::default();
        let (context, _) = test_context(partner, |config| {
            config.scenario.default_customer_id = "missing".to_string();
        });

        let err = GetCustomerDetails.run(&context).expect_err("unknown customer");
        assert!(matches!(err, ScenarioError::Api(api) if api.is_not_found()));
    }

    #[test]
    fn customer_details_fails_when_input_ends_before_an_id() {
        let partner = FakePartner::default();
        let log = partner.log.clone();
        let (context, output) = test_context_with_input(partner, "\n  \n", |_| {});

        let err = GetCustomerDetails.run(&context).expect_err("no customer id");

        assert!(matches!(
            err,
            ScenarioError::Console(ConsoleError::EndOfInput(_))
        ));
        assert!(log.calls().is_empty());
        assert!(output.contents().contains("A value is required."));
    }
}
