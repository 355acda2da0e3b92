use crate::context::ScenarioContext;
use crate::models::{LicenseAssignment, LicenseUpdate, SortDirection};
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};
use tracing::debug;

pub struct GetCustomerUsers;

impl PartnerScenario for GetCustomerUsers {
    fn title(&self) -> &str {
        "Get customer users"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id = context.obtain_customer_id("Enter the ID of the customer to list users for")?;

        let console = context.console();
        console.start_progress("Querying customer users")?;
        let users = context.operations().customer_users(
            &customer_id,
            context.settings().customer_user_page_size,
            None,
        )?;
        console.stop_progress()?;

        console.write_object(&users, Some("Customer users"))?;
        Ok(ScenarioOutcome::Completed)
    }
}

pub struct SortCustomerUsers {
    title: String,
    direction: SortDirection,
}

impl SortCustomerUsers {
    pub fn new(title: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            title: title.into(),
            direction,
        }
    }
}

impl PartnerScenario for SortCustomerUsers {
    fn title(&self) -> &str {
        &self.title
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let customer_id = context.obtain_customer_id("Enter the ID of the customer to list users for")?;

        let console = context.console();
        console.start_progress(&format!(
            "Querying customer users sorted {} by display name",
            self.direction.as_str()
        ))?;
        let users = context.operations().customer_users(
            &customer_id,
            context.settings().customer_user_page_size,
            Some(self.direction),
        )?;
        console.stop_progress()?;

        console.write_object(&users.items, Some("Sorted customer users"))?;
        Ok(ScenarioOutcome::Completed)
    }
}

pub struct CustomerUserAssignedLicenses;

impl PartnerScenario for CustomerUserAssignedLicenses {
    fn title(&self) -> &str {
        "Get customer user assigned licenses"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let user_id = context.obtain_customer_user_id("Enter the ID of the customer user")?;
        let customer_id = context.obtain_customer_id("Enter the ID of the customer")?;

        let console = context.console();
        console.start_progress("Getting assigned licenses")?;
        let licenses = context
            .operations()
            .customer_user_licenses(&customer_id, &user_id)?;
        console.stop_progress()?;

        if licenses.items.is_empty() {
            console.write_line("The user has no licenses assigned.")?;
        } else {
            console.write_object(&licenses.items, Some("Assigned licenses"))?;
        }
        Ok(ScenarioOutcome::Completed)
    }
}

/// Assigns the customer's first subscribed SKU to a user, then reads back the
/// user's licenses.
pub struct CustomerUserAssignLicenses;

impl PartnerScenario for CustomerUserAssignLicenses {
    fn title(&self) -> &str {
        "Assign customer user a license"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let user_id =
            context.obtain_customer_user_id("Enter the ID of the customer user to assign license")?;
        let customer_id = context.obtain_customer_id("Enter the ID of the customer")?;
        let operations = context.operations();
        let console = context.console();

        console.start_progress("Getting subscribed SKUs")?;
        let skus = operations.subscribed_skus(&customer_id)?;
        console.stop_progress()?;

        let sku = skus.items.first().ok_or_else(|| {
            ScenarioError::Precondition(format!(
                "customer {customer_id} has no subscribed SKUs to assign"
            ))
        })?;
        debug!(sku = %sku.product_sku.id, %user_id, "assigning license");

        let update = LicenseUpdate {
            licenses_to_assign: vec![LicenseAssignment {
                sku_id: sku.product_sku.id.clone(),
                excluded_plans: None,
            }],
            ..LicenseUpdate::default()
        };

        console.start_progress("Assigning license")?;
        operations.assign_licenses(&customer_id, &user_id, &update)?;
        console.stop_progress()?;

        console.start_progress("Getting assigned licenses")?;
        let assigned = operations.customer_user_licenses(&customer_id, &user_id)?;
        console.stop_progress()?;

        console.success("License was successfully assigned to the user.")?;
        let license = assigned.items.first().ok_or_else(|| {
            ScenarioError::Precondition(format!(
                "user {user_id} reports no licenses after the assignment"
            ))
        })?;
        console.write_object(license, Some("Assigned license"))?;
        Ok(ScenarioOutcome::Completed)
    }
}
