//! The sample scenarios and the tree the program runs.

mod customer_users;
mod customers;
mod entitlements;
mod invoices;
mod offers;
mod subscribed_skus;
mod subscriptions;

pub use customer_users::{
    CustomerUserAssignLicenses, CustomerUserAssignedLicenses, GetCustomerUsers, SortCustomerUsers,
};
pub use customers::{FilterCustomers, GetCustomerDetails, GetPagedCustomers};
pub use entitlements::GetEntitlements;
pub use invoices::{GetAccountBalance, GetPagedInvoices};
pub use offers::GetPagedOffers;
pub use subscribed_skus::GetCustomerSubscribedSkus;
pub use subscriptions::{GetSubscription, GetSubscriptions, UpdateSubscription};

use crate::client::{follow_link_as, ApiError};
use crate::context::ScenarioContext;
use crate::models::{CustomerSearchField, ResourceCollection, SortDirection};
use crate::scenario::{ScenarioError, ScenarioNode};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const ROOT_TITLE: &str = "Partner SDK samples";

/// Assembles the full sample tree in the order the program runs it.
pub fn build_scenario_tree() -> ScenarioNode {
    ScenarioNode::aggregate(
        ROOT_TITLE,
        vec![
            customer_scenarios(),
            offer_scenarios(),
            subscription_scenarios(),
            invoice_scenarios(),
            customer_user_scenarios(),
            customer_subscribed_sku_scenarios(),
            entitlement_scenarios(),
        ],
    )
}

fn customer_scenarios() -> ScenarioNode {
    let filtering = ScenarioNode::aggregate(
        "Customer filtering",
        vec![
            ScenarioNode::leaf(FilterCustomers::new(
                "Filter by company name",
                CustomerSearchField::CompanyName,
            )),
            ScenarioNode::leaf(FilterCustomers::new(
                "Filter by domain name",
                CustomerSearchField::Domain,
            )),
        ],
    );

    ScenarioNode::aggregate(
        "Customer samples",
        vec![
            ScenarioNode::leaf(GetPagedCustomers),
            filtering,
            ScenarioNode::leaf(GetCustomerDetails),
        ],
    )
}

fn customer_user_scenarios() -> ScenarioNode {
    let sorting = ScenarioNode::aggregate(
        "Get sorted customer users",
        vec![
            ScenarioNode::leaf(SortCustomerUsers::new(
                "Ascending order",
                SortDirection::Ascending,
            )),
            ScenarioNode::leaf(SortCustomerUsers::new(
                "Descending order",
                SortDirection::Descending,
            )),
        ],
    );

    ScenarioNode::aggregate(
        "Customer User samples",
        vec![
            ScenarioNode::leaf(GetCustomerUsers),
            sorting,
            ScenarioNode::leaf(CustomerUserAssignedLicenses),
            ScenarioNode::leaf(CustomerUserAssignLicenses),
        ],
    )
}

fn customer_subscribed_sku_scenarios() -> ScenarioNode {
    ScenarioNode::aggregate(
        "Customer Subscribed Skus",
        vec![ScenarioNode::leaf(GetCustomerSubscribedSkus)],
    )
}

fn subscription_scenarios() -> ScenarioNode {
    ScenarioNode::aggregate(
        "Subscription samples",
        vec![
            ScenarioNode::leaf(GetSubscription),
            ScenarioNode::leaf(GetSubscriptions),
            ScenarioNode::leaf(UpdateSubscription),
        ],
    )
}

fn entitlement_scenarios() -> ScenarioNode {
    ScenarioNode::aggregate(
        "Entitlement samples",
        vec![ScenarioNode::leaf(GetEntitlements)],
    )
}

fn offer_scenarios() -> ScenarioNode {
    ScenarioNode::aggregate("Offer samples", vec![ScenarioNode::leaf(GetPagedOffers)])
}

fn invoice_scenarios() -> ScenarioNode {
    ScenarioNode::aggregate(
        "Invoice samples",
        vec![
            ScenarioNode::leaf(GetAccountBalance),
            ScenarioNode::leaf(GetPagedInvoices),
        ],
    )
}

/// Prints `first` and every page reachable through its `next` links, up to
/// `scenario.max_pages` pages. Returns the number of items printed.
fn print_linked_pages<T>(
    context: &ScenarioContext,
    first: ResourceCollection<T>,
    item_title: &str,
) -> Result<usize, ScenarioError>
where
    T: Serialize + DeserializeOwned,
{
    let console = context.console();
    let max_pages = context.settings().max_pages.max(1);
    let mut current = first;
    let mut page_number = 1;
    let mut printed = 0;

    loop {
        console.write_line(&format!(
            "Page {page_number}: {} item(s)",
            current.items.len()
        ))?;
        for item in &current.items {
            console.write_object(item, Some(item_title))?;
        }
        printed += current.items.len();

        let Some(next) = current.next_link().cloned() else {
            break;
        };
        if page_number >= max_pages {
            console.warning(&format!(
                "Stopped after {max_pages} page(s); more results are available."
            ))?;
            break;
        }

        console.start_progress("Getting next page")?;
        current = follow_link_as(context.operations(), &next)?;
        console.stop_progress()?;
        page_number += 1;
    }

    Ok(printed)
}

/// Offset-based counterpart of [`print_linked_pages`] for endpoints that page
/// with `offset`/`size` instead of continuation links.
fn print_offset_pages<T, F>(
    context: &ScenarioContext,
    page_size: u32,
    item_title: &str,
    mut fetch: F,
) -> Result<usize, ScenarioError>
where
    T: Serialize,
    F: FnMut(u32) -> Result<ResourceCollection<T>, ApiError>,
{
    let console = context.console();
    let max_pages = context.settings().max_pages.max(1);
    let mut offset = 0u32;
    let mut page_number = 1;
    let mut printed = 0;

    loop {
        console.start_progress(&format!("Getting page {page_number}"))?;
        let page = fetch(offset)?;
        console.stop_progress()?;

        if page.items.is_empty() {
            if page_number == 1 {
                console.write_line("No items found.")?;
            }
            break;
        }

        console.write_line(&format!(
            "Page {page_number}: {} item(s)",
            page.items.len()
        ))?;
        for item in &page.items {
            console.write_object(item, Some(item_title))?;
        }
        printed += page.items.len();
        offset += page.items.len() as u32;

        // A known total wins over page length.
        let exhausted = if page.total_count > 0 {
            offset as usize >= page.total_count
        } else {
            page.items.len() < page_size as usize
        };
        if exhausted {
            break;
        }
        if page_number >= max_pages {
            console.warning(&format!(
                "Stopped after {max_pages} page(s); more results are available."
            ))?;
            break;
        }
        page_number += 1;
    }

    Ok(printed)
}
