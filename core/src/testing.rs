//! Test doubles shared by the unit tests.

use crate::client::{ApiError, PartnerOperations};
use crate::config::SamplesConfig;
use crate::console::ConsoleHelper;
use crate::context::ScenarioContext;
use crate::models::{
    AccountBalance, Customer, CustomerFilter, CustomerUser, Entitlement, Invoice, License,
    LicenseUpdate, Link, Offer, ResourceCollection, SortDirection, SubscribedSku, Subscription,
};
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Write};
use std::rc::Rc;

/// In-memory sink that can be handed to the console and inspected later.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn test_context(
    partner: FakePartner,
    configure: impl FnOnce(&mut SamplesConfig),
) -> (ScenarioContext, SharedBuffer) {
    test_context_with_input(partner, "", configure)
}

pub fn test_context_with_input(
    partner: FakePartner,
    input: &str,
    configure: impl FnOnce(&mut SamplesConfig),
) -> (ScenarioContext, SharedBuffer) {
    let mut config = SamplesConfig::default();
    configure(&mut config);
    let output = SharedBuffer::default();
    let console = ConsoleHelper::new(
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        Box::new(output.clone()),
    );
    (
        ScenarioContext::new(config, Box::new(partner), console),
        output,
    )
}

/// Records the order in which scenarios ran.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    calls: Rc<RefCell<Vec<String>>>,
}

impl Probe {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, title: &str) {
        self.calls.borrow_mut().push(title.to_string());
    }
}

enum Behaviour {
    Complete,
    Fail,
    Skip,
}

pub struct RecordingScenario {
    title: String,
    probe: Probe,
    behaviour: Behaviour,
    mutates: bool,
}

impl RecordingScenario {
    fn new(title: &str, probe: &Probe, behaviour: Behaviour) -> Self {
        Self {
            title: title.to_string(),
            probe: probe.clone(),
            behaviour,
            mutates: false,
        }
    }

    pub fn ok(title: &str, probe: &Probe) -> Self {
        Self::new(title, probe, Behaviour::Complete)
    }

    pub fn failing(title: &str, probe: &Probe) -> Self {
        Self::new(title, probe, Behaviour::Fail)
    }

    pub fn skipping(title: &str, probe: &Probe) -> Self {
        Self::new(title, probe, Behaviour::Skip)
    }

    pub fn mutating(mut self) -> Self {
        self.mutates = true;
        self
    }
}

impl PartnerScenario for RecordingScenario {
    fn title(&self) -> &str {
        &self.title
    }

    fn mutates(&self) -> bool {
        self.mutates
    }

    fn run(&self, _context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        self.probe.record(&self.title);
        match self.behaviour {
            Behaviour::Complete => Ok(ScenarioOutcome::Completed),
            Behaviour::Skip => Ok(ScenarioOutcome::Skipped("nothing to do".to_string())),
            Behaviour::Fail => Err(ScenarioError::Precondition(format!(
                "{} failed on purpose",
                self.title
            ))),
        }
    }
}

/// Canned partner API. Every call is logged in `calls`; operations listed in
/// `failing` answer with a 404.
#[derive(Default)]
pub struct FakePartner {
    pub customers: ResourceCollection<Customer>,
    pub users: ResourceCollection<CustomerUser>,
    pub licenses: ResourceCollection<License>,
    pub skus: ResourceCollection<SubscribedSku>,
    pub subscriptions: ResourceCollection<Subscription>,
    pub entitlements: ResourceCollection<Entitlement>,
    pub offers: Vec<Offer>,
    pub invoices: Vec<Invoice>,
    pub balance: Option<AccountBalance>,
    /// Bodies returned by `follow_link`, keyed by link URI.
    pub links: HashMap<String, Value>,
    pub failing: HashSet<&'static str>,
    pub log: FakeLog,
}

/// Shared view of what the fake was asked to do.
#[derive(Debug, Clone, Default)]
pub struct FakeLog {
    calls: Rc<RefCell<Vec<String>>>,
    assigned: Rc<RefCell<Vec<(String, String, LicenseUpdate)>>>,
    updated: Rc<RefCell<Vec<Subscription>>>,
}

impl FakeLog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn assigned(&self) -> Vec<(String, String, LicenseUpdate)> {
        self.assigned.borrow().clone()
    }

    pub fn updated(&self) -> Vec<Subscription> {
        self.updated.borrow().clone()
    }
}

impl FakePartner {
    fn call(&self, operation: &'static str, detail: String) -> Result<(), ApiError> {
        self.log
            .calls
            .borrow_mut()
            .push(format!("{operation}({detail})"));
        if self.failing.contains(operation) {
            return Err(not_found(operation));
        }
        Ok(())
    }
}

pub fn collection<T>(items: Vec<T>) -> ResourceCollection<T> {
    ResourceCollection {
        total_count: items.len(),
        items,
        links: None,
    }
}

pub fn from_json<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture decodes")
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        url: format!("fake://{what}"),
        code: Some("600008".to_string()),
        message: format!("{what} not found"),
    }
}

fn page<T: Clone>(items: &[T], offset: u32, size: u32) -> ResourceCollection<T> {
    let start = (offset as usize).min(items.len());
    let end = (start + size as usize).min(items.len());
    ResourceCollection {
        total_count: items.len(),
        items: items[start..end].to_vec(),
        links: None,
    }
}

impl PartnerOperations for FakePartner {
    fn customers(
        &self,
        page_size: u32,
        filter: Option<&CustomerFilter>,
    ) -> Result<ResourceCollection<Customer>, ApiError> {
        let detail = match filter {
            Some(filter) => format!("{page_size}, {}={}", filter.field.as_str(), filter.value),
            None => page_size.to_string(),
        };
        self.call("customers", detail)?;
        Ok(self.customers.clone())
    }

    fn customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        self.call("customer", customer_id.to_string())?;
        self.customers
            .items
            .iter()
            .find(|customer| customer.id == customer_id)
            .cloned()
            .ok_or_else(|| not_found("customer"))
    }

    fn customer_users(
        &self,
        customer_id: &str,
        page_size: u32,
        sort: Option<SortDirection>,
    ) -> Result<ResourceCollection<CustomerUser>, ApiError> {
        let sort = sort.map(SortDirection::as_str).unwrap_or("unsorted");
        self.call(
            "customer_users",
            format!("{customer_id}, {page_size}, {sort}"),
        )?;
        Ok(self.users.clone())
    }

    fn customer_user_licenses(
        &self,
        customer_id: &str,
        user_id: &str,
    ) -> Result<ResourceCollection<License>, ApiError> {
        self.call("customer_user_licenses", format!("{customer_id}, {user_id}"))?;
        Ok(self.licenses.clone())
    }

    fn assign_licenses(
        &self,
        customer_id: &str,
        user_id: &str,
        update: &LicenseUpdate,
    ) -> Result<LicenseUpdate, ApiError> {
        self.call("assign_licenses", format!("{customer_id}, {user_id}"))?;
        self.log.assigned.borrow_mut().push((
            customer_id.to_string(),
            user_id.to_string(),
            update.clone(),
        ));
        Ok(update.clone())
    }

    fn subscribed_skus(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<SubscribedSku>, ApiError> {
        self.call("subscribed_skus", customer_id.to_string())?;
        Ok(self.skus.clone())
    }

    fn subscriptions(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<Subscription>, ApiError> {
        self.call("subscriptions", customer_id.to_string())?;
        Ok(self.subscriptions.clone())
    }

    fn subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<Subscription, ApiError> {
        self.call("subscription", format!("{customer_id}, {subscription_id}"))?;
        self.subscriptions
            .items
            .iter()
            .find(|subscription| subscription.id == subscription_id)
            .cloned()
            .ok_or_else(|| not_found("subscription"))
    }

    fn update_subscription(
        &self,
        customer_id: &str,
        subscription: &Subscription,
    ) -> Result<Subscription, ApiError> {
        self.call(
            "update_subscription",
            format!("{customer_id}, {}", subscription.id),
        )?;
        self.log.updated.borrow_mut().push(subscription.clone());
        Ok(subscription.clone())
    }

    fn entitlements(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<Entitlement>, ApiError> {
        self.call("entitlements", customer_id.to_string())?;
        Ok(self.entitlements.clone())
    }

    fn offers(
        &self,
        country: &str,
        offset: u32,
        page_size: u32,
    ) -> Result<ResourceCollection<Offer>, ApiError> {
        self.call("offers", format!("{country}, {offset}, {page_size}"))?;
        Ok(page(&self.offers, offset, page_size))
    }

    fn account_balance(&self) -> Result<AccountBalance, ApiError> {
        self.call("account_balance", String::new())?;
        self.balance
            .clone()
            .ok_or_else(|| not_found("account balance"))
    }

    fn invoices(
        &self,
        offset: u32,
        page_size: u32,
    ) -> Result<ResourceCollection<Invoice>, ApiError> {
        self.call("invoices", format!("{offset}, {page_size}"))?;
        Ok(page(&self.invoices, offset, page_size))
    }

    fn follow_link(&self, link: &Link) -> Result<Value, ApiError> {
        self.call("follow_link", link.uri.clone())?;
        self.links
            .get(&link.uri)
            .cloned()
            .ok_or_else(|| not_found(&link.uri))
    }
}
