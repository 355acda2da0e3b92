use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page of resources as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCollection<T> {
    #[serde(default)]
    pub total_count: usize,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub links: Option<CollectionLinks>,
}

impl<T> ResourceCollection<T> {
    pub fn next_link(&self) -> Option<&Link> {
        self.links.as_ref().and_then(|links| links.next.as_ref())
    }
}

impl<T> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
            links: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectionLinks {
    #[serde(default)]
    pub next: Option<Link>,
    #[serde(default)]
    pub previous: Option<Link>,
}

/// A navigable reference returned by the service, carrying any headers
/// (such as continuation tokens) needed to follow it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub uri: String,
    #[serde(default = "default_link_method")]
    pub method: String,
    #[serde(default)]
    pub headers: Vec<LinkHeader>,
}

impl Link {
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            method: default_link_method(),
            headers: Vec::new(),
        }
    }
}

fn default_link_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkHeader {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub company_profile: Option<CompanyProfile>,
    #[serde(default)]
    pub relationship_to_partner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Field a customer search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerSearchField {
    CompanyName,
    Domain,
}

impl CustomerSearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerSearchField::CompanyName => "CompanyName",
            CustomerSearchField::Domain => "Domain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFilter {
    pub field: CustomerSearchField,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUser {
    pub id: String,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub usage_location: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedSku {
    #[serde(default)]
    pub available_units: i64,
    #[serde(default)]
    pub active_units: i64,
    #[serde(default)]
    pub consumed_units: i64,
    #[serde(default)]
    pub capability_status: Option<String>,
    pub product_sku: ProductSku,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSku {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku_part_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default)]
    pub service_plans: Vec<Value>,
    pub product_sku: ProductSku,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LicenseUpdate {
    #[serde(default)]
    pub licenses_to_assign: Vec<LicenseAssignment>,
    #[serde(default)]
    pub licenses_to_remove: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_warnings: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAssignment {
    pub sku_id: String,
    #[serde(default)]
    pub excluded_plans: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub offer_name: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    #[serde(default)]
    pub reference_order: Option<Value>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub sku_id: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub entitlement_type: EntitlementType,
    #[serde(default)]
    pub entitled_artifacts: Vec<EntitledArtifact>,
}

impl Entitlement {
    /// Link to the artifact details this entitlement type exposes, if the
    /// service returned one.
    pub fn artifact_details_link(&self) -> Option<&Link> {
        let wanted = match self.entitlement_type {
            EntitlementType::VirtualMachineReservedInstance => {
                ArtifactType::VirtualMachineReservedInstance
            }
            EntitlementType::Software => ArtifactType::ProductKey,
            EntitlementType::Other => return None,
        };
        self.entitled_artifacts
            .iter()
            .find(|artifact| artifact.artifact_type == wanted)
            .and_then(|artifact| artifact.link.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EntitlementType {
    VirtualMachineReservedInstance,
    Software,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitledArtifact {
    pub artifact_type: ArtifactType,
    #[serde(default)]
    pub dynamic_attributes: Option<Value>,
    #[serde(default)]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactType {
    VirtualMachineReservedInstance,
    ProductKey,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub minimum_quantity: i64,
    #[serde(default)]
    pub maximum_quantity: i64,
    #[serde(default)]
    pub billing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub balance_amount: f64,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub first_order_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub total_charges: f64,
    #[serde(default)]
    pub paid_amount: f64,
    #[serde(default)]
    pub currency_code: Option<String>,
}
