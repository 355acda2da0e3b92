//! Boundary to the partner management API.
//!
//! Scenarios only ever talk to [`PartnerOperations`]; the production
//! implementation is [`HttpPartnerClient`], tests substitute an in-memory fake.

mod http;

pub use http::HttpPartnerClient;

use crate::models::{
    AccountBalance, Customer, CustomerFilter, CustomerUser, Entitlement, Invoice, License,
    LicenseUpdate, Link, Offer, ResourceCollection, SortDirection, SubscribedSku, Subscription,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}{}: {message}", code_suffix(.code))]
    Status {
        status: u16,
        url: String,
        code: Option<String>,
        message: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported link method '{0}'")]
    UnsupportedMethod(String),
    #[error("link {uri} is invalid: {reason}")]
    InvalidLink { uri: String, reason: String },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|code| format!(" (code {code})"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Resource-style operations the sample scenarios call.
pub trait PartnerOperations {
    fn customers(
        &self,
        page_size: u32,
        filter: Option<&CustomerFilter>,
    ) -> Result<ResourceCollection<Customer>, ApiError>;

    fn customer(&self, customer_id: &str) -> Result<Customer, ApiError>;

    fn customer_users(
        &self,
        customer_id: &str,
        page_size: u32,
        sort: Option<SortDirection>,
    ) -> Result<ResourceCollection<CustomerUser>, ApiError>;

    fn customer_user_licenses(
        &self,
        customer_id: &str,
        user_id: &str,
    ) -> Result<ResourceCollection<License>, ApiError>;

    fn assign_licenses(
        &self,
        customer_id: &str,
        user_id: &str,
        update: &LicenseUpdate,
    ) -> Result<LicenseUpdate, ApiError>;

    fn subscribed_skus(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<SubscribedSku>, ApiError>;

    fn subscriptions(&self, customer_id: &str)
        -> Result<ResourceCollection<Subscription>, ApiError>;

    fn subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<Subscription, ApiError>;

    fn update_subscription(
        &self,
        customer_id: &str,
        subscription: &Subscription,
    ) -> Result<Subscription, ApiError>;

    fn entitlements(&self, customer_id: &str)
        -> Result<ResourceCollection<Entitlement>, ApiError>;

    fn offers(
        &self,
        country: &str,
        offset: u32,
        page_size: u32,
    ) -> Result<ResourceCollection<Offer>, ApiError>;

    fn account_balance(&self) -> Result<AccountBalance, ApiError>;

    fn invoices(&self, offset: u32, page_size: u32)
        -> Result<ResourceCollection<Invoice>, ApiError>;

    /// Invokes a link handed out by the service (next page, artifact details).
    fn follow_link(&self, link: &Link) -> Result<Value, ApiError>;
}

/// Follows `link` and decodes the body into `T`.
pub fn follow_link_as<T>(operations: &dyn PartnerOperations, link: &Link) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let value = operations.follow_link(link)?;
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        url: link.uri.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_service_code() {
        let err = ApiError::Status {
            status: 404,
            url: "https://partner.example/v1/customers/x".to_string(),
            code: Some("600008".to_string()),
            message: "customer not found".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "https://partner.example/v1/customers/x returned 404 (code 600008): customer not found"
        );
    }

    #[test]
    fn status_error_without_code() {
        let err = ApiError::Status {
            status: 500,
            url: "u".to_string(),
            code: None,
            message: "boom".to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "u returned 500: boom");
    }
}
