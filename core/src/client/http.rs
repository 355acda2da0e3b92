use super::{ApiError, PartnerOperations};
use crate::config::PartnerServiceConfig;
use crate::models::{
    AccountBalance, Customer, CustomerFilter, CustomerUser, Entitlement, Invoice, License,
    LicenseUpdate, Link, Offer, ResourceCollection, SortDirection, SubscribedSku, Subscription,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "MS-RequestId";
const CORRELATION_ID_HEADER: &str = "MS-CorrelationId";

/// Blocking client for the partner REST API.
#[derive(Debug, Clone)]
pub struct HttpPartnerClient {
    http: Client,
    base_url: String,
    access_token: String,
    correlation_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

impl HttpPartnerClient {
    pub fn new(
        config: &PartnerServiceConfig,
        access_token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport {
                url: config.endpoint.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: base_url(&config.endpoint, &config.api_version),
            access_token: access_token.into(),
            correlation_id: Uuid::new_v4().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .header(CORRELATION_ID_HEADER, self.correlation_id.as_str())
    }

    fn send<T>(&self, request: RequestBuilder, url: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response.text().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "partner api response");

        if !status.is_success() {
            return Err(status_error(status.as_u16(), url, &body));
        }

        let payload = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(payload).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.request(Method::GET, &url).query(query);
        self.send(request, &url)
    }

    fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let request = self.request(method, &url).json(body);
        self.send(request, &url)
    }
}

impl PartnerOperations for HttpPartnerClient {
    fn customers(
        &self,
        page_size: u32,
        filter: Option<&CustomerFilter>,
    ) -> Result<ResourceCollection<Customer>, ApiError> {
        let mut query = vec![("size", page_size.to_string())];
        if let Some(filter) = filter {
            let expression = json!({
                "Field": filter.field.as_str(),
                "Value": filter.value,
                "Operator": "starts_with",
            });
            query.push(("filter", expression.to_string()));
        }
        self.get("customers", &query)
    }

    fn customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        self.get(&format!("customers/{customer_id}"), &[])
    }

    fn customer_users(
        &self,
        customer_id: &str,
        page_size: u32,
        sort: Option<SortDirection>,
    ) -> Result<ResourceCollection<CustomerUser>, ApiError> {
        let mut query = vec![("size", page_size.to_string())];
        if let Some(direction) = sort {
            query.push(("sortField", "DisplayName".to_string()));
            query.push(("sortDirection", direction.as_str().to_string()));
        }
        self.get(&format!("customers/{customer_id}/users"), &query)
    }

    fn customer_user_licenses(
        &self,
        customer_id: &str,
        user_id: &str,
    ) -> Result<ResourceCollection<License>, ApiError> {
        self.get(&format!("customers/{customer_id}/users/{user_id}/licenses"), &[])
    }

    fn assign_licenses(
        &self,
        customer_id: &str,
        user_id: &str,
        update: &LicenseUpdate,
    ) -> Result<LicenseUpdate, ApiError> {
        self.send_json(
            Method::POST,
            &format!("customers/{customer_id}/users/{user_id}/licenseupdates"),
            update,
        )
    }

    fn subscribed_skus(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<SubscribedSku>, ApiError> {
        self.get(&format!("customers/{customer_id}/subscribedskus"), &[])
    }

    fn subscriptions(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<Subscription>, ApiError> {
        self.get(&format!("customers/{customer_id}/subscriptions"), &[])
    }

    fn subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<Subscription, ApiError> {
        self.get(
            &format!("customers/{customer_id}/subscriptions/{subscription_id}"),
            &[],
        )
    }

    fn update_subscription(
        &self,
        customer_id: &str,
        subscription: &Subscription,
    ) -> Result<Subscription, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("customers/{customer_id}/subscriptions/{}", subscription.id),
            subscription,
        )
    }

    fn entitlements(
        &self,
        customer_id: &str,
    ) -> Result<ResourceCollection<Entitlement>, ApiError> {
        self.get(&format!("customers/{customer_id}/entitlements"), &[])
    }

    fn offers(
        &self,
        country: &str,
        offset: u32,
        page_size: u32,
    ) -> Result<ResourceCollection<Offer>, ApiError> {
        self.get(
            "offers",
            &[
                ("country", country.to_string()),
                ("offset", offset.to_string()),
                ("size", page_size.to_string()),
            ],
        )
    }

    fn account_balance(&self) -> Result<AccountBalance, ApiError> {
        self.get("invoices/summary", &[])
    }

    fn invoices(
        &self,
        offset: u32,
        page_size: u32,
    ) -> Result<ResourceCollection<Invoice>, ApiError> {
        self.get(
            "invoices",
            &[("offset", offset.to_string()), ("size", page_size.to_string())],
        )
    }

    fn follow_link(&self, link: &Link) -> Result<Value, ApiError> {
        let method = Method::from_bytes(link.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ApiError::UnsupportedMethod(link.method.clone()))?;
        if method != Method::GET {
            return Err(ApiError::UnsupportedMethod(link.method.clone()));
        }

        let url = self.resolve_link(&link.uri);
        let request = self
            .request(method, &url)
            .headers(link_headers(link)?);
        self.send(request, &url)
    }
}

impl HttpPartnerClient {
    fn resolve_link(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            self.url(uri)
        }
    }
}

fn base_url(endpoint: &str, api_version: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    let version = api_version.trim_matches('/');
    if version.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}/{version}")
    }
}

fn link_headers(link: &Link) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for header in &link.headers {
        let name = HeaderName::from_bytes(header.key.as_bytes());
        let value = HeaderValue::from_str(&header.value);
        match (name, value) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => {
                return Err(ApiError::InvalidLink {
                    uri: link.uri.clone(),
                    reason: format!("invalid header '{}'", header.key),
                })
            }
        }
    }
    Ok(headers)
}

fn status_error(status: u16, url: &str, body: &str) -> ApiError {
    let parsed: Option<ServiceErrorBody> = serde_json::from_str(body).ok();
    let (code, description) = match parsed {
        Some(ServiceErrorBody { code, description }) => (
            code.map(|code| match code {
                Value::String(text) => text,
                other => other.to_string(),
            }),
            description,
        ),
        None => (None, None),
    };
    let message = description
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "no error details returned".to_string()
            } else {
                body.trim().to_string()
            }
        });

    ApiError::Status {
        status,
        url: url.to_string(),
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkHeader;

    fn client() -> HttpPartnerClient {
        let config = PartnerServiceConfig {
            endpoint: "https://partner.example/".to_string(),
            ..PartnerServiceConfig::default()
        };
        HttpPartnerClient::new(&config, "token").expect("client builds")
    }

    #[test]
    fn joins_endpoint_version_and_path() {
        assert_eq!(
            client().url("/customers/abc"),
            "https://partner.example/v1/customers/abc"
        );
        assert_eq!(base_url("https://x/", "/v2/"), "https://x/v2");
        assert_eq!(base_url("https://x", ""), "https://x");
    }

    #[test]
    fn relative_links_resolve_against_versioned_base() {
        let client = client();
        assert_eq!(
            client.resolve_link("customers?size=10"),
            "https://partner.example/v1/customers?size=10"
        );
        assert_eq!(
            client.resolve_link("https://elsewhere.example/keys/1"),
            "https://elsewhere.example/keys/1"
        );
    }

    #[test]
    fn service_error_body_populates_code_and_description() {
        let err = status_error(
            404,
            "https://partner.example/v1/customers/x",
            r#"{"code": 600008, "description": "The requested resource was not found."}"#,
        );
        match err {
            ApiError::Status {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("600008"));
                assert_eq!(message, "The requested resource was not found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_text_error_body_is_kept() {
        let err = status_error(502, "u", "bad gateway\n");
        assert_eq!(err.to_string(), "u returned 502: bad gateway");
    }

    #[test]
    fn link_headers_are_forwarded() {
        let link = Link {
            headers: vec![LinkHeader {
                key: "MS-ContinuationToken".to_string(),
                value: "abc".to_string(),
            }],
            ..Link::get("/customers")
        };
        assert_eq!(link.method, "GET");
        let headers = link_headers(&link).expect("valid headers");
        assert_eq!(
            headers
                .get("ms-continuationtoken")
                .and_then(|v| v.to_str().ok()),
            Some("abc")
        );
    }

    #[test]
    fn non_get_links_are_rejected() {
        let link = Link {
            method: "DELETE".to_string(),
            ..Link::get("/customers")
        };
        let err = client().follow_link(&link).expect_err("only GET is followed");
        assert!(matches!(err, ApiError::UnsupportedMethod(method) if method == "DELETE"));
    }
}
