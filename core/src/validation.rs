use crate::config::SamplesConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub location: Option<String>,
    pub message: String,
}

impl Diagnostic {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            location: Some(location.into()),
            message: message.into(),
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            location: Some(location.into()),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, DiagnosticLevel::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warn",
        };
        match &self.location {
            Some(location) => write!(f, "[{level}] {location}: {}", self.message),
            None => write!(f, "[{level}] {}", self.message),
        }
    }
}

pub fn validate_config(config: &SamplesConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let service = &config.partner_service;
    if !(service.endpoint.starts_with("https://") || service.endpoint.starts_with("http://")) {
        diagnostics.push(Diagnostic::error(
            "partner_service.endpoint",
            format!("expected an http(s) URL, got '{}'", service.endpoint),
        ));
    } else if service.endpoint.starts_with("http://") {
        diagnostics.push(Diagnostic::warning(
            "partner_service.endpoint",
            "endpoint is not using TLS; the access token will be sent in clear text",
        ));
    }
    if service.api_version.trim().is_empty() {
        diagnostics.push(Diagnostic::error(
            "partner_service.api_version",
            "api version must not be empty",
        ));
    }
    if service.access_token_env.trim().is_empty() {
        diagnostics.push(Diagnostic::error(
            "partner_service.access_token_env",
            "name of the access token variable must not be empty",
        ));
    }
    if service.timeout_secs == 0 {
        diagnostics.push(Diagnostic::error(
            "partner_service.timeout_secs",
            "request timeout must be at least one second",
        ));
    }

    let scenario = &config.scenario;
    let page_sizes = [
        ("scenario.customer_page_size", scenario.customer_page_size),
        (
            "scenario.customer_user_page_size",
            scenario.customer_user_page_size,
        ),
        ("scenario.offer_page_size", scenario.offer_page_size),
        ("scenario.invoice_page_size", scenario.invoice_page_size),
    ];
    for (location, size) in page_sizes {
        if size == 0 {
            diagnostics.push(Diagnostic::error(location, "page size must be positive"));
        }
    }
    if scenario.max_pages == 0 {
        diagnostics.push(Diagnostic::error(
            "scenario.max_pages",
            "at least one page must be fetched",
        ));
    }
    if scenario.country.len() != 2 {
        diagnostics.push(Diagnostic::warning(
            "scenario.country",
            format!(
                "'{}' does not look like a two-letter country code",
                scenario.country
            ),
        ));
    }

    if config.features.allow_mutations {
        diagnostics.push(Diagnostic::warning(
            "features.allow_mutations",
            "mutating scenarios are enabled and will change partner data",
        ));
    }

    diagnostics
}
