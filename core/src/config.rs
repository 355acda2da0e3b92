use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "partner-samples.yaml";
pub const DEFAULT_TOKEN_ENV: &str = "PARTNER_CENTER_ACCESS_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("environment variable {0} is not set; it must hold a partner API access token")]
    MissingToken(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SamplesConfig {
    pub partner_service: PartnerServiceConfig,
    pub scenario: ScenarioSettings,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerServiceConfig {
    pub endpoint: String,
    pub api_version: String,
    pub access_token_env: String,
    pub timeout_secs: u64,
}

impl Default for PartnerServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.partnercenter.microsoft.com".to_string(),
            api_version: "v1".to_string(),
            access_token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Page sizes and default identifiers used by the sample scenarios. Empty
/// identifiers make the scenario prompt for a value instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    pub customer_page_size: u32,
    pub customer_user_page_size: u32,
    pub offer_page_size: u32,
    pub invoice_page_size: u32,
    pub max_pages: u32,
    pub country: String,
    pub default_customer_id: String,
    pub default_customer_user_id: String,
    pub default_subscription_id: String,
    pub customer_filter_company_name: String,
    pub customer_filter_domain: String,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            customer_page_size: 100,
            customer_user_page_size: 10,
            offer_page_size: 100,
            invoice_page_size: 100,
            max_pages: 3,
            country: "US".to_string(),
            default_customer_id: String::new(),
            default_customer_user_id: String::new(),
            default_subscription_id: String::new(),
            customer_filter_company_name: String::new(),
            customer_filter_domain: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeatureFlags {
    /// Run scenarios that create or update partner data.
    pub allow_mutations: bool,
}

impl SamplesConfig {
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, otherwise [`DEFAULT_CONFIG_FILE`] from the
    /// working directory if it exists, otherwise the built-in defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn access_token(&self) -> Result<String, ConfigError> {
        let name = &self.partner_service.access_token_env;
        match env::var(name) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ConfigError::MissingToken(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SamplesConfig::from_yaml("").expect("empty config parses");
        assert_eq!(config.scenario.customer_page_size, 100);
        assert_eq!(config.partner_service.api_version, "v1");
        assert!(!config.features.allow_mutations);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = SamplesConfig::from_yaml(
            r#"
scenario:
  default_customer_id: "c-42"
  max_pages: 1
features:
  allow_mutations: true
"#,
        )
        .expect("config parses");
        assert_eq!(config.scenario.default_customer_id, "c-42");
        assert_eq!(config.scenario.max_pages, 1);
        assert_eq!(config.scenario.offer_page_size, 100);
        assert!(config.features.allow_mutations);
        assert_eq!(
            config.partner_service.endpoint,
            "https://api.partnercenter.microsoft.com"
        );
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "scenario:\n  customer_page_size: lots").expect("write config");

        let err = SamplesConfig::load(file.path()).expect_err("invalid config rejected");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn discover_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "scenario:\n  country: GB").expect("write config");

        let config = SamplesConfig::discover(Some(file.path())).expect("config loads");
        assert_eq!(config.scenario.country, "GB");
    }

    #[test]
    fn missing_token_names_the_variable() {
        let mut config = SamplesConfig::default();
        config.partner_service.access_token_env = "PARTNER_SAMPLES_TEST_UNSET_TOKEN".to_string();
        std::env::remove_var("PARTNER_SAMPLES_TEST_UNSET_TOKEN");

        let err = config.access_token().expect_err("token missing");
        assert!(err.to_string().contains("PARTNER_SAMPLES_TEST_UNSET_TOKEN"));
    }
}
