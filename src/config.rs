use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::remote::{ApiVersion, VersionPolicy, VersionTable};
use crate::utils::get_env_with_prefix;

/// Main configuration for plan reconciliation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API version requests are made with. `None` defers to the account's
    /// pinned version, then to the current payload shape.
    #[serde(default)]
    pub version: Option<String>,
    /// First API version whose plans belong to products
    #[serde(default = "default_product_version")]
    pub product_version: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: None,
            product_version: default_product_version(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_product_version() -> String {
    "2018-02-05".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

impl Config {
    /// Load configuration from `STRIPE_PLANS_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any loaded value is invalid.
    pub fn from_env() -> Result<Self> {
        ConfigBuilder::new().from_env().build()
    }

    /// The configured API version, parsed.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidApiVersion` if the version does not parse.
    pub fn api_version(&self) -> Result<Option<ApiVersion>> {
        self.api
            .version
            .as_deref()
            .map(ApiVersion::parse)
            .transpose()
    }

    /// Version policy built from the configured product boundary.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidApiVersion` if the boundary does not parse.
    pub fn version_policy(&self) -> Result<VersionPolicy> {
        let boundary = ApiVersion::parse(&self.api.product_version)?;
        Ok(VersionPolicy::new(VersionTable::products_since(boundary)))
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api.version = Some(version.into());
        self
    }

    pub fn with_product_version(mut self, version: impl Into<String>) -> Self {
        self.config.api.product_version = version.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load configuration from environment variables with STRIPE_PLANS_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(version) = get_env_with_prefix("API_VERSION") {
            let version = version.trim().to_string();
            // An empty value means "unset", matching an absent variable.
            self.config.api.version = (!version.is_empty()).then_some(version);
        }
        if let Some(version) = get_env_with_prefix("PRODUCT_VERSION") {
            self.config.api.product_version = version;
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The log level is unknown
    /// - The API version or product boundary version does not parse
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(PlanError::config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        self.config.api_version()?;
        self.config.version_policy()?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
