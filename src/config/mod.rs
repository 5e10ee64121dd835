#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::domain::model::{DateLocale, RecomputePolicy};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

/// Effective settings: defaults, then the config file, then command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub locale: DateLocale,
    pub recompute_policy: RecomputePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
            locale: DateLocale::default(),
            recompute_policy: RecomputePolicy::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            endpoint: config
                .gateway
                .endpoint
                .clone()
                .unwrap_or(defaults.endpoint),
            timeout_seconds: config.gateway.timeout_seconds,
            locale: config.table.locale.unwrap_or(defaults.locale),
            recompute_policy: config.table.recompute.unwrap_or(defaults.recompute_policy),
        }
    }

    pub fn with_overrides(
        mut self,
        endpoint: Option<String>,
        locale: Option<DateLocale>,
        policy: Option<RecomputePolicy>,
    ) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(locale) = locale {
            self.locale = locale;
        }
        if let Some(policy) = policy {
            self.recompute_policy = policy;
        }
        self
    }
}

impl ConfigProvider for Settings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn locale(&self) -> DateLocale {
        self.locale
    }

    fn recompute_policy(&self) -> RecomputePolicy {
        self.recompute_policy
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}
