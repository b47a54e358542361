use crate::adapters::http::FRANKFURTER_ENDPOINT;
use crate::core::auction_fee::AuctionFeeSchedule;
use crate::core::customs::CustomsRates;
use crate::core::engine::FALLBACK_EUR_USD;
use crate::core::logistics::LogisticsRates;
use crate::core::tariff::Tariff;
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{
    validate_location, validate_positive_amount, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Tariff and source settings, loadable from TOML. Every section is optional
/// and falls back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub auction_fee: AuctionFeeSchedule,
    pub customs: CustomsRates,
    pub logistics: LogisticsRates,
    pub exchange_rate: ExchangeRateConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRateConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub fallback: f64,
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        Self {
            endpoint: FRANKFURTER_ENDPOINT.to_string(),
            timeout_seconds: 5,
            fallback: FALLBACK_EUR_USD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// File path or http(s) URL of the reference dataset JSON.
    pub source: String,
    pub timeout_seconds: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: "data.json".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl TariffConfig {
    /// Loads the TOML file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QuoteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No tariff file at {}, using built-in defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| QuoteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_RE: OnceLock<Regex> = OnceLock::new();
        let re = ENV_RE
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn tariff(&self) -> Tariff {
        Tariff {
            auction_fee: self.auction_fee.clone(),
            customs: self.customs.clone(),
            logistics: self.logistics.clone(),
        }
    }

    pub fn rate_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange_rate.timeout_seconds)
    }

    pub fn dataset_timeout(&self) -> Duration {
        Duration::from_secs(self.dataset.timeout_seconds)
    }
}

impl Validate for TariffConfig {
    fn validate(&self) -> Result<()> {
        self.tariff().validate()?;

        validate_url("exchange_rate.endpoint", &self.exchange_rate.endpoint)?;
        validate_range(
            "exchange_rate.timeout_seconds",
            self.exchange_rate.timeout_seconds,
            1,
            60,
        )?;
        validate_positive_amount("exchange_rate.fallback", self.exchange_rate.fallback)?;

        if self.dataset.source.trim().is_empty() {
            return Err(QuoteError::MissingConfigError {
                field: "dataset.source".to_string(),
            });
        }
        validate_location("dataset.source", &self.dataset.source)?;
        validate_range("dataset.timeout_seconds", self.dataset.timeout_seconds, 1, 600)?;
        Ok(())
    }
}
