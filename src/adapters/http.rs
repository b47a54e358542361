use crate::domain::dataset::ReferenceDataset;
use crate::domain::ports::{DatasetSource, ExchangeRateSource};
use crate::utils::error::{QuoteError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const FRANKFURTER_ENDPOINT: &str = "https://api.frankfurter.dev/latest";

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    #[serde(default)]
    date: Option<chrono::NaiveDate>,
    #[serde(default)]
    rates: HashMap<String, serde_json::Value>,
}

/// ECB reference rates via the Frankfurter API (no key required).
#[derive(Debug, Clone)]
pub struct FrankfurterRates {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl FrankfurterRates {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ExchangeRateSource for FrankfurterRates {
    async fn eur_to_usd(&self) -> Result<f64> {
        tracing::debug!("Requesting EUR/USD from: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("from", "EUR"), ("to", "USD")])
            .timeout(self.timeout)
            .send()
            .await?;

        tracing::debug!("Rate API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(QuoteError::ExchangeRateError {
                message: format!("rate API returned {}", response.status()),
            });
        }

        let body: FrankfurterResponse = response.json().await?;
        let rate = body
            .rates
            .get("USD")
            .and_then(|value| value.as_f64())
            .ok_or_else(|| QuoteError::ExchangeRateError {
                message: "response has no numeric rates.USD".to_string(),
            })?;

        if let Some(date) = body.date {
            tracing::debug!("EUR/USD {} as of {}", rate, date);
        }
        Ok(rate)
    }
}

/// A rate known up front (offline mode or an explicit override).
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub f64);

#[async_trait]
impl ExchangeRateSource for FixedRate {
    async fn eur_to_usd(&self) -> Result<f64> {
        Ok(self.0)
    }
}

/// Reference dataset published as JSON over http(s).
#[derive(Debug, Clone)]
pub struct HttpDataset {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpDataset {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DatasetSource for HttpDataset {
    async fn load(&self) -> Result<ReferenceDataset> {
        tracing::debug!("Downloading dataset from: {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuoteError::DatasetError {
                message: format!("{} returned {}", self.url, response.status()),
            });
        }

        let bytes = response.bytes().await?;
        ReferenceDataset::from_json_slice(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
