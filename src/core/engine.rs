use crate::core::quote::{build_quote, QuoteContext};
use crate::core::tariff::Tariff;
use crate::domain::dataset::ReferenceDataset;
use crate::domain::model::{Amount, Quote, QuoteInputs};
use crate::domain::ports::{DatasetSource, ExchangeRateSource};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Datelike;

/// ECB EUR→USD reference used when the live rate cannot be fetched.
pub const FALLBACK_EUR_USD: f64 = 1.1794;

/// Single attempt at the live rate; any failure or non-positive value yields `fallback`.
pub async fn resolve_exchange_rate(source: &dyn ExchangeRateSource, fallback: f64) -> f64 {
    match source.eur_to_usd().await {
        Ok(rate) if rate.is_finite() && rate > 0.0 => {
            tracing::info!("💱 Live EUR/USD rate: {:.4}", rate);
            rate
        }
        Ok(rate) => {
            tracing::warn!(
                "⚠️ Ignoring unusable EUR/USD rate {}, using fallback {:.4}",
                rate,
                fallback
            );
            fallback
        }
        Err(e) => {
            tracing::warn!(
                "⚠️ EUR/USD rate fetch failed ({}), using fallback {:.4}",
                e,
                fallback
            );
            fallback
        }
    }
}

/// Holds the loaded reference data, tariff and the process-wide exchange rate.
pub struct QuoteEngine {
    dataset: ReferenceDataset,
    tariff: Tariff,
    eur_usd: Amount,
    current_year: i32,
}

impl QuoteEngine {
    pub fn new(dataset: ReferenceDataset, tariff: Tariff, eur_usd: Amount) -> Self {
        Self {
            dataset,
            tariff,
            eur_usd,
            current_year: chrono::Local::now().year(),
        }
    }

    /// Pins the year used for vehicle age.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Loads and validates the dataset, then resolves the exchange rate once.
    pub async fn bootstrap(
        dataset_source: &dyn DatasetSource,
        rate_source: &dyn ExchangeRateSource,
        tariff: Tariff,
        fallback_rate: f64,
    ) -> Result<Self> {
        tariff.validate()?;

        tracing::info!("📥 Loading reference dataset from {}", dataset_source.describe());
        let dataset = dataset_source.load().await?;
        dataset.validate()?;
        tracing::info!(
            "✅ Loaded {} auctions, {} locations, {} ports",
            dataset.auctions.len(),
            dataset.records.len(),
            dataset.ports.len()
        );

        let rate = resolve_exchange_rate(rate_source, fallback_rate).await;
        Ok(Self::new(dataset, tariff, Amount::known(rate)))
    }

    pub fn context(&self) -> QuoteContext<'_> {
        QuoteContext {
            dataset: &self.dataset,
            tariff: &self.tariff,
            eur_usd: self.eur_usd,
            current_year: self.current_year,
        }
    }

    pub fn quote(&self, inputs: &QuoteInputs) -> Quote {
        build_quote(&self.context(), inputs)
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn eur_usd(&self) -> Amount {
        self.eur_usd
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn auctions(&self) -> &[String] {
        &self.dataset.auctions
    }

    pub fn states(&self, auction: &str) -> Vec<String> {
        self.dataset.states_for_auction(auction)
    }

    pub fn locations(&self, auction: &str, state: Option<&str>) -> Vec<String> {
        self.dataset.location_labels(auction, state)
    }
}
