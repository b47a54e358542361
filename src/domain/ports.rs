use crate::domain::dataset::ReferenceDataset;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Live EUR→USD rate provider.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    async fn eur_to_usd(&self) -> Result<f64>;
}

/// Where the reference dataset comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self) -> Result<ReferenceDataset>;

    fn describe(&self) -> String;
}
