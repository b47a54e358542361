use crate::core::auction_fee::AuctionFeeSchedule;
use crate::core::customs::CustomsRates;
use crate::core::logistics::LogisticsRates;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

/// Every constant and schedule the engine prices against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariff {
    pub auction_fee: AuctionFeeSchedule,
    pub customs: CustomsRates,
    pub logistics: LogisticsRates,
}

impl Validate for Tariff {
    fn validate(&self) -> Result<()> {
        self.auction_fee.validate()?;
        self.customs.validate()?;
        self.logistics.validate()?;
        Ok(())
    }
}
