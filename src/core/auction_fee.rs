use crate::core::rate_table::{RateBand, RateTable};
use crate::domain::model::Amount;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_non_negative_amount};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FEE_BEARING_PATTERN: &str = "copart";
pub const DEFAULT_PROCESSING_FEE: f64 = 95.00;

/// Copart base sale fee: flat steps to $14,999.99, then 7.5% of the full price.
const COPART_BASE_BANDS: &[RateBand] = &[
    RateBand::flat(0.00, 49.99, 25.00),
    RateBand::flat(50.00, 99.99, 45.00),
    RateBand::flat(100.00, 199.99, 80.00),
    RateBand::flat(200.00, 299.99, 130.00),
    RateBand::flat(300.00, 349.99, 137.50),
    RateBand::flat(350.00, 399.99, 145.00),
    RateBand::flat(400.00, 449.99, 175.00),
    RateBand::flat(450.00, 499.99, 185.00),
    RateBand::flat(500.00, 549.99, 205.00),
    RateBand::flat(550.00, 599.99, 210.00),
    RateBand::flat(600.00, 699.99, 240.00),
    RateBand::flat(700.00, 799.99, 270.00),
    RateBand::flat(800.00, 899.99, 295.00),
    RateBand::flat(900.00, 999.99, 320.00),
    RateBand::flat(1000.00, 1199.99, 375.00),
    RateBand::flat(1200.00, 1299.99, 395.00),
    RateBand::flat(1300.00, 1399.99, 410.00),
    RateBand::flat(1400.00, 1499.99, 430.00),
    RateBand::flat(1500.00, 1599.99, 445.00),
    RateBand::flat(1600.00, 1699.99, 465.00),
    RateBand::flat(1700.00, 1799.99, 485.00),
    RateBand::flat(1800.00, 1999.99, 510.00),
    RateBand::flat(2000.00, 2399.99, 535.00),
    RateBand::flat(2400.00, 2499.99, 570.00),
    RateBand::flat(2500.00, 2999.99, 610.00),
    RateBand::flat(3000.00, 3499.99, 655.00),
    RateBand::flat(3500.00, 3999.99, 705.00),
    RateBand::flat(4000.00, 4499.99, 725.00),
    RateBand::flat(4500.00, 4999.99, 750.00),
    RateBand::flat(5000.00, 5499.99, 775.00),
    RateBand::flat(5500.00, 5999.99, 800.00),
    RateBand::flat(6000.00, 6499.99, 825.00),
    RateBand::flat(6500.00, 6999.99, 845.00),
    RateBand::flat(7000.00, 7499.99, 880.00),
    RateBand::flat(7500.00, 7999.99, 900.00),
    RateBand::flat(8000.00, 8499.99, 925.00),
    RateBand::flat(8500.00, 8999.99, 945.00),
    RateBand::flat(9000.00, 9999.99, 945.00),
    RateBand::flat(10000.00, 10499.99, 1000.00),
    RateBand::flat(10500.00, 10999.99, 1000.00),
    RateBand::flat(11000.00, 11499.99, 1000.00),
    RateBand::flat(11500.00, 11999.99, 1000.00),
    RateBand::flat(12000.00, 12499.99, 1000.00),
    RateBand::flat(12500.00, 14999.99, 1000.00),
    RateBand::percent_from(15000.00, 0.075),
];

/// Copart virtual bid (buyer premium) fee. Band edges touch; the lower band wins.
const COPART_BID_BANDS: &[RateBand] = &[
    RateBand::flat(0.00, 100.00, 0.00),
    RateBand::flat(100.00, 500.00, 40.00),
    RateBand::flat(500.00, 1000.00, 55.00),
    RateBand::flat(1000.00, 1500.00, 75.00),
    RateBand::flat(1500.00, 2000.00, 85.00),
    RateBand::flat(2000.00, 4000.00, 100.00),
    RateBand::flat(4000.00, 6000.00, 110.00),
    RateBand::flat(6000.00, 8000.00, 125.00),
    RateBand::flat_from(8000.00, 140.00),
];

pub fn copart_base_table() -> RateTable {
    RateTable::new(COPART_BASE_BANDS.to_vec())
}

pub fn copart_bid_table() -> RateTable {
    RateTable::new(COPART_BID_BANDS.to_vec())
}

/// Buyer-side fee schedule of a fee-bearing auction house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionFeeSchedule {
    /// Case-insensitive substring identifying fee-bearing auction names.
    pub fee_bearing_pattern: String,
    pub processing_fee: f64,
    pub base_bands: RateTable,
    pub bid_bands: RateTable,
}

impl Default for AuctionFeeSchedule {
    fn default() -> Self {
        Self {
            fee_bearing_pattern: DEFAULT_FEE_BEARING_PATTERN.to_string(),
            processing_fee: DEFAULT_PROCESSING_FEE,
            base_bands: copart_base_table(),
            bid_bands: copart_bid_table(),
        }
    }
}

impl AuctionFeeSchedule {
    pub fn is_fee_bearing(&self, auction: &str) -> bool {
        !self.fee_bearing_pattern.is_empty()
            && auction
                .to_lowercase()
                .contains(&self.fee_bearing_pattern.to_lowercase())
    }

    /// Base fee + processing fee + bid fee. Both tables must resolve; there
    /// is no partial fee.
    pub fn fee(&self, price: Amount) -> Amount {
        let Some(price) = price.value().filter(|p| *p >= 0.0) else {
            return Amount::Unknown;
        };

        let base = self.base_bands.lookup(price);
        if base.is_unknown() {
            tracing::debug!("No base fee band covers price {:.2}", price);
            return Amount::Unknown;
        }

        let bid = self.bid_bands.lookup(price);
        if bid.is_unknown() {
            tracing::debug!("No bid fee band covers price {:.2}", price);
            return Amount::Unknown;
        }

        tracing::debug!(
            "Auction fee for {:.2}: base {} + processing {:.2} + bid {}",
            price,
            base,
            self.processing_fee,
            bid
        );
        base + Amount::known(self.processing_fee) + bid
    }

    pub fn validate(&self) -> Result<()> {
        validate_non_empty_string("auction_fee.fee_bearing_pattern", &self.fee_bearing_pattern)?;
        validate_non_negative_amount("auction_fee.processing_fee", self.processing_fee)?;
        self.base_bands.validate("auction_fee.base_bands")?;
        self.bid_bands.validate("auction_fee.bid_bands")?;
        Ok(())
    }
}
