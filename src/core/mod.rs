pub mod auction_fee;
pub mod customs;
pub mod engine;
pub mod logistics;
pub mod quote;
pub mod rate_table;
pub mod tariff;

pub use crate::domain::dataset::{LocationRecord, ReferenceDataset};
pub use crate::domain::model::{Amount, Quote, QuoteInputs};
pub use crate::domain::ports::{DatasetSource, ExchangeRateSource};
pub use crate::utils::error::Result;
