pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::TariffConfig;
pub use core::{
    engine::{resolve_exchange_rate, QuoteEngine, FALLBACK_EUR_USD},
    quote::{build_quote, QuoteContext},
    tariff::Tariff,
};
pub use domain::model::{Amount, FuelType, Quote, QuoteInputs, VehicleClass, VehicleProfile};
pub use utils::error::{QuoteError, Result};
