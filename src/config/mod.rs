#[cfg(feature = "cli")]
pub mod cli;
pub mod tariff_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, QuoteArgs};
pub use tariff_config::{DatasetConfig, ExchangeRateConfig, TariffConfig};
