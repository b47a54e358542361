// Adapters layer: concrete implementations for external systems (rate API, dataset storage).

pub mod http;
pub mod storage;

pub use http::{FixedRate, FrankfurterRates, HttpDataset, FRANKFURTER_ENDPOINT};
pub use storage::{dataset_source_for, LocalDataset};
