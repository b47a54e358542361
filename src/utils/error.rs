use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Reference dataset error: {message}")]
    DatasetError { message: String },

    #[error("Exchange rate unavailable: {message}")]
    ExchangeRateError { message: String },

    #[error("Report rendering error: {message}")]
    ReportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QuoteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuoteError::HttpError(_) | QuoteError::ExchangeRateError { .. } => {
                ErrorCategory::Network
            }
            QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. }
            | QuoteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            QuoteError::CsvError(_)
            | QuoteError::ReportError { .. }
            | QuoteError::SerializationError(_)
            | QuoteError::DatasetError { .. } => ErrorCategory::Data,
            QuoteError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // The rate fetch always has a fallback, so this never stops a quote.
            QuoteError::ExchangeRateError { .. } => ErrorSeverity::Low,
            QuoteError::HttpError(_) => ErrorSeverity::Medium,
            QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. }
            | QuoteError::MissingConfigError { .. }
            | QuoteError::DatasetError { .. }
            | QuoteError::SerializationError(_)
            | QuoteError::CsvError(_)
            | QuoteError::ReportError { .. } => ErrorSeverity::High,
            QuoteError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QuoteError::HttpError(_) => "Check network connectivity or pass --offline to skip remote lookups",
            QuoteError::ExchangeRateError { .. } => "The fallback EUR/USD rate is used; pass --rate to override it",
            QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. }
            | QuoteError::MissingConfigError { .. } => "Review the tariff TOML file and command line flags",
            QuoteError::DatasetError { .. } | QuoteError::SerializationError(_) => {
                "Make sure the reference dataset is valid JSON with auctions, records, ports and seaRates"
            }
            QuoteError::CsvError(_) | QuoteError::ReportError { .. } => {
                "Retry with --format table or --format json"
            }
            QuoteError::IoError(_) => "Check that the file exists and is readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuoteError::HttpError(e) => format!("Could not reach a remote service: {}", e),
            QuoteError::IoError(e) => format!("Could not read a local file: {}", e),
            QuoteError::SerializationError(e) => format!("Reference data is not valid JSON: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
