use thiserror::Error;

use crate::providers::ProviderError;

/// The unified error type for the `market_data_store` crate.
///
/// Validation problems are deliberately absent: they are reported through
/// [`ValidationReport`](crate::validate::ValidationReport) so batch jobs can
/// continue past bad files.
#[derive(Debug, Error)]
pub enum Error {
    /// No stored data exists for the requested key (instrument, partition,
    /// snapshot date, ...).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored file does not match the expected schema for its dataset kind.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Too little history is available to compute a derived metric.
    #[error("Insufficient data: have {have} days of history, need {need}")]
    InsufficientData { have: usize, need: usize },

    /// An error originating from a data provider (API error, validation).
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// An error from the Polars library.
    #[error("Polars operation failed")]
    Polars(#[from] polars::prelude::PolarsError),
}
