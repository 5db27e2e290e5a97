//! Error types for assumption validation and loading

use thiserror::Error;

/// An assumption set that cannot drive a projection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Seasonality weights have no positive, finite total.
    #[error("Seasonality weights must have a positive, finite sum")]
    DegenerateSeasonality,

    /// A seasonality weight is negative, NaN or infinite.
    #[error("Invalid seasonality weight {weight} at term {term}")]
    InvalidSeasonalityWeight {
        /// 1-indexed term slot
        term: usize,
        weight: f64,
    },

    /// The seasonality curve does not have one weight per term.
    #[error("Seasonality has {actual} weights but cadence has {expected} entries per year")]
    SeasonalityLength { expected: usize, actual: usize },

    /// Annual starts past the range where `f64` holds every integer exactly.
    #[error("Annual starts {starts} exceeds the supported maximum of {max}")]
    TooManyStarts { starts: u64, max: u64 },

    #[error("Entries per year must be at least 1")]
    NoEntriesPerYear,

    #[error("Term length must be at least 1 week")]
    ZeroTermLength,

    #[error("Credits per term must be at least 1")]
    ZeroCreditsPerTerm,

    /// Tuition is negative or not finite.
    #[error("Invalid tuition per credit: {0}")]
    InvalidTuition(f64),

    /// Year-over-year growth is not finite or would shrink enrollment below zero.
    #[error("Invalid year-over-year growth rate: {0}")]
    InvalidGrowth(f64),
}

impl ConfigurationError {
    pub fn invalid_weight(term: usize, weight: f64) -> Self {
        Self::InvalidSeasonalityWeight { term, weight }
    }

    pub fn seasonality_length(expected: usize, actual: usize) -> Self {
        Self::SeasonalityLength { expected, actual }
    }
}

/// Failure to load a priors directory from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A `priors.csv` value could not be parsed for its key.
    #[error("Invalid value {value:?} for prior {key}")]
    InvalidValue { key: String, value: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
