//! Enrollment assumptions: cadence, pricing, retention and growth
//!
//! An [`Assumptions`] value is immutable input to every projection. Request
//! or CLI overrides never mutate it; they produce a new merged set via
//! [`Assumptions::merged`], with precedence
//! explicit override > named prior (loaded or default set) > hardcoded default.

mod cadence;
mod pricing;
mod retention;
pub mod loader;

pub use cadence::{
    Cadence, NormalizedSeasonality, SeasonalityCurve, DEFAULT_ENTRIES_PER_YEAR,
    DEFAULT_SEASONALITY, DEFAULT_TERM_LENGTH_WEEKS,
};
pub use pricing::{Pricing, DEFAULT_CREDITS_PER_TERM, DEFAULT_TUITION_PER_CREDIT};
pub use retention::{
    annualize, clamp_persistence, Retention, DEFAULT_TERM_PERSISTENCE, MAX_TERM_PERSISTENCE,
};
pub use loader::{LoadedPriors, DEFAULT_PRIORS_PATH};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigurationError, LoadError};

/// Default annual starts across all terms
pub const DEFAULT_ANNUAL_STARTS: u64 = 120;

/// Largest accepted `annual_starts`: 2^53, the last integer `f64` represents exactly
pub const MAX_ANNUAL_STARTS: u64 = 1 << 53;

/// Default flat year-over-year growth applied to multi-year horizons
pub const DEFAULT_YOY_GROWTH: f64 = 0.05;

/// Provenance reported with every projection unless overridden
pub const DEFAULT_SOURCES: [&str; 2] = ["Census/ACS (guardrails)", "EDDY priors"];

/// Container for all projection assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// New students starting per year, across all terms
    pub annual_starts: u64,

    pub cadence: Cadence,

    pub pricing: Pricing,

    pub retention: Retention,

    /// Flat year-over-year growth for multi-year horizons
    pub yoy_growth: f64,

    /// Named data sources behind these priors
    pub sources: Vec<String>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_priors()
    }
}

impl Assumptions {
    /// Hardcoded priors for an online program on an 8-week calendar
    pub fn default_priors() -> Self {
        Self {
            annual_starts: DEFAULT_ANNUAL_STARTS,
            cadence: Cadence::default(),
            pricing: Pricing::default(),
            retention: Retention::default(),
            yoy_growth: DEFAULT_YOY_GROWTH,
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load priors from CSV files in the default location (data/priors/)
    pub fn from_csv() -> Result<Self, LoadError> {
        Self::from_csv_path(Path::new(DEFAULT_PRIORS_PATH))
    }

    /// Load priors from CSV files in a specific directory.
    /// Keys missing from the files keep their hardcoded defaults.
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let loaded = LoadedPriors::load_from(path)?;
        let assumptions = loaded.apply_to(Self::default_priors())?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Check that the set can drive a projection
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.annual_starts > MAX_ANNUAL_STARTS {
            return Err(ConfigurationError::TooManyStarts {
                starts: self.annual_starts,
                max: MAX_ANNUAL_STARTS,
            });
        }
        self.cadence.normalized_seasonality()?;
        self.pricing.validate()?;
        if !self.yoy_growth.is_finite() || self.yoy_growth <= -1.0 {
            return Err(ConfigurationError::InvalidGrowth(self.yoy_growth));
        }
        Ok(())
    }

    /// Term persistence actually used by the projection (override, else prior, clamped)
    pub fn term_persistence(&self) -> f64 {
        self.retention.effective_term_persistence()
    }

    /// Annual persistence implied by the effective term persistence
    pub fn annual_persistence(&self) -> f64 {
        annualize(self.term_persistence(), self.cadence.entries_per_year)
    }

    /// Build a new validated set with `overrides` layered on top of `self`
    pub fn merged(&self, overrides: &AssumptionOverrides) -> Result<Self, ConfigurationError> {
        let mut merged = self.clone();

        if let Some(starts) = overrides.annual_starts {
            merged.annual_starts = starts;
        }

        let pricing = &overrides.pricing;
        if let Some(tuition) = pricing.tuition_per_credit {
            merged.pricing.tuition_per_credit = tuition;
        }
        if let Some(credits) = pricing.credits_per_term {
            merged.pricing.credits_per_term = credits;
        }

        let cadence = &overrides.cadence;
        if let Some(entries) = cadence.entries_per_year {
            merged.cadence.entries_per_year = entries;
        }
        if let Some(weeks) = cadence.term_length_weeks {
            merged.cadence.term_length_weeks = weeks;
        }
        if let Some(weights) = &cadence.seasonality {
            merged.cadence.seasonality = SeasonalityCurve::new(weights.clone());
        }

        let retention = &overrides.retention;
        if let Some(prior) = retention.term_persistence_prior {
            merged.retention.term_persistence_prior = prior;
        }
        if let Some(school) = retention.school_term_persistence {
            merged.retention.school_term_persistence = Some(school);
        }

        if let Some(growth) = overrides.yoy_growth {
            merged.yoy_growth = growth;
        }

        merged.validate()?;
        Ok(merged)
    }
}

/// Optional replacements for any assumption, as supplied by a caller.
///
/// Deserializes from request JSON where every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionOverrides {
    pub annual_starts: Option<u64>,
    pub pricing: PricingOverrides,
    pub cadence: CadenceOverrides,
    pub retention: RetentionOverrides,
    pub yoy_growth: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingOverrides {
    pub tuition_per_credit: Option<f64>,
    pub credits_per_term: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceOverrides {
    pub entries_per_year: Option<u32>,
    pub term_length_weeks: Option<u32>,
    pub seasonality: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionOverrides {
    pub term_persistence_prior: Option<f64>,
    pub school_term_persistence: Option<f64>,
}
