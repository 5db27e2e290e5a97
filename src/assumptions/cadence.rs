//! Term cadence and start-season weighting
//!
//! A cadence describes how many cohorts start per year, how long each term
//! runs, and how popular each start slot is relative to the others.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::rounding::round_to;

/// Default start-season popularity for an online program on an 8-week
/// calendar. Front-loaded toward the first two starts of the year.
pub const DEFAULT_SEASONALITY: [f64; 6] = [0.28, 0.22, 0.18, 0.14, 0.10, 0.08];

/// Default number of cohort starts per year
pub const DEFAULT_ENTRIES_PER_YEAR: u32 = 6;

/// Default term length in weeks
pub const DEFAULT_TERM_LENGTH_WEEKS: u32 = 8;

/// Decimal places kept on each normalized weight
const NORMALIZED_DECIMALS: i32 = 4;

/// Relative start weights, one per term slot in a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonalityCurve {
    weights: Vec<f64>,
}

impl SeasonalityCurve {
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// Equal weight on every term
    pub fn uniform(terms: usize) -> Self {
        Self {
            weights: vec![1.0; terms],
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Turn the raw weights into a distribution over terms.
    ///
    /// Each weight is divided by the total and rounded to 4 decimals. The
    /// rounded weights may miss 1.0 by a few ten-thousandths; the start
    /// splitter absorbs that.
    pub fn normalize(&self) -> Result<NormalizedSeasonality, ConfigurationError> {
        for (idx, &weight) in self.weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigurationError::invalid_weight(idx + 1, weight));
            }
        }

        // Finite weights can still overflow to an infinite total
        let total: f64 = self.weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(ConfigurationError::DegenerateSeasonality);
        }

        let weights = self
            .weights
            .iter()
            .map(|w| round_to(w / total, NORMALIZED_DECIMALS))
            .collect();

        Ok(NormalizedSeasonality { weights })
    }
}

impl Default for SeasonalityCurve {
    fn default() -> Self {
        Self::new(DEFAULT_SEASONALITY.to_vec())
    }
}

/// Seasonality weights that have been validated and normalized.
///
/// Only obtainable through [`SeasonalityCurve::normalize`], so it is never
/// empty and never contains negative weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedSeasonality {
    weights: Vec<f64>,
}

impl NormalizedSeasonality {
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn term_count(&self) -> usize {
        self.weights.len()
    }
}

/// Start calendar for a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    /// Cohort starts per year
    pub entries_per_year: u32,

    /// Weeks per term
    pub term_length_weeks: u32,

    /// Relative popularity of each start slot
    pub seasonality: SeasonalityCurve,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            entries_per_year: DEFAULT_ENTRIES_PER_YEAR,
            term_length_weeks: DEFAULT_TERM_LENGTH_WEEKS,
            seasonality: SeasonalityCurve::default(),
        }
    }
}

impl Cadence {
    /// Check the calendar and normalize its seasonality in one pass
    pub fn normalized_seasonality(&self) -> Result<NormalizedSeasonality, ConfigurationError> {
        if self.entries_per_year == 0 {
            return Err(ConfigurationError::NoEntriesPerYear);
        }
        if self.term_length_weeks == 0 {
            return Err(ConfigurationError::ZeroTermLength);
        }
        let expected = self.entries_per_year as usize;
        if self.seasonality.len() != expected {
            return Err(ConfigurationError::seasonality_length(expected, self.seasonality.len()));
        }
        self.seasonality.normalize()
    }
}
