//! Term-over-term persistence and its annual equivalent
//!
//! Persistence is a business-tunable prior, often supplied loosely, so
//! out-of-range values are clamped rather than rejected.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::rounding::round_to;

/// Default fraction of a cohort retained from one term to the next
pub const DEFAULT_TERM_PERSISTENCE: f64 = 0.88;

/// Upper bound applied before compounding, keeps every cohort decaying
pub const MAX_TERM_PERSISTENCE: f64 = 0.9999;

/// Retention priors for a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retention {
    /// Named prior for term persistence
    pub term_persistence_prior: f64,

    /// School-specific observed persistence; wins over the prior when set
    pub school_term_persistence: Option<f64>,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            term_persistence_prior: DEFAULT_TERM_PERSISTENCE,
            school_term_persistence: None,
        }
    }
}

impl Retention {
    /// Persistence to project with: school override, else prior, clamped
    pub fn effective_term_persistence(&self) -> f64 {
        clamp_persistence(self.school_term_persistence.unwrap_or(self.term_persistence_prior))
    }
}

/// Clamp a term persistence rate into `[0, 0.9999]`. NaN maps to 0.
pub fn clamp_persistence(rate: f64) -> f64 {
    if rate.is_nan() {
        warn!("Term persistence is NaN; treating as 0");
        return 0.0;
    }
    let clamped = rate.clamp(0.0, MAX_TERM_PERSISTENCE);
    if clamped != rate {
        warn!("Term persistence {} clamped to {}", rate, clamped);
    }
    clamped
}

/// Implied annual persistence from a per-term rate.
///
/// Compounds the clamped term rate over `entries_per_year` terms and rounds
/// to 2 decimals. A reporting unit derived from the per-term assumption,
/// not an independent estimate.
pub fn annualize(term_persistence: f64, entries_per_year: u32) -> f64 {
    let rate = clamp_persistence(term_persistence);
    round_to(rate.powi(entries_per_year as i32), 2)
}
