//! Tuition pricing

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Default tuition per credit hour
pub const DEFAULT_TUITION_PER_CREDIT: f64 = 500.0;

/// Default credits carried by an active student each term
pub const DEFAULT_CREDITS_PER_TERM: u32 = 6;

/// Flat per-credit tuition pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Tuition per credit (non-negative)
    pub tuition_per_credit: f64,

    /// Credits per active student per term
    pub credits_per_term: u32,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            tuition_per_credit: DEFAULT_TUITION_PER_CREDIT,
            credits_per_term: DEFAULT_CREDITS_PER_TERM,
        }
    }
}

impl Pricing {
    /// Revenue from one active student for one term
    pub fn revenue_per_student_term(&self) -> f64 {
        self.credits_per_term as f64 * self.tuition_per_credit
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.credits_per_term == 0 {
            return Err(ConfigurationError::ZeroCreditsPerTerm);
        }
        if !self.tuition_per_credit.is_finite() || self.tuition_per_credit < 0.0 {
            return Err(ConfigurationError::InvalidTuition(self.tuition_per_credit));
        }
        Ok(())
    }
}
