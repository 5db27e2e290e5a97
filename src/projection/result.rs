//! Output structures for projections

use serde::{Deserialize, Serialize};

use super::Horizon;

/// One term of the baseline year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRow {
    /// Term number within the year (1-indexed)
    pub term: u32,
    pub starts: u64,
    pub actives: u64,
    pub revenue: f64,
}

/// Totals for one projected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    /// Projection year (1-indexed)
    pub year: u32,
    /// Display label, "Y1", "Y2", ...
    pub label: String,
    pub starts: u64,
    pub actives_avg: u64,
    pub completions: u64,
    pub revenue_total: f64,
}

/// Headline totals plus the per-year breakdown.
///
/// `starts`, `actives_avg` and `completions` are year-1 figures;
/// `revenue_total` is summed over every year of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub starts: u64,
    pub actives_avg: u64,
    pub completions: u64,
    pub revenue_total: f64,
    pub by_year: Vec<YearRow>,
}

/// Echo of the inputs a projection actually ran with, for auditability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsUsed {
    pub annual_starts: u64,
    pub entries_per_year: u32,
    pub term_length_weeks: u32,
    /// Normalized seasonality weights
    pub seasonality: Vec<f64>,
    /// Effective (override-resolved, clamped) term persistence
    pub term_persistence: f64,
    pub annual_persistence: f64,
    pub tuition_per_credit: f64,
    pub credits_per_term: u32,
    pub yoy_growth: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub horizon: Horizon,

    pub inputs_used: InputsUsed,

    /// Per-term table for the baseline year
    pub terms: Vec<TermRow>,

    pub yearly_totals: YearlyTotals,

    /// Plain-language summary of the formula used
    pub explain: String,

    /// Named data sources behind the priors
    pub sources: Vec<String>,
}

impl ProjectionResult {
    /// Revenue summed over the whole horizon
    pub fn revenue_total(&self) -> f64 {
        self.yearly_totals.revenue_total
    }

    /// Actives in the final term of the baseline year
    pub fn final_term_actives(&self) -> u64 {
        self.terms.last().map(|t| t.actives).unwrap_or(0)
    }
}
