//! Tuition revenue from active head counts

use crate::assumptions::Pricing;
use crate::rounding::round_whole;

/// Revenue per term: `round(actives * credits_per_term * tuition_per_credit)`
pub fn term_revenue(actives: &[u64], pricing: &Pricing) -> Vec<f64> {
    let per_student = pricing.revenue_per_student_term();
    actives
        .iter()
        .map(|&count| round_whole(count as f64 * per_student))
        .collect()
}

/// Sum of per-term revenue
pub fn total_revenue(revenue: &[f64]) -> f64 {
    revenue.iter().sum()
}
