//! Enrollment Projection - cohort-based enrollment and revenue projections
//!
//! This library provides:
//! - Seasonality normalization and exact-sum splitting of annual starts across terms
//! - Overlapping-cohort decay to active students per term
//! - Tuition revenue and annualized persistence
//! - 1, 3 and 5 year projections with flat year-over-year growth
//! - Sensitivity scenarios, launch timeline checks and a request dispatcher

pub mod error;
pub mod rounding;
pub mod assumptions;
pub mod cohort;
pub mod projection;
pub mod scenario;
pub mod timeline;
pub mod service;

// Re-export commonly used types
pub use error::{ConfigurationError, LoadError};
pub use assumptions::{Assumptions, AssumptionOverrides, Cadence, Pricing, Retention, SeasonalityCurve};
pub use cohort::{CohortMatrix, split_starts};
pub use projection::{Horizon, ProjectionEngine, ProjectionResult};
pub use scenario::{ScenarioRunner, SensitivityReport};
