//! Projection engine for single and multi-year enrollment projections

mod engine;
mod result;

pub use engine::{BaselineYear, Horizon, ProjectionEngine};
pub use result::{InputsUsed, ProjectionResult, TermRow, YearRow, YearlyTotals};
