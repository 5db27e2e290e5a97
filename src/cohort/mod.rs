//! Cohort arithmetic for one projection year: split, decay, price

mod splitter;
mod matrix;
mod revenue;

pub use splitter::split_starts;
pub use matrix::{CohortMatrix, project_actives};
pub use revenue::{term_revenue, total_revenue};
