//! Scenario runner for batch projections and sensitivity analysis
//!
//! Holds one immutable base assumption set and layers per-run overrides on
//! top of it, so concurrent runs with different overrides never interfere.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{AssumptionOverrides, Assumptions};
use crate::error::{ConfigurationError, LoadError};
use crate::projection::{Horizon, ProjectionEngine, ProjectionResult};
use crate::rounding::round_count;

/// Pre-loaded scenario runner for efficient batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// // Same priors, different program sizes
/// let batch: Vec<_> = [80, 120, 200]
///     .iter()
///     .map(|&starts| AssumptionOverrides { annual_starts: Some(starts), ..Default::default() })
///     .collect();
/// let results = runner.run_batch(Horizon::ThreeYear, &batch);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Pre-loaded base assumptions
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with hardcoded default priors
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::default_priors(),
        }
    }

    /// Create runner by loading priors from CSV files
    pub fn from_csv() -> Result<Self, LoadError> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from a specific priors directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, LoadError> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Base assumptions every run starts from
    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Run a single projection with `overrides` layered on the base priors
    pub fn run(
        &self,
        horizon: Horizon,
        overrides: &AssumptionOverrides,
    ) -> Result<ProjectionResult, ConfigurationError> {
        let assumptions = self.base_assumptions.merged(overrides)?;
        ProjectionEngine::new(assumptions).project(horizon)
    }

    /// Run one projection per override set, in parallel
    pub fn run_batch(
        &self,
        horizon: Horizon,
        overrides: &[AssumptionOverrides],
    ) -> Vec<Result<ProjectionResult, ConfigurationError>> {
        overrides
            .par_iter()
            .map(|o| self.run(horizon, o))
            .collect()
    }

    /// Re-run the projection under each named scenario and report revenue deltas
    pub fn sensitivity(
        &self,
        horizon: Horizon,
        overrides: &AssumptionOverrides,
    ) -> Result<SensitivityReport, ConfigurationError> {
        let base = self.base_assumptions.merged(overrides)?;
        let baseline_revenue_total = ProjectionEngine::new(base.clone()).project(horizon)?.revenue_total();

        let scenarios = SensitivityScenario::ALL
            .par_iter()
            .map(|scenario| -> Result<ScenarioDelta, ConfigurationError> {
                let adjusted = scenario.apply(&base);
                let revenue_total = ProjectionEngine::new(adjusted).project(horizon)?.revenue_total();
                Ok(ScenarioDelta {
                    label: scenario.label().to_string(),
                    revenue_total,
                    delta_revenue_total: revenue_total - baseline_revenue_total,
                    explain: scenario.explain().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Sensitivity over {} year(s): baseline={:.0}, {} scenarios",
            horizon.years(),
            baseline_revenue_total,
            scenarios.len()
        );

        Ok(SensitivityReport {
            horizon,
            baseline_revenue_total,
            scenarios,
            explain: "Revenue deltas from re-running the cohort projection under each scenario; \
                      no price elasticity is modeled."
                .to_string(),
        })
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Named what-if adjustments to a base assumption set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityScenario {
    /// Term persistence up one percentage point
    RetentionPlusOnePoint,
    /// Annual starts up 10%
    StartsPlusTenPercent,
    /// Tuition per credit down 10%
    TuitionMinusTenPercent,
}

impl SensitivityScenario {
    pub const ALL: [SensitivityScenario; 3] = [
        SensitivityScenario::RetentionPlusOnePoint,
        SensitivityScenario::StartsPlusTenPercent,
        SensitivityScenario::TuitionMinusTenPercent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SensitivityScenario::RetentionPlusOnePoint => "+1pp_retention",
            SensitivityScenario::StartsPlusTenPercent => "+10pct_starts",
            SensitivityScenario::TuitionMinusTenPercent => "-10pct_tuition",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            SensitivityScenario::RetentionPlusOnePoint => {
                "Lower term loss lifts actives across cohorts."
            }
            SensitivityScenario::StartsPlusTenPercent => "More starts increase cumulative actives.",
            SensitivityScenario::TuitionMinusTenPercent => {
                "Lower price reduces gross tuition (no elasticity modeled)."
            }
        }
    }

    /// Copy of `base` with this scenario's adjustment applied
    pub fn apply(&self, base: &Assumptions) -> Assumptions {
        let mut adjusted = base.clone();
        match self {
            SensitivityScenario::RetentionPlusOnePoint => {
                adjusted.retention.school_term_persistence = Some(base.term_persistence() + 0.01);
            }
            SensitivityScenario::StartsPlusTenPercent => {
                adjusted.annual_starts = round_count(base.annual_starts as f64 * 1.1);
            }
            SensitivityScenario::TuitionMinusTenPercent => {
                adjusted.pricing.tuition_per_credit = base.pricing.tuition_per_credit * 0.9;
            }
        }
        adjusted
    }
}

/// Revenue outcome of one scenario against the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub label: String,
    pub revenue_total: f64,
    pub delta_revenue_total: f64,
    pub explain: String,
}

/// Baseline plus every scenario delta for one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub horizon: Horizon,
    pub baseline_revenue_total: f64,
    pub scenarios: Vec<ScenarioDelta>,
    pub explain: String,
}

impl SensitivityReport {
    pub fn scenario(&self, label: &str) -> Option<&ScenarioDelta> {
        self.scenarios.iter().find(|s| s.label == label)
    }
}
