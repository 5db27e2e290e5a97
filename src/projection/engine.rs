//! Projection orchestration over 1, 3 and 5 year horizons

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::cohort::{project_actives, split_starts, term_revenue, total_revenue, CohortMatrix};
use crate::error::ConfigurationError;
use crate::rounding::{round_count, round_whole};
use super::result::{InputsUsed, ProjectionResult, TermRow, YearRow, YearlyTotals};

/// Length of a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1yr")]
    OneYear,
    #[serde(rename = "3yr")]
    ThreeYear,
    #[serde(rename = "5yr")]
    FiveYear,
}

impl Horizon {
    pub fn years(&self) -> u32 {
        match self {
            Horizon::OneYear => 1,
            Horizon::ThreeYear => 3,
            Horizon::FiveYear => 5,
        }
    }

    pub fn from_years(years: u32) -> Option<Self> {
        match years {
            1 => Some(Horizon::OneYear),
            3 => Some(Horizon::ThreeYear),
            5 => Some(Horizon::FiveYear),
            _ => None,
        }
    }
}

/// Fully computed single year: the basis every horizon is reported from
#[derive(Debug, Clone)]
pub struct BaselineYear {
    pub starts: Vec<u64>,
    pub matrix: CohortMatrix,
    pub actives: Vec<u64>,
    pub revenue: Vec<f64>,
    pub totals: YearRow,
}

impl BaselineYear {
    pub fn term_rows(&self) -> Vec<TermRow> {
        self.starts
            .iter()
            .zip(&self.actives)
            .zip(&self.revenue)
            .enumerate()
            .map(|(idx, ((&starts, &actives), &revenue))| TermRow {
                term: idx as u32 + 1,
                starts,
                actives,
                revenue,
            })
            .collect()
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    assumptions: Assumptions,
}

impl ProjectionEngine {
    /// Create a new projection engine over a fixed assumption set
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Split, decay and price one year of starts
    pub fn baseline_year(&self) -> Result<BaselineYear, ConfigurationError> {
        let a = &self.assumptions;
        a.pricing.validate()?;
        let seasonality = a.cadence.normalized_seasonality()?;
        let persistence = a.term_persistence();

        let starts = split_starts(a.annual_starts, &seasonality);
        let (matrix, actives) = project_actives(&starts, persistence);
        let revenue = term_revenue(&actives, &a.pricing);

        let terms = actives.len().max(1) as f64;
        let actives_sum: u64 = actives.iter().sum();
        let last_actives = actives.last().copied().unwrap_or(0);

        let totals = YearRow {
            year: 1,
            label: year_label(1),
            starts: starts.iter().sum(),
            actives_avg: round_count(actives_sum as f64 / terms),
            completions: round_count(last_actives as f64 * persistence),
            revenue_total: total_revenue(&revenue),
        };

        debug!(
            "Baseline year: starts={:?} actives={:?} revenue_total={:.0}",
            starts, actives, totals.revenue_total
        );

        Ok(BaselineYear {
            starts,
            matrix,
            actives,
            revenue,
            totals,
        })
    }

    /// Run a projection for the given horizon.
    ///
    /// The cohort engine runs once for the baseline year. Later years scale
    /// the baseline by a flat `(1 + yoy_growth)^(year - 1)`; cohorts are not
    /// re-simulated and do not carry over between years.
    pub fn project(&self, horizon: Horizon) -> Result<ProjectionResult, ConfigurationError> {
        self.assumptions.validate()?;
        let baseline = self.baseline_year()?;

        let by_year: Vec<YearRow> = (1..=horizon.years())
            .map(|year| self.grow_year(&baseline.totals, year))
            .collect();
        let revenue_total = by_year.iter().map(|y| y.revenue_total).sum();

        let yearly_totals = YearlyTotals {
            starts: baseline.totals.starts,
            actives_avg: baseline.totals.actives_avg,
            completions: baseline.totals.completions,
            revenue_total,
            by_year,
        };

        debug!(
            "Projected {} year(s): revenue_total={:.0}",
            horizon.years(),
            revenue_total
        );

        Ok(ProjectionResult {
            horizon,
            inputs_used: self.inputs_used()?,
            terms: baseline.term_rows(),
            yearly_totals,
            explain: self.explain(horizon),
            sources: self.assumptions.sources.clone(),
        })
    }

    /// Baseline totals scaled to `year` by the flat growth multiplier
    fn grow_year(&self, baseline: &YearRow, year: u32) -> YearRow {
        if year <= 1 {
            return baseline.clone();
        }
        let multiplier = (1.0 + self.assumptions.yoy_growth).powi(year as i32 - 1);
        YearRow {
            year,
            label: year_label(year),
            starts: round_count(baseline.starts as f64 * multiplier),
            actives_avg: round_count(baseline.actives_avg as f64 * multiplier),
            completions: round_count(baseline.completions as f64 * multiplier),
            revenue_total: round_whole(baseline.revenue_total * multiplier),
        }
    }

    fn inputs_used(&self) -> Result<InputsUsed, ConfigurationError> {
        let a = &self.assumptions;
        Ok(InputsUsed {
            annual_starts: a.annual_starts,
            entries_per_year: a.cadence.entries_per_year,
            term_length_weeks: a.cadence.term_length_weeks,
            seasonality: a.cadence.normalized_seasonality()?.weights().to_vec(),
            term_persistence: a.term_persistence(),
            annual_persistence: a.annual_persistence(),
            tuition_per_credit: a.pricing.tuition_per_credit,
            credits_per_term: a.pricing.credits_per_term,
            yoy_growth: a.yoy_growth,
        })
    }

    fn explain(&self, horizon: Horizon) -> String {
        let a = &self.assumptions;
        let mut text = format!(
            "Starts distributed by seasonality across {} terms of {} weeks; \
             each cohort keeps {:.2} of its students per term (~{:.2} annually); \
             revenue = actives x {} credits x ${}/credit.",
            a.cadence.entries_per_year,
            a.cadence.term_length_weeks,
            a.term_persistence(),
            a.annual_persistence(),
            a.pricing.credits_per_term,
            a.pricing.tuition_per_credit,
        );
        if horizon.years() > 1 {
            text.push_str(&format!(
                " Years 2-{} scale year-1 results by a flat {:.1}% per year; \
                 cohorts are not re-simulated across years.",
                horizon.years(),
                a.yoy_growth * 100.0,
            ));
        }
        text
    }
}

fn year_label(year: u32) -> String {
    format!("Y{}", year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{AssumptionOverrides, PricingOverrides, RetentionOverrides};
    use approx::assert_relative_eq;

    fn default_engine() -> ProjectionEngine {
        ProjectionEngine::new(Assumptions::default_priors())
    }

    #[test]
    fn test_one_year_default_priors() {
        let result = default_engine().project(Horizon::OneYear).unwrap();

        let starts: Vec<u64> = result.terms.iter().map(|t| t.starts).collect();
        assert_eq!(starts, vec![33, 26, 22, 17, 12, 10]);
        assert_eq!(starts.iter().sum::<u64>(), 120);

        let actives: Vec<u64> = result.terms.iter().map(|t| t.actives).collect();
        assert_eq!(actives, vec![33, 55, 71, 78, 82, 82]);
        assert!(result.final_term_actives() < 120);

        let totals = &result.yearly_totals;
        assert_eq!(totals.starts, 120);
        assert_eq!(totals.actives_avg, 67);
        assert_eq!(totals.completions, 72);
        assert_eq!(totals.revenue_total, 1_203_000.0);

        let term_sum: f64 = result.terms.iter().map(|t| t.revenue).sum();
        assert_eq!(totals.revenue_total, term_sum);
        assert_eq!(totals.by_year.len(), 1);
        assert_eq!(totals.by_year[0].label, "Y1");
    }

    #[test]
    fn test_inputs_echo() {
        let result = default_engine().project(Horizon::OneYear).unwrap();
        let inputs = &result.inputs_used;

        assert_eq!(inputs.annual_starts, 120);
        assert_eq!(inputs.seasonality, vec![0.28, 0.22, 0.18, 0.14, 0.10, 0.08]);
        assert_eq!(inputs.term_persistence, 0.88);
        assert_eq!(inputs.annual_persistence, 0.46);
        assert_eq!(inputs.tuition_per_credit, 500.0);
        assert_eq!(result.sources, vec!["Census/ACS (guardrails)", "EDDY priors"]);
        assert!(result.explain.contains("6 terms of 8 weeks"));
        assert!(!result.explain.contains("re-simulated"));
    }

    #[test]
    fn test_three_year_growth() {
        let result = default_engine().project(Horizon::ThreeYear).unwrap();
        let by_year = &result.yearly_totals.by_year;

        assert_eq!(by_year.len(), 3);
        assert_eq!(by_year[0].starts, 120);
        assert_eq!(by_year[1].starts, 126);
        assert_eq!(by_year[2].starts, 132);
        assert_eq!(by_year[1].revenue_total, 1_263_150.0);
        assert_eq!(by_year[2].revenue_total, 1_326_308.0);

        let summed: f64 = by_year.iter().map(|y| y.revenue_total).sum();
        assert_eq!(result.revenue_total(), summed);
        assert_eq!(result.yearly_totals.starts, 120);
        assert!(result.explain.contains("Years 2-3"));
    }

    #[test]
    fn test_five_year_is_non_decreasing() {
        let result = default_engine().project(Horizon::FiveYear).unwrap();
        let by_year = &result.yearly_totals.by_year;

        assert_eq!(by_year.len(), 5);
        assert_eq!(by_year[4].label, "Y5");
        for pair in by_year.windows(2) {
            assert!(pair[1].starts >= pair[0].starts);
            assert!(pair[1].revenue_total >= pair[0].revenue_total);
        }
        assert_relative_eq!(
            by_year[4].revenue_total / by_year[0].revenue_total,
            1.05f64.powi(4),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_zero_growth_repeats_baseline() {
        let assumptions = Assumptions {
            yoy_growth: 0.0,
            ..Assumptions::default_priors()
        };
        let result = ProjectionEngine::new(assumptions).project(Horizon::FiveYear).unwrap();
        assert_eq!(result.revenue_total(), 5.0 * 1_203_000.0);
    }

    #[test]
    fn test_zero_persistence_end_to_end() {
        let overrides = AssumptionOverrides {
            retention: RetentionOverrides {
                school_term_persistence: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let assumptions = Assumptions::default_priors().merged(&overrides).unwrap();
        let baseline = ProjectionEngine::new(assumptions).baseline_year().unwrap();

        assert_eq!(baseline.actives, baseline.starts);
        assert_eq!(baseline.totals.completions, 0);
    }

    #[test]
    fn test_free_tuition_projects_zero_revenue() {
        let overrides = AssumptionOverrides {
            pricing: PricingOverrides {
                tuition_per_credit: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let assumptions = Assumptions::default_priors().merged(&overrides).unwrap();
        let result = ProjectionEngine::new(assumptions).project(Horizon::ThreeYear).unwrap();
        assert_eq!(result.revenue_total(), 0.0);
        assert_eq!(result.yearly_totals.starts, 120);
    }

    #[test]
    fn test_degenerate_seasonality_fails() {
        let mut assumptions = Assumptions::default_priors();
        assumptions.cadence.seasonality = crate::assumptions::SeasonalityCurve::new(vec![0.0; 6]);
        let err = ProjectionEngine::new(assumptions).project(Horizon::OneYear).unwrap_err();
        assert_eq!(err, ConfigurationError::DegenerateSeasonality);
    }

    #[test]
    fn test_horizon_years() {
        assert_eq!(Horizon::from_years(3), Some(Horizon::ThreeYear));
        assert_eq!(Horizon::from_years(2), None);
        assert_eq!(Horizon::FiveYear.years(), 5);
        assert_eq!(serde_json::to_string(&Horizon::OneYear).unwrap(), "\"1yr\"");
    }
}
