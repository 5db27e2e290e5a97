//! Enrollment Projection CLI
//!
//! Command-line interface for running enrollment and revenue projections

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use enrollment_projection::{
    assumptions::{AssumptionOverrides, CadenceOverrides, PricingOverrides, RetentionOverrides},
    Horizon, ProjectionEngine, ScenarioRunner,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "enrollment_projection", version, about = "Project enrollment and tuition revenue by term")]
struct Cli {
    /// Directory holding seasonality.csv and priors.csv (defaults to built-in priors)
    #[arg(long)]
    priors: Option<PathBuf>,

    /// Projection horizon in years: 1, 3 or 5
    #[arg(long, default_value_t = 1)]
    years: u32,

    /// New students per year
    #[arg(long)]
    annual_starts: Option<u64>,

    #[arg(long)]
    tuition_per_credit: Option<f64>,

    #[arg(long)]
    credits_per_term: Option<u32>,

    #[arg(long)]
    entries_per_year: Option<u32>,

    #[arg(long)]
    term_length_weeks: Option<u32>,

    /// Comma-separated relative start weights, one per term
    #[arg(long, value_delimiter = ',')]
    seasonality: Option<Vec<f64>>,

    /// Term persistence prior
    #[arg(long)]
    persistence: Option<f64>,

    /// Observed school term persistence; takes precedence over the prior
    #[arg(long)]
    school_persistence: Option<f64>,

    /// Flat year-over-year growth for multi-year horizons
    #[arg(long)]
    yoy_growth: Option<f64>,

    /// Also report revenue deltas for the named sensitivity scenarios
    #[arg(long)]
    sensitivity: bool,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write the per-term table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> AssumptionOverrides {
        AssumptionOverrides {
            annual_starts: self.annual_starts,
            pricing: PricingOverrides {
                tuition_per_credit: self.tuition_per_credit,
                credits_per_term: self.credits_per_term,
            },
            cadence: CadenceOverrides {
                entries_per_year: self.entries_per_year,
                term_length_weeks: self.term_length_weeks,
                seasonality: self.seasonality.clone(),
            },
            retention: RetentionOverrides {
                term_persistence_prior: self.persistence,
                school_term_persistence: self.school_persistence,
            },
            yoy_growth: self.yoy_growth,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let horizon = Horizon::from_years(cli.years)
        .ok_or_else(|| anyhow!("--years must be 1, 3 or 5 (got {})", cli.years))?;

    let runner = match &cli.priors {
        Some(path) => ScenarioRunner::from_csv_path(path)
            .with_context(|| format!("loading priors from {}", path.display()))?,
        None => ScenarioRunner::new(),
    };
    let overrides = cli.overrides();

    let assumptions = runner
        .assumptions()
        .merged(&overrides)
        .context("invalid projection inputs")?;
    let engine = ProjectionEngine::new(assumptions);
    let result = engine.project(horizon)?;
    let sensitivity = if cli.sensitivity {
        Some(runner.sensitivity(horizon, &overrides)?)
    } else {
        None
    };

    if let Some(path) = &cli.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for row in &result.terms {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    if cli.json {
        let output = serde_json::json!({
            "projection": result,
            "sensitivity": sensitivity,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let inputs = &result.inputs_used;
    println!("Enrollment Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");
    println!("Inputs:");
    println!("  Annual Starts: {}", inputs.annual_starts);
    println!("  Terms/Year: {} x {} weeks", inputs.entries_per_year, inputs.term_length_weeks);
    println!("  Seasonality: {:?}", inputs.seasonality);
    println!("  Term Persistence: {:.4} (annual {:.2})", inputs.term_persistence, inputs.annual_persistence);
    println!("  Tuition: ${:.2}/credit x {} credits", inputs.tuition_per_credit, inputs.credits_per_term);
    println!();

    println!("Cohort Matrix (start term x observed term):");
    let baseline = engine.baseline_year()?;
    for (idx, row) in baseline.matrix.rows().iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| format!("{:>6}", c)).collect();
        println!("  T{:<3}{}", idx + 1, cells.join(""));
    }
    println!();

    println!("{:>5} {:>8} {:>8} {:>14}", "Term", "Starts", "Actives", "Revenue");
    println!("{}", "-".repeat(38));
    for row in &result.terms {
        println!("{:>5} {:>8} {:>8} {:>14.0}", row.term, row.starts, row.actives, row.revenue);
    }
    println!();

    println!("{:>5} {:>8} {:>12} {:>12} {:>14}", "Year", "Starts", "Actives Avg", "Completions", "Revenue");
    println!("{}", "-".repeat(55));
    for year in &result.yearly_totals.by_year {
        println!(
            "{:>5} {:>8} {:>12} {:>12} {:>14.0}",
            year.label, year.starts, year.actives_avg, year.completions, year.revenue_total
        );
    }
    println!("\nTotal Revenue ({} yr): ${:.0}", horizon.years(), result.revenue_total());
    println!("\n{}", result.explain);
    println!("Sources: {}", result.sources.join(", "));

    if let Some(report) = sensitivity {
        println!("\nSensitivity (baseline ${:.0}):", report.baseline_revenue_total);
        for scenario in &report.scenarios {
            println!(
                "  {:<16} {:>+14.0}  {}",
                scenario.label, scenario.delta_revenue_total, scenario.explain
            );
        }
    }

    if let Some(path) = &cli.csv {
        println!("\nPer-term results written to: {}", path.display());
    }

    Ok(())
}
