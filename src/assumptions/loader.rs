//! CSV-based priors loader
//!
//! Loads enrollment priors from CSV files in data/priors/:
//! - `seasonality.csv` with columns `term,weight`
//! - `priors.csv` with columns `key,value`

use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use super::{Assumptions, SeasonalityCurve};
use crate::error::LoadError;

/// Default path to priors directory
pub const DEFAULT_PRIORS_PATH: &str = "data/priors";

const SEASONALITY_FILE: &str = "seasonality.csv";
const PRIORS_FILE: &str = "priors.csv";

#[derive(Debug, Deserialize)]
struct SeasonalityRow {
    term: u32,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct PriorRow {
    key: String,
    value: String,
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load seasonality weights ordered by term number
pub fn load_seasonality(path: &Path) -> Result<Vec<f64>, LoadError> {
    let file = open(&path.join(SEASONALITY_FILE))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: SeasonalityRow = result?;
        rows.push(row);
    }
    rows.sort_by_key(|r| r.term);

    Ok(rows.into_iter().map(|r| r.weight).collect())
}

/// Load raw key/value priors; later rows win on duplicate keys
pub fn load_prior_values(path: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    let file = open(&path.join(PRIORS_FILE))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut values = BTreeMap::new();
    for result in reader.deserialize() {
        let row: PriorRow = result?;
        values.insert(row.key, row.value);
    }

    Ok(values)
}

/// Raw contents of a priors directory
#[derive(Debug, Clone, Default)]
pub struct LoadedPriors {
    pub seasonality: Vec<f64>,
    pub values: BTreeMap<String, String>,
}

impl LoadedPriors {
    /// Load all priors from the default path
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_from(Path::new(DEFAULT_PRIORS_PATH))
    }

    /// Load all priors from a specific path
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        let priors = Self {
            seasonality: load_seasonality(path)?,
            values: load_prior_values(path)?,
        };
        info!(
            "Loaded {} seasonality weights and {} priors from {}",
            priors.seasonality.len(),
            priors.values.len(),
            path.display()
        );
        Ok(priors)
    }

    /// Layer the loaded priors over `base`. Unknown keys are ignored with a warning.
    pub fn apply_to(&self, mut base: Assumptions) -> Result<Assumptions, LoadError> {
        if !self.seasonality.is_empty() {
            base.cadence.seasonality = SeasonalityCurve::new(self.seasonality.clone());
        }

        for (key, value) in &self.values {
            match key.as_str() {
                "annual_starts" => base.annual_starts = parse_value(key, value)?,
                "tuition_per_credit" => base.pricing.tuition_per_credit = parse_value(key, value)?,
                "credits_per_term" => base.pricing.credits_per_term = parse_value(key, value)?,
                "entries_per_year" => base.cadence.entries_per_year = parse_value(key, value)?,
                "term_length_weeks" => base.cadence.term_length_weeks = parse_value(key, value)?,
                "term_persistence_prior" => {
                    base.retention.term_persistence_prior = parse_value(key, value)?
                }
                "school_term_persistence" => {
                    base.retention.school_term_persistence = Some(parse_value(key, value)?)
                }
                "yoy_growth" => base.yoy_growth = parse_value(key, value)?,
                "sources" => {
                    base.sources = value
                        .split(';')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                }
                other => warn!("Ignoring unknown prior {:?}", other),
            }
        }

        Ok(base)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
