//! Overlapping-cohort decay
//!
//! Every term's active population is the superposition of all earlier
//! cohorts still retained. Row `i` of the matrix is the cohort that started
//! in term `i`; column `k` is what is observed in term `k`.

use serde::Serialize;

use crate::assumptions::clamp_persistence;
use crate::rounding::round_count;

/// Start-term × observed-term head counts for one projection year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortMatrix {
    rows: Vec<Vec<u64>>,
}

impl CohortMatrix {
    /// Decay each cohort geometrically from its start term.
    ///
    /// The cohort carries a running real size multiplied by the persistence
    /// once per elapsed term; each cell is that running size rounded (ties to
    /// even). Cells before the start term are zero. Persistence is clamped to
    /// `[0, 0.9999]`.
    pub fn build(starts: &[u64], term_persistence: f64) -> Self {
        let persistence = clamp_persistence(term_persistence);
        let terms = starts.len();

        let rows = starts
            .iter()
            .enumerate()
            .map(|(start_term, &size)| {
                let mut row = vec![0; terms];
                let mut remaining = size as f64;
                for cell in row.iter_mut().skip(start_term) {
                    *cell = round_count(remaining);
                    remaining *= persistence;
                }
                row
            })
            .collect();

        Self { rows }
    }

    pub fn term_count(&self) -> usize {
        self.rows.len()
    }

    /// Head count of the `start_term` cohort observed in `observed_term` (0-indexed)
    pub fn get(&self, start_term: usize, observed_term: usize) -> u64 {
        self.rows
            .get(start_term)
            .and_then(|row| row.get(observed_term))
            .copied()
            .unwrap_or(0)
    }

    /// One cohort across every term of the year, `None` past the last start term
    pub fn row(&self, start_term: usize) -> Option<&[u64]> {
        self.rows.get(start_term).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Active students per term: column sums over all cohorts
    pub fn actives(&self) -> Vec<u64> {
        let mut actives = vec![0; self.term_count()];
        for row in &self.rows {
            for (total, &count) in actives.iter_mut().zip(row) {
                *total += count;
            }
        }
        actives
    }
}

/// Build the cohort matrix and its per-term actives in one call
pub fn project_actives(starts: &[u64], term_persistence: f64) -> (CohortMatrix, Vec<u64>) {
    let matrix = CohortMatrix::build(starts, term_persistence);
    let actives = matrix.actives();
    (matrix, actives)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_STARTS: [u64; 6] = [33, 26, 22, 17, 12, 10];

    #[test]
    fn test_default_year_actives() {
        let (matrix, actives) = project_actives(&DEFAULT_STARTS, 0.88);

        assert_eq!(matrix.term_count(), 6);
        assert_eq!(matrix.row(0), Some(&[33, 29, 26, 22, 20, 17][..]));
        assert_eq!(matrix.row(6), None);
        assert_eq!(matrix.get(6, 0), 0);
        assert_eq!(&actives[..3], &[33, 55, 71]);
        assert_eq!(actives[5], 82);
        assert!(actives[5] < DEFAULT_STARTS.iter().sum::<u64>());
    }

    #[test]
    fn test_no_cohort_before_its_start() {
        let (matrix, _) = project_actives(&DEFAULT_STARTS, 0.88);
        for start_term in 0..6 {
            for observed_term in 0..start_term {
                assert_eq!(matrix.get(start_term, observed_term), 0);
            }
            assert_eq!(matrix.get(start_term, start_term), DEFAULT_STARTS[start_term]);
        }
    }

    #[test]
    fn test_rows_never_increase() {
        for persistence in [0.0, 0.3, 0.5, 0.88, 0.9999, 1.2] {
            let matrix = CohortMatrix::build(&[1000, 7, 1, 0, 250, 3], persistence);
            for row in matrix.rows() {
                for pair in row.windows(2) {
                    if pair[0] > 0 {
                        assert!(pair[1] <= pair[0], "row {:?} grew at p={}", row, persistence);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_persistence_leaves_only_new_starts() {
        let (matrix, actives) = project_actives(&DEFAULT_STARTS, 0.0);

        assert_eq!(actives, DEFAULT_STARTS.to_vec());
        for start_term in 0..6 {
            for observed_term in (start_term + 1)..6 {
                assert_eq!(matrix.get(start_term, observed_term), 0);
            }
        }
    }

    #[test]
    fn test_actives_are_column_sums() {
        let (matrix, actives) = project_actives(&[5, 9, 2], 0.7);
        for (term, &active) in actives.iter().enumerate() {
            let column: u64 = (0..3).map(|i| matrix.get(i, term)).sum();
            assert_eq!(active, column);
        }
    }

    #[test]
    fn test_empty_year() {
        let (matrix, actives) = project_actives(&[], 0.88);
        assert_eq!(matrix.term_count(), 0);
        assert!(actives.is_empty());
    }
}
