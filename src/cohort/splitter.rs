//! Allocation of annual starts across term slots

use log::debug;

use crate::assumptions::NormalizedSeasonality;
use crate::rounding::round_count;

/// Split `annual_starts` across terms by normalized seasonality.
///
/// Each term first gets `round(annual_starts * weight)` (ties to even). The
/// signed shortfall against `annual_starts` is then corrected one unit per
/// term, cycling through terms from the first. A term already at zero is
/// skipped when taking units away, so counts stay non-negative and the
/// result always sums to exactly `annual_starts`. Whole cycles are applied
/// in bulk, so the correction costs time in the number of terms rather than
/// the size of the shortfall.
pub fn split_starts(annual_starts: u64, seasonality: &NormalizedSeasonality) -> Vec<u64> {
    let weights = seasonality.weights();
    let terms = weights.len();
    if terms == 0 {
        return Vec::new();
    }

    let mut allocation: Vec<u64> = weights
        .iter()
        .map(|w| round_count(annual_starts as f64 * w))
        .collect();

    let provisional: u128 = allocation.iter().map(|&count| u128::from(count)).sum();
    let target = u128::from(annual_starts);
    if provisional == target {
        return allocation;
    }
    debug!(
        "Rounded start split totals {} against {} annual starts; correcting",
        provisional, annual_starts
    );

    if target > provisional {
        add_cyclic(&mut allocation, target - provisional);
    } else {
        remove_cyclic(&mut allocation, provisional - target);
    }

    allocation
}

/// Add `remaining` units one per term from the first, wrapping around.
/// The corrected total is `annual_starts`, so no single term can overflow.
fn add_cyclic(allocation: &mut [u64], remaining: u128) {
    let terms = allocation.len() as u128;
    let whole_cycles = (remaining / terms) as u64;
    let partial = (remaining % terms) as usize;

    for (slot, count) in allocation.iter_mut().enumerate() {
        *count += whole_cycles + u64::from(slot < partial);
    }
}

/// Take `remaining` units one per non-empty term from the first, wrapping around.
///
/// While the running sum exceeds `annual_starts >= 0` a positive term always
/// exists. Each bulk step either empties a term or leaves less than one full
/// cycle, so the loop runs at most `terms + 1` times.
fn remove_cyclic(allocation: &mut [u64], mut remaining: u128) {
    while remaining > 0 {
        let positive = allocation.iter().filter(|&&count| count > 0).count() as u128;
        let smallest = allocation.iter().copied().filter(|&count| count > 0).min().unwrap_or(0);
        if positive == 0 || remaining < positive {
            break;
        }

        let rounds = (remaining / positive).min(u128::from(smallest)) as u64;
        for count in allocation.iter_mut().filter(|count| **count > 0) {
            *count -= rounds;
        }
        remaining -= u128::from(rounds) * positive;
    }

    for count in allocation
        .iter_mut()
        .filter(|count| **count > 0)
        .take(remaining as usize)
    {
        *count -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::SeasonalityCurve;

    fn normalized(weights: &[f64]) -> NormalizedSeasonality {
        SeasonalityCurve::new(weights.to_vec()).normalize().unwrap()
    }

    /// One unit per step, cycling from term 1 and skipping empty terms on removal
    fn split_unit_by_unit(annual_starts: u64, seasonality: &NormalizedSeasonality) -> Vec<u64> {
        let mut allocation: Vec<u64> = seasonality
            .weights()
            .iter()
            .map(|w| round_count(annual_starts as f64 * w))
            .collect();
        let terms = allocation.len();
        let mut slot = 0;
        loop {
            let total: u64 = allocation.iter().sum();
            if total == annual_starts {
                return allocation;
            }
            let count = &mut allocation[slot % terms];
            if total < annual_starts {
                *count += 1;
            } else if *count > 0 {
                *count -= 1;
            }
            slot += 1;
        }
    }

    #[test]
    fn test_default_curve_120_starts() {
        let seasonality = SeasonalityCurve::default().normalize().unwrap();
        let starts = split_starts(120, &seasonality);

        // Provisional rounding gives [34, 26, 22, 17, 12, 10] = 121; one start comes off term 1
        assert_eq!(starts, vec![33, 26, 22, 17, 12, 10]);
        assert_eq!(starts.iter().sum::<u64>(), 120);
    }

    #[test]
    fn test_exact_sum_for_many_totals() {
        let curves: [&[f64]; 4] = [
            &[0.28, 0.22, 0.18, 0.14, 0.10, 0.08],
            &[1.0, 1.0, 1.0],
            &[0.05, 0.9, 0.05],
            &[7.0, 0.0, 3.0, 1.0, 0.0, 2.0, 5.0],
        ];

        for curve in curves {
            let seasonality = normalized(curve);
            for annual_starts in 0..=500 {
                let starts = split_starts(annual_starts, &seasonality);
                assert_eq!(starts.len(), curve.len());
                assert_eq!(
                    starts.iter().sum::<u64>(),
                    annual_starts,
                    "curve {:?} with {} starts gave {:?}",
                    curve,
                    annual_starts,
                    starts
                );
            }
        }
    }

    #[test]
    fn test_negative_correction_skips_empty_terms() {
        // Provisional [0, 2, 2, 7] = 11 for 10 starts; term 1 has nothing to give
        let seasonality = normalized(&[0.0, 0.16, 0.16, 0.68]);
        let starts = split_starts(10, &seasonality);

        assert_eq!(starts, vec![0, 1, 2, 7]);
    }

    #[test]
    fn test_correction_cycles_from_first_term() {
        // 1/3 each: 1 start rounds to [0, 0, 0]
        let seasonality = normalized(&[1.0, 1.0, 1.0]);
        assert_eq!(split_starts(1, &seasonality), vec![1, 0, 0]);
        // 2 starts round to [1, 1, 1]; the surplus comes off term 1
        assert_eq!(split_starts(2, &seasonality), vec![0, 1, 1]);
    }

    #[test]
    fn test_zero_starts() {
        let seasonality = SeasonalityCurve::default().normalize().unwrap();
        assert_eq!(split_starts(0, &seasonality), vec![0; 6]);
    }

    #[test]
    fn test_bulk_correction_matches_unit_steps() {
        let curves: [&[f64]; 3] = [
            &[1.0; 7],
            &[0.0, 0.16, 0.16, 0.68],
            &[7.0, 0.0, 3.0, 1.0, 0.0, 2.0, 5.0],
        ];

        for curve in curves {
            let seasonality = normalized(curve);
            for annual_starts in 0..=2_000 {
                assert_eq!(
                    split_starts(annual_starts, &seasonality),
                    split_unit_by_unit(annual_starts, &seasonality),
                    "curve {:?} with {} starts",
                    curve,
                    annual_starts
                );
            }
        }
    }

    #[test]
    fn test_large_shortfall_corrects_in_bulk() {
        // 1/7 rounds to 0.1429, so the provisional split overshoots by 3e9 starts
        let seasonality = normalized(&[1.0; 7]);
        let starts = split_starts(10_000_000_000_000, &seasonality);

        assert_eq!(starts[..4], [1_428_571_428_571; 4]);
        assert_eq!(starts[4..], [1_428_571_428_572; 3]);
        assert_eq!(starts.iter().sum::<u64>(), 10_000_000_000_000);
    }

    #[test]
    fn test_max_starts_do_not_overflow() {
        let seasonality = SeasonalityCurve::default().normalize().unwrap();
        let starts = split_starts(u64::MAX, &seasonality);

        let total: u128 = starts.iter().map(|&c| u128::from(c)).sum();
        assert_eq!(total, u128::from(u64::MAX));
    }
}
