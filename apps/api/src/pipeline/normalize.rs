//! Time-Budget Normalizer: makes every scheduled day add up to the daily budget.
//!
//! Algorithm, per day:
//! 1. Empty day → stays empty.
//! 2. `scale = target / sum(hours)`.
//! 3. Every block × `scale`, rounded to `decimals`, floored at `min_block_hours`.
//! 4. If the rounded sum is off by `tolerance` or more, the LAST block absorbs the
//!    difference (`target − sum(others)`, floored at `min_block_hours`).
//!
//! Always the last block, never the first or a random one, so output is reproducible.
//! Inputs are never mutated; new day sequences are built.

use contracts::{DaySchedule, Plan, TimeBlock};
use tracing::{debug, warn};

/// Float noise allowed when comparing a deviation against the tolerance.
const DEVIATION_EPSILON: f64 = 1e-9;

/// Knobs for the normalizer. Defaults: 0.01 tolerance, 0.1 h floor, 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    pub tolerance: f64,
    pub min_block_hours: f64,
    pub decimals: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_block_hours: 0.1,
            decimals: 2,
        }
    }
}

impl NormalizerConfig {
    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals as i32);
        (value * factor).round() / factor
    }
}

/// Returns a copy of `plan` whose time blocks sum to `target_hours` per day.
pub fn normalize_plan(plan: &Plan, target_hours: f64, config: &NormalizerConfig) -> Plan {
    Plan {
        time_blocks: normalize_schedule(&plan.time_blocks, target_hours, config),
        ..plan.clone()
    }
}

pub fn normalize_schedule(
    schedule: &DaySchedule,
    target_hours: f64,
    config: &NormalizerConfig,
) -> DaySchedule {
    schedule
        .iter()
        .map(|(day, blocks)| {
            let normalized = normalize_day(blocks, target_hours, config);
            if normalized != *blocks {
                debug!("Normalized {day}: {} blocks to {target_hours}h", blocks.len());
            }
            (*day, normalized)
        })
        .collect()
}

/// Rescales one day's blocks so their durations sum to `target_hours`.
pub fn normalize_day(
    blocks: &[TimeBlock],
    target_hours: f64,
    config: &NormalizerConfig,
) -> Vec<TimeBlock> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let current: f64 = blocks.iter().map(|b| b.hours).sum();
    let mut scaled: Vec<f64> = if current > 0.0 {
        let scale = target_hours / current;
        blocks.iter().map(|b| b.hours * scale).collect()
    } else {
        // Schema forbids non-positive durations; split evenly if one slips through.
        vec![target_hours / blocks.len() as f64; blocks.len()]
    };
    for hours in scaled.iter_mut() {
        *hours = config.round(*hours).max(config.min_block_hours);
    }

    let sum: f64 = scaled.iter().sum();
    if (target_hours - sum).abs() + DEVIATION_EPSILON >= config.tolerance {
        let last = scaled.len() - 1;
        let others: f64 = scaled[..last].iter().sum();
        let corrected = config.round(target_hours - others);
        if corrected < config.min_block_hours {
            warn!(
                "Cannot fit {} blocks into {target_hours}h; last block floored at {}h",
                blocks.len(),
                config.min_block_hours
            );
        }
        scaled[last] = corrected.max(config.min_block_hours);
    }

    blocks
        .iter()
        .zip(scaled)
        .map(|(block, hours)| TimeBlock {
            label: block.label.clone(),
            hours,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use contracts::Weekday;
    use proptest::prelude::*;

    use super::*;

    fn blocks(hours: &[f64]) -> Vec<TimeBlock> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| TimeBlock {
                label: format!("block {i}"),
                hours: *h,
            })
            .collect()
    }

    fn hours(blocks: &[TimeBlock]) -> Vec<f64> {
        blocks.iter().map(|b| b.hours).collect()
    }

    fn total(blocks: &[TimeBlock]) -> f64 {
        blocks.iter().map(|b| b.hours).sum()
    }

    #[test]
    fn test_equal_thirds_correct_last_block() {
        let out = normalize_day(&blocks(&[1.0, 1.0, 1.0]), 2.5, &NormalizerConfig::default());
        assert_eq!(hours(&out), vec![0.83, 0.83, 0.84]);
        assert!((total(&out) - 2.5).abs() < 0.01);
    }

    #[test]
    fn test_empty_day_stays_empty() {
        assert!(normalize_day(&[], 3.0, &NormalizerConfig::default()).is_empty());
    }

    #[test]
    fn test_labels_and_order_preserved() {
        let input = blocks(&[2.0, 1.0]);
        let out = normalize_day(&input, 1.5, &NormalizerConfig::default());
        assert_eq!(out[0].label, "block 0");
        assert_eq!(out[1].label, "block 1");
        assert_eq!(hours(&out), vec![1.0, 0.5]);
    }

    #[test]
    fn test_single_block_takes_whole_budget() {
        let out = normalize_day(&blocks(&[0.4]), 3.25, &NormalizerConfig::default());
        assert_eq!(hours(&out), vec![3.25]);
    }

    #[test]
    fn test_tiny_blocks_floored() {
        let out = normalize_day(&blocks(&[0.01, 0.01, 10.0]), 1.0, &NormalizerConfig::default());
        assert_eq!(hours(&out), vec![0.1, 0.1, 0.8]);
    }

    #[test]
    fn test_custom_tolerance_skips_small_corrections() {
        let config = NormalizerConfig {
            tolerance: 0.05,
            ..NormalizerConfig::default()
        };
        let out = normalize_day(&blocks(&[1.0, 1.0, 1.0]), 2.5, &config);
        assert_eq!(hours(&out), vec![0.83, 0.83, 0.83]);
    }

    #[test]
    fn test_zero_durations_split_evenly() {
        let out = normalize_day(&blocks(&[0.0, 0.0]), 3.0, &NormalizerConfig::default());
        assert_eq!(hours(&out), vec![1.5, 1.5]);
    }

    #[test]
    fn test_normalize_plan_does_not_mutate_input() {
        let mut time_blocks = BTreeMap::new();
        time_blocks.insert(Weekday::Mon, blocks(&[1.0, 3.0]));
        time_blocks.insert(Weekday::Tue, Vec::new());
        let plan = Plan {
            week_of: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time_blocks,
            daily_tasks: BTreeMap::new(),
            milestones: vec![],
            resources: vec![],
            version: 4,
        };
        let snapshot = plan.clone();

        let out = normalize_plan(&plan, 2.0, &NormalizerConfig::default());

        assert_eq!(plan, snapshot);
        assert_eq!(hours(&out.time_blocks[&Weekday::Mon]), vec![0.5, 1.5]);
        assert!(out.time_blocks[&Weekday::Tue].is_empty());
        assert_eq!(out.version, 4);
    }

    /// Durations and budgets for which every block can stay above the floor.
    fn feasible_day() -> impl Strategy<Value = (Vec<f64>, f64)> {
        prop::collection::vec(1.0f64..4.0, 1..=8).prop_flat_map(|durations| {
            let min_target = durations.len() as f64;
            (Just(durations), min_target..16.0)
        })
    }

    proptest! {
        #[test]
        fn prop_sum_matches_target((durations, target) in feasible_day()) {
            let config = NormalizerConfig::default();
            let out = normalize_day(&blocks(&durations), target, &config);
            prop_assert_eq!(out.len(), durations.len());
            prop_assert!((total(&out) - target).abs() < config.tolerance);
            for block in &out {
                prop_assert!(block.hours >= config.min_block_hours);
            }
        }

        #[test]
        fn prop_normalizing_twice_is_a_no_op((durations, target) in feasible_day()) {
            let config = NormalizerConfig::default();
            let once = normalize_day(&blocks(&durations), target, &config);
            let twice = normalize_day(&once, target, &config);
            for (a, b) in once.iter().zip(&twice) {
                // Equal up to one rounding step.
                prop_assert!((a.hours - b.hours).abs() <= config.tolerance + 1e-9);
            }
            prop_assert!((total(&twice) - target).abs() < config.tolerance);
        }

        #[test]
        fn prop_all_but_last_keep_scaled_proportions((durations, target) in feasible_day()) {
            let config = NormalizerConfig::default();
            let out = normalize_day(&blocks(&durations), target, &config);
            let scale = target / durations.iter().sum::<f64>();
            let last = out.len() - 1;
            for (block, d) in out[..last].iter().zip(&durations) {
                prop_assert!((block.hours - config.round(d * scale)).abs() < 1e-9);
            }
        }
    }
}
