//! Joint-strength (CIRM) accumulator.
//!
//! Extends the CIRC pair of tables with a conditioning gate: an anchor only
//! contributes when the conditioning label `z` (or every label of a subset
//! `Z`) also occurs somewhere in the same backward window. Which column a
//! conditioning label is matched against is resolved once at construction:
//! the cause column if the label ever occurs there, the effect column
//! otherwise.
//!
//! Open modeling point: a conditioning label equal to the cause label is not
//! special-cased. The complement gate ("cause absent but z present") is then
//! unsatisfiable and the per-z ratio degrades to zero through the usual
//! denominator guard.

use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::catalog::ConditioningCatalog;
use crate::errors::LogError;
use crate::log::{Column, EventLog, LogConfig};
use crate::stats::{grid, BaseStats, CondKey, SubsetKey};
use crate::window::{backward_anchors, backward_window, matching_duration_sum, window_contains};

/// Aggregates for the CIRM score: CIRC-shaped joint/complement duration
/// sums, further split per conditioning label and per non-empty subset of
/// each effect's conditioning list.
#[derive(Debug, Clone)]
pub struct CirmAccumulator {
    log: EventLog,
    base: BaseStats,
    catalog: ConditioningCatalog,
    single_joint: FxHashMap<CondKey, f64>,
    single_complement: FxHashMap<CondKey, f64>,
    subset_joint: FxHashMap<SubsetKey, f64>,
    subset_complement: FxHashMap<SubsetKey, f64>,
}

impl CirmAccumulator {
    /// Load a log table and eagerly compute every aggregate for the given
    /// window sizes. The catalog must already be loaded; a missing catalog
    /// file is a caller-level precondition surfaced by
    /// [`ConditioningCatalog::from_json_path`].
    pub fn construct(
        path: impl AsRef<Path>,
        config: &LogConfig,
        windows: &[usize],
        catalog: ConditioningCatalog,
    ) -> Result<Self, LogError> {
        Ok(Self::from_log(
            EventLog::from_csv_path(path, config)?,
            windows,
            catalog,
        ))
    }

    /// Build from an already-parsed log.
    pub fn from_log(log: EventLog, windows: &[usize], catalog: ConditioningCatalog) -> Self {
        let start = Instant::now();
        let base = BaseStats::compute(&log, windows);

        // Resolve each conditioning label's column exactly once.
        let columns: FxHashMap<&str, Column> = catalog
            .all_labels()
            .map(|z| (z, log.resolve_column(z)))
            .collect();

        let single_grid = single_grid(&log, windows, &catalog);
        let subset_grid = subset_grid(&log, windows, &catalog);
        tracing::debug!(
            single_tuples = single_grid.len(),
            subset_tuples = subset_grid.len(),
            "dispatching CIRM parameter grid"
        );

        let single_joint = grid::fan_out(single_grid.clone(), |&(w, cause, effect, z)| {
            let gate = [(z, columns[z])];
            (
                (w, cause.to_string(), effect.to_string(), z.to_string()),
                scan_joint(&log, w, cause, effect, &gate),
            )
        });
        let single_complement = grid::fan_out(single_grid, |&(w, cause, effect, z)| {
            let gate = [(z, columns[z])];
            (
                (w, cause.to_string(), effect.to_string(), z.to_string()),
                scan_complement(&log, w, cause, effect, &gate),
            )
        });

        let subset_joint = grid::fan_out(subset_grid.clone(), |&(w, cause, effect, zs)| {
            let gate: Vec<(&str, Column)> =
                zs.iter().map(|z| (z.as_str(), columns[z.as_str()])).collect();
            (
                (w, cause.to_string(), effect.to_string(), zs.clone()),
                scan_joint(&log, w, cause, effect, &gate),
            )
        });
        let subset_complement = grid::fan_out(subset_grid, |&(w, cause, effect, zs)| {
            let gate: Vec<(&str, Column)> =
                zs.iter().map(|z| (z.as_str(), columns[z.as_str()])).collect();
            (
                (w, cause.to_string(), effect.to_string(), zs.clone()),
                scan_complement(&log, w, cause, effect, &gate),
            )
        });

        tracing::debug!(
            tuples = single_joint.len() * 2 + subset_joint.len() * 2,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built CIRM accumulator"
        );

        Self {
            log,
            base,
            catalog,
            single_joint,
            single_complement,
            subset_joint,
            subset_complement,
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    pub fn catalog(&self) -> &ConditioningCatalog {
        &self.catalog
    }

    /// Cause-matching duration sum over backward windows where the effect
    /// anchors, the cause occurs, and `z` occurs.
    pub fn single_joint_sum(&self, cause: &str, effect: &str, z: &str, window: usize) -> f64 {
        self.single_joint
            .get(&(window, cause.to_string(), effect.to_string(), z.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Anchor-duration sum where the effect anchors, the cause is absent
    /// from the window, and `z` occurs.
    pub fn single_complement_sum(&self, cause: &str, effect: &str, z: &str, window: usize) -> f64 {
        self.single_complement
            .get(&(window, cause.to_string(), effect.to_string(), z.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Joint sum gated on every label of `zs` occurring in the window.
    pub fn subset_joint_sum(
        &self,
        cause: &str,
        effect: &str,
        zs: &[String],
        window: usize,
    ) -> f64 {
        self.subset_joint
            .get(&(window, cause.to_string(), effect.to_string(), zs.to_vec()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Complement sum gated on every label of `zs` occurring in the window.
    pub fn subset_complement_sum(
        &self,
        cause: &str,
        effect: &str,
        zs: &[String],
        window: usize,
    ) -> f64 {
        self.subset_complement
            .get(&(window, cause.to_string(), effect.to_string(), zs.to_vec()))
            .copied()
            .unwrap_or(0.0)
    }
}

fn single_grid<'a>(
    log: &'a EventLog,
    windows: &[usize],
    catalog: &'a ConditioningCatalog,
) -> Vec<(usize, &'a str, &'a str, &'a str)> {
    let mut grid = Vec::new();
    for &w in windows {
        for cause in log.cause_labels() {
            for effect in log.effect_labels() {
                for z in catalog.list(effect) {
                    grid.push((w, cause.as_str(), effect.as_str(), z.as_str()));
                }
            }
        }
    }
    grid
}

fn subset_grid<'a>(
    log: &'a EventLog,
    windows: &[usize],
    catalog: &'a ConditioningCatalog,
) -> Vec<(usize, &'a str, &'a str, &'a Vec<String>)> {
    let mut grid = Vec::new();
    for &w in windows {
        for cause in log.cause_labels() {
            for effect in log.effect_labels() {
                for zs in catalog.subsets(effect) {
                    grid.push((w, cause.as_str(), effect.as_str(), zs));
                }
            }
        }
    }
    grid
}

/// Backward joint sum gated on a conjunction of conditioning labels: every
/// label must occur somewhere in the window, each in its own column. The gate
/// is a conjunction of per-label window matches, not co-timing at one
/// position.
fn scan_joint(log: &EventLog, w: usize, cause: &str, effect: &str, gate: &[(&str, Column)]) -> f64 {
    backward_anchors(log.len(), w)
        .filter(|&i| log.labels(i, Column::Effect).contains(effect))
        .filter(|&i| window_contains(log, backward_window(i, w), Column::Cause, cause))
        .filter(|&i| {
            gate.iter()
                .all(|&(z, col)| window_contains(log, backward_window(i, w), col, z))
        })
        .map(|i| matching_duration_sum(log, backward_window(i, w), Column::Cause, cause))
        .sum()
}

/// Complement counterpart: cause absent from the window, every conditioning
/// label present; the anchor record's own duration is accumulated.
fn scan_complement(
    log: &EventLog,
    w: usize,
    cause: &str,
    effect: &str,
    gate: &[(&str, Column)],
) -> f64 {
    backward_anchors(log.len(), w)
        .filter(|&i| log.labels(i, Column::Effect).contains(effect))
        .filter(|&i| !window_contains(log, backward_window(i, w), Column::Cause, cause))
        .filter(|&i| {
            gate.iter()
                .all(|&(z, col)| window_contains(log, backward_window(i, w), col, z))
        })
        .map(|i| log.duration(i))
        .sum()
}
