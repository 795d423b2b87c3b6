//! Parameter-grid fan-out over the rayon pool.
//!
//! The unit of parallel work is one parameter tuple. Every task reads the
//! shared immutable log end-to-end and returns a single `(key, value)` pair;
//! results are merged into the owning table only after the whole batch
//! completes (`collect` is the fan-in barrier). No task mutates shared state.

use std::hash::Hash;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::log::EventLog;

/// Run `scan` once per parameter tuple on the rayon pool and merge the
/// results into a table. Tuple ordering is irrelevant; keys are unique by
/// construction of the grids below.
pub(crate) fn fan_out<P, K, V, F>(params: Vec<P>, scan: F) -> FxHashMap<K, V>
where
    P: Send + Sync,
    K: Eq + Hash + Send,
    V: Send,
    F: Fn(&P) -> (K, V) + Send + Sync,
{
    params
        .par_iter()
        .map(|p| scan(p))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// The cartesian product windows x causes x effects, in window-major order.
pub(crate) fn pair_grid<'a>(
    log: &'a EventLog,
    windows: &[usize],
) -> Vec<(usize, &'a str, &'a str)> {
    let mut grid = Vec::new();
    for &w in windows {
        for cause in log.cause_labels() {
            for effect in log.effect_labels() {
                grid.push((w, cause.as_str(), effect.as_str()));
            }
        }
    }
    grid
}

/// The cartesian product windows x causes (per-label aggregates).
pub(crate) fn label_grid<'a>(log: &'a EventLog, windows: &[usize]) -> Vec<(usize, &'a str)> {
    let mut grid = Vec::new();
    for &w in windows {
        for cause in log.cause_labels() {
            grid.push((w, cause.as_str()));
        }
    }
    grid
}

/// Every label of both universes, cause labels first.
pub(crate) fn universe<'a>(log: &'a EventLog) -> Vec<&'a str> {
    log.cause_labels()
        .iter()
        .chain(log.effect_labels().iter())
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{EventRecord, LabelSet};

    fn small_log() -> EventLog {
        EventLog::from_records(vec![
            EventRecord {
                causes: LabelSet::parse("a, b"),
                effects: LabelSet::parse("x"),
                duration: 1.0,
            },
            EventRecord {
                causes: LabelSet::parse("a"),
                effects: LabelSet::parse("y"),
                duration: 1.0,
            },
        ])
    }

    #[test]
    fn test_pair_grid_is_window_major() {
        let log = small_log();
        let grid = pair_grid(&log, &[1, 2]);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid[0], (1, "a", "x"));
        assert_eq!(grid[4], (2, "a", "x"));
    }

    #[test]
    fn test_fan_out_merges_all_tuples() {
        let grid: Vec<usize> = (0..100).collect();
        let table = fan_out(grid, |&i| (i, i * 2));
        assert_eq!(table.len(), 100);
        assert_eq!(table[&21], 42);
    }
}
