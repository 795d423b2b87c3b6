//! Window-independent and window-counting base statistics.
//!
//! Every table is computed eagerly at accumulator construction via one
//! independent full-log scan per parameter tuple, dispatched through the
//! grid in [`grid`]. Tables are immutable after construction; absent keys
//! read as zero through the accessors.

pub(crate) mod grid;

use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::log::{Column, EventLog};
use crate::window::{
    backward_anchors, backward_window, forward_anchors, forward_window, window_contains,
};

/// Key for per-(window, cause, effect) aggregates.
pub type PairKey = (usize, String, String);
/// Key for per-(window, label) aggregates.
pub type LabelKey = (usize, String);
/// Key for per-(window, cause, effect, conditioning-label) aggregates.
pub type CondKey = (usize, String, String, String);
/// Key for per-(window, cause, effect, conditioning-subset) aggregates.
pub type SubsetKey = (usize, String, String, Vec<String>);

/// Aggregates that do not depend on a conditioning variable: co-occurrence
/// counts, window occupancy, global counts, probabilities, and per-label
/// duration totals. Shared by all four variant accumulators.
#[derive(Debug, Clone)]
pub struct BaseStats {
    /// `Nw(cause <- effect)`: anchors where the effect occurs and the cause
    /// occurred somewhere in the backward window.
    necessity: FxHashMap<PairKey, u64>,
    /// `Nw(cause -> effect)`: anchors where the cause occurs and the effect
    /// occurs somewhere in the forward window.
    sufficiency: FxHashMap<PairKey, u64>,
    /// `Dw(label)`: window start positions whose window contains the label
    /// in the cause column.
    occupancy: FxHashMap<LabelKey, u64>,
    /// `N(label)`: records containing the label, in whichever column the
    /// label lives.
    count: FxHashMap<String, u64>,
    /// `p(label) = N(label) / T`.
    probability: FxHashMap<String, f64>,
    /// Total duration of records carrying the label in the cause column.
    cause_duration_total: FxHashMap<String, f64>,
    /// Total duration of records carrying the label in the effect column.
    effect_duration_total: FxHashMap<String, f64>,
    /// Sequence length `T`.
    len: usize,
}

impl BaseStats {
    /// Compute all base tables for the given window sizes.
    pub fn compute(log: &EventLog, windows: &[usize]) -> Self {
        let start = Instant::now();
        let t = log.len();

        let necessity = grid::fan_out(grid::pair_grid(log, windows), |&(w, cause, effect)| {
            (
                (w, cause.to_string(), effect.to_string()),
                scan_necessity(log, w, cause, effect),
            )
        });

        let sufficiency = grid::fan_out(grid::pair_grid(log, windows), |&(w, cause, effect)| {
            (
                (w, cause.to_string(), effect.to_string()),
                scan_sufficiency(log, w, cause, effect),
            )
        });

        let occupancy = grid::fan_out(grid::label_grid(log, windows), |&(w, label)| {
            ((w, label.to_string()), scan_occupancy(log, w, label))
        });

        let count = grid::fan_out(grid::universe(log), |&label| {
            let column = log.resolve_column(label);
            let n = (0..t)
                .filter(|&i| log.labels(i, column).contains(label))
                .count() as u64;
            (label.to_string(), n)
        });

        let probability = count
            .iter()
            .map(|(label, &n)| {
                let p = if t > 0 { n as f64 / t as f64 } else { 0.0 };
                (label.clone(), p)
            })
            .collect();

        let cause_duration_total = grid::fan_out(grid::universe(log), |&label| {
            (label.to_string(), log.duration_total(Column::Cause, label))
        });
        let effect_duration_total = grid::fan_out(grid::universe(log), |&label| {
            (label.to_string(), log.duration_total(Column::Effect, label))
        });

        tracing::debug!(
            records = t,
            windows = windows.len(),
            pairs = log.cause_labels().len() * log.effect_labels().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "computed base statistics"
        );

        Self {
            necessity,
            sufficiency,
            occupancy,
            count,
            probability,
            cause_duration_total,
            effect_duration_total,
            len: t,
        }
    }

    /// Sequence length `T`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn necessity(&self, cause: &str, effect: &str, window: usize) -> u64 {
        lookup_pair(&self.necessity, cause, effect, window)
    }

    pub fn sufficiency(&self, cause: &str, effect: &str, window: usize) -> u64 {
        lookup_pair(&self.sufficiency, cause, effect, window)
    }

    pub fn occupancy(&self, label: &str, window: usize) -> u64 {
        self.occupancy
            .get(&(window, label.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn count(&self, label: &str) -> u64 {
        self.count.get(label).copied().unwrap_or(0)
    }

    pub fn probability(&self, label: &str) -> f64 {
        self.probability.get(label).copied().unwrap_or(0.0)
    }

    /// `pw(cause <- effect) = Nw(cause <- effect) / T`.
    pub fn pw_backward(&self, cause: &str, effect: &str, window: usize) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.necessity(cause, effect, window) as f64 / self.len as f64
    }

    /// `pw(cause -> effect) = Nw(cause -> effect) / T`.
    pub fn pw_forward(&self, cause: &str, effect: &str, window: usize) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.sufficiency(cause, effect, window) as f64 / self.len as f64
    }

    /// Total duration of records carrying `label` in the cause column.
    pub fn cause_duration_total(&self, label: &str) -> f64 {
        self.cause_duration_total.get(label).copied().unwrap_or(0.0)
    }

    /// Total duration of records carrying `label` in the effect column.
    pub fn effect_duration_total(&self, label: &str) -> f64 {
        self.effect_duration_total.get(label).copied().unwrap_or(0.0)
    }
}

fn lookup_pair(table: &FxHashMap<PairKey, u64>, cause: &str, effect: &str, window: usize) -> u64 {
    table
        .get(&(window, cause.to_string(), effect.to_string()))
        .copied()
        .unwrap_or(0)
}

fn scan_necessity(log: &EventLog, w: usize, cause: &str, effect: &str) -> u64 {
    backward_anchors(log.len(), w)
        .filter(|&i| {
            log.labels(i, Column::Effect).contains(effect)
                && window_contains(log, backward_window(i, w), Column::Cause, cause)
        })
        .count() as u64
}

fn scan_sufficiency(log: &EventLog, w: usize, cause: &str, effect: &str) -> u64 {
    forward_anchors(log.len(), w)
        .filter(|&i| {
            log.labels(i, Column::Cause).contains(cause)
                && window_contains(log, forward_window(i, w), Column::Effect, effect)
        })
        .count() as u64
}

fn scan_occupancy(log: &EventLog, w: usize, label: &str) -> u64 {
    forward_anchors(log.len(), w)
        .filter(|&i| window_contains(log, forward_window(i, w), Column::Cause, label))
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{EventRecord, LabelSet};

    // The reference fixture: causes [A, "", A, B, A], effects ["", E, E, "", E],
    // durations [1, 2, 3, 4, 5].
    fn fixture() -> EventLog {
        let rows = [
            ("A", "", 1.0),
            ("", "E", 2.0),
            ("A", "E", 3.0),
            ("B", "", 4.0),
            ("A", "E", 5.0),
        ];
        EventLog::from_records(
            rows.iter()
                .map(|&(c, e, d)| EventRecord {
                    causes: LabelSet::parse(c),
                    effects: LabelSet::parse(e),
                    duration: d,
                })
                .collect(),
        )
    }

    #[test]
    fn test_necessity_fixture() {
        let stats = BaseStats::compute(&fixture(), &[2]);
        assert_eq!(stats.necessity("A", "E", 2), 3);
        assert_eq!(stats.necessity("B", "E", 2), 1);
    }

    #[test]
    fn test_sufficiency_fixture() {
        let stats = BaseStats::compute(&fixture(), &[2]);
        assert_eq!(stats.sufficiency("A", "E", 2), 2);
        assert_eq!(stats.sufficiency("B", "E", 2), 1);
    }

    #[test]
    fn test_occupancy_fixture() {
        let stats = BaseStats::compute(&fixture(), &[2]);
        assert_eq!(stats.occupancy("A", 2), 4);
        assert_eq!(stats.occupancy("B", 2), 2);
    }

    #[test]
    fn test_counts_and_probabilities() {
        let stats = BaseStats::compute(&fixture(), &[2]);
        assert_eq!(stats.count("A"), 3);
        assert_eq!(stats.count("E"), 3);
        assert_eq!(stats.probability("A"), 0.6);
        assert_eq!(stats.probability("missing"), 0.0);
    }

    #[test]
    fn test_duration_totals_cached() {
        let stats = BaseStats::compute(&fixture(), &[2]);
        assert_eq!(stats.cause_duration_total("A"), 9.0);
        assert_eq!(stats.effect_duration_total("E"), 10.0);
        assert_eq!(stats.cause_duration_total("E"), 0.0);
    }

    #[test]
    fn test_counts_bounded_by_len() {
        let log = fixture();
        let stats = BaseStats::compute(&log, &[1, 2, 3, 10]);
        for w in [1, 2, 3, 10] {
            assert!(stats.necessity("A", "E", w) <= log.len() as u64);
            assert!(stats.sufficiency("A", "E", w) <= log.len() as u64);
        }
    }

    #[test]
    fn test_oversized_window_is_all_zero() {
        let stats = BaseStats::compute(&fixture(), &[9]);
        assert_eq!(stats.necessity("A", "E", 9), 0);
        assert_eq!(stats.sufficiency("A", "E", 9), 0);
        assert_eq!(stats.occupancy("A", 9), 0);
        assert_eq!(stats.pw_backward("A", "E", 9), 0.0);
    }

    #[test]
    fn test_unrequested_window_reads_zero() {
        let stats = BaseStats::compute(&fixture(), &[2]);
        assert_eq!(stats.necessity("A", "E", 3), 0);
    }
}
