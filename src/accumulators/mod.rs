//! Variant accumulators: one per metric family.
//!
//! Each accumulator owns its [`EventLog`], a [`BaseStats`], and the
//! duration-weighted tables its score formula needs. Construction is eager
//! and total: every aggregate for every requested window size is computed
//! (in parallel, one full-log scan per parameter tuple) before the
//! constructor returns. Accumulators are immutable afterwards and share no
//! state with one another.

mod cirb;
mod circ;
mod cirm;
mod nst;

pub use cirb::CirbAccumulator;
pub use circ::CircAccumulator;
pub use cirm::CirmAccumulator;
pub use nst::NstAccumulator;

use rustc_hash::FxHashMap;

use crate::log::{Column, EventLog};
use crate::stats::PairKey;
use crate::window::{
    backward_anchors, backward_window, forward_anchors, forward_window, matching_duration_sum,
    window_contains,
};

pub(crate) fn lookup_duration(
    table: &FxHashMap<PairKey, f64>,
    cause: &str,
    effect: &str,
    window: usize,
) -> f64 {
    table
        .get(&(window, cause.to_string(), effect.to_string()))
        .copied()
        .unwrap_or(0.0)
}

/// Backward duration sum: for every anchor where the effect occurs, add the
/// durations of all cause-matching positions inside the backward window.
pub(crate) fn scan_backward_durations(log: &EventLog, w: usize, cause: &str, effect: &str) -> f64 {
    backward_anchors(log.len(), w)
        .filter(|&i| log.labels(i, Column::Effect).contains(effect))
        .map(|i| matching_duration_sum(log, backward_window(i, w), Column::Cause, cause))
        .sum()
}

/// Forward duration sum: for every anchor where the cause occurs, add the
/// durations of all effect-matching positions inside the forward window.
pub(crate) fn scan_forward_durations(log: &EventLog, w: usize, cause: &str, effect: &str) -> f64 {
    forward_anchors(log.len(), w)
        .filter(|&i| log.labels(i, Column::Cause).contains(cause))
        .map(|i| matching_duration_sum(log, forward_window(i, w), Column::Effect, effect))
        .sum()
}

/// Complement duration sum: for every anchor where the effect occurs but the
/// cause is absent from the whole backward window, add the anchor record's
/// own duration. Disjoint by construction from the backward sum's anchors.
pub(crate) fn scan_complement_durations(
    log: &EventLog,
    w: usize,
    cause: &str,
    effect: &str,
) -> f64 {
    backward_anchors(log.len(), w)
        .filter(|&i| {
            log.labels(i, Column::Effect).contains(effect)
                && !window_contains(log, backward_window(i, w), Column::Cause, cause)
        })
        .map(|i| log.duration(i))
        .sum()
}


#[cfg(test)]
mod tests {
    use super::testutil::fixture;
    use super::*;

    #[test]
    fn test_backward_durations_fixture() {
        // Anchors with E at 1, 2, 4; A-matching durations 1, 3, 5.
        assert_eq!(scan_backward_durations(&fixture(), 2, "A", "E"), 9.0);
        assert_eq!(scan_backward_durations(&fixture(), 2, "B", "E"), 4.0);
    }

    #[test]
    fn test_forward_durations_fixture() {
        // Anchors with A at 0 and 2; E-matching durations 2 and 3.
        assert_eq!(scan_forward_durations(&fixture(), 2, "A", "E"), 5.0);
    }

    #[test]
    fn test_complement_durations_fixture() {
        // A occurs in every E anchor's window; B misses anchors 1 and 2.
        assert_eq!(scan_complement_durations(&fixture(), 2, "A", "E"), 0.0);
        assert_eq!(scan_complement_durations(&fixture(), 2, "B", "E"), 5.0);
    }

    #[test]
    fn test_no_anchor_counts_in_both_branches() {
        let log = fixture();
        for (cause, effect) in [("A", "E"), ("B", "E")] {
            for w in 1..=6 {
                let joint: Vec<usize> = crate::window::backward_anchors(log.len(), w)
                    .filter(|&i| {
                        log.labels(i, Column::Effect).contains(effect)
                            && window_contains(
                                &log,
                                crate::window::backward_window(i, w),
                                Column::Cause,
                                cause,
                            )
                    })
                    .collect();
                let complement: Vec<usize> = crate::window::backward_anchors(log.len(), w)
                    .filter(|&i| {
                        log.labels(i, Column::Effect).contains(effect)
                            && !window_contains(
                                &log,
                                crate::window::backward_window(i, w),
                                Column::Cause,
                                cause,
                            )
                    })
                    .collect();
                for i in &joint {
                    assert!(!complement.contains(i));
                }
            }
        }
    }

    #[test]
    fn test_oversized_window_sums_zero() {
        assert_eq!(scan_backward_durations(&fixture(), 9, "A", "E"), 0.0);
        assert_eq!(scan_forward_durations(&fixture(), 9, "A", "E"), 0.0);
        assert_eq!(scan_complement_durations(&fixture(), 9, "A", "E"), 0.0);
    }
}
