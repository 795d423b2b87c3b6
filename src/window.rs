//! Stateless sliding-window primitives.
//!
//! A backward window of size `w` anchored at `i` spans positions
//! `[i+1-w, i]`; a forward window spans `[i, i+w-1]`. Positions that cannot
//! host a full window are simply not anchors. Windows larger than the log
//! produce no anchors at all, which makes every dependent aggregate zero.

use std::ops::{Range, RangeInclusive};

use crate::log::{Column, EventLog};

/// Anchor positions for backward windows of size `w` over a log of length
/// `t`: `w-1 .. t`. Empty when `w == 0` or `w > t`.
pub fn backward_anchors(t: usize, w: usize) -> Range<usize> {
    if w == 0 || w > t {
        return 0..0;
    }
    (w - 1)..t
}

/// Anchor positions for forward windows of size `w` over a log of length
/// `t`: `0 ..= t-w`. Empty when `w == 0` or `w > t`.
pub fn forward_anchors(t: usize, w: usize) -> Range<usize> {
    if w == 0 || w > t {
        return 0..0;
    }
    0..(t - w + 1)
}

/// Positions of the backward window ending at anchor `i`. Caller guarantees
/// `i >= w-1` by iterating [`backward_anchors`].
pub fn backward_window(i: usize, w: usize) -> RangeInclusive<usize> {
    (i + 1 - w)..=i
}

/// Positions of the forward window starting at anchor `i`.
pub fn forward_window(i: usize, w: usize) -> RangeInclusive<usize> {
    i..=(i + w - 1)
}

/// True when `label` occurs in the given column at any position of `window`.
pub fn window_contains(
    log: &EventLog,
    window: RangeInclusive<usize>,
    column: Column,
    label: &str,
) -> bool {
    window.into_iter().any(|j| log.labels(j, column).contains(label))
}

/// Sum of durations over window positions whose `column` label set contains
/// `label`.
pub fn matching_duration_sum(
    log: &EventLog,
    window: RangeInclusive<usize>,
    column: Column,
    label: &str,
) -> f64 {
    window
        .into_iter()
        .filter(|&j| log.labels(j, column).contains(label))
        .map(|j| log.duration(j))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{EventRecord, LabelSet};

    fn log3() -> EventLog {
        EventLog::from_records(vec![
            EventRecord {
                causes: LabelSet::parse("a"),
                effects: LabelSet::empty(),
                duration: 1.0,
            },
            EventRecord {
                causes: LabelSet::empty(),
                effects: LabelSet::parse("y"),
                duration: 2.0,
            },
            EventRecord {
                causes: LabelSet::parse("a"),
                effects: LabelSet::parse("y"),
                duration: 4.0,
            },
        ])
    }

    #[test]
    fn test_anchor_ranges() {
        assert_eq!(backward_anchors(5, 2), 1..5);
        assert_eq!(forward_anchors(5, 2), 0..4);
        assert_eq!(backward_anchors(5, 1), 0..5);
        assert_eq!(forward_anchors(5, 5), 0..1);
    }

    #[test]
    fn test_oversized_window_has_no_anchors() {
        assert!(backward_anchors(3, 4).is_empty());
        assert!(forward_anchors(3, 4).is_empty());
        assert!(backward_anchors(0, 1).is_empty());
    }

    #[test]
    fn test_zero_window_has_no_anchors() {
        assert!(backward_anchors(5, 0).is_empty());
        assert!(forward_anchors(5, 0).is_empty());
    }

    #[test]
    fn test_window_extents() {
        assert_eq!(backward_window(4, 2), 3..=4);
        assert_eq!(backward_window(1, 2), 0..=1);
        assert_eq!(forward_window(0, 3), 0..=2);
    }

    #[test]
    fn test_window_contains() {
        let log = log3();
        assert!(window_contains(&log, 0..=1, Column::Cause, "a"));
        assert!(!window_contains(&log, 1..=1, Column::Cause, "a"));
        assert!(window_contains(&log, 1..=2, Column::Effect, "y"));
    }

    #[test]
    fn test_matching_duration_sum() {
        let log = log3();
        assert_eq!(matching_duration_sum(&log, 0..=2, Column::Cause, "a"), 5.0);
        assert_eq!(matching_duration_sum(&log, 1..=2, Column::Effect, "y"), 6.0);
        assert_eq!(matching_duration_sum(&log, 0..=2, Column::Cause, "z"), 0.0);
    }
}
