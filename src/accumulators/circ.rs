//! Conditioned-ratio (CIRC) accumulator.

use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::errors::LogError;
use crate::log::{EventLog, LogConfig};
use crate::stats::{grid, BaseStats, PairKey};

use super::{lookup_duration, scan_backward_durations, scan_complement_durations};

/// Aggregates for the CIRC score: the backward duration sum plus its
/// cause-absent complement. The two tables partition each (effect, window)
/// anchor set; an anchor's duration is never counted in both.
#[derive(Debug, Clone)]
pub struct CircAccumulator {
    log: EventLog,
    base: BaseStats,
    backward_durations: FxHashMap<PairKey, f64>,
    complement_durations: FxHashMap<PairKey, f64>,
}

impl CircAccumulator {
    /// Load a log table and eagerly compute every aggregate for the given
    /// window sizes.
    pub fn construct(
        path: impl AsRef<Path>,
        config: &LogConfig,
        windows: &[usize],
    ) -> Result<Self, LogError> {
        Ok(Self::from_log(
            EventLog::from_csv_path(path, config)?,
            windows,
        ))
    }

    /// Build from an already-parsed log.
    pub fn from_log(log: EventLog, windows: &[usize]) -> Self {
        let start = Instant::now();
        let base = BaseStats::compute(&log, windows);

        let backward_durations =
            grid::fan_out(grid::pair_grid(&log, windows), |&(w, cause, effect)| {
                (
                    (w, cause.to_string(), effect.to_string()),
                    scan_backward_durations(&log, w, cause, effect),
                )
            });
        let complement_durations =
            grid::fan_out(grid::pair_grid(&log, windows), |&(w, cause, effect)| {
                (
                    (w, cause.to_string(), effect.to_string()),
                    scan_complement_durations(&log, w, cause, effect),
                )
            });

        tracing::debug!(
            tuples = backward_durations.len() + complement_durations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built CIRC accumulator"
        );

        Self {
            log,
            base,
            backward_durations,
            complement_durations,
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    /// Cause-matching duration sum over backward windows anchored at effect
    /// occurrences.
    pub fn backward_duration_sum(&self, cause: &str, effect: &str, window: usize) -> f64 {
        lookup_duration(&self.backward_durations, cause, effect, window)
    }

    /// Anchor-duration sum over effect occurrences whose backward window
    /// never contains the cause.
    pub fn complement_duration_sum(&self, cause: &str, effect: &str, window: usize) -> f64 {
        lookup_duration(&self.complement_durations, cause, effect, window)
    }
}
