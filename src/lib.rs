//! # durcause
//!
//! Duration-weighted windowed causality-strength engine for labeled event logs.
//!
//! The crate ingests a timestamped event log where every record carries a
//! duration plus multi-valued cause/effect label sets, eagerly computes
//! sliding-window aggregates for a configured set of window sizes, and exposes
//! four closely related causality scores over the cached aggregates:
//!
//! - NST (backward-strength): geometric blend of backward and forward
//!   duration-weighted lift terms
//! - CIRB (complement-ratio): backward duration share against base rate
//! - CIRC (conditioned-ratio): backward duration share against the
//!   cause-absent complement
//! - CIRM (joint-strength): CIRC further conditioned on auxiliary labels,
//!   reported as max/min/avg across the conditioning set
//!
//! Aggregate construction fans out one full-log scan per parameter tuple
//! across a rayon pool; the log itself is immutable and shared read-only.
//! Score functions are pure, never re-scan the log, and return `0.0` for
//! every degenerate case (zero denominators, unknown labels, windows longer
//! than the log) instead of failing.

pub mod accumulators;
pub mod catalog;
pub mod errors;
pub mod log;
pub mod score;
pub mod stats;
pub mod window;

pub use accumulators::{
    CirbAccumulator, CircAccumulator, CirmAccumulator, NstAccumulator,
};
pub use catalog::ConditioningCatalog;
pub use errors::{CatalogError, LogError};
pub use log::{Column, EventLog, EventRecord, LabelSet, LogConfig};
pub use score::{cirb, circ, cirm_single, cirm_subsets, nst, JointSummary, NstParams};
pub use stats::BaseStats;
