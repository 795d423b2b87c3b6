//! Normalized in-memory event log.
//!
//! Label fields are comma-joined multi-label strings in the source table.
//! They are parsed into per-record sets once at ingestion; membership tests
//! afterwards never touch the raw strings again.

mod loader;

use std::collections::BTreeSet;

use smallvec::SmallVec;

pub use loader::LogConfig;

/// Which per-record label column a membership test reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Cause,
    Effect,
}

/// A parsed multi-valued label field. Empty or missing fields yield an empty
/// set, never a sentinel value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(SmallVec<[String; 2]>);

impl LabelSet {
    /// Parse a comma-joined field. Surrounding whitespace per label is
    /// stripped; empty fragments are discarded.
    pub fn parse(raw: &str) -> Self {
        let labels = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self(labels)
    }

    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One row of the event log.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub causes: LabelSet,
    pub effects: LabelSet,
    /// May be negative after size-bound truncation adjusts the final record.
    pub duration: f64,
}

/// The ordered event sequence plus its derived label universes.
///
/// Built once, immutable thereafter; accumulators share it read-only across
/// worker threads during aggregate construction.
#[derive(Debug, Clone)]
pub struct EventLog {
    records: Vec<EventRecord>,
    cause_labels: BTreeSet<String>,
    effect_labels: BTreeSet<String>,
}

impl EventLog {
    /// Build a log from pre-parsed records, deriving the label universes.
    pub fn from_records(records: Vec<EventRecord>) -> Self {
        let mut cause_labels = BTreeSet::new();
        let mut effect_labels = BTreeSet::new();
        for record in &records {
            cause_labels.extend(record.causes.iter().map(str::to_string));
            effect_labels.extend(record.effects.iter().map(str::to_string));
        }
        Self {
            records,
            cause_labels,
            effect_labels,
        }
    }

    /// Number of records `T`.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn duration(&self, i: usize) -> f64 {
        self.records[i].duration
    }

    /// The label set of record `i` in the given column.
    pub fn labels(&self, i: usize, column: Column) -> &LabelSet {
        match column {
            Column::Cause => &self.records[i].causes,
            Column::Effect => &self.records[i].effects,
        }
    }

    /// Union of all cause labels, sorted.
    pub fn cause_labels(&self) -> &BTreeSet<String> {
        &self.cause_labels
    }

    /// Union of all effect labels, sorted.
    pub fn effect_labels(&self) -> &BTreeSet<String> {
        &self.effect_labels
    }

    /// True when `label` occurs in the given column anywhere in the log.
    pub fn column_has_label(&self, column: Column, label: &str) -> bool {
        (0..self.len()).any(|i| self.labels(i, column).contains(label))
    }

    /// Resolve which column a label lives in: the cause column wins when the
    /// label occurs there at all, otherwise the effect column. Labels are
    /// assumed to live exclusively in one column.
    pub fn resolve_column(&self, label: &str) -> Column {
        if self.column_has_label(Column::Cause, label) {
            Column::Cause
        } else {
            Column::Effect
        }
    }

    /// Sum of durations over records whose `column` label set contains
    /// `label`.
    pub fn duration_total(&self, column: Column, label: &str) -> f64 {
        (0..self.len())
            .filter(|&i| self.labels(i, column).contains(label))
            .map(|i| self.duration(i))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(causes: &str, effects: &str, duration: f64) -> EventRecord {
        EventRecord {
            causes: LabelSet::parse(causes),
            effects: LabelSet::parse(effects),
            duration,
        }
    }

    #[test]
    fn test_label_set_parse() {
        let set = LabelSet::parse("rain, fog");
        assert!(set.contains("rain"));
        assert!(set.contains("fog"));
        assert!(!set.contains("snow"));
    }

    #[test]
    fn test_label_set_empty_field() {
        assert!(LabelSet::parse("").is_empty());
        assert!(LabelSet::parse(" , ").is_empty());
    }

    #[test]
    fn test_label_universes() {
        let log = EventLog::from_records(vec![
            record("a", "x", 1.0),
            record("a, b", "", 2.0),
            record("", "y", 3.0),
        ]);
        assert_eq!(
            log.cause_labels().iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(
            log.effect_labels().iter().collect::<Vec<_>>(),
            vec!["x", "y"]
        );
    }

    #[test]
    fn test_resolve_column_prefers_cause() {
        let log = EventLog::from_records(vec![record("a", "a, y", 1.0)]);
        assert_eq!(log.resolve_column("a"), Column::Cause);
        assert_eq!(log.resolve_column("y"), Column::Effect);
    }

    #[test]
    fn test_duration_totals() {
        let log = EventLog::from_records(vec![
            record("a", "y", 1.5),
            record("b", "y", 2.0),
            record("a", "", 4.0),
        ]);
        assert_eq!(log.duration_total(Column::Cause, "a"), 5.5);
        assert_eq!(log.duration_total(Column::Effect, "y"), 3.5);
        assert_eq!(log.duration_total(Column::Effect, "missing"), 0.0);
    }
}
