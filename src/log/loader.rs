//! CSV ingestion and size-bound truncation.

use std::path::Path;

use crate::errors::LogError;

use super::{EventLog, EventRecord, LabelSet};

/// Column name to read the cumulative position from when a size bound is
/// applied.
const END_COLUMN: &str = "end";

/// Column mapping and optional size bound for loading a log table.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub cause_column: String,
    pub effect_column: String,
    pub duration_column: String,
    /// When set, the log is cut at the first record whose cumulative `end`
    /// reaches or exceeds the bound; the crossing record's duration is
    /// reduced by the overrun.
    pub size_bound: Option<f64>,
}

impl LogConfig {
    pub fn new(
        cause_column: impl Into<String>,
        effect_column: impl Into<String>,
        duration_column: impl Into<String>,
    ) -> Self {
        Self {
            cause_column: cause_column.into(),
            effect_column: effect_column.into(),
            duration_column: duration_column.into(),
            size_bound: None,
        }
    }

    pub fn with_size_bound(mut self, bound: f64) -> Self {
        self.size_bound = Some(bound);
        self
    }
}

impl EventLog {
    /// Load a log from a CSV file. Fails fast on missing columns or
    /// unparseable numeric fields; label fields may be empty.
    pub fn from_csv_path(path: impl AsRef<Path>, config: &LogConfig) -> Result<Self, LogError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|source| LogError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let headers = reader
            .headers()
            .map_err(|source| LogError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .clone();

        let column_index = |name: &str| -> Result<usize, LogError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LogError::MissingColumn {
                    column: name.to_string(),
                })
        };

        let cause_idx = column_index(&config.cause_column)?;
        let effect_idx = column_index(&config.effect_column)?;
        let duration_idx = column_index(&config.duration_column)?;
        let end_idx = match config.size_bound {
            Some(_) => Some(column_index(END_COLUMN)?),
            None => None,
        };

        let parse_number = |row: usize, column: &str, value: &str| -> Result<f64, LogError> {
            value.trim().parse::<f64>().map_err(|_| LogError::BadNumber {
                row,
                column: column.to_string(),
                value: value.to_string(),
            })
        };

        let mut records = Vec::new();
        let mut truncated = false;

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|source| LogError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

            let field = |idx: usize| record.get(idx).unwrap_or("");
            let duration = parse_number(row, &config.duration_column, field(duration_idx))?;

            let mut event = EventRecord {
                causes: LabelSet::parse(field(cause_idx)),
                effects: LabelSet::parse(field(effect_idx)),
                duration,
            };

            if let (Some(bound), Some(end_idx)) = (config.size_bound, end_idx) {
                let end = parse_number(row, END_COLUMN, field(end_idx))?;
                if end >= bound {
                    // Cut at the crossing record, subtracting the overrun
                    // from its duration. One-time transformation.
                    event.duration -= end - bound;
                    records.push(event);
                    truncated = true;
                    break;
                }
            }

            records.push(event);
        }

        let log = Self::from_records(records);
        tracing::debug!(
            path = %path.display(),
            records = log.len(),
            truncated,
            "loaded event log"
        );
        Ok(log)
    }
}
