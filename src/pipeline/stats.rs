use crate::models::reading::format_iso;
use crate::models::{CanonicalVariable, Reading, StationStats};
use crate::pipeline::aqi::pm25_to_aqi;
use crate::pipeline::columns::ColumnMap;
use crate::pipeline::round2;

/// Computes per-station scalar summaries over the full, unresampled reading
/// set: record count, time span, and per-column means with canonical-variable
/// backfill.
pub struct StatsSummarizer<'a> {
    columns: &'a ColumnMap,
    numeric_columns: &'a [String],
}

impl<'a> StatsSummarizer<'a> {
    pub fn new(columns: &'a ColumnMap, numeric_columns: &'a [String]) -> Self {
        Self {
            columns,
            numeric_columns,
        }
    }

    /// Summarize one station's readings (sorted ascending by timestamp).
    pub fn summarize(&self, readings: &[Reading]) -> StationStats {
        let mut stats = StationStats {
            n_samples: readings.len(),
            first_reading: readings.first().map(|r| format_iso(&r.timestamp)),
            last_reading: readings.last().map(|r| format_iso(&r.timestamp)),
            ..Default::default()
        };

        // Generic pass: every numeric source column (lat/lon already
        // excluded at detection time)
        for column in self.numeric_columns {
            stats.set_mean(column.clone(), column_mean(readings, column));
        }

        // Backfill each canonical variable from its resolved source column
        // when the generic pass didn't already produce a value under the
        // canonical name (the raw column may be named differently)
        for var in CanonicalVariable::ALL {
            if stats.mean(var.as_str()).is_none() {
                if let Some(column) = self.columns.column(var) {
                    stats.set_mean(var.as_str(), column_mean(readings, column));
                }
            }
        }

        if stats.mean(CanonicalVariable::Aqi.as_str()).is_none() {
            if let Some(aqi) = pm25_to_aqi(stats.mean(CanonicalVariable::Pm25.as_str())) {
                stats.set_mean(CanonicalVariable::Aqi.as_str(), Some(aqi));
            }
        }

        stats
    }
}

/// Mean of the non-null values of a column, rounded to 2 decimals; None when
/// no value parses
fn column_mean(readings: &[Reading], column: &str) -> Option<f64> {
    let values: Vec<f64> = readings.iter().filter_map(|r| r.numeric(column)).collect();
    if values.is_empty() {
        None
    } else {
        Some(round2(values.iter().sum::<f64>() / values.len() as f64))
    }
}
