use chrono::{NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap};

use crate::models::{CanonicalVariable, History, Reading};
use crate::pipeline::aqi::pm25_to_aqi;
use crate::pipeline::columns::ColumnMap;
use crate::utils::constants::MAX_HISTORY_POINTS;

/// Buckets one station's irregular readings into fixed 1-hour calendar-aligned
/// bins, averaging the values of each resolved column within a bin and
/// trimming the result to a bounded retention window.
pub struct HistoryResampler<'a> {
    columns: &'a ColumnMap,
    max_points: usize,
}

/// Calendar-aligned hour containing the instant
fn hour_bin(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), 0, 0)
        .unwrap_or(timestamp)
}

impl<'a> HistoryResampler<'a> {
    pub fn new(columns: &'a ColumnMap) -> Self {
        Self {
            columns,
            max_points: MAX_HISTORY_POINTS,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Resample one station's readings. A bin survives only if at least one
    /// resolved column contributed a value to it; a station with zero
    /// resolved columns (or no surviving bins) gets an empty-but-present
    /// history rather than being omitted.
    ///
    /// Returns the retention-bounded history together with every surviving
    /// bin instant before the retention cut; the global time axis is built
    /// from the latter, so it can reach further back than any retained
    /// history.
    pub fn resample(&self, readings: &[Reading]) -> (History, Vec<NaiveDateTime>) {
        let resolved_columns = self.columns.resolved_columns();
        if resolved_columns.is_empty() {
            return (History::default(), Vec::new());
        }

        // Per surviving bin, per source column: running (sum, count).
        // Bins are only created when a value lands in them, so hours where
        // every resolved column is null are absent, not zero.
        let mut bins: BTreeMap<NaiveDateTime, HashMap<&str, (f64, usize)>> = BTreeMap::new();
        for reading in readings {
            for &column in &resolved_columns {
                if let Some(value) = reading.numeric(column) {
                    let bin = bins.entry(hour_bin(reading.timestamp)).or_default();
                    let (sum, count) = bin.entry(column).or_insert((0.0, 0));
                    *sum += value;
                    *count += 1;
                }
            }
        }

        if bins.is_empty() {
            return (History::default(), Vec::new());
        }

        let bin_count = bins.len();
        let mean_series = |column: &str| -> Vec<Option<f64>> {
            bins.values()
                .map(|bin| bin.get(column).map(|&(sum, count)| sum / count as f64))
                .collect()
        };

        let bin_instants: Vec<NaiveDateTime> = bins.keys().copied().collect();
        let mut history = History {
            timestamps: bin_instants.clone(),
            ..Default::default()
        };

        for var in CanonicalVariable::ALL {
            let series = match self.columns.column(var) {
                Some(column) => mean_series(column),
                // No AQI column: derive each bin's index independently from
                // that bin's averaged PM2.5, never from raw readings
                None if var == CanonicalVariable::Aqi => {
                    match self.columns.column(CanonicalVariable::Pm25) {
                        Some(pm_column) => mean_series(pm_column)
                            .into_iter()
                            .map(pm25_to_aqi)
                            .collect(),
                        None => vec![None; bin_count],
                    }
                }
                None => vec![None; bin_count],
            };
            history.set_series(var, series);
        }

        history.truncate_to_tail(self.max_points);
        (history, bin_instants)
    }
}
