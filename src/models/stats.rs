use serde::Serialize;
use std::collections::BTreeMap;

/// Per-station scalar summary over the full, unresampled reading set.
///
/// `means` is keyed by source column name for generic numeric columns and by
/// canonical variable name for backfilled entries; null means the column
/// resolved but never carried a parseable value for this station.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StationStats {
    pub n_samples: usize,
    pub first_reading: Option<String>,
    pub last_reading: Option<String>,

    #[serde(flatten)]
    pub means: BTreeMap<String, Option<f64>>,
}

impl StationStats {
    /// Non-null mean for a key, if one was computed
    pub fn mean(&self, key: &str) -> Option<f64> {
        self.means.get(key).copied().flatten()
    }

    pub fn set_mean(&mut self, key: impl Into<String>, value: Option<f64>) {
        self.means.insert(key.into(), value);
    }
}
