use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::models::reading::format_iso;
use crate::models::{GlobalAverage, History, LegendTier, Snapshot, StationStats};

/// The full pre-materialized output of one pipeline run: everything the
/// presentation layer needs, as plain data.
#[derive(Debug, Serialize)]
pub struct MapDataset {
    pub latest_records: Vec<Snapshot>,
    pub station_histories: BTreeMap<String, History>,
    pub station_stats: BTreeMap<String, StationStats>,

    /// Global time axis: sorted union of all stations' resampled instants
    #[serde(serialize_with = "serialize_instants")]
    pub all_times: Vec<NaiveDateTime>,

    /// One record per axis instant, aligned 1:1 with `all_times`
    pub global_averages: Vec<GlobalAverage>,

    pub center_lat: f64,
    pub center_lon: f64,

    /// At most ten canonical-or-raw keys shown in the detail panel
    pub selected_detail_keys: Vec<String>,

    pub legend: Vec<LegendTier>,
}

fn serialize_instants<S>(instants: &[NaiveDateTime], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(instants.iter().map(format_iso))
}

impl MapDataset {
    pub fn station_count(&self) -> usize {
        self.latest_records.len()
    }
}
