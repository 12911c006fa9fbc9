use crate::models::reading::format_iso;
use crate::models::{CanonicalVariable, Reading, Snapshot};
use crate::pipeline::aqi::pm25_to_aqi;
use crate::pipeline::columns::ColumnMap;

/// Extracts each station's most recent reading into a canonical flat record.
pub struct SnapshotBuilder<'a> {
    columns: &'a ColumnMap,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(columns: &'a ColumnMap) -> Self {
        Self { columns }
    }

    /// Build the snapshot for one station from its readings, which must
    /// already be stably sorted ascending by timestamp: the last element is
    /// the latest reading, and among equal timestamps the later input row
    /// wins. Returns None only for an empty group.
    pub fn build(&self, readings: &[Reading]) -> Option<Snapshot> {
        let latest = readings.last()?;

        let mut snapshot = Snapshot::new(
            latest.station_id.clone(),
            latest.station_name.clone(),
            latest.latitude,
            latest.longitude,
            Some(format_iso(&latest.timestamp)),
        );

        for var in CanonicalVariable::ALL {
            let value = self.columns.column(var).and_then(|col| latest.numeric(col));
            snapshot.set(var, value);
        }

        if snapshot.aqi.is_none() {
            snapshot.aqi = pm25_to_aqi(snapshot.pm25);
        }

        Some(snapshot)
    }
}
