use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{
    CanonicalVariable, History, LegendTier, MapDataset, Snapshot, StationStats,
};
use crate::pipeline::columns::ColumnMap;
use crate::pipeline::global_avg::{time_axis, GlobalAggregator};
use crate::pipeline::resampler::HistoryResampler;
use crate::pipeline::snapshot::SnapshotBuilder;
use crate::pipeline::stats::StatsSummarizer;
use crate::readers::SensorTable;
use crate::utils::constants::{MAX_DETAIL_KEYS, MAX_HISTORY_POINTS};
use crate::utils::progress::ProgressReporter;

/// Orchestrates one pipeline run: resolves columns once, fans per-station
/// work out over a worker pool, fans the results into the output maps, then
/// computes the cross-station views that need every station complete.
pub struct PipelineRunner {
    max_workers: usize,
    max_history_points: usize,
}

impl PipelineRunner {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            max_history_points: MAX_HISTORY_POINTS,
        }
    }

    pub fn with_max_history_points(mut self, max_history_points: usize) -> Self {
        self.max_history_points = max_history_points;
        self
    }

    pub fn run(
        &self,
        table: &SensorTable,
        progress: Option<&ProgressReporter>,
    ) -> Result<MapDataset> {
        let columns = ColumnMap::resolve(table.columns());
        for var in CanonicalVariable::ALL {
            debug!(
                variable = var.as_str(),
                column = columns.column(var).unwrap_or("<unresolved>"),
                "column resolution"
            );
        }

        let groups: Vec<_> = table.group_by_station().into_iter().collect();
        info!(stations = groups.len(), readings = table.len(), "aggregating");
        if let Some(p) = progress {
            p.set_message(&format!("Aggregating {} stations...", groups.len()));
        }

        let snapshot_builder = SnapshotBuilder::new(&columns);
        let resampler = HistoryResampler::new(&columns).with_max_points(self.max_history_points);
        let summarizer = StatsSummarizer::new(&columns, table.numeric_columns());

        // Per-station computation is independent; the global aggregation
        // below needs every history complete before it can start
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| crate::error::ProcessingError::Config(e.to_string()))?;

        type StationOutput = (
            String,
            Option<Snapshot>,
            History,
            Vec<chrono::NaiveDateTime>,
            StationStats,
        );
        let per_station: Vec<StationOutput> = pool.install(|| {
            groups
                .par_iter()
                .map(|(station_id, readings)| {
                    let snapshot = snapshot_builder.build(readings);
                    let (history, bin_instants) = resampler.resample(readings);
                    let stats = summarizer.summarize(readings);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    (station_id.clone(), snapshot, history, bin_instants, stats)
                })
                .collect()
        });

        let mut latest_records = Vec::with_capacity(per_station.len());
        let mut station_histories = BTreeMap::new();
        let mut station_stats = BTreeMap::new();
        // The axis unions bin instants from before each station's retention
        // cut, so it can reach further back than any retained history
        let mut all_instants = Vec::new();
        for (station_id, snapshot, history, bin_instants, stats) in per_station {
            latest_records.extend(snapshot);
            all_instants.extend(bin_instants);
            station_histories.insert(station_id.clone(), history);
            station_stats.insert(station_id, stats);
        }

        if let Some(p) = progress {
            p.set_message("Computing global averages...");
        }
        let all_times = time_axis(all_instants);
        let aggregator = GlobalAggregator::new(&station_histories);
        let global_averages = aggregator.averages(&all_times);

        let (center_lat, center_lon) = center_of(table);
        let selected_detail_keys = select_detail_keys(&station_stats, table.numeric_columns());

        Ok(MapDataset {
            latest_records,
            station_histories,
            station_stats,
            all_times,
            global_averages,
            center_lat,
            center_lon,
            selected_detail_keys,
            legend: LegendTier::pm25_tiers(),
        })
    }
}

/// Arithmetic mean coordinates over all cleaned readings, for initial map
/// framing only
fn center_of(table: &SensorTable) -> (f64, f64) {
    if table.is_empty() {
        return (0.0, 0.0);
    }
    let n = table.len() as f64;
    let (lat_sum, lon_sum) = table
        .readings()
        .iter()
        .fold((0.0, 0.0), |(la, lo), r| (la + r.latitude, lo + r.longitude));
    (lat_sum / n, lon_sum / n)
}

/// Up to MAX_DETAIL_KEYS variable keys for the detail panel: canonical
/// variables in priority order that have at least one non-null statistic
/// anywhere, then extra raw numeric columns until full or exhausted
fn select_detail_keys(
    station_stats: &BTreeMap<String, StationStats>,
    numeric_columns: &[String],
) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();

    for var in CanonicalVariable::DETAIL_PRIORITY {
        let any_non_null = station_stats.values().any(|s| s.mean(var.as_str()).is_some());
        if any_non_null {
            keys.push(var.as_str().to_string());
        }
    }

    for column in numeric_columns {
        if keys.len() >= MAX_DETAIL_KEYS {
            break;
        }
        if keys.iter().any(|k| k.eq_ignore_ascii_case(column)) {
            continue;
        }
        keys.push(column.clone());
    }

    keys.truncate(MAX_DETAIL_KEYS);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::parse_timestamp;
    use crate::models::Reading;
    use std::collections::HashMap;

    fn reading(station: &str, ts: &str, lat: f64, lon: f64, pm25: &str) -> Reading {
        let mut fields = HashMap::new();
        fields.insert("pm25".to_string(), pm25.to_string());
        Reading::new(
            station.to_string(),
            None,
            parse_timestamp(ts).unwrap(),
            lat,
            lon,
            fields,
        )
    }

    fn table(readings: Vec<Reading>) -> SensorTable {
        let columns = vec![
            "timestamp".to_string(),
            "latitud".to_string(),
            "longitud".to_string(),
            "pm25".to_string(),
        ];
        SensorTable::new(columns, readings, vec!["pm25".to_string()], 0)
    }

    #[test]
    fn test_run_produces_aligned_outputs() {
        let t = table(vec![
            reading("x", "2025-11-04T10:10:00", 4.0, -74.0, "10"),
            reading("x", "2025-11-04T11:10:00", 4.0, -74.0, "14"),
            reading("y", "2025-11-04T10:30:00", 5.0, -75.0, "60"),
        ]);

        let dataset = PipelineRunner::new(2).run(&t, None).unwrap();

        assert_eq!(dataset.station_count(), 2);
        assert_eq!(dataset.all_times.len(), dataset.global_averages.len());
        assert_eq!(dataset.station_histories.len(), 2);
        assert_eq!(dataset.station_stats.len(), 2);
        // Snapshots ordered by station key
        assert_eq!(dataset.latest_records[0].station_id, "x");
        assert_eq!(dataset.latest_records[1].station_id, "y");
    }

    #[test]
    fn test_center_is_mean_of_cleaned_readings() {
        let t = table(vec![
            reading("x", "2025-11-04T10:00:00", 4.0, -74.0, "10"),
            reading("y", "2025-11-04T10:00:00", 6.0, -76.0, "20"),
        ]);

        let dataset = PipelineRunner::new(1).run(&t, None).unwrap();
        assert!((dataset.center_lat - 5.0).abs() < 1e-9);
        assert!((dataset.center_lon + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_keeps_bins_cut_by_retention() {
        let start = parse_timestamp("2025-01-01T00:00:00").unwrap();
        let readings: Vec<Reading> = (0..200)
            .map(|i| {
                let mut r = reading("only", "2025-01-01T00:00:00", 4.0, -74.0, &i.to_string());
                r.timestamp = start + chrono::Duration::hours(i);
                r
            })
            .collect();

        let dataset = PipelineRunner::new(1).run(&table(readings), None).unwrap();

        assert_eq!(dataset.station_histories["only"].len(), 168);
        assert_eq!(dataset.all_times.len(), 200);
        assert_eq!(dataset.global_averages.len(), 200);
        // Axis instants older than the retained window have no contributors
        assert_eq!(dataset.global_averages[0].pm25, None);
        assert_eq!(dataset.global_averages[31].pm25, None);
        assert_eq!(dataset.global_averages[32].pm25, Some(32.0));
        assert_eq!(dataset.global_averages[199].pm25, Some(199.0));
    }

    #[test]
    fn test_empty_table_yields_empty_dataset() {
        let dataset = PipelineRunner::new(1).run(&table(vec![]), None).unwrap();
        assert_eq!(dataset.station_count(), 0);
        assert!(dataset.all_times.is_empty());
        assert_eq!(dataset.center_lat, 0.0);
        assert_eq!(dataset.legend.len(), 5);
    }

    #[test]
    fn test_detail_keys_capped_and_deduplicated() {
        let mut stats_map = BTreeMap::new();
        let mut stats = StationStats::default();
        for var in CanonicalVariable::ALL {
            stats.set_mean(var.as_str(), Some(1.0));
        }
        stats_map.insert("x".to_string(), stats);

        let extra_columns: Vec<String> = vec![
            "PM25".to_string(),
            "battery".to_string(),
            "signal".to_string(),
        ];
        let keys = select_detail_keys(&stats_map, &extra_columns);

        assert_eq!(keys.len(), MAX_DETAIL_KEYS);
        let mut unique = keys.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), keys.len());
        // All ten canonical variables fill the quota; extras are dropped
        assert!(!keys.contains(&"battery".to_string()));
    }

    #[test]
    fn test_detail_keys_backfilled_from_numeric_columns() {
        let mut stats_map = BTreeMap::new();
        let mut stats = StationStats::default();
        stats.set_mean("pm25", Some(1.0));
        stats.set_mean("aqi", Some(50.0));
        stats_map.insert("x".to_string(), stats);

        let extra_columns = vec!["battery".to_string(), "signal".to_string()];
        let keys = select_detail_keys(&stats_map, &extra_columns);

        assert_eq!(keys, vec!["pm25", "aqi", "battery", "signal"]);
    }
}
