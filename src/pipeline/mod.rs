pub mod aqi;
pub mod columns;
pub mod global_avg;
pub mod identity;
pub mod resampler;
pub mod runner;
pub mod snapshot;
pub mod stats;

pub use columns::{ColumnMap, ColumnResolver};
pub use global_avg::{time_axis, GlobalAggregator};
pub use resampler::HistoryResampler;
pub use runner::PipelineRunner;
pub use snapshot::SnapshotBuilder;
pub use stats::StatsSummarizer;

/// Round half-away-from-zero to 2 decimal places, the precision used for
/// every reported mean
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
