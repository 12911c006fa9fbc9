pub mod dataset;
pub mod global;
pub mod history;
pub mod reading;
pub mod snapshot;
pub mod stats;
pub mod variable;

pub use dataset::MapDataset;
pub use global::{GlobalAverage, LegendTier};
pub use history::History;
pub use reading::Reading;
pub use snapshot::Snapshot;
pub use stats::StationStats;
pub use variable::CanonicalVariable;
