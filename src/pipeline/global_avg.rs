use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CanonicalVariable, GlobalAverage, History};
use crate::pipeline::round2;

/// Sorted, deduplicated global time axis from the given bin instants. Fed
/// with every station's pre-retention instants, so the axis can reach
/// further back than any single retained history.
pub fn time_axis<I>(instants: I) -> Vec<NaiveDateTime>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let union: BTreeSet<NaiveDateTime> = instants.into_iter().collect();
    union.into_iter().collect()
}

/// Merges every station's resampled history onto one shared time axis and
/// computes cross-station averages per canonical variable via as-of lookups.
pub struct GlobalAggregator<'a> {
    histories: &'a BTreeMap<String, History>,
}

impl<'a> GlobalAggregator<'a> {
    pub fn new(histories: &'a BTreeMap<String, History>) -> Self {
        Self { histories }
    }

    /// One record per axis instant. A station contributes to an average only
    /// when its as-of value at that instant exists and is non-null; with zero
    /// contributors the average itself is null.
    pub fn averages(&self, axis: &[NaiveDateTime]) -> Vec<GlobalAverage> {
        axis.iter()
            .map(|&instant| {
                let mut record = GlobalAverage::new(instant);
                for var in CanonicalVariable::GLOBAL_AVERAGE {
                    let values: Vec<f64> = self
                        .histories
                        .values()
                        .filter_map(|h| h.value_as_of(var, instant))
                        .collect();
                    if !values.is_empty() {
                        let mean = values.iter().sum::<f64>() / values.len() as f64;
                        record.set(var, Some(round2(mean)));
                    }
                }
                record
            })
            .collect()
    }
}
