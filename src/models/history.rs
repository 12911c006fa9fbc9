use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::models::reading::format_iso;
use crate::models::CanonicalVariable;

/// A station's resampled, retention-bounded time series.
///
/// Every variable sequence has exactly the same length as `timestamps` and is
/// aligned index-for-index with it. Instants are kept parsed internally so
/// chronological comparisons never rely on string ordering; serialization
/// renders them as ISO-8601 strings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    #[serde(serialize_with = "serialize_instants")]
    pub timestamps: Vec<NaiveDateTime>,
    pub pm1: Vec<Option<f64>>,
    pub pm25: Vec<Option<f64>>,
    pub pm10: Vec<Option<f64>>,
    pub aqi: Vec<Option<f64>>,
    pub temp: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub precip: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_dir: Vec<Option<f64>>,
    pub pressure: Vec<Option<f64>>,
}

fn serialize_instants<S>(instants: &[NaiveDateTime], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(instants.iter().map(format_iso))
}

impl History {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn series(&self, variable: CanonicalVariable) -> &[Option<f64>] {
        match variable {
            CanonicalVariable::Pm1 => &self.pm1,
            CanonicalVariable::Pm25 => &self.pm25,
            CanonicalVariable::Pm10 => &self.pm10,
            CanonicalVariable::Aqi => &self.aqi,
            CanonicalVariable::Temp => &self.temp,
            CanonicalVariable::Humidity => &self.humidity,
            CanonicalVariable::Precip => &self.precip,
            CanonicalVariable::WindSpeed => &self.wind_speed,
            CanonicalVariable::WindDir => &self.wind_dir,
            CanonicalVariable::Pressure => &self.pressure,
        }
    }

    pub fn set_series(&mut self, variable: CanonicalVariable, values: Vec<Option<f64>>) {
        match variable {
            CanonicalVariable::Pm1 => self.pm1 = values,
            CanonicalVariable::Pm25 => self.pm25 = values,
            CanonicalVariable::Pm10 => self.pm10 = values,
            CanonicalVariable::Aqi => self.aqi = values,
            CanonicalVariable::Temp => self.temp = values,
            CanonicalVariable::Humidity => self.humidity = values,
            CanonicalVariable::Precip => self.precip = values,
            CanonicalVariable::WindSpeed => self.wind_speed = values,
            CanonicalVariable::WindDir => self.wind_dir = values,
            CanonicalVariable::Pressure => self.pressure = values,
        }
    }

    /// Keep only the `max_points` most recent bins, preserving index
    /// alignment between the timestamp axis and every variable sequence
    pub fn truncate_to_tail(&mut self, max_points: usize) {
        if self.timestamps.len() <= max_points {
            return;
        }
        let cut = self.timestamps.len() - max_points;
        self.timestamps.drain(..cut);
        for variable in CanonicalVariable::ALL {
            let series = self.series(variable);
            if series.len() > max_points {
                let tail = series[series.len() - max_points..].to_vec();
                self.set_series(variable, tail);
            }
        }
    }

    /// As-of lookup: the value at the latest bin at or before `instant`,
    /// with no interpolation. None when the station has no bin at or before
    /// the instant, or when the value there is null.
    pub fn value_as_of(&self, variable: CanonicalVariable, instant: NaiveDateTime) -> Option<f64> {
        let idx = self.timestamps.partition_point(|ts| *ts <= instant);
        if idx == 0 {
            return None;
        }
        self.series(variable).get(idx - 1).copied().flatten()
    }
}
