use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::CanonicalVariable;

/// A station's most recent reading, flattened to the canonical variables.
///
/// Unresolved or unparseable fields are simply null; building a snapshot
/// never fails.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Snapshot {
    pub station_id: String,
    pub station_name: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// ISO-8601, or null when defensive handling drops the timestamp
    pub timestamp: Option<String>,

    pub pm1: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub aqi: Option<f64>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub precip: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<f64>,
    pub pressure: Option<f64>,
}

impl Snapshot {
    pub fn new(
        station_id: String,
        station_name: Option<String>,
        latitude: f64,
        longitude: f64,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            station_id,
            station_name,
            latitude,
            longitude,
            timestamp,
            pm1: None,
            pm25: None,
            pm10: None,
            aqi: None,
            temp: None,
            humidity: None,
            precip: None,
            wind_speed: None,
            wind_dir: None,
            pressure: None,
        }
    }

    pub fn get(&self, variable: CanonicalVariable) -> Option<f64> {
        match variable {
            CanonicalVariable::Pm1 => self.pm1,
            CanonicalVariable::Pm25 => self.pm25,
            CanonicalVariable::Pm10 => self.pm10,
            CanonicalVariable::Aqi => self.aqi,
            CanonicalVariable::Temp => self.temp,
            CanonicalVariable::Humidity => self.humidity,
            CanonicalVariable::Precip => self.precip,
            CanonicalVariable::WindSpeed => self.wind_speed,
            CanonicalVariable::WindDir => self.wind_dir,
            CanonicalVariable::Pressure => self.pressure,
        }
    }

    pub fn set(&mut self, variable: CanonicalVariable, value: Option<f64>) {
        match variable {
            CanonicalVariable::Pm1 => self.pm1 = value,
            CanonicalVariable::Pm25 => self.pm25 = value,
            CanonicalVariable::Pm10 => self.pm10 = value,
            CanonicalVariable::Aqi => self.aqi = value,
            CanonicalVariable::Temp => self.temp = value,
            CanonicalVariable::Humidity => self.humidity = value,
            CanonicalVariable::Precip => self.precip = value,
            CanonicalVariable::WindSpeed => self.wind_speed = value,
            CanonicalVariable::WindDir => self.wind_dir = value,
            CanonicalVariable::Pressure => self.pressure = value,
        }
    }
}
