use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::models::reading::format_iso;
use crate::models::CanonicalVariable;
use crate::utils::constants::PM25_LEGEND;

/// Cross-station averages for one instant of the global time axis
#[derive(Debug, Clone, Serialize)]
pub struct GlobalAverage {
    #[serde(serialize_with = "serialize_instant")]
    pub timestamp: NaiveDateTime,
    pub pm25: Option<f64>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub precip: Option<f64>,
}

fn serialize_instant<S>(instant: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_iso(instant))
}

impl GlobalAverage {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            pm25: None,
            temp: None,
            humidity: None,
            precip: None,
        }
    }

    pub fn get(&self, variable: CanonicalVariable) -> Option<f64> {
        match variable {
            CanonicalVariable::Pm25 => self.pm25,
            CanonicalVariable::Temp => self.temp,
            CanonicalVariable::Humidity => self.humidity,
            CanonicalVariable::Precip => self.precip,
            _ => None,
        }
    }

    pub fn set(&mut self, variable: CanonicalVariable, value: Option<f64>) {
        match variable {
            CanonicalVariable::Pm25 => self.pm25 = value,
            CanonicalVariable::Temp => self.temp = value,
            CanonicalVariable::Humidity => self.humidity = value,
            CanonicalVariable::Precip => self.precip = value,
            _ => {}
        }
    }
}

/// One tier of the fixed PM2.5 classification shown in the map legend
#[derive(Debug, Clone, Serialize)]
pub struct LegendTier {
    pub max: f64,
    pub label: String,
    pub color: String,
}

impl LegendTier {
    /// The static 5-tier PM2.5 legend; a constant, not derived from data
    pub fn pm25_tiers() -> Vec<LegendTier> {
        PM25_LEGEND
            .iter()
            .map(|&(max, label, color)| LegendTier {
                max,
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect()
    }
}
