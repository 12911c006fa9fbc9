use serde::{Deserialize, Serialize};

/// The normalized sensor-measurement kinds used throughout the pipeline
/// outputs, independent of how the source hardware names its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalVariable {
    Pm1,
    Pm25,
    Pm10,
    Aqi,
    Temp,
    Humidity,
    Precip,
    WindSpeed,
    WindDir,
    Pressure,
}

impl CanonicalVariable {
    pub const ALL: [CanonicalVariable; 10] = [
        CanonicalVariable::Pm1,
        CanonicalVariable::Pm25,
        CanonicalVariable::Pm10,
        CanonicalVariable::Aqi,
        CanonicalVariable::Temp,
        CanonicalVariable::Humidity,
        CanonicalVariable::Precip,
        CanonicalVariable::WindSpeed,
        CanonicalVariable::WindDir,
        CanonicalVariable::Pressure,
    ];

    /// Priority order for selecting detail-panel keys
    pub const DETAIL_PRIORITY: [CanonicalVariable; 10] = [
        CanonicalVariable::Pm25,
        CanonicalVariable::Temp,
        CanonicalVariable::Humidity,
        CanonicalVariable::Precip,
        CanonicalVariable::Aqi,
        CanonicalVariable::WindSpeed,
        CanonicalVariable::WindDir,
        CanonicalVariable::Pressure,
        CanonicalVariable::Pm1,
        CanonicalVariable::Pm10,
    ];

    /// Variables averaged across stations on the global time axis
    pub const GLOBAL_AVERAGE: [CanonicalVariable; 4] = [
        CanonicalVariable::Pm25,
        CanonicalVariable::Temp,
        CanonicalVariable::Humidity,
        CanonicalVariable::Precip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalVariable::Pm1 => "pm1",
            CanonicalVariable::Pm25 => "pm25",
            CanonicalVariable::Pm10 => "pm10",
            CanonicalVariable::Aqi => "aqi",
            CanonicalVariable::Temp => "temp",
            CanonicalVariable::Humidity => "humidity",
            CanonicalVariable::Precip => "precip",
            CanonicalVariable::WindSpeed => "wind_speed",
            CanonicalVariable::WindDir => "wind_dir",
            CanonicalVariable::Pressure => "pressure",
        }
    }

    /// Human-readable label used by the detail table and chart axes
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalVariable::Pm1 => "PM1 (µg/m³)",
            CanonicalVariable::Pm25 => "PM2.5 (µg/m³)",
            CanonicalVariable::Pm10 => "PM10 (µg/m³)",
            CanonicalVariable::Aqi => "ICA / AQI",
            CanonicalVariable::Temp => "Temperatura (°C)",
            CanonicalVariable::Humidity => "Humedad (%)",
            CanonicalVariable::Precip => "Precipitación (mm)",
            CanonicalVariable::WindSpeed => "Velocidad del viento (km/h)",
            CanonicalVariable::WindDir => "Dirección del viento",
            CanonicalVariable::Pressure => "Presión (hPa)",
        }
    }

    /// Acceptable source column names, most preferred first. Matched
    /// case-insensitively against whatever columns the dataset carries;
    /// each list covers the naming of the sensor hardware seen so far.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            CanonicalVariable::Temp => &[
                "temp_ext_ult_c",
                "temp_ext_media_c",
                "temp_c",
                "temperatura",
                "temperature",
                "temp",
            ],
            CanonicalVariable::Humidity => {
                &["hum_ext_ult", "humedad", "hum", "relative_humidity", "rh"]
            }
            CanonicalVariable::Precip => &[
                "lluvia_mm",
                "lluvia",
                "precipitation",
                "precip",
                "rain_mm",
                "rain",
            ],
            CanonicalVariable::Pm25 => &[
                "pm_2p5_media_ugm3",
                "pm25",
                "pm2_5",
                "pm_2_5_ugm3",
                "pm_2_5",
            ],
            CanonicalVariable::Pm10 => &["pm10", "pm_10", "pm_10_ugm3"],
            CanonicalVariable::Pm1 => &["pm1", "pm_1"],
            CanonicalVariable::Aqi => &["aqi", "ica", "aqi_media_val", "indice_calidad_aire"],
            CanonicalVariable::WindSpeed => &[
                "viento_vel_media_kmh",
                "wind_speed_kmh",
                "wind_speed",
                "wind_avg",
                "viento_vel",
            ],
            CanonicalVariable::WindDir => {
                &["viento_dir", "wind_dir", "wind_direction", "direccion_viento"]
            }
            CanonicalVariable::Pressure => &[
                "presion_hpa",
                "pressure_hpa",
                "pressure",
                "barometer",
                "barometric_pressure",
                "presion",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_as_str() {
        for var in CanonicalVariable::ALL {
            let json = serde_json::to_string(&var).unwrap();
            assert_eq!(json, format!("\"{}\"", var.as_str()));
        }
    }

    #[test]
    fn test_detail_priority_covers_all_variables() {
        for var in CanonicalVariable::ALL {
            assert!(CanonicalVariable::DETAIL_PRIORITY.contains(&var));
        }
    }
}
