use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// A cleaned sensor reading: one retained row of the input table.
///
/// Only rows whose timestamp, latitude and longitude all parsed survive
/// cleaning, so these three fields are never optional here. All other cells
/// are kept verbatim and parsed lazily by downstream consumers.
#[derive(Debug, Clone)]
pub struct Reading {
    pub station_id: String,
    pub station_name: Option<String>,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    fields: HashMap<String, String>,
}

impl Reading {
    pub fn new(
        station_id: String,
        station_name: Option<String>,
        timestamp: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        fields: HashMap<String, String>,
    ) -> Self {
        Self {
            station_id,
            station_name,
            timestamp,
            latitude,
            longitude,
            fields,
        }
    }

    /// Raw cell value for a source column, None if absent or empty
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Numeric cell value for a source column, None if absent or unparseable
    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.raw(column).and_then(parse_numeric)
    }
}

/// Lenient numeric parse: trims and rejects non-finite values
pub fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Lenient timestamp parse covering the formats produced by the field
/// hardware. Offset-carrying timestamps are normalized to UTC wall time;
/// bare dates become midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// ISO-8601 rendering used in every serialized output (matches the
/// lexicographic-equals-chronological property the front end relies on)
pub fn format_iso(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 4)
            .unwrap()
            .and_hms_opt(14, 17, 43)
            .unwrap();

        assert_eq!(parse_timestamp("2025-11-04T14:17:43"), Some(expected));
        assert_eq!(parse_timestamp("2025-11-04 14:17:43"), Some(expected));
        assert_eq!(parse_timestamp("2025/11/04 14:17:43"), Some(expected));
        assert_eq!(parse_timestamp("2025-11-04T14:17:43+00:00"), Some(expected));
        assert_eq!(parse_timestamp("not a time"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let ts = parse_timestamp("2025-11-04").unwrap();
        assert_eq!(format_iso(&ts), "2025-11-04T00:00:00");
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("12.5"), Some(12.5));
        assert_eq!(parse_numeric("  -3 "), Some(-3.0));
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_reading_field_access() {
        let mut fields = HashMap::new();
        fields.insert("pm25".to_string(), "18.2".to_string());
        fields.insert("note".to_string(), "calibrating".to_string());
        fields.insert("blank".to_string(), "  ".to_string());

        let reading = Reading::new(
            "st-1".to_string(),
            None,
            parse_timestamp("2025-11-04T10:00:00").unwrap(),
            4.6,
            -74.1,
            fields,
        );

        assert_eq!(reading.numeric("pm25"), Some(18.2));
        assert_eq!(reading.numeric("note"), None);
        assert_eq!(reading.raw("blank"), None);
        assert_eq!(reading.raw("missing"), None);
    }
}
