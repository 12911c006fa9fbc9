use memmap2::Mmap;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::reading::{parse_numeric, parse_timestamp};
use crate::models::Reading;
use crate::pipeline::columns::ColumnResolver;
use crate::pipeline::identity::assign_identity;
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, LATITUDE_TOKENS, LONGITUDE_TOKENS, STATION_ID_TOKENS,
    STATION_NAME_TOKENS, TIMESTAMP_TOKENS,
};

/// The cleaned input table: readings stably sorted by timestamp, plus the
/// column metadata downstream components share.
#[derive(Debug)]
pub struct SensorTable {
    columns: Vec<String>,
    readings: Vec<Reading>,
    numeric_columns: Vec<String>,
    dropped_rows: usize,
}

impl SensorTable {
    pub fn new(
        columns: Vec<String>,
        readings: Vec<Reading>,
        numeric_columns: Vec<String>,
        dropped_rows: usize,
    ) -> Self {
        Self {
            columns,
            readings,
            numeric_columns,
            dropped_rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Numeric source columns, lat/lon/timestamp already excluded
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Group readings by station key, preserving the table's stable
    /// timestamp order within each group
    pub fn group_by_station(&self) -> BTreeMap<String, Vec<Reading>> {
        let mut groups: BTreeMap<String, Vec<Reading>> = BTreeMap::new();
        for reading in &self.readings {
            groups
                .entry(reading.station_id.clone())
                .or_default()
                .push(reading.clone());
        }
        groups
    }
}

/// Reads the raw sensor CSV and applies the cleaning rules: mandatory
/// columns are fatal when absent, everything row-level degrades silently.
pub struct SensorCsvReader {
    use_mmap: bool,
}

impl SensorCsvReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn read(&self, path: &Path) -> Result<SensorTable> {
        if self.use_mmap {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            let reader = csv::ReaderBuilder::new()
                .flexible(true)
                .from_reader(&mmap[..]);
            self.read_table(reader)
        } else {
            let file = File::open(path)?;
            let reader = csv::ReaderBuilder::new()
                .flexible(true)
                .from_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file));
            self.read_table(reader)
        }
    }

    fn read_table<R: std::io::Read>(&self, mut reader: csv::Reader<R>) -> Result<SensorTable> {
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let resolver = ColumnResolver::new(&columns);
        let timestamp_col = mandatory(&resolver, TIMESTAMP_TOKENS, "timestamp")?;
        let latitude_col = mandatory(&resolver, LATITUDE_TOKENS, "latitude")?;
        let longitude_col = mandatory(&resolver, LONGITUDE_TOKENS, "longitude")?;
        let id_col = resolver.resolve(STATION_ID_TOKENS).map(str::to_string);
        let name_col = resolver.resolve(STATION_NAME_TOKENS).map(str::to_string);

        let index_of = |col: &str| columns.iter().position(|c| c == col);
        let timestamp_idx = index_of(&timestamp_col);
        let latitude_idx = index_of(&latitude_col);
        let longitude_idx = index_of(&longitude_col);

        let mut readings = Vec::new();
        let mut dropped_rows = 0usize;

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(_) => {
                    dropped_rows += 1;
                    continue;
                }
            };

            let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim);

            // Rows failing any of the three mandatory fields are silently
            // excluded from all downstream output
            let timestamp = cell(timestamp_idx).and_then(parse_timestamp);
            let latitude = cell(latitude_idx).and_then(parse_numeric);
            let longitude = cell(longitude_idx).and_then(parse_numeric);
            let (Some(timestamp), Some(latitude), Some(longitude)) =
                (timestamp, latitude, longitude)
            else {
                dropped_rows += 1;
                continue;
            };

            let fields: HashMap<String, String> = columns
                .iter()
                .zip(record.iter())
                .map(|(col, value)| (col.clone(), value.to_string()))
                .collect();

            let native_id = id_col
                .as_deref()
                .and_then(|c| fields.get(c))
                .map(String::as_str);
            let station_name = name_col
                .as_deref()
                .and_then(|c| fields.get(c))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let station_id =
                assign_identity(native_id, station_name.as_deref(), latitude, longitude);

            readings.push(Reading::new(
                station_id,
                station_name,
                timestamp,
                latitude,
                longitude,
                fields,
            ));
        }

        // Stable sort: equal timestamps keep input row order, so "latest"
        // ties resolve to the later input row
        readings.sort_by_key(|r| r.timestamp);

        let meta_columns = [&timestamp_col, &latitude_col, &longitude_col];
        let numeric_columns: Vec<String> = columns
            .iter()
            .filter(|col| !meta_columns.contains(col))
            .filter(|col| is_numeric_column(&readings, col))
            .cloned()
            .collect();

        debug!(
            rows = readings.len(),
            dropped = dropped_rows,
            numeric_columns = numeric_columns.len(),
            "cleaned input table"
        );

        Ok(SensorTable::new(
            columns,
            readings,
            numeric_columns,
            dropped_rows,
        ))
    }
}

impl Default for SensorCsvReader {
    fn default() -> Self {
        Self::new()
    }
}

fn mandatory(resolver: &ColumnResolver, tokens: &[&str], name: &str) -> Result<String> {
    resolver
        .resolve(tokens)
        .map(str::to_string)
        .ok_or_else(|| ProcessingError::MissingColumn {
            name: name.to_string(),
        })
}

/// A column is numeric when it has at least one non-empty cell and every
/// non-empty cell parses as a float
fn is_numeric_column(readings: &[Reading], column: &str) -> bool {
    let mut seen_value = false;
    for reading in readings {
        if let Some(raw) = reading.raw(column) {
            if parse_numeric(raw).is_none() {
                return false;
            }
            seen_value = true;
        }
    }
    seen_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_row_survives_iff_mandatory_fields_parse() {
        let file = write_csv(
            "timestamp,latitud,longitud,pm25\n\
             2025-11-04T10:00:00,4.60,-74.08,12\n\
             not-a-time,4.60,-74.08,13\n\
             2025-11-04T11:00:00,abc,-74.08,14\n\
             2025-11-04T12:00:00,4.60,,15\n\
             2025-11-04T13:00:00,4.61,-74.09,16\n",
        );

        let table = SensorCsvReader::new().read(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped_rows(), 3);
    }

    #[test]
    fn test_missing_mandatory_column_is_fatal() {
        let file = write_csv("timestamp,longitud,pm25\n2025-11-04T10:00:00,-74.08,12\n");
        let err = SensorCsvReader::new().read(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::MissingColumn { ref name } if name == "latitude"
        ));
    }

    #[test]
    fn test_identity_from_native_column() {
        let file = write_csv(
            "timestamp,latitud,longitud,estacion_id,pm25\n\
             2025-11-04T10:00:00,4.60,-74.08,EST-1,12\n\
             2025-11-04T11:00:00,4.99,-74.99,EST-1,13\n",
        );

        let table = SensorCsvReader::new().read(file.path()).unwrap();
        let groups = table.group_by_station();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["EST-1"].len(), 2);
    }

    #[test]
    fn test_identity_falls_back_to_trimmed_station_name() {
        let file = write_csv(
            "timestamp,latitud,longitud,nombre_estacion,pm25\n\
             2025-11-04T10:00:00,4.60,-74.08,  Centro  ,12\n\
             2025-11-04T11:00:00,4.60,-74.08,Centro,13\n",
        );

        let table = SensorCsvReader::new().read(file.path()).unwrap();
        let groups = table.group_by_station();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["Centro"].len(), 2);
        assert_eq!(
            table.readings()[0].station_name.as_deref(),
            Some("Centro")
        );
    }

    #[test]
    fn test_identity_synthesized_from_coordinates() {
        let file = write_csv(
            "timestamp,latitud,longitud,pm25\n\
             2025-11-04T10:00:00,4.60,-74.08,12\n\
             2025-11-04T11:00:00,4.60,-74.08,13\n\
             2025-11-04T12:00:00,4.61,-74.08,14\n",
        );

        let table = SensorCsvReader::new().read(file.path()).unwrap();
        let groups = table.group_by_station();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["lat4.6_lon-74.08"].len(), 2);
    }

    #[test]
    fn test_readings_sorted_stably_by_timestamp() {
        let file = write_csv(
            "timestamp,latitud,longitud,pm25\n\
             2025-11-04T12:00:00,4.60,-74.08,30\n\
             2025-11-04T10:00:00,4.60,-74.08,10\n\
             2025-11-04T12:00:00,4.60,-74.08,40\n",
        );

        let table = SensorCsvReader::new().read(file.path()).unwrap();
        let values: Vec<Option<f64>> =
            table.readings().iter().map(|r| r.numeric("pm25")).collect();
        assert_eq!(values, vec![Some(10.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_numeric_column_detection() {
        let file = write_csv(
            "timestamp,latitud,longitud,pm25,firmware,battery\n\
             2025-11-04T10:00:00,4.60,-74.08,12,v2.1,88\n\
             2025-11-04T11:00:00,4.60,-74.08,13,v2.1,\n",
        );

        let table = SensorCsvReader::new().read(file.path()).unwrap();
        assert_eq!(
            table.numeric_columns(),
            &["pm25".to_string(), "battery".to_string()]
        );
    }

    #[test]
    fn test_mmap_path_matches_buffered() {
        let file = write_csv(
            "timestamp,latitud,longitud,pm25\n2025-11-04T10:00:00,4.60,-74.08,12\n",
        );

        let buffered = SensorCsvReader::new().read(file.path()).unwrap();
        let mapped = SensorCsvReader::new()
            .with_mmap(true)
            .read(file.path())
            .unwrap();
        assert_eq!(buffered.len(), mapped.len());
        assert_eq!(buffered.numeric_columns(), mapped.numeric_columns());
    }
}
