pub mod csv_reader;

pub use csv_reader::{SensorCsvReader, SensorTable};
