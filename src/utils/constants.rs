/// Mandatory column token lists, most preferred first (matched case-insensitively)
pub const TIMESTAMP_TOKENS: &[&str] = &["timestamp", "fecha_hora", "datetime", "time"];
pub const LATITUDE_TOKENS: &[&str] = &["latitud", "latitude", "lat"];
pub const LONGITUDE_TOKENS: &[&str] = &["longitud", "longitude", "lon", "lng"];

/// Station identity token lists
pub const STATION_ID_TOKENS: &[&str] = &["estacion_id", "station_id", "sensor_id", "station"];
pub const STATION_NAME_TOKENS: &[&str] = &["nombre_estacion", "station_name", "nombre", "name"];

/// History retention: resampled points kept per station (one week of hourly bins)
pub const MAX_HISTORY_POINTS: usize = 168;

/// Detail panel shows at most this many variable keys
pub const MAX_DETAIL_KEYS: usize = 10;

/// Reader defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// PM2.5 classification tiers for the map legend: (upper bound, label, color)
pub const PM25_LEGEND: &[(f64, &str, &str)] = &[
    (10.0, "Excelente", "#2ecc71"),
    (13.0, "Bueno", "#9ae66a"),
    (35.0, "Regular", "#f1c40f"),
    (55.0, "Malo", "#e67e22"),
    (9999.0, "Peligroso", "#e74c3c"),
];
