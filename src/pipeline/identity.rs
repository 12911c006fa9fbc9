/// Derive the stable station key for one row, checked in order:
/// native identity column, then human-readable name, then a deterministic
/// synthesis from the coordinates at full float precision. Rows sharing
/// exact lat/lon floats therefore collapse into one synthesized station.
pub fn assign_identity(
    native_id: Option<&str>,
    station_name: Option<&str>,
    latitude: f64,
    longitude: f64,
) -> String {
    if let Some(id) = native_id.map(str::trim).filter(|s| !s.is_empty()) {
        return id.to_string();
    }
    if let Some(name) = station_name.map(str::trim).filter(|s| !s.is_empty()) {
        return name.to_string();
    }
    format!("lat{latitude}_lon{longitude}")
}
