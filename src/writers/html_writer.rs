use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{CanonicalVariable, MapDataset};

const MAP_TEMPLATE: &str = include_str!("map_template.html");

/// Renders a MapDataset into the self-contained HTML artifact by
/// substituting JSON payloads into the static template. The template is pure
/// presentation; everything it displays is precomputed by the pipeline.
pub struct HtmlWriter {
    template: &'static str,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self {
            template: MAP_TEMPLATE,
        }
    }

    pub fn render(&self, dataset: &MapDataset) -> Result<String> {
        let labels: serde_json::Map<String, serde_json::Value> = CanonicalVariable::ALL
            .iter()
            .map(|v| (v.as_str().to_string(), v.label().into()))
            .collect();

        let html = self
            .template
            .replace(
                "__LATEST_JSON__",
                &serde_json::to_string(&dataset.latest_records)?,
            )
            .replace(
                "__HIST_JSON__",
                &serde_json::to_string(&dataset.station_histories)?,
            )
            .replace(
                "__STATS_JSON__",
                &serde_json::to_string(&dataset.station_stats)?,
            )
            .replace(
                "__ALL_TIMES_JSON__",
                &serde_json::to_string(&serialized_times(dataset))?,
            )
            .replace(
                "__GLOBAL_AVG_JSON__",
                &serde_json::to_string(&dataset.global_averages)?,
            )
            .replace("__LABELS_JSON__", &serde_json::to_string(&labels)?)
            .replace(
                "__DETAIL_KEYS_JSON__",
                &serde_json::to_string(&dataset.selected_detail_keys)?,
            )
            .replace("__LEGEND_JSON__", &serde_json::to_string(&dataset.legend)?)
            .replace("__CENTER_LAT__", &format!("{:.6}", dataset.center_lat))
            .replace("__CENTER_LON__", &format!("{:.6}", dataset.center_lon));

        Ok(html)
    }

    pub fn write(&self, dataset: &MapDataset, path: &Path) -> Result<ArtifactInfo> {
        let html = self.render(dataset)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &html)?;

        Ok(ArtifactInfo {
            path: path.to_path_buf(),
            size_bytes: html.len() as u64,
        })
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn serialized_times(dataset: &MapDataset) -> Vec<String> {
    dataset
        .all_times
        .iter()
        .map(crate::models::reading::format_iso)
        .collect()
}

/// Details about a written artifact
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ArtifactInfo {
    pub fn summary(&self) -> String {
        format!(
            "Artifact: {} ({:.1} KB)",
            self.path.display(),
            self.size_bytes as f64 / 1024.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LegendTier;
    use std::collections::BTreeMap;

    fn empty_dataset() -> MapDataset {
        MapDataset {
            latest_records: vec![],
            station_histories: BTreeMap::new(),
            station_stats: BTreeMap::new(),
            all_times: vec![],
            global_averages: vec![],
            center_lat: 4.6097,
            center_lon: -74.0817,
            selected_detail_keys: vec!["pm25".to_string()],
            legend: LegendTier::pm25_tiers(),
        }
    }

    #[test]
    fn test_all_placeholders_substituted() {
        let html = HtmlWriter::new().render(&empty_dataset()).unwrap();
        for placeholder in [
            "__LATEST_JSON__",
            "__HIST_JSON__",
            "__STATS_JSON__",
            "__ALL_TIMES_JSON__",
            "__GLOBAL_AVG_JSON__",
            "__LABELS_JSON__",
            "__DETAIL_KEYS_JSON__",
            "__LEGEND_JSON__",
            "__CENTER_LAT__",
            "__CENTER_LON__",
        ] {
            assert!(!html.contains(placeholder), "unsubstituted {placeholder}");
        }
    }

    #[test]
    fn test_embedded_payloads_present() {
        let html = HtmlWriter::new().render(&empty_dataset()).unwrap();
        assert!(html.contains("const CENTER = [4.609700, -74.081700];"));
        assert!(html.contains("\"Peligroso\""));
        assert!(html.contains("const DETAIL_KEYS = [\"pm25\"];"));
    }

    #[test]
    fn test_write_creates_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("mapa.html");
        let info = HtmlWriter::new().write(&empty_dataset(), &path).unwrap();

        assert!(path.exists());
        assert!(info.size_bytes > 0);
        assert!(info.summary().contains("mapa.html"));
    }
}
