use chrono::Local;
use std::path::PathBuf;

/// Default artifact filename: aqmap-{YYMMDD}.html
pub fn generate_default_artifact_filename() -> PathBuf {
    PathBuf::from(format!("aqmap-{}.html", Local::now().format("%y%m%d")))
}
