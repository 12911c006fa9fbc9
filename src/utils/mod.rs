pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::generate_default_artifact_filename;
pub use progress::ProgressReporter;
