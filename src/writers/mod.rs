pub mod html_writer;

pub use html_writer::{ArtifactInfo, HtmlWriter};
