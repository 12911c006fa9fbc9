pub mod cli;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
