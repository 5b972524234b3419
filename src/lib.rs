pub mod config;
pub mod error;
pub mod output;
pub mod scoring;
pub mod tables;

pub use error::PipelineError;
