pub mod analyzer;
pub mod skeleton_tool;

pub use analyzer::{load_config, AbortPolicy, AnalyzerConfig, OutputConfig};
