use crate::calibration::REFERENCE_LENGTH_MM;
use crate::distance::RadiusOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with completed rows when the operator quits mid-run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortPolicy {
    /// Write nothing.
    #[default]
    Discard,
    /// Write the rows of fully measured plants.
    KeepCompleted,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Physical length spanned by the longer side of the reference box.
    pub reference_length_mm: f64,
    pub radius: RadiusOptions,
    pub output: OutputConfig,
    pub abort_policy: AbortPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            reference_length_mm: REFERENCE_LENGTH_MM,
            radius: RadiusOptions::default(),
            output: OutputConfig::default(),
            abort_policy: AbortPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv: PathBuf,
    /// Optional JSON report with per-plant diagnostics.
    pub json: Option<PathBuf>,
    /// Directory for overlay PNGs; `None` disables them.
    pub overlay_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("professional_metrics.csv"),
            json: None,
            overlay_dir: Some(PathBuf::from(".")),
        }
    }
}

pub fn load_config(path: &Path) -> Result<AnalyzerConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<AnalyzerConfig, serde_json::Error> {
    serde_json::from_str(json)
}
