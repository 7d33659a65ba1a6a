use crate::distance::RadiusOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct SkeletonToolConfig {
    /// Mask image; any nonzero pixel is foreground.
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Millimetres per pixel; 0 reports pixel quantities only.
    #[serde(default)]
    pub mm_per_px: f64,
    #[serde(default)]
    pub radius: RadiusOptions,
    pub output: SkeletonOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SkeletonOutputConfig {
    #[serde(rename = "skeleton_image")]
    pub skeleton_image: PathBuf,
    #[serde(rename = "summary_json")]
    pub summary_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<SkeletonToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
