use crate::types::PlantMetrics;
use serde::Serialize;

/// Intermediate quantities gathered while measuring one plant.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PlantDiagnostics {
    pub root_area_px: usize,
    pub shoot_area_px: usize,
    pub skeleton_pixels: usize,
    pub endpoint_count: usize,
    /// Skeleton pixels with three or more neighbours. Not part of the table.
    pub junction_count: usize,
    pub radius_samples: usize,
    pub mean_radius_px: f64,
    /// Distance-transform diameter along the root skeleton.
    pub skeleton_diameter_mm: f64,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlantReport {
    pub metrics: PlantMetrics,
    pub diagnostics: PlantDiagnostics,
}

/// Whole-run report written next to the CSV table.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub image_width: usize,
    pub image_height: usize,
    pub mm_per_px: f64,
    pub calibrated: bool,
    pub plants: Vec<PlantReport>,
    pub total_latency_ms: f64,
}
