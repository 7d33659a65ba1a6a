//! Per-plant metric computation.
//!
//! Given the plant crop, the operator's root and shoot rectangles, the image
//! scale and the two manual line measurements, `PlantMeasurer` runs:
//!
//! 1. root and shoot masks over the crop,
//! 2. mean green over the shoot mask,
//! 3. mean luma over the root mask,
//! 4. root skeleton and its endpoint count,
//! 5. distance-transform diameter sampled along that skeleton,
//! 6. validation of the manual values,
//!
//! and assembles one immutable `PlantMetrics` record. Any failure aborts the
//! plant as a whole.
mod error;

pub use error::MeasureError;

use crate::calibration::ScaleFactor;
use crate::diagnostics::{PlantDiagnostics, PlantReport};
use crate::distance::{distance_transform, estimate_radius, RadiusOptions};
use crate::image::RgbImageU8;
use crate::intensity::masked_mean;
use crate::mask::Mask;
use crate::skeleton::Skeleton;
use crate::types::{PlantIndex, PlantMetrics, Rect};
use log::{debug, warn};
use serde::Deserialize;
use std::time::Instant;

/// The plant image with everything outside `plant` blacked out. Same shape
/// as `image`, so rects drawn on the crop are in image coordinates.
pub fn plant_crop(image: &RgbImageU8, plant: Rect) -> RgbImageU8 {
    image.masked(&Mask::from_rect(image.shape(), plant))
}

/// Operator-measured lengths, already converted to millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct ManualMeasurements {
    pub length_mm: f64,
    pub diameter_mm: f64,
}

#[derive(Clone, Debug)]
pub struct PlantInput<'a> {
    pub index: PlantIndex,
    pub crop: &'a RgbImageU8,
    pub root: Rect,
    pub shoot: Rect,
    pub manual: ManualMeasurements,
    pub scale: ScaleFactor,
}

/// Record plus the artifacts handed to the visualization sink.
#[derive(Clone, Debug)]
pub struct PlantMeasurement {
    pub metrics: PlantMetrics,
    pub skeleton: Skeleton,
    pub endpoints: Mask,
    pub diagnostics: PlantDiagnostics,
}

impl PlantMeasurement {
    pub fn report(&self) -> PlantReport {
        PlantReport {
            metrics: self.metrics.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlantMeasurer {
    radius: RadiusOptions,
}

impl PlantMeasurer {
    pub fn new(radius: RadiusOptions) -> Self {
        Self { radius }
    }

    pub fn measure(&self, input: &PlantInput<'_>) -> Result<PlantMeasurement, MeasureError> {
        let t0 = Instant::now();
        let index = input.index;
        let manual_length_mm = validate_manual(index, "length", input.manual.length_mm)?;
        let manual_diameter_mm = validate_manual(index, "diameter", input.manual.diameter_mm)?;

        let shape = input.crop.shape();
        let root_mask = Mask::from_rect(shape, input.root);
        let shoot_mask = Mask::from_rect(shape, input.shoot);
        if root_mask.is_empty() {
            warn!("plant {index}: root selection is empty, root metrics will be 0");
        }
        if shoot_mask.is_empty() {
            warn!("plant {index}: shoot selection is empty, shoot metrics will be 0");
        }

        let mean_shoot_green = masked_mean(&input.crop.green(), &shoot_mask)?;
        let mean_root_gray = masked_mean(&input.crop.to_gray(), &root_mask)?;

        let skeleton = Skeleton::extract(&root_mask);
        let analysis = skeleton.analyze();

        let field = distance_transform(&root_mask);
        let radius = estimate_radius(&field, &skeleton, input.scale, &self.radius);
        debug!(
            "plant {index}: skeleton {} px, {} endpoints, {} junctions, mean radius {:.3} px",
            analysis.pixel_count, analysis.branch_count, analysis.junction_count, radius.mean_radius_px
        );

        let metrics = PlantMetrics {
            index,
            mean_shoot_green,
            mean_root_gray,
            branch_count: analysis.branch_count,
            manual_length_mm,
            manual_diameter_mm,
        };
        let diagnostics = PlantDiagnostics {
            root_area_px: root_mask.count(),
            shoot_area_px: shoot_mask.count(),
            skeleton_pixels: analysis.pixel_count,
            endpoint_count: analysis.branch_count,
            junction_count: analysis.junction_count,
            radius_samples: radius.samples,
            mean_radius_px: radius.mean_radius_px,
            skeleton_diameter_mm: radius.diameter_mm,
            elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
        };
        Ok(PlantMeasurement {
            metrics,
            skeleton,
            endpoints: analysis.endpoints,
            diagnostics,
        })
    }
}

fn validate_manual(plant: PlantIndex, field: &'static str, value: f64) -> Result<f64, MeasureError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MeasureError::InvalidManualValue {
            plant,
            field,
            value,
        })
    }
}
