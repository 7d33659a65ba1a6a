#![doc = include_str!("../README.md")]

// Measurement core
pub mod calibration;
pub mod distance;
pub mod intensity;
pub mod mask;
pub mod measure;
pub mod skeleton;
pub mod table;
pub mod types;

// Image buffers and I/O
pub mod image;

// Orchestration, operator input and sinks
pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod interaction;
pub mod overlay;

// --- High-level re-exports -------------------------------------------------

pub use crate::analyzer::{AnalysisOutcome, AnalyzeError, Analyzer, NullSink, VisualizationSink};
pub use crate::calibration::{calibrate_scale, ScaleFactor, REFERENCE_LENGTH_MM};
pub use crate::mask::Mask;
pub use crate::measure::{ManualMeasurements, MeasureError, PlantInput, PlantMeasurer};
pub use crate::skeleton::{Skeleton, SkeletonAnalysis};
pub use crate::table::MetricsTable;
pub use crate::types::{PlantIndex, PlantMetrics, Rect};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for scripts and tests.
///
/// ```
/// use plant_morphometry::prelude::*;
///
/// let root = Mask::from_rect((100, 100), Rect::new(40, 20, 1, 20));
/// let analysis = Skeleton::extract(&root).analyze();
/// assert_eq!(analysis.branch_count, 2);
/// assert_eq!(calibrate_scale(Rect::new(0, 0, 30, 10), REFERENCE_LENGTH_MM).mm_per_px(), 10.0);
/// ```
pub mod prelude {
    pub use crate::image::{GrayImageU8, ImageView, RgbImageU8};
    pub use crate::{
        calibrate_scale, Analyzer, Mask, MetricsTable, PlantMetrics, Rect, ScaleFactor, Skeleton,
        REFERENCE_LENGTH_MM,
    };
}
