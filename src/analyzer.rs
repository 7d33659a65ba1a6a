//! One-image analysis protocol.
//!
//! 1. Ruler box → scale calibration.
//! 2. Plant boxes, in drawing order.
//! 3. Per plant: crop, root box, shoot box, manual length and width, metric
//!    computation, visualization, table append.
//!
//! Plants are processed strictly one after another. Quitting is cooperative:
//! an `Aborted` acquisition or a cancelled `CancelToken` ends the run with
//! `AnalyzeError::Aborted`, which carries the rows completed so far so the
//! caller can apply its own abort policy.
use crate::calibration::{calibrate_scale, ScaleFactor};
use crate::config::AnalyzerConfig;
use crate::diagnostics::{AnalysisReport, PlantReport};
use crate::distance::RadiusOptions;
use crate::image::RgbImageU8;
use crate::interaction::{Aborted, CancelToken, Operator};
use crate::mask::Mask;
use crate::measure::{plant_crop, ManualMeasurements, MeasureError, PlantInput, PlantMeasurer};
use crate::skeleton::Skeleton;
use crate::table::{MetricsTable, TableError};
use crate::types::{PlantIndex, PlantMetrics};
use log::{info, warn};
use std::time::Instant;

/// Receives the per-plant artifacts, unmodified, after each measurement.
pub trait VisualizationSink {
    fn present(
        &mut self,
        crop: &RgbImageU8,
        skeleton: &Skeleton,
        endpoints: &Mask,
        metrics: &PlantMetrics,
    ) -> Result<(), String>;
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl VisualizationSink for NullSink {
    fn present(&mut self, _: &RgbImageU8, _: &Skeleton, _: &Mask, _: &PlantMetrics) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug)]
pub enum AnalyzeError {
    /// The operator selected no plant boxes.
    NoPlants,
    /// Quit requested; `completed` holds fully measured plants.
    Aborted {
        completed: MetricsTable,
        reports: Vec<PlantReport>,
    },
    Measure {
        plant: PlantIndex,
        source: MeasureError,
    },
    Table(TableError),
    Sink {
        plant: PlantIndex,
        message: String,
    },
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::NoPlants => write!(f, "no plants selected"),
            AnalyzeError::Aborted { completed, .. } => {
                write!(f, "{} ({} plant(s) completed)", Aborted, completed.len())
            }
            AnalyzeError::Measure { plant, source } => {
                write!(f, "measuring plant {plant} failed: {source}")
            }
            AnalyzeError::Table(e) => write!(f, "{e}"),
            AnalyzeError::Sink { plant, message } => {
                write!(f, "visualization of plant {plant} failed: {message}")
            }
        }
    }
}

impl std::error::Error for AnalyzeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzeError::Measure { source, .. } => Some(source),
            AnalyzeError::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TableError> for AnalyzeError {
    fn from(e: TableError) -> Self {
        AnalyzeError::Table(e)
    }
}

/// Successful run: the table plus the diagnostic report.
#[derive(Clone, Debug)]
pub struct AnalysisOutcome {
    pub table: MetricsTable,
    pub report: AnalysisReport,
}

#[derive(Clone, Debug)]
pub struct Analyzer {
    reference_length_mm: f64,
    measurer: PlantMeasurer,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl Analyzer {
    pub fn new(reference_length_mm: f64, radius: RadiusOptions) -> Self {
        Self {
            reference_length_mm,
            measurer: PlantMeasurer::new(radius),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.reference_length_mm, config.radius.clone())
    }

    pub fn run<O, S>(
        &self,
        image: &RgbImageU8,
        operator: &mut O,
        sink: &mut S,
        cancel: &CancelToken,
    ) -> Result<AnalysisOutcome, AnalyzeError>
    where
        O: Operator + ?Sized,
        S: VisualizationSink + ?Sized,
    {
        let t0 = Instant::now();
        let mut table = MetricsTable::new();
        let mut reports = Vec::new();
        macro_rules! acquire {
            ($e:expr) => {
                match cancel.check().and_then(|_| $e) {
                    Ok(v) => v,
                    Err(Aborted) => {
                        cancel.cancel();
                        return Err(AnalyzeError::Aborted {
                            completed: table,
                            reports,
                        });
                    }
                }
            };
        }

        let ruler = acquire!(
            operator.acquire_single_region("Draw RULER box (Enter=confirm, Esc=cancel)", image)
        );
        let scale = calibrate_scale(ruler, self.reference_length_mm);
        if scale.is_available() {
            info!("Scale calibrated: {scale}");
        } else {
            warn!("Scale calibration unavailable (degenerate ruler box); millimetre values will be 0");
        }

        let plants = acquire!(
            operator.acquire_regions("Draw PLANT boxes (Z=undo, Enter=done, Esc=cancel)", image)
        );
        info!("Selected {} plant(s).", plants.len());
        if plants.is_empty() {
            return Err(AnalyzeError::NoPlants);
        }

        for (i, &plant) in plants.iter().enumerate() {
            let index = i + 1;
            info!("Analyzing Plant {index}");
            let crop = plant_crop(image, plant);

            let root = acquire!(
                operator.acquire_single_region(&format!("Draw ROOT area for Plant {index}"), &crop)
            );
            let shoot = acquire!(
                operator.acquire_single_region(&format!("Draw SHOOT area for Plant {index}"), &crop)
            );
            let length_mm = acquire!(operator.acquire_length(
                &format!("Measure ROOT LENGTH for Plant {index}"),
                &crop,
                scale
            ));
            let diameter_mm = acquire!(operator.acquire_length(
                &format!("Measure ROOT WIDTH for Plant {index}"),
                &crop,
                scale
            ));

            let input = PlantInput {
                index,
                crop: &crop,
                root,
                shoot,
                manual: ManualMeasurements {
                    length_mm,
                    diameter_mm,
                },
                scale,
            };
            let measurement = self
                .measurer
                .measure(&input)
                .map_err(|source| AnalyzeError::Measure {
                    plant: index,
                    source,
                })?;

            sink.present(
                &crop,
                &measurement.skeleton,
                &measurement.endpoints,
                &measurement.metrics,
            )
            .map_err(|message| AnalyzeError::Sink {
                plant: index,
                message,
            })?;

            reports.push(measurement.report());
            table.append(measurement.metrics)?;
        }

        let report = build_report(image, scale, reports, t0);
        Ok(AnalysisOutcome { table, report })
    }
}

fn build_report(
    image: &RgbImageU8,
    scale: ScaleFactor,
    plants: Vec<PlantReport>,
    t0: Instant,
) -> AnalysisReport {
    AnalysisReport {
        image_width: image.width(),
        image_height: image.height(),
        mm_per_px: scale.mm_per_px(),
        calibrated: scale.is_available(),
        plants,
        total_latency_ms: t0.elapsed().as_secs_f64() * 1000.0,
    }
}
