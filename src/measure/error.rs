use crate::types::PlantIndex;

/// Reasons a plant could not be measured. No record is produced for the
/// plant when any of these is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum MeasureError {
    ShapeMismatch {
        image: (usize, usize),
        mask: (usize, usize),
    },
    InvalidManualValue {
        plant: PlantIndex,
        field: &'static str,
        value: f64,
    },
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::ShapeMismatch { image, mask } => write!(
                f,
                "mask shape {}x{} does not match image shape {}x{}",
                mask.1, mask.0, image.1, image.0
            ),
            MeasureError::InvalidManualValue {
                plant,
                field,
                value,
            } => write!(
                f,
                "plant {plant}: manual {field} must be a finite value >= 0 (got {value})"
            ),
        }
    }
}

impl std::error::Error for MeasureError {}
