//! Pixel-to-millimetre calibration from a reference object.
//!
//! The operator boxes a reference of known physical length (a ruler segment);
//! the longer side of that box is taken to span the reference length.
use crate::types::Rect;
use serde::Serialize;
use std::fmt;

/// Physical length spanned by the reference box, in millimetres.
pub const REFERENCE_LENGTH_MM: f64 = 300.0;

/// Millimetres per pixel. Zero means calibration is unavailable.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const UNAVAILABLE: ScaleFactor = ScaleFactor(0.0);

    /// Non-finite or negative inputs collapse to `UNAVAILABLE`.
    pub fn new(mm_per_px: f64) -> Self {
        if mm_per_px.is_finite() && mm_per_px > 0.0 {
            Self(mm_per_px)
        } else {
            Self::UNAVAILABLE
        }
    }

    #[inline]
    pub fn mm_per_px(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_available(self) -> bool {
        self.0 > 0.0
    }

    /// Convert a pixel distance to millimetres.
    #[inline]
    pub fn to_mm(self, px: f64) -> f64 {
        px * self.0
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} mm/pixel", self.0)
    }
}

/// `reference_length_mm / max(width, height)`, or unavailable for a
/// degenerate box.
pub fn calibrate_scale(reference: Rect, reference_length_mm: f64) -> ScaleFactor {
    let length_px = reference.longest_side();
    if length_px == 0 {
        return ScaleFactor::UNAVAILABLE;
    }
    ScaleFactor::new(reference_length_mm / length_px as f64)
}
