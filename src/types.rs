use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// 1-based plant number in selection order.
pub type PlantIndex = usize;

/// Operator-drawn axis-aligned rectangle in pixel coordinates.
///
/// `x`/`y` are signed because a drag may start or end outside the image.
/// A rect with zero width or height means "no selection".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanned by two drag corners.
    pub fn from_corners(a: Point2<i32>, b: Point2<i32>) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Longer side in pixels.
    #[inline]
    pub fn longest_side(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Half-open overlap `[x0, x1) × [y0, y1)` with an image of `(height, width)`.
    /// `None` when the rect is degenerate or lies completely outside.
    pub fn clamped(&self, shape: (usize, usize)) -> Option<(usize, usize, usize, usize)> {
        if self.is_degenerate() {
            return None;
        }
        let (h, w) = (shape.0 as i64, shape.1 as i64);
        let x0 = (self.x as i64).clamp(0, w);
        let y0 = (self.y as i64).clamp(0, h);
        let x1 = (self.x as i64 + self.width as i64).clamp(0, w);
        let y1 = (self.y as i64 + self.height as i64).clamp(0, h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

/// Final per-plant record, one row of the metrics table.
///
/// Field names follow the published table header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantMetrics {
    #[serde(rename = "PlantIndex")]
    pub index: PlantIndex,
    #[serde(rename = "MeanShootGreen")]
    pub mean_shoot_green: f64,
    #[serde(rename = "MeanRootGray")]
    pub mean_root_gray: f64,
    /// Endpoint count of the root skeleton (see `skeleton::SkeletonAnalysis`).
    #[serde(rename = "BranchCount")]
    pub branch_count: usize,
    #[serde(rename = "ManualLength_mm")]
    pub manual_length_mm: f64,
    #[serde(rename = "ManualDiameter_mm")]
    pub manual_diameter_mm: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalize_any_drag_direction() {
        let r = Rect::from_corners(Point2::new(40, 30), Point2::new(10, 35));
        assert_eq!(r, Rect::new(10, 30, 30, 5));
        let click = Rect::from_corners(Point2::new(7, 7), Point2::new(7, 7));
        assert!(click.is_degenerate());
    }

    #[test]
    fn clamping_keeps_only_the_overlap() {
        let r = Rect::new(-5, 90, 20, 20);
        assert_eq!(r.clamped((100, 100)), Some((0, 90, 15, 100)));
        assert_eq!(Rect::new(120, 0, 5, 5).clamped((100, 100)), None);
        assert_eq!(Rect::EMPTY.clamped((100, 100)), None);
    }
}
