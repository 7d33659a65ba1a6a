//! Binary masks over an image grid.
//!
//! Foreground is stored as 255 and background as 0 so a mask can be written
//! straight to an 8-bit PNG. The shape of a mask always equals the shape of
//! the image it was derived from.
use crate::image::{ImageView, ImageViewMut};
use crate::types::Rect;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    /// All-background mask of shape `(height, width)`.
    pub fn empty(shape: (usize, usize)) -> Self {
        let (height, width) = shape;
        Self {
            width,
            height,
            data: vec![BACKGROUND; width * height],
        }
    }

    /// Rectangle mask: the part of `rect` that overlaps the image is
    /// foreground, everything else background. Degenerate rects give an
    /// all-background mask.
    pub fn from_rect(shape: (usize, usize), rect: Rect) -> Self {
        let mut mask = Self::empty(shape);
        if let Some((x0, y0, x1, y1)) = rect.clamped(shape) {
            for y in y0..y1 {
                mask.row_mut(y)[x0..x1].fill(FOREGROUND);
            }
        }
        mask
    }

    /// Binarize any raster with a predicate.
    pub fn from_view<V, F>(view: &V, is_foreground: F) -> Self
    where
        V: ImageView,
        F: Fn(V::Pixel) -> bool,
    {
        let mut mask = Self::empty(view.shape());
        for (y, row) in view.rows().enumerate() {
            let out = mask.row_mut(y);
            for (dst, &v) in out.iter_mut().zip(row) {
                if is_foreground(v) {
                    *dst = FOREGROUND;
                }
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != BACKGROUND
    }

    /// Bounds-checked lookup with signed coordinates; outside pixels are background.
    #[inline]
    pub fn is_set_at(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.is_set(x as usize, y as usize)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = if on { FOREGROUND } else { BACKGROUND };
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != BACKGROUND).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == BACKGROUND)
    }

    /// True when every foreground pixel here is also foreground in `other`.
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| a == BACKGROUND || b != BACKGROUND)
    }

    /// Iterate `(x, y)` of foreground pixels in row-major order.
    pub fn foreground(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != BACKGROUND)
            .map(move |(i, _)| (i % w, i / w))
    }
}

impl ImageView for Mask {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.width
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl ImageViewMut for Mask {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_inside_image_covers_exactly_its_area() {
        for &(x, y, w, h) in &[(0, 0, 1, 1), (3, 4, 10, 7), (10, 10, 50, 30), (0, 0, 64, 48)] {
            let mask = Mask::from_rect((48, 64), Rect::new(x, y, w, h));
            assert_eq!(mask.count(), (w * h) as usize, "rect ({x},{y},{w},{h})");
            assert_eq!(mask.shape(), (48, 64));
        }
    }

    #[test]
    fn rect_crossing_the_border_is_clamped() {
        let mask = Mask::from_rect((20, 30), Rect::new(25, 15, 10, 10));
        assert_eq!(mask.count(), 5 * 5);
        let mask = Mask::from_rect((20, 30), Rect::new(-4, -2, 6, 4));
        assert_eq!(mask.count(), 2 * 2);
        assert!(mask.is_set(0, 0) && mask.is_set(1, 1) && !mask.is_set(2, 0));
    }

    #[test]
    fn degenerate_rect_gives_empty_mask() {
        assert!(Mask::from_rect((10, 10), Rect::new(2, 2, 0, 5)).is_empty());
        assert!(Mask::from_rect((10, 10), Rect::new(2, 2, 5, 0)).is_empty());
        assert!(Mask::from_rect((10, 10), Rect::EMPTY).is_empty());
    }

    #[test]
    fn rect_bounds_are_half_open() {
        let mask = Mask::from_rect((10, 10), Rect::new(2, 3, 4, 2));
        assert!(mask.is_set(2, 3));
        assert!(mask.is_set(5, 4));
        assert!(!mask.is_set(6, 4));
        assert!(!mask.is_set(5, 5));
        assert!(!mask.is_set_at(-1, 3));
    }
}
