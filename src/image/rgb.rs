//! Owned 8-bit RGB raster (interleaved, row-major, tightly packed).
//!
//! The analysed photograph and every per-plant crop live in this type. It is
//! never mutated after loading; masking and channel extraction return new
//! buffers.
use super::GrayImageU8;
use crate::mask::Mask;

/// Channel index of green in an interleaved RGB pixel.
pub const GREEN: usize = 1;

// ITU-R BT.601 luma weights in 14-bit fixed point (sum = 1 << 14).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImageU8 {
    /// Wrap interleaved RGB bytes; `data.len()` must equal `3 * width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            3 * width * height,
            "rgb buffer length does not match {width}x{height}"
        );
        Self {
            width,
            height,
            data,
        }
    }

    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(3 * width * height);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self::new(width, height, data)
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

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = 3 * (y * self.width + x);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = 3 * (y * self.width + x);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Extract one colour plane (0 = R, 1 = G, 2 = B).
    pub fn channel(&self, c: usize) -> GrayImageU8 {
        assert!(c < 3, "channel index {c} out of range");
        let plane = self.data.chunks_exact(3).map(|px| px[c]).collect();
        GrayImageU8::new(self.width, self.height, plane)
    }

    pub fn green(&self) -> GrayImageU8 {
        self.channel(GREEN)
    }

    /// Luma conversion `0.299 R + 0.587 G + 0.114 B`, rounded to nearest.
    pub fn to_gray(&self) -> GrayImageU8 {
        let round = 1u32 << (LUMA_SHIFT - 1);
        let plane = self
            .data
            .chunks_exact(3)
            .map(|px| {
                let y = px[0] as u32 * LUMA_R + px[1] as u32 * LUMA_G + px[2] as u32 * LUMA_B;
                ((y + round) >> LUMA_SHIFT) as u8
            })
            .collect();
        GrayImageU8::new(self.width, self.height, plane)
    }

    /// Copy of the image with every pixel outside `mask` set to black.
    ///
    /// Panics if the mask shape differs from the image shape.
    pub fn masked(&self, mask: &Mask) -> RgbImageU8 {
        assert_eq!(
            mask.shape(),
            self.shape(),
            "mask shape must match the image it is applied to"
        );
        let mut data = self.data.clone();
        for (px, &m) in data.chunks_exact_mut(3).zip(mask.data()) {
            if m == 0 {
                px.fill(0);
            }
        }
        RgbImageU8 {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    #[test]
    fn gray_conversion_matches_bt601_weights() {
        let mut img = RgbImageU8::filled(3, 1, [0, 0, 0]);
        img.put_pixel(0, 0, [255, 0, 0]);
        img.put_pixel(1, 0, [0, 255, 0]);
        img.put_pixel(2, 0, [0, 0, 255]);
        let gray = img.to_gray();
        assert_eq!(gray.data(), &[76, 150, 29]);
        assert_eq!(RgbImageU8::filled(1, 1, [255, 255, 255]).to_gray().data(), &[255]);
    }

    #[test]
    fn green_plane_is_extracted() {
        let img = RgbImageU8::filled(4, 2, [10, 120, 30]);
        let g = img.green();
        assert!(g.data().iter().all(|&v| v == 120));
        assert_eq!((g.as_view().w, g.as_view().h), (4, 2));
    }

    #[test]
    fn masking_blacks_out_outside_pixels() {
        let img = RgbImageU8::filled(5, 5, [9, 9, 9]);
        let mask = Mask::from_rect(img.shape(), Rect::new(1, 1, 2, 2));
        let crop = img.masked(&mask);
        assert_eq!(crop.pixel(1, 1), [9, 9, 9]);
        assert_eq!(crop.pixel(2, 2), [9, 9, 9]);
        assert_eq!(crop.pixel(0, 0), [0, 0, 0]);
        assert_eq!(crop.pixel(3, 2), [0, 0, 0]);
        assert_eq!(img.pixel(0, 0), [9, 9, 9], "source must stay untouched");
    }
}
