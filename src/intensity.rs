//! Mean intensity of a single-channel image restricted to a mask.
use crate::image::ImageView;
use crate::mask::Mask;
use crate::measure::MeasureError;

/// Arithmetic mean of `image` over the foreground of `mask`.
///
/// An all-background mask yields 0 rather than an error so the per-plant
/// arithmetic stays total.
pub fn masked_mean<I>(image: &I, mask: &Mask) -> Result<f64, MeasureError>
where
    I: ImageView<Pixel = u8>,
{
    if image.shape() != mask.shape() {
        return Err(MeasureError::ShapeMismatch {
            image: image.shape(),
            mask: mask.shape(),
        });
    }
    let mut sum = 0u64;
    let mut count = 0u64;
    for (row, mrow) in image.rows().zip(mask.rows()) {
        for (&v, &m) in row.iter().zip(mrow) {
            if m != 0 {
                sum += v as u64;
                count += 1;
            }
        }
    }
    if count == 0 {
        return Ok(0.0);
    }
    Ok(sum as f64 / count as f64)
}
