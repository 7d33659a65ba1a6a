//! Euclidean distance transform and skeleton-sampled radius estimation.
//!
//! The transform is exact and separable (Felzenszwalb & Huttenlocher 2012):
//! a 1-D squared-distance lower envelope is computed down every column and
//! then along every row. Background pixels map to 0, foreground pixels to
//! the distance between their centre and the centre of the nearest
//! background pixel.
//!
//! Pixels outside the grid are not background. A mask without any
//! background pixel is measured against the ring of pixels just outside the
//! grid instead, so the field stays finite.
use crate::calibration::ScaleFactor;
use crate::image::{ImageF32, ImageViewMut};
use crate::mask::Mask;
use crate::skeleton::Skeleton;
use serde::{Deserialize, Serialize};

const FAR: f64 = 1e20;

/// Squared-distance lower envelope of `f` into `d`.
fn envelope_1d(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }
    let intersect = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        let mut s = intersect(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersect(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in d.iter_mut().enumerate().take(n) {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        *out = dq * dq + f[v[k]];
    }
}

/// Distance from every pixel to the nearest background pixel.
pub fn distance_transform(mask: &Mask) -> ImageF32 {
    let (w, h) = (mask.width(), mask.height());
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    if mask.count() == w * h {
        for y in 0..h {
            let row = out.row_mut(y);
            for (x, px) in row.iter_mut().enumerate() {
                let nearest = (x + 1).min(w - x).min(y + 1).min(h - y);
                *px = nearest as f32;
            }
        }
        return out;
    }

    let n = w.max(h);
    let mut f = vec![0.0f64; n];
    let mut d = vec![0.0f64; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];
    let mut sq = vec![0.0f64; w * h];

    for x in 0..w {
        for y in 0..h {
            f[y] = if mask.is_set(x, y) { FAR } else { 0.0 };
        }
        envelope_1d(&f[..h], &mut d[..h], &mut v, &mut z);
        for y in 0..h {
            sq[y * w + x] = d[y];
        }
    }
    for y in 0..h {
        f[..w].copy_from_slice(&sq[y * w..(y + 1) * w]);
        envelope_1d(&f[..w], &mut d[..w], &mut v, &mut z);
        let row = out.row_mut(y);
        for (px, &dd) in row.iter_mut().zip(&d[..w]) {
            *px = dd.sqrt() as f32;
        }
    }
    out
}

/// Radius estimation knobs.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RadiusOptions {
    /// Subtracted from each sampled centre-to-centre distance so the radius
    /// is measured to the edge of the boundary pixel. A unit-width line then
    /// has half-width 0.5. Set to 0 to report raw transform values.
    pub boundary_offset_px: f32,
}

impl Default for RadiusOptions {
    fn default() -> Self {
        Self {
            boundary_offset_px: 0.5,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RadiusEstimate {
    /// Mean half-width in pixels, 0 when no skeleton pixel was sampled.
    pub mean_radius_px: f64,
    pub samples: usize,
    /// `2 × mean_radius_px × scale`
    pub diameter_mm: f64,
}

/// Sample `field` on the skeleton and average.
pub fn estimate_radius(
    field: &ImageF32,
    skeleton: &Skeleton,
    scale: ScaleFactor,
    options: &RadiusOptions,
) -> RadiusEstimate {
    let mut sum = 0.0f64;
    let mut samples = 0usize;
    for (x, y) in skeleton.as_mask().foreground() {
        sum += field.get(x, y) as f64;
        samples += 1;
    }
    if samples == 0 {
        return RadiusEstimate::default();
    }
    let mean = sum / samples as f64;
    let mean_radius_px = (mean - options.boundary_offset_px as f64).max(0.0);
    RadiusEstimate {
        mean_radius_px,
        samples,
        diameter_mm: scale.to_mm(2.0 * mean_radius_px),
    }
}
