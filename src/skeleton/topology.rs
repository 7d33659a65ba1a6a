use crate::mask::Mask;

/// 3×3 box sum over a binary mask, centre included, outside pixels zero.
///
/// Returned row-major with one entry per pixel (background pixels included).
pub fn neighbourhood_sums(mask: &Mask) -> Vec<u8> {
    let (w, h) = (mask.width(), mask.height());
    let mut sums = vec![0u8; w * h];
    for (x, y) in mask.foreground() {
        let (x0, x1) = (x.saturating_sub(1), (x + 1).min(w - 1));
        let (y0, y1) = (y.saturating_sub(1), (y + 1).min(h - 1));
        for yy in y0..=y1 {
            for xx in x0..=x1 {
                sums[yy * w + xx] += 1;
            }
        }
    }
    sums
}

/// Skeleton pixels whose box sum equals `2`: the pixel plus exactly one
/// neighbour.
pub fn endpoint_mask(skeleton: &Mask, sums: &[u8]) -> Mask {
    select(skeleton, sums, |s| s == 2)
}

/// Skeleton pixels with three or more neighbours.
pub fn junction_mask(skeleton: &Mask, sums: &[u8]) -> Mask {
    select(skeleton, sums, |s| s >= 4)
}

fn select(skeleton: &Mask, sums: &[u8], keep: impl Fn(u8) -> bool) -> Mask {
    let mut out = Mask::empty(skeleton.shape());
    let w = skeleton.width();
    for (x, y) in skeleton.foreground() {
        if keep(sums[y * w + x]) {
            out.set(x, y, true);
        }
    }
    out
}
