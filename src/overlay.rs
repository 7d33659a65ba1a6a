//! Skeleton overlay rendering: skeleton in red, endpoints in blue, drawn
//! over the plant crop.
use crate::analyzer::VisualizationSink;
use crate::image::io::save_rgb_image;
use crate::image::RgbImageU8;
use crate::mask::Mask;
use crate::skeleton::Skeleton;
use crate::types::PlantMetrics;
use log::info;
use std::path::PathBuf;

pub const SKELETON_COLOR: [u8; 3] = [255, 0, 0];
pub const ENDPOINT_COLOR: [u8; 3] = [0, 0, 255];

pub fn render_overlay(crop: &RgbImageU8, skeleton: &Skeleton, endpoints: &Mask) -> RgbImageU8 {
    let mut out = crop.clone();
    for (x, y) in skeleton.as_mask().foreground() {
        out.put_pixel(x, y, SKELETON_COLOR);
    }
    for (x, y) in endpoints.foreground() {
        out.put_pixel(x, y, ENDPOINT_COLOR);
    }
    out
}

/// Writes `<dir>/<basename>_plant<N>_branches.png` for every plant.
#[derive(Clone, Debug)]
pub struct OverlaySink {
    dir: PathBuf,
    basename: String,
    written: Vec<PathBuf>,
}

impl OverlaySink {
    pub fn new(dir: impl Into<PathBuf>, basename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            basename: basename.into(),
            written: Vec::new(),
        }
    }

    pub fn path_for(&self, plant: usize) -> PathBuf {
        self.dir
            .join(format!("{}_plant{}_branches.png", self.basename, plant))
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl VisualizationSink for OverlaySink {
    fn present(
        &mut self,
        crop: &RgbImageU8,
        skeleton: &Skeleton,
        endpoints: &Mask,
        metrics: &PlantMetrics,
    ) -> Result<(), String> {
        let overlay = render_overlay(crop, skeleton, endpoints);
        let path = self.path_for(metrics.index);
        save_rgb_image(&overlay, &path)?;
        info!(
            "plant {}: green {:.1}, gray {:.1}, branches {}, length {:.1} mm, diameter {:.1} mm -> {}",
            metrics.index,
            metrics.mean_shoot_green,
            metrics.mean_root_gray,
            metrics.branch_count,
            metrics.manual_length_mm,
            metrics.manual_diameter_mm,
            path.display()
        );
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    #[test]
    fn endpoints_are_painted_over_the_skeleton() {
        let crop = RgbImageU8::filled(10, 10, [0, 90, 0]);
        let line = Mask::from_rect((10, 10), Rect::new(4, 2, 1, 5));
        let skeleton = Skeleton::extract(&line);
        let analysis = skeleton.analyze();
        let overlay = render_overlay(&crop, &skeleton, &analysis.endpoints);
        assert_eq!(overlay.pixel(4, 2), ENDPOINT_COLOR);
        assert_eq!(overlay.pixel(4, 4), SKELETON_COLOR);
        assert_eq!(overlay.pixel(4, 6), ENDPOINT_COLOR);
        assert_eq!(overlay.pixel(0, 0), [0, 90, 0]);
    }
}
