#![allow(dead_code)]

pub mod synthetic_image;

use plant_morphometry::analyzer::VisualizationSink;
use plant_morphometry::image::RgbImageU8;
use plant_morphometry::interaction::{CancelToken, ScriptedOperator, SessionScript};
use plant_morphometry::mask::Mask;
use plant_morphometry::skeleton::Skeleton;
use plant_morphometry::types::PlantMetrics;

/// What the visualization sink received for one plant.
pub struct Presented {
    pub crop: RgbImageU8,
    pub skeleton: Skeleton,
    pub endpoints: Mask,
    pub metrics: PlantMetrics,
}

#[derive(Default)]
pub struct RecordingSink {
    pub presented: Vec<Presented>,
}

impl VisualizationSink for RecordingSink {
    fn present(
        &mut self,
        crop: &RgbImageU8,
        skeleton: &Skeleton,
        endpoints: &Mask,
        metrics: &PlantMetrics,
    ) -> Result<(), String> {
        self.presented.push(Presented {
            crop: crop.clone(),
            skeleton: skeleton.clone(),
            endpoints: endpoints.clone(),
            metrics: metrics.clone(),
        });
        Ok(())
    }
}

pub fn scripted(json: &str) -> (ScriptedOperator, CancelToken) {
    let cancel = CancelToken::new();
    let script = SessionScript::from_json(json).expect("valid session script");
    (ScriptedOperator::new(script, cancel.clone()), cancel)
}
