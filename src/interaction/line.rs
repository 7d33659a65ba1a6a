//! Two-point line measurement state machine.
//!
//! Presses add points until two are placed; further presses are ignored.
//! Enter only confirms with exactly two points. Escape drops both points
//! and ends the prompt with a zero length.
use super::{InputEvent, Key};
use crate::calibration::ScaleFactor;
use nalgebra::Point2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinePhase {
    Collecting,
    Confirmed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineEffect {
    PointAdded(Point2<f64>),
    PointRemoved(Point2<f64>),
    /// Both points placed; pixel length of the line.
    Complete { length_px: f64 },
    Cleared,
    Confirmed,
    QuitRequested,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineMeasurement {
    pub phase: LinePhase,
    pub points: Vec<Point2<f64>>,
}

impl Default for LineMeasurement {
    fn default() -> Self {
        Self {
            phase: LinePhase::Collecting,
            points: Vec::with_capacity(2),
        }
    }
}

impl LineMeasurement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(mut self, event: InputEvent) -> (Self, Vec<LineEffect>) {
        let mut effects = Vec::new();
        if self.phase != LinePhase::Collecting {
            return (self, effects);
        }
        match event {
            InputEvent::Press { x, y } if self.points.len() < 2 => {
                let p = Point2::new(x as f64, y as f64);
                self.points.push(p);
                effects.push(LineEffect::PointAdded(p));
                if let Some(length_px) = self.length_px() {
                    effects.push(LineEffect::Complete { length_px });
                }
            }
            InputEvent::Key(Key::Enter) if self.points.len() == 2 => {
                self.phase = LinePhase::Confirmed;
                effects.push(LineEffect::Confirmed);
            }
            InputEvent::Key(Key::Escape) => {
                self.points.clear();
                self.phase = LinePhase::Cancelled;
                effects.push(LineEffect::Cleared);
            }
            InputEvent::Key(Key::Undo) => {
                if let Some(p) = self.points.pop() {
                    effects.push(LineEffect::PointRemoved(p));
                }
            }
            InputEvent::Key(Key::Quit) => {
                self.phase = LinePhase::Cancelled;
                effects.push(LineEffect::QuitRequested);
            }
            _ => {}
        }
        (self, effects)
    }

    /// Euclidean pixel distance between the two points, if both are placed.
    pub fn length_px(&self) -> Option<f64> {
        match self.points.as_slice() {
            [a, b] => Some(nalgebra::distance(a, b)),
            _ => None,
        }
    }

    /// Length in millimetres, 0.0 unless exactly two points remain and the
    /// measurement was not cancelled.
    pub fn length_mm(&self, scale: ScaleFactor) -> f64 {
        if self.phase == LinePhase::Cancelled {
            return 0.0;
        }
        self.length_px().map_or(0.0, |px| scale.to_mm(px))
    }
}
