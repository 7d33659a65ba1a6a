//! Replay of recorded operator input.
//!
//! A session script is a JSON document with one step per prompt, in the
//! order the analyzer asks:
//!
//! ```json
//! { "steps": [
//!     [{"drag": [0, 0, 30, 10]}, {"key": "enter"}],
//!     [{"drag": [10, 10, 60, 60]}],
//!     [{"press": [20, 15]}, {"move": [21, 30]}, {"release": [21, 35]}],
//!     [],
//!     [{"click": [20, 15]}, {"click": [20, 30]}, {"key": "enter"}],
//!     [{"key": "escape"}]
//! ] }
//! ```
//!
//! A step whose events run out before the prompt ends is finished as if
//! Enter had been pressed. Missing steps behave like empty ones.
use super::{
    AcquisitionScope, Acquisition, Aborted, CancelToken, InputEvent, Key, LineEffect,
    LineMeasurement, Operator, RegionSelection, SelectionEffect,
};
use crate::calibration::ScaleFactor;
use crate::image::RgbImageU8;
use crate::types::Rect;
use log::{debug, info};
use serde::Deserialize;
use std::cell::Cell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptEvent {
    Press([i32; 2]),
    Move([i32; 2]),
    Release([i32; 2]),
    Key(Key),
    /// Press at the first corner, move and release at the second.
    Drag([i32; 4]),
    /// Single press, as used for line points.
    Click([i32; 2]),
}

impl ScriptEvent {
    fn expand(self, out: &mut Vec<InputEvent>) {
        match self {
            ScriptEvent::Press([x, y]) | ScriptEvent::Click([x, y]) => {
                out.push(InputEvent::Press { x, y })
            }
            ScriptEvent::Move([x, y]) => out.push(InputEvent::Move { x, y }),
            ScriptEvent::Release([x, y]) => out.push(InputEvent::Release { x, y }),
            ScriptEvent::Key(k) => out.push(InputEvent::Key(k)),
            ScriptEvent::Drag([x0, y0, x1, y1]) => out.extend([
                InputEvent::Press { x: x0, y: y0 },
                InputEvent::Move { x: x1, y: y1 },
                InputEvent::Release { x: x1, y: y1 },
            ]),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub steps: Vec<Vec<ScriptEvent>>,
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self, String> {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read session {}: {e}", path.display()))?;
        Self::from_json(&data)
            .map_err(|e| format!("Failed to parse session {}: {e}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// `Operator` driven by a `SessionScript`.
#[derive(Debug)]
pub struct ScriptedOperator {
    steps: VecDeque<Vec<InputEvent>>,
    cancel: CancelToken,
    open_scopes: Rc<Cell<usize>>,
    prompts: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(script: SessionScript, cancel: CancelToken) -> Self {
        let steps = script
            .steps
            .into_iter()
            .map(|step| {
                let mut events = Vec::with_capacity(step.len());
                for e in step {
                    e.expand(&mut events);
                }
                events
            })
            .collect();
        Self {
            steps,
            cancel,
            open_scopes: Rc::new(Cell::new(0)),
            prompts: Vec::new(),
        }
    }

    /// Prompts answered so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Number of acquisitions currently holding resources.
    pub fn open_scopes(&self) -> usize {
        self.open_scopes.get()
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    fn begin(&mut self, prompt: &str) -> Acquisition<(AcquisitionScope, Vec<InputEvent>)> {
        self.cancel.check()?;
        info!("{prompt}");
        self.prompts.push(prompt.to_string());
        let scope = AcquisitionScope::open(prompt, &self.open_scopes);
        let events = self.steps.pop_front().unwrap_or_default();
        Ok((scope, events))
    }

    fn quit(&self) -> Aborted {
        self.cancel.cancel();
        Aborted
    }
}

impl Operator for ScriptedOperator {
    fn acquire_regions(&mut self, prompt: &str, _image: &RgbImageU8) -> Acquisition<Vec<Rect>> {
        let (_scope, events) = self.begin(prompt)?;
        let mut state = RegionSelection::new();
        for event in events.into_iter().chain([InputEvent::Key(Key::Enter)]) {
            if state.phase.is_terminal() {
                break;
            }
            let (next, effects) = state.handle(event);
            state = next;
            for effect in effects {
                match effect {
                    SelectionEffect::QuitRequested => return Err(self.quit()),
                    SelectionEffect::Committed(r) => debug!("region committed: {r:?}"),
                    SelectionEffect::Undone(r) => debug!("region undone: {r:?}"),
                    _ => {}
                }
            }
        }
        Ok(state.result())
    }

    fn acquire_length(
        &mut self,
        prompt: &str,
        _image: &RgbImageU8,
        scale: ScaleFactor,
    ) -> Acquisition<f64> {
        let (_scope, events) = self.begin(prompt)?;
        let mut state = LineMeasurement::new();
        for event in events.into_iter().chain([InputEvent::Key(Key::Enter)]) {
            let (next, effects) = state.handle(event);
            state = next;
            for effect in effects {
                match effect {
                    LineEffect::QuitRequested => return Err(self.quit()),
                    LineEffect::Complete { length_px } => {
                        debug!("line: {length_px:.1} px = {:.1} mm", scale.to_mm(length_px))
                    }
                    _ => {}
                }
            }
        }
        Ok(state.length_mm(scale))
    }
}
