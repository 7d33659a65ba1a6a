//! Operator input: event types, selection state machines and the
//! acquisition contract used by the analyzer.
//!
//! Pointer and keyboard input is reduced to discrete `InputEvent`s. The
//! state machines in `region` and `line` are pure transition functions
//! `(state, event) -> (state, effects)`; a front end only has to feed events
//! and render effects. `ScriptedOperator` replays recorded events.
pub mod line;
pub mod region;
pub mod script;

pub use line::{LineEffect, LineMeasurement, LinePhase};
pub use region::{DragPhase, RegionSelection, SelectionEffect};
pub use script::{ScriptEvent, ScriptedOperator, SessionScript};

use crate::calibration::ScaleFactor;
use crate::image::RgbImageU8;
use crate::types::Rect;
use log::debug;
use serde::Deserialize;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Confirm the current prompt.
    Enter,
    /// Cancel the current prompt, discarding its input.
    Escape,
    /// Drop the last rectangle or point.
    Undo,
    /// Abort the whole session.
    Quit,
}

/// Discrete pointer/keyboard event in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release { x: i32, y: i32 },
    Key(Key),
}

/// The operator asked to quit, or the session was cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

impl std::fmt::Display for Aborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User exited.")
    }
}

impl std::error::Error for Aborted {}

pub type Acquisition<T> = Result<T, Aborted>;

/// Cooperative cancellation flag shared between front end and analyzer.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(Aborted)` once cancelled.
    pub fn check(&self) -> Acquisition<()> {
        if self.is_cancelled() {
            Err(Aborted)
        } else {
            Ok(())
        }
    }
}

/// Holds whatever a prompt opened (window, event subscription) for exactly
/// the duration of one acquisition. Released on drop, including on abort.
#[derive(Debug)]
pub struct AcquisitionScope {
    prompt: String,
    open: Rc<Cell<usize>>,
}

impl AcquisitionScope {
    pub fn open(prompt: &str, open: &Rc<Cell<usize>>) -> Self {
        open.set(open.get() + 1);
        debug!("prompt opened: {prompt}");
        Self {
            prompt: prompt.to_string(),
            open: Rc::clone(open),
        }
    }
}

impl Drop for AcquisitionScope {
    fn drop(&mut self) {
        self.open.set(self.open.get().saturating_sub(1));
        debug!("prompt closed: {}", self.prompt);
    }
}

/// Interactive collaborator supplying regions and line lengths.
pub trait Operator {
    /// Zero or more rectangles in drawing order; empty when cancelled.
    fn acquire_regions(&mut self, prompt: &str, image: &RgbImageU8) -> Acquisition<Vec<Rect>>;

    /// Length in millimetres of a two-point line, 0.0 when cancelled or
    /// when the operator did not pick exactly two points.
    fn acquire_length(
        &mut self,
        prompt: &str,
        image: &RgbImageU8,
        scale: ScaleFactor,
    ) -> Acquisition<f64>;

    /// First drawn rectangle, or `Rect::EMPTY`.
    fn acquire_single_region(&mut self, prompt: &str, image: &RgbImageU8) -> Acquisition<Rect> {
        Ok(self
            .acquire_regions(prompt, image)?
            .first()
            .copied()
            .unwrap_or(Rect::EMPTY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());
        other.cancel();
        assert_eq!(token.check(), Err(Aborted));
    }

    #[test]
    fn scope_is_released_on_drop() {
        let open = Rc::new(Cell::new(0));
        {
            let _a = AcquisitionScope::open("a", &open);
            let _b = AcquisitionScope::open("b", &open);
            assert_eq!(open.get(), 2);
        }
        assert_eq!(open.get(), 0);
    }
}
