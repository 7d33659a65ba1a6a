//! Rectangle selection state machine.
//!
//! ```text
//!   Idle --press--> Dragging --release--> Idle   (rect committed)
//!   Idle|Dragging --enter--> Confirmed
//!   Idle|Dragging --escape--> Cancelled           (all rects dropped)
//!   any non-terminal --quit--> Cancelled + Quit effect
//! ```
//!
//! `undo` drops the most recent rectangle. Releasing without moving commits
//! a zero-sized rect, which downstream code treats as "no selection".
use super::{InputEvent, Key};
use crate::types::Rect;
use nalgebra::Point2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging { start: Point2<i32> },
    Confirmed,
    Cancelled,
}

impl DragPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DragPhase::Confirmed | DragPhase::Cancelled)
    }
}

/// What a front end should render or act on after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Rubber-band rectangle while dragging.
    Preview(Rect),
    Committed(Rect),
    Undone(Rect),
    Cleared,
    Confirmed,
    QuitRequested,
}

/// Selection session: current phase plus committed rectangles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionSelection {
    pub phase: DragPhase,
    pub rects: Vec<Rect>,
}

impl Default for RegionSelection {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            rects: Vec::new(),
        }
    }
}

impl RegionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition. Events after a terminal phase are ignored.
    pub fn handle(mut self, event: InputEvent) -> (Self, Vec<SelectionEffect>) {
        let mut effects = Vec::new();
        if self.phase.is_terminal() {
            return (self, effects);
        }
        match (self.phase, event) {
            (DragPhase::Idle, InputEvent::Press { x, y }) => {
                self.phase = DragPhase::Dragging {
                    start: Point2::new(x, y),
                };
            }
            (DragPhase::Dragging { start }, InputEvent::Move { x, y }) => {
                effects.push(SelectionEffect::Preview(Rect::from_corners(
                    start,
                    Point2::new(x, y),
                )));
            }
            (DragPhase::Dragging { start }, InputEvent::Release { x, y }) => {
                let rect = Rect::from_corners(start, Point2::new(x, y));
                self.rects.push(rect);
                self.phase = DragPhase::Idle;
                effects.push(SelectionEffect::Committed(rect));
            }
            (_, InputEvent::Key(Key::Enter)) => {
                self.phase = DragPhase::Confirmed;
                effects.push(SelectionEffect::Confirmed);
            }
            (_, InputEvent::Key(Key::Escape)) => {
                self.rects.clear();
                self.phase = DragPhase::Cancelled;
                effects.push(SelectionEffect::Cleared);
            }
            (_, InputEvent::Key(Key::Undo)) => {
                if let Some(rect) = self.rects.pop() {
                    effects.push(SelectionEffect::Undone(rect));
                }
            }
            (_, InputEvent::Key(Key::Quit)) => {
                self.phase = DragPhase::Cancelled;
                effects.push(SelectionEffect::QuitRequested);
            }
            // Stray moves/releases while idle, presses while dragging.
            _ => {}
        }
        (self, effects)
    }

    /// Rectangles to hand back once the session is over: the committed list
    /// when confirmed (or still open), nothing when cancelled.
    pub fn result(&self) -> Vec<Rect> {
        match self.phase {
            DragPhase::Cancelled => Vec::new(),
            _ => self.rects.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[InputEvent]) -> (RegionSelection, Vec<SelectionEffect>) {
        let mut state = RegionSelection::new();
        let mut all = Vec::new();
        for &e in events {
            let (next, effects) = state.handle(e);
            state = next;
            all.extend(effects);
        }
        (state, all)
    }

    fn drag(x0: i32, y0: i32, x1: i32, y1: i32) -> [InputEvent; 3] {
        [
            InputEvent::Press { x: x0, y: y0 },
            InputEvent::Move { x: x1, y: y1 },
            InputEvent::Release { x: x1, y: y1 },
        ]
    }

    #[test]
    fn drag_then_enter_commits_normalized_rects() {
        let mut events = drag(50, 40, 10, 20).to_vec();
        events.extend(drag(0, 0, 5, 6));
        events.push(InputEvent::Key(Key::Enter));
        let (state, effects) = run(&events);
        assert_eq!(state.phase, DragPhase::Confirmed);
        assert_eq!(
            state.result(),
            vec![Rect::new(10, 20, 40, 20), Rect::new(0, 0, 5, 6)]
        );
        assert_eq!(effects[0], SelectionEffect::Preview(Rect::new(10, 20, 40, 20)));
        assert_eq!(effects.last(), Some(&SelectionEffect::Confirmed));
    }

    #[test]
    fn undo_pops_the_latest_rect() {
        let mut events = drag(0, 0, 10, 10).to_vec();
        events.extend(drag(20, 20, 30, 30));
        events.push(InputEvent::Key(Key::Undo));
        events.push(InputEvent::Key(Key::Enter));
        let (state, effects) = run(&events);
        assert_eq!(state.result(), vec![Rect::new(0, 0, 10, 10)]);
        assert!(effects.contains(&SelectionEffect::Undone(Rect::new(20, 20, 10, 10))));
    }

    #[test]
    fn undo_on_empty_selection_is_a_no_op() {
        let (state, effects) = run(&[InputEvent::Key(Key::Undo)]);
        assert_eq!(state, RegionSelection::new());
        assert!(effects.is_empty());
    }

    #[test]
    fn escape_cancels_everything() {
        let mut events = drag(0, 0, 10, 10).to_vec();
        events.push(InputEvent::Key(Key::Escape));
        events.extend(drag(1, 1, 2, 2));
        let (state, _) = run(&events);
        assert_eq!(state.phase, DragPhase::Cancelled);
        assert!(state.result().is_empty());
    }

    #[test]
    fn quit_requests_abort() {
        let (state, effects) = run(&[InputEvent::Key(Key::Quit)]);
        assert_eq!(state.phase, DragPhase::Cancelled);
        assert_eq!(effects, vec![SelectionEffect::QuitRequested]);
    }

    #[test]
    fn click_without_drag_commits_a_degenerate_rect() {
        let (state, _) = run(&[
            InputEvent::Press { x: 4, y: 4 },
            InputEvent::Release { x: 4, y: 4 },
        ]);
        assert_eq!(state.rects.len(), 1);
        assert!(state.rects[0].is_degenerate());
    }
}
