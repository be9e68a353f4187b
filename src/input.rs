//! Input model: mouse buttons, wheel deltas, and the pointer gesture state machine.
//!
//! `InputState` tracks one pointer from press to release. A press that moves
//! less than [`CLICK_SLOP_PX`] before release is a click; anything further
//! becomes a pan and yields incremental screen deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::CLICK_SLOP_PX;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// What a pointer move or release amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Nothing to act on.
    None,
    /// Pointer moved with no button held.
    Hover(Point),
    /// Drag pan by this screen delta.
    Pan { dx: f64, dy: f64 },
    /// Press and release within the click slop.
    Click(Point),
}

/// Internal state for the pointer state machine.
#[derive(Debug, Clone, Copy, Default)]
pub enum InputState {
    /// No button held.
    #[default]
    Idle,
    /// Primary button held, not yet moved past the click slop.
    Pressed {
        /// Screen position of the press.
        start: Point,
    },
    /// Dragging the map.
    Panning {
        /// Screen position of the previous pointer event, used to compute pan delta.
        last: Point,
    },
}

impl InputState {
    /// Primary press starts tracking; other buttons are ignored.
    pub fn press(&mut self, p: Point, button: Button) {
        if button == Button::Primary {
            *self = Self::Pressed { start: p };
        }
    }

    pub fn motion(&mut self, p: Point) -> Gesture {
        match *self {
            Self::Idle => Gesture::Hover(p),
            Self::Pressed { start } => {
                if start.distance(p) < CLICK_SLOP_PX {
                    return Gesture::None;
                }
                *self = Self::Panning { last: p };
                Gesture::Pan { dx: p.x - start.x, dy: p.y - start.y }
            }
            Self::Panning { last } => {
                *self = Self::Panning { last: p };
                Gesture::Pan { dx: p.x - last.x, dy: p.y - last.y }
            }
        }
    }

    pub fn release(&mut self, p: Point) -> Gesture {
        let prev = std::mem::take(self);
        match prev {
            Self::Pressed { start } if start.distance(p) < CLICK_SLOP_PX => Gesture::Click(p),
            Self::Pressed { start } => Gesture::Pan { dx: p.x - start.x, dy: p.y - start.y },
            Self::Panning { last } => Gesture::Pan { dx: p.x - last.x, dy: p.y - last.y },
            Self::Idle => Gesture::None,
        }
    }

    /// Pointer left the widget; any gesture in progress is abandoned.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}
