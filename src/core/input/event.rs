//=========================================================================
// Touch Event Types
//
// Defines the internal representation of low-level touch input.
//
// This module abstracts away platform-specific touch input (e.g. Winit
// `Touch`, emulated mouse drags) into a unified format consumed by the
// touch controls.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    TouchPoint (this module)
//         ↓
//    TouchControls (routes by touch id)
//         ↓
//    Joystick / Aim / HUD buttons → InputFrame
// ```
//
//=========================================================================

//=== TouchPhase ==========================================================

/// Lifecycle phase of a single touch.
///
/// `Cancelled` is reported when the host takes the touch away (system
/// gesture, window focus loss). Controls treat it like `Ended` except for
/// buttons, which do not fire on a cancelled press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

//=== TouchPoint ==========================================================

/// One touch sample in window coordinates (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Host-assigned identifier, stable for the lifetime of the touch.
    pub id: u64,
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(id: u64, phase: TouchPhase, x: f32, y: f32) -> Self {
        Self { id, phase, x, y }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// `true` for phases that end the touch.
    pub fn is_final(&self) -> bool {
        matches!(self.phase, TouchPhase::Ended | TouchPhase::Cancelled)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ended_and_cancelled_are_final() {
        assert!(TouchPoint::new(1, TouchPhase::Ended, 0.0, 0.0).is_final());
        assert!(TouchPoint::new(1, TouchPhase::Cancelled, 0.0, 0.0).is_final());
        assert!(!TouchPoint::new(1, TouchPhase::Started, 0.0, 0.0).is_final());
        assert!(!TouchPoint::new(1, TouchPhase::Moved, 0.0, 0.0).is_final());
    }

    #[test]
    fn position_is_xy() {
        let touch = TouchPoint::new(7, TouchPhase::Moved, 3.5, 9.0);
        assert_eq!(touch.position(), (3.5, 9.0));
    }
}
