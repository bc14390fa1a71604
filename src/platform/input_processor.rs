//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit touch, mouse and keyboard events into touch samples and
// control signals.
//
// Architecture:
//   Winit Touch        ─┐
//   Winit mouse (left) ─┼─► InputProcessor → TouchPoint → TouchControls
//   Winit Escape key   ─┘                  → ControlSignal
//
// The left mouse button emulates a single touch with a reserved id so the
// controls can be driven on desktop. Cursor position is cached between
// events since Winit reports button changes without a location.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton, TouchPhase as WinitTouchPhase},
    keyboard::{KeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{ControlSignal, TouchPhase, TouchPoint};

//=== Constants ===========================================================

/// Touch id used for the emulated mouse touch.
pub(crate) const MOUSE_TOUCH_ID: u64 = u64::MAX;

//=== InputProcessor ======================================================

/// Converts Winit events to touch samples with mouse-touch emulation.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    cursor: (f32, f32),
    mouse_down: bool,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Touch ------------------------------------------------------------

    /// Converts a native touch (physical pixels).
    pub(crate) fn process_touch(&self, phase: WinitTouchPhase, id: u64, x: f64, y: f64) -> TouchPoint {
        let phase = match phase {
            WinitTouchPhase::Started => TouchPhase::Started,
            WinitTouchPhase::Moved => TouchPhase::Moved,
            WinitTouchPhase::Ended => TouchPhase::Ended,
            WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
        };
        TouchPoint::new(id, phase, x as f32, y as f32)
    }

    //--- Mouse Emulation --------------------------------------------------

    /// Caches the cursor; yields a move while the left button is held.
    pub(crate) fn process_cursor_moved(&mut self, x: f64, y: f64) -> Option<TouchPoint> {
        self.cursor = (x as f32, y as f32);
        self.mouse_down.then(|| self.mouse_touch(TouchPhase::Moved))
    }

    /// Left button press/release becomes touch start/end at the cursor.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<TouchPoint> {
        if button != MouseButton::Left {
            return None;
        }

        match (state, self.mouse_down) {
            (ElementState::Pressed, false) => {
                self.mouse_down = true;
                Some(self.mouse_touch(TouchPhase::Started))
            }
            (ElementState::Released, true) => {
                self.mouse_down = false;
                Some(self.mouse_touch(TouchPhase::Ended))
            }
            _ => None,
        }
    }

    /// Cancels the emulated touch when the window loses focus mid-drag.
    pub(crate) fn process_focus_lost(&mut self) -> Option<TouchPoint> {
        if !self.mouse_down {
            return None;
        }
        self.mouse_down = false;
        Some(self.mouse_touch(TouchPhase::Cancelled))
    }

    //--- Keyboard ---------------------------------------------------------

    /// Escape toggles pause. Key repeats are ignored.
    pub(crate) fn process_key(
        &self,
        key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<ControlSignal> {
        match (key, state, repeat) {
            (PhysicalKey::Code(KeyCode::Escape), ElementState::Pressed, false) => {
                Some(ControlSignal::TogglePause)
            }
            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn mouse_touch(&self, phase: TouchPhase) -> TouchPoint {
        TouchPoint::new(MOUSE_TOUCH_ID, phase, self.cursor.0, self.cursor.1)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_phases_map_one_to_one() {
        let processor = InputProcessor::new();
        let cases = [
            (WinitTouchPhase::Started, TouchPhase::Started),
            (WinitTouchPhase::Moved, TouchPhase::Moved),
            (WinitTouchPhase::Ended, TouchPhase::Ended),
            (WinitTouchPhase::Cancelled, TouchPhase::Cancelled),
        ];

        for (winit_phase, phase) in cases {
            let touch = processor.process_touch(winit_phase, 3, 12.5, 40.0);
            assert_eq!(touch, TouchPoint::new(3, phase, 12.5, 40.0));
        }
    }

    #[test]
    fn mouse_drag_emulates_touch() {
        let mut processor = InputProcessor::new();

        assert_eq!(processor.process_cursor_moved(10.0, 20.0), None, "hover is ignored");

        let start = processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(start, Some(TouchPoint::new(MOUSE_TOUCH_ID, TouchPhase::Started, 10.0, 20.0)));

        let drag = processor.process_cursor_moved(30.0, 25.0);
        assert_eq!(drag, Some(TouchPoint::new(MOUSE_TOUCH_ID, TouchPhase::Moved, 30.0, 25.0)));

        let end = processor.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(end, Some(TouchPoint::new(MOUSE_TOUCH_ID, TouchPhase::Ended, 30.0, 25.0)));

        assert_eq!(processor.process_cursor_moved(50.0, 50.0), None);
    }

    #[test]
    fn other_buttons_and_duplicates_are_ignored() {
        let mut processor = InputProcessor::new();

        assert_eq!(processor.process_mouse_button(MouseButton::Right, ElementState::Pressed), None);
        assert_eq!(processor.process_mouse_button(MouseButton::Left, ElementState::Released), None);

        processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(processor.process_mouse_button(MouseButton::Left, ElementState::Pressed), None);
    }

    #[test]
    fn focus_loss_cancels_mouse_touch() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_focus_lost(), None);

        processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        let cancel = processor.process_focus_lost();
        assert_eq!(cancel.map(|t| t.phase), Some(TouchPhase::Cancelled));
        assert_eq!(processor.process_focus_lost(), None);
    }

    #[test]
    fn escape_press_toggles_pause() {
        let processor = InputProcessor::new();
        let escape = PhysicalKey::Code(KeyCode::Escape);

        assert_eq!(
            processor.process_key(escape, ElementState::Pressed, false),
            Some(ControlSignal::TogglePause)
        );
        assert_eq!(processor.process_key(escape, ElementState::Pressed, true), None);
        assert_eq!(processor.process_key(escape, ElementState::Released, false), None);
        assert_eq!(
            processor.process_key(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed, false),
            None
        );
    }
}
