//=========================================================================
// Input System
//=========================================================================
//
// Touch-gesture mapping for the front-end.
//
// Architecture:
//   TouchPoint → TouchControls → {JoystickMapper, AimFireMapper, buttons}
//                                        ↓
//                                   InputFrame (latched, read by session)
//
// Components:
// - `event`: Platform-agnostic touch samples
// - `layout`: Hit regions derived from the window size
// - `joystick` / `spring`: Drag vector → normalized movement, knob return
// - `aim`: Aim/fire gesture state machine
// - `input_frame`: Latched input with change tracking
// - `controls`: Per-touch routing into the frame
//
//=========================================================================

//=== Module Declarations =================================================

pub mod aim;
pub mod controls;
pub mod event;
pub mod input_frame;
pub mod joystick;
pub mod layout;
pub mod spring;
pub mod vector;

//=== Public API ==========================================================

pub use aim::{transition, AimEmission, AimFireMapper, AimGesture, AimPhase, AimState};
pub use controls::{ControlSignal, TouchControls};
pub use event::{TouchPhase, TouchPoint};
pub use input_frame::{FrameChanges, InputFrame, WeaponCycle};
pub use joystick::{circular_clamp, normalize_drag, JoystickConfig, JoystickMapper};
pub use layout::{ControlLayout, HudButton, LayoutConfig, Region, TouchTarget};
pub use spring::KnobSpring;
pub use vector::{GestureVector, NormalizedInput};
