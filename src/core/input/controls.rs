//=========================================================================
// Touch Controls
//=========================================================================
//
// Routes touches to the joystick, the aim surface and the HUD buttons,
// and latches the results into the session's InputFrame.
//
// Architecture:
//   TouchPoint ─► binding lookup (by touch id)
//                   ├─ Joystick   → JoystickMapper  → frame.set_movement
//                   ├─ AimSurface → AimFireMapper   → frame.set_aim / set_fire
//                   └─ Button     → press/release   → frame.set_jump / requests
//
// A touch is bound to the target it started on and keeps that binding
// until it ends, wherever it moves. Only one touch drives the joystick
// and one drives the aim surface at a time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::aim::{AimEmission, AimFireMapper, AimGesture};
use super::event::{TouchPhase, TouchPoint};
use super::input_frame::{InputFrame, WeaponCycle};
use super::joystick::{JoystickConfig, JoystickMapper};
use super::layout::{ControlLayout, HudButton, LayoutConfig, TouchTarget};

//=== ControlSignal =======================================================

/// Requests that the controls cannot satisfy through the input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    TogglePause,
}

//=== TouchControls =======================================================

/// Owns the gesture mappers and the per-touch bindings.
#[derive(Debug, Clone)]
pub struct TouchControls {
    layout: ControlLayout,
    joystick: JoystickMapper,
    aim: AimFireMapper,
    bindings: HashMap<u64, TouchTarget>,
}

impl TouchControls {
    //--- Construction -----------------------------------------------------

    pub fn new(joystick: JoystickConfig, layout: LayoutConfig, width: f32, height: f32) -> Self {
        Self {
            layout: ControlLayout::new(layout, width, height),
            joystick: JoystickMapper::new(joystick),
            aim: AimFireMapper::new(),
            bindings: HashMap::new(),
        }
    }

    /// Recomputes hit regions. Active touches keep their bindings.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout = self.layout.resized(width, height);
    }

    //--- Touch Routing ----------------------------------------------------

    /// Routes one touch sample, writing its effect into `frame`.
    pub fn handle(&mut self, touch: TouchPoint, frame: &mut InputFrame) -> Option<ControlSignal> {
        match touch.phase {
            TouchPhase::Started => {
                let target = self.claim(touch);
                self.start(target, touch, frame);
                None
            }
            TouchPhase::Moved => {
                let target = *self.bindings.get(&touch.id)?;
                self.moved(target, touch, frame);
                None
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                let target = self.bindings.remove(&touch.id)?;
                self.finish(target, touch, frame)
            }
        }
    }

    /// Ends every active touch as if the host cancelled it.
    pub fn cancel_all(&mut self, frame: &mut InputFrame) {
        let ids: Vec<u64> = self.bindings.keys().copied().collect();
        for id in ids {
            self.handle(TouchPoint::new(id, TouchPhase::Cancelled, 0.0, 0.0), frame);
        }
    }

    //--- Presentation -----------------------------------------------------

    /// Advances the joystick knob spring.
    pub fn animate(&mut self, dt_secs: f32) -> bool {
        self.joystick.animate(dt_secs)
    }

    /// Knob offset from the joystick centre, for drawing.
    pub fn knob_offset(&self) -> (f32, f32) {
        self.joystick.knob_offset()
    }

    //--- Queries ----------------------------------------------------------

    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    pub fn joystick(&self) -> &JoystickMapper {
        &self.joystick
    }

    pub fn aim(&self) -> &AimFireMapper {
        &self.aim
    }

    pub fn active_touches(&self) -> usize {
        self.bindings.len()
    }

    //--- Internal Helpers -------------------------------------------------

    /// Picks the target for a new touch and records the binding.
    fn claim(&mut self, touch: TouchPoint) -> TouchTarget {
        let mut target = self.layout.hit_test(touch.x, touch.y);

        let owned = match target {
            TouchTarget::Joystick => self.joystick.is_active(),
            TouchTarget::AimSurface => self.aim.is_active(),
            _ => false,
        };
        if owned {
            debug!(
                target: "platform::input",
                "Touch {} ignored: {:?} already owned",
                touch.id,
                target
            );
            target = TouchTarget::Outside;
        }

        if target != TouchTarget::Outside {
            debug!(target: "platform::input", "Touch {} bound to {:?}", touch.id, target);
            self.bindings.insert(touch.id, target);
        }
        target
    }

    fn start(&mut self, target: TouchTarget, touch: TouchPoint, frame: &mut InputFrame) {
        match target {
            TouchTarget::Joystick => self.joystick.grant(touch.position()),
            TouchTarget::AimSurface => {
                let (x, y) = self.layout.to_aim_local(touch.x, touch.y);
                self.apply_aim(AimGesture::Grant { x, y }, frame);
            }
            TouchTarget::Button(HudButton::Jump) => frame.set_jump(true),
            TouchTarget::Button(_) | TouchTarget::Outside => {}
        }
    }

    fn moved(&mut self, target: TouchTarget, touch: TouchPoint, frame: &mut InputFrame) {
        match target {
            TouchTarget::Joystick => {
                if let Some(movement) = self.joystick.drag_to(touch.position()) {
                    frame.set_movement(movement);
                }
            }
            TouchTarget::AimSurface => {
                let (x, y) = self.layout.to_aim_local(touch.x, touch.y);
                self.apply_aim(AimGesture::Move { x, y }, frame);
            }
            TouchTarget::Button(_) | TouchTarget::Outside => {}
        }
    }

    fn finish(
        &mut self,
        target: TouchTarget,
        touch: TouchPoint,
        frame: &mut InputFrame,
    ) -> Option<ControlSignal> {
        let cancelled = touch.phase == TouchPhase::Cancelled;

        match target {
            TouchTarget::Joystick => {
                let zero = if cancelled {
                    self.joystick.terminate()
                } else {
                    self.joystick.release()
                };
                if let Some(zero) = zero {
                    frame.set_movement(zero);
                }
                None
            }
            TouchTarget::AimSurface => {
                let gesture = if cancelled { AimGesture::Terminate } else { AimGesture::Release };
                self.apply_aim(gesture, frame);
                None
            }
            TouchTarget::Button(HudButton::Jump) => {
                frame.set_jump(false);
                None
            }
            TouchTarget::Button(_) if cancelled => None,
            TouchTarget::Button(HudButton::Special) => {
                frame.request_special();
                None
            }
            TouchTarget::Button(HudButton::PreviousWeapon) => {
                frame.request_weapon(WeaponCycle::Previous);
                None
            }
            TouchTarget::Button(HudButton::NextWeapon) => {
                frame.request_weapon(WeaponCycle::Next);
                None
            }
            TouchTarget::Button(HudButton::Pause) => Some(ControlSignal::TogglePause),
            TouchTarget::Outside => None,
        }
    }

    fn apply_aim(&mut self, gesture: AimGesture, frame: &mut InputFrame) {
        for emission in self.aim.apply(gesture) {
            match emission {
                AimEmission::AimMove { x, y } => frame.set_aim(x, y),
                AimEmission::FireStart => frame.set_fire(true),
                AimEmission::FireEnd => frame.set_fire(false),
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
