//=========================================================================
// Input Frame
//=========================================================================
//
// Latched input snapshot shared by the gesture handlers (writers) and the
// session tick (reader).
//
// Frame lifecycle:
//   handlers: set_movement() / set_aim() / set_fire() / ...  (any number)
//   tick:     take_changes() → forward only what changed → flags cleared
//
// Level fields (movement, aim, fire, jump) are latched until overwritten.
// Edge fields (special, weapon cycling) are consumed by take_changes().
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::aim::AimState;
use super::vector::NormalizedInput;

//=== WeaponCycle =========================================================

/// Direction of a weapon switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponCycle {
    Next,
    Previous,
}

//=== FrameChanges ========================================================

/// Everything that changed since the previous tick.
///
/// `None` means "unchanged, do not forward".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameChanges {
    pub movement: Option<NormalizedInput>,
    pub aim: Option<(f32, f32)>,
    pub fire: Option<bool>,
    pub jump: Option<bool>,
    pub special: bool,
    pub weapon_cycles: Vec<WeaponCycle>,
}

impl FrameChanges {
    pub fn is_empty(&self) -> bool {
        self.movement.is_none()
            && self.aim.is_none()
            && self.fire.is_none()
            && self.jump.is_none()
            && !self.special
            && self.weapon_cycles.is_empty()
    }
}

//=== InputFrame ==========================================================

/// Latched input state with per-field change tracking.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    //--- Latched State ----------------------------------------------------
    movement: NormalizedInput,
    aim: AimState,
    jump_pressed: bool,

    //--- Edge Requests (consumed each tick) ------------------------------
    special_requested: bool,
    weapon_cycles: Vec<WeaponCycle>,

    //--- Change Flags -----------------------------------------------------
    movement_changed: bool,
    aim_changed: bool,
    fire_changed: bool,
    jump_changed: bool,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Writers ----------------------------------------------------------

    pub fn set_movement(&mut self, movement: NormalizedInput) {
        self.movement = movement;
        self.movement_changed = true;
    }

    pub fn set_aim(&mut self, screen_x: f32, screen_y: f32) {
        self.aim.screen_x = screen_x;
        self.aim.screen_y = screen_y;
        self.aim_changed = true;
    }

    pub fn set_fire(&mut self, firing: bool) {
        if self.aim.firing != firing {
            self.aim.firing = firing;
            self.fire_changed = true;
        }
    }

    pub fn set_jump(&mut self, pressed: bool) {
        if self.jump_pressed != pressed {
            self.jump_pressed = pressed;
            self.jump_changed = true;
        }
    }

    pub fn request_special(&mut self) {
        self.special_requested = true;
    }

    pub fn request_weapon(&mut self, cycle: WeaponCycle) {
        self.weapon_cycles.push(cycle);
    }

    //--- Reader -----------------------------------------------------------

    /// Returns the changes since the last call and clears all change flags
    /// and edge requests. Latched values stay in place.
    pub fn take_changes(&mut self) -> FrameChanges {
        let changes = FrameChanges {
            movement: self.movement_changed.then_some(self.movement),
            aim: self.aim_changed.then_some((self.aim.screen_x, self.aim.screen_y)),
            fire: self.fire_changed.then_some(self.aim.firing),
            jump: self.jump_changed.then_some(self.jump_pressed),
            special: self.special_requested,
            weapon_cycles: std::mem::take(&mut self.weapon_cycles),
        };

        self.movement_changed = false;
        self.aim_changed = false;
        self.fire_changed = false;
        self.jump_changed = false;
        self.special_requested = false;

        changes
    }

    /// Resets every field to neutral without marking anything changed.
    ///
    /// Used when the engine drops its own input state (pause).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    //--- Queries ----------------------------------------------------------

    pub fn movement(&self) -> NormalizedInput {
        self.movement
    }

    pub fn aim(&self) -> AimState {
        self.aim
    }

    pub fn jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    pub fn special_requested(&self) -> bool {
        self.special_requested
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
