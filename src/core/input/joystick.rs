//=========================================================================
// Joystick Mapper
//=========================================================================
//
// Converts a drag on the virtual joystick into normalized movement.
//
// Architecture:
//   grant(origin) → move(pointer)* → release | terminate
//                       ↓                   ↓
//        GestureVector → circular clamp   NormalizedInput::ZERO (once)
//                       ↓                   ↓
//                NormalizedInput        KnobSpring (presentation)
//
// Every move is recomputed from the origin captured at grant time, so
// a burst of move events never accumulates.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::spring::KnobSpring;
use super::vector::{GestureVector, NormalizedInput};

//=== JoystickConfig ======================================================

/// Geometry of the on-screen joystick, in pixels.
///
/// # Default Values
///
/// - **size**: 160.0 (outer circle diameter)
/// - **knob_margin**: 20.0 (keeps the knob inside the outer ring)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickConfig {
    pub size: f32,
    pub knob_margin: f32,
}

impl JoystickConfig {
    /// Maximum knob travel from the centre: `size / 2 - knob_margin`.
    pub fn max_distance(&self) -> f32 {
        self.size / 2.0 - self.knob_margin
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            size: 160.0,
            knob_margin: 20.0,
        }
    }
}

//=== Circular Clamp ======================================================

/// Restricts `drag` to the circle of radius `max_distance`, keeping its angle.
///
/// Vectors already inside the circle are returned unchanged. A zero-length
/// drag never reaches the trigonometry, so its undefined angle is harmless.
pub fn circular_clamp(drag: GestureVector, max_distance: f32) -> GestureVector {
    if drag.length() <= max_distance {
        return drag;
    }

    let angle = drag.dy.atan2(drag.dx);
    GestureVector::new(angle.cos() * max_distance, angle.sin() * max_distance)
}

/// Clamps `drag` and scales it into the unit disk.
pub fn normalize_drag(drag: GestureVector, max_distance: f32) -> NormalizedInput {
    let clamped = circular_clamp(drag, max_distance);
    NormalizedInput::new(clamped.dx / max_distance, clamped.dy / max_distance)
}

//=== JoystickMapper ======================================================

/// Stateful joystick: tracks the drag origin, the published input and the
/// knob presentation.
#[derive(Debug, Clone)]
pub struct JoystickMapper {
    config: JoystickConfig,
    origin: Option<(f32, f32)>,
    output: NormalizedInput,
    knob: KnobSpring,
}

impl JoystickMapper {
    /// Creates a mapper for the given geometry.
    ///
    /// # Panics
    ///
    /// Panics if the resulting max distance is not positive.
    pub fn new(config: JoystickConfig) -> Self {
        assert!(
            config.max_distance() > 0.0,
            "Joystick max distance must be positive, got {}",
            config.max_distance()
        );

        Self {
            config,
            origin: None,
            output: NormalizedInput::ZERO,
            knob: KnobSpring::default(),
        }
    }

    //--- Gesture Lifecycle ------------------------------------------------

    /// Starts a drag anchored at `origin`.
    ///
    /// A grant while already active re-anchors the drag; nothing is emitted
    /// until the first move.
    pub fn grant(&mut self, origin: (f32, f32)) {
        trace!(target: "platform::input", "Joystick grant at {:?}", origin);
        self.origin = Some(origin);
        self.knob.hold((0.0, 0.0));
    }

    /// Maps the live pointer position. Returns `None` when no drag is active.
    pub fn drag_to(&mut self, pointer: (f32, f32)) -> Option<NormalizedInput> {
        let origin = self.origin?;
        Some(self.apply(GestureVector::between(origin, pointer)))
    }

    /// Maps a raw drag vector directly (origin-relative).
    pub fn drag(&mut self, drag: GestureVector) -> Option<NormalizedInput> {
        self.origin?;
        Some(self.apply(drag))
    }

    /// Ends the drag. Emits `(0, 0)` exactly once per active drag and hands
    /// the knob to the return spring.
    pub fn release(&mut self) -> Option<NormalizedInput> {
        self.origin.take()?;
        self.output = NormalizedInput::ZERO;
        trace!(target: "platform::input", "Joystick released");
        Some(NormalizedInput::ZERO)
    }

    /// Gesture interrupted by the host; identical to [`release`](Self::release).
    pub fn terminate(&mut self) -> Option<NormalizedInput> {
        self.release()
    }

    //--- Presentation -----------------------------------------------------

    /// Advances the knob spring. Returns `true` while the knob is moving.
    pub fn animate(&mut self, dt_secs: f32) -> bool {
        if self.is_active() {
            return false;
        }
        self.knob.advance(dt_secs)
    }

    /// Knob offset from the centre in pixels.
    pub fn knob_offset(&self) -> (f32, f32) {
        self.knob.offset()
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Most recently published input.
    pub fn output(&self) -> NormalizedInput {
        self.output
    }

    pub fn config(&self) -> &JoystickConfig {
        &self.config
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply(&mut self, drag: GestureVector) -> NormalizedInput {
        let max_distance = self.config.max_distance();
        self.output = normalize_drag(drag, max_distance);

        self.knob.hold((self.output.x * max_distance, self.output.y * max_distance));
        self.output
    }
}

impl Default for JoystickMapper {
    fn default() -> Self {
        Self::new(JoystickConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
