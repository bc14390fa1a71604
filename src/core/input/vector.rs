//=========================================================================
// Input Vectors
//=========================================================================
//
// Plain value types crossing the gesture → mapper → engine boundary.
//
//   GestureVector  raw (dx, dy) from the gesture origin, in pixels
//   NormalizedInput  clamped movement in [-1, 1] x [-1, 1]
//
//=========================================================================

//=== GestureVector =======================================================

/// Raw delta from a gesture origin to the current touch point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureVector {
    pub dx: f32,
    pub dy: f32,
}

impl GestureVector {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Builds the delta between a fixed origin and a live pointer position.
    pub fn between(origin: (f32, f32), pointer: (f32, f32)) -> Self {
        Self {
            dx: pointer.0 - origin.0,
            dy: pointer.1 - origin.1,
        }
    }

    /// Euclidean length of the drag.
    pub fn length(&self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

//=== NormalizedInput =====================================================

/// Movement input in `[-1, 1]` on both axes.
///
/// Values produced by the joystick mapper always lie inside the unit disk
/// (`x² + y² ≤ 1`), so diagonal input is never stronger than cardinal input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedInput {
    pub x: f32,
    pub y: f32,
}

impl NormalizedInput {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns a copy with each axis clamped to `[-1, 1]`.
    ///
    /// This is the axis-wise guard applied right before values cross the
    /// bridge; it does not replace the joystick's circular clamp.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
