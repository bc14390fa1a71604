//=========================================================================
// Knob Spring
//=========================================================================
//
// Damped spring that carries the joystick knob back to the centre after
// release. Presentation only: the logical movement input is zeroed by the
// mapper before the spring starts and never waits on it.
//
//   a = -tension * x - friction * v       (unit mass)
//
// Integrated with semi-implicit Euler in fixed sub-steps so large frame
// gaps stay stable.
//
//=========================================================================

//=== Constants ===========================================================

/// Default stiffness of the return spring.
pub const DEFAULT_TENSION: f32 = 50.0;

/// Default damping of the return spring.
pub const DEFAULT_FRICTION: f32 = 8.0;

const MAX_STEP_SECS: f32 = 1.0 / 120.0;
const REST_EPSILON: f32 = 0.01;

//=== KnobSpring ==========================================================

/// Two-axis damped spring anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobSpring {
    tension: f32,
    friction: f32,
    offset: (f32, f32),
    velocity: (f32, f32),
}

impl KnobSpring {
    pub fn new(tension: f32, friction: f32) -> Self {
        Self {
            tension,
            friction,
            offset: (0.0, 0.0),
            velocity: (0.0, 0.0),
        }
    }

    /// Pins the knob to `offset` with no velocity (used while dragging).
    pub fn hold(&mut self, offset: (f32, f32)) {
        self.offset = offset;
        self.velocity = (0.0, 0.0);
    }

    /// Advances the animation by `dt_secs`. Returns `true` while moving.
    pub fn advance(&mut self, dt_secs: f32) -> bool {
        if self.is_at_rest() {
            return false;
        }

        let mut remaining = dt_secs.max(0.0);
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.velocity.0 += (-self.tension * self.offset.0 - self.friction * self.velocity.0) * step;
            self.velocity.1 += (-self.tension * self.offset.1 - self.friction * self.velocity.1) * step;
            self.offset.0 += self.velocity.0 * step;
            self.offset.1 += self.velocity.1 * step;
            remaining -= step;
        }

        if self.settled() {
            self.offset = (0.0, 0.0);
            self.velocity = (0.0, 0.0);
            return false;
        }
        true
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn is_at_rest(&self) -> bool {
        self.offset == (0.0, 0.0) && self.velocity == (0.0, 0.0)
    }

    fn settled(&self) -> bool {
        self.offset.0.abs() < REST_EPSILON
            && self.offset.1.abs() < REST_EPSILON
            && self.velocity.0.abs() < REST_EPSILON
            && self.velocity.1.abs() < REST_EPSILON
    }
}

impl Default for KnobSpring {
    fn default() -> Self {
        Self::new(DEFAULT_TENSION, DEFAULT_FRICTION)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
