//=========================================================================
// Control Layout
//=========================================================================
//
// Hit regions for the touch controls, derived from the window size.
//
//   ┌──────────────────────────────────────────┐
//   │ [PREV]            (||)            [NEXT] │  top bar
//   │                                          │
//   │               aim surface                │
//   │                                          │
//   │                                  (SPEC)  │
//   │   ( joystick )                   (JUMP)  │  control strip
//   └──────────────────────────────────────────┘
//
// Buttons and the joystick are tested first; any other point inside the
// window belongs to the aim surface.
//
//=========================================================================

//=== HudButton ===========================================================

/// Tappable HUD buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudButton {
    Jump,
    Special,
    PreviousWeapon,
    NextWeapon,
    Pause,
}

//=== TouchTarget =========================================================

/// What a touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchTarget {
    Joystick,
    AimSurface,
    Button(HudButton),
    Outside,
}

//=== Region ==============================================================

/// Axis-aligned rectangle or circle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Rect { x: f32, y: f32, width: f32, height: f32 },
    Circle { cx: f32, cy: f32, radius: f32 },
}

impl Region {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        match *self {
            Region::Rect { x, y, width, height } => {
                px >= x && px < x + width && py >= y && py < y + height
            }
            Region::Circle { cx, cy, radius } => (px - cx).hypot(py - cy) <= radius,
        }
    }

    /// Centre point of the region.
    pub fn center(&self) -> (f32, f32) {
        match *self {
            Region::Rect { x, y, width, height } => (x + width / 2.0, y + height / 2.0),
            Region::Circle { cx, cy, .. } => (cx, cy),
        }
    }
}

//=== LayoutConfig ========================================================

/// Sizes and spacing of the HUD controls, in pixels.
///
/// # Default Values
///
/// - **joystick_size**: 160.0
/// - **control_strip_height**: 200.0 (reserved below the engine viewport)
/// - **edge_padding**: 20.0
/// - **jump_diameter** / **special_diameter**: 70.0 / 60.0
/// - **top_bar_offset**: 40.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub joystick_size: f32,
    pub control_strip_height: f32,
    pub edge_padding: f32,
    pub joystick_lift: f32,
    pub jump_diameter: f32,
    pub special_diameter: f32,
    pub button_gap: f32,
    pub top_bar_offset: f32,
    pub weapon_button_size: (f32, f32),
    pub pause_diameter: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            joystick_size: 160.0,
            control_strip_height: 200.0,
            edge_padding: 20.0,
            joystick_lift: 10.0,
            jump_diameter: 70.0,
            special_diameter: 60.0,
            button_gap: 15.0,
            top_bar_offset: 40.0,
            weapon_button_size: (90.0, 40.0),
            pause_diameter: 50.0,
        }
    }
}

//=== ControlLayout =======================================================

/// Resolved control regions for one window size.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLayout {
    config: LayoutConfig,
    width: f32,
    height: f32,
    joystick: Region,
    buttons: Vec<(HudButton, Region)>,
}

impl ControlLayout {
    /// Lays the controls out for a `width` x `height` window.
    pub fn new(config: LayoutConfig, width: f32, height: f32) -> Self {
        let pad = config.edge_padding;

        let joystick_radius = config.joystick_size / 2.0;
        let joystick = Region::Circle {
            cx: pad + joystick_radius,
            cy: height - pad - config.joystick_lift - joystick_radius,
            radius: joystick_radius,
        };

        let jump_radius = config.jump_diameter / 2.0;
        let jump = Region::Circle {
            cx: width - pad - jump_radius,
            cy: height - pad - jump_radius,
            radius: jump_radius,
        };

        let special_radius = config.special_diameter / 2.0;
        let special = Region::Circle {
            cx: width - pad - special_radius,
            cy: height - pad - config.jump_diameter - config.button_gap - special_radius,
            radius: special_radius,
        };

        let (weapon_w, weapon_h) = config.weapon_button_size;
        let previous = Region::Rect {
            x: pad,
            y: config.top_bar_offset,
            width: weapon_w,
            height: weapon_h,
        };
        let next = Region::Rect {
            x: width - pad - weapon_w,
            y: config.top_bar_offset,
            width: weapon_w,
            height: weapon_h,
        };

        let pause_radius = config.pause_diameter / 2.0;
        let pause = Region::Circle {
            cx: width / 2.0,
            cy: config.top_bar_offset + pause_radius,
            radius: pause_radius,
        };

        Self {
            config,
            width,
            height,
            joystick,
            buttons: vec![
                (HudButton::Jump, jump),
                (HudButton::Special, special),
                (HudButton::PreviousWeapon, previous),
                (HudButton::NextWeapon, next),
                (HudButton::Pause, pause),
            ],
        }
    }

    /// Same configuration, new window size.
    pub fn resized(&self, width: f32, height: f32) -> Self {
        Self::new(self.config, width, height)
    }

    //--- Hit Testing ------------------------------------------------------

    pub fn hit_test(&self, x: f32, y: f32) -> TouchTarget {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return TouchTarget::Outside;
        }

        if let Some((button, _)) = self.buttons.iter().find(|(_, region)| region.contains(x, y)) {
            return TouchTarget::Button(*button);
        }

        if self.joystick.contains(x, y) {
            return TouchTarget::Joystick;
        }

        TouchTarget::AimSurface
    }

    /// Converts window coordinates into aim-surface local coordinates.
    ///
    /// The aim surface fills the window, so this is the identity today; it
    /// stays a separate step so the surface can move without touching callers.
    pub fn to_aim_local(&self, x: f32, y: f32) -> (f32, f32) {
        (x, y)
    }

    //--- Queries ----------------------------------------------------------

    /// Engine viewport: the window minus the bottom control strip.
    pub fn viewport(&self) -> (u32, u32) {
        let height = (self.height - self.config.control_strip_height).max(0.0);
        (self.width.max(0.0) as u32, height as u32)
    }

    pub fn joystick_region(&self) -> Region {
        self.joystick
    }

    pub fn button_region(&self, button: HudButton) -> Option<Region> {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, region)| *region)
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ControlLayout {
        ControlLayout::new(LayoutConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn joystick_sits_bottom_left() {
        let layout = layout();
        let (cx, cy) = layout.joystick_region().center();
        assert_eq!((cx, cy), (100.0, 490.0));
        assert_eq!(layout.hit_test(cx, cy), TouchTarget::Joystick);
    }

    #[test]
    fn buttons_are_hit_at_their_centres() {
        let layout = layout();
        for button in [
            HudButton::Jump,
            HudButton::Special,
            HudButton::PreviousWeapon,
            HudButton::NextWeapon,
            HudButton::Pause,
        ] {
            let (x, y) = layout.button_region(button).unwrap().center();
            assert_eq!(layout.hit_test(x, y), TouchTarget::Button(button), "{:?}", button);
        }
    }

    #[test]
    fn open_space_is_aim_surface() {
        let layout = layout();
        assert_eq!(layout.hit_test(400.0, 300.0), TouchTarget::AimSurface);
        assert_eq!(layout.hit_test(5.0, 595.0), TouchTarget::AimSurface);
    }

    #[test]
    fn points_outside_window_are_ignored() {
        let layout = layout();
        assert_eq!(layout.hit_test(-1.0, 10.0), TouchTarget::Outside);
        assert_eq!(layout.hit_test(10.0, 600.0), TouchTarget::Outside);
    }

    #[test]
    fn viewport_reserves_control_strip() {
        assert_eq!(layout().viewport(), (800, 400));
    }

    #[test]
    fn tiny_window_viewport_saturates() {
        let layout = ControlLayout::new(LayoutConfig::default(), 100.0, 150.0);
        assert_eq!(layout.viewport(), (100, 0));
    }

    #[test]
    fn resize_moves_bottom_controls() {
        let small = layout();
        let tall = small.resized(800.0, 1000.0);
        assert_eq!(tall.joystick_region().center(), (100.0, 890.0));
        assert_eq!(tall.size(), (800.0, 1000.0));
    }
}
