//=========================================================================
// Touch Bridge Frontend
//
// Main entry point: wires an engine bridge, the touch controls and the
// host window together.
//
// Architecture:
// ```text
//     FrontendBuilder  ──build(engine)──>  Frontend  ──run()──>  [Event Loop]
//         │                                  │
//         ├─ with_joystick_size()            ├─ init(|session| ...)
//         ├─ with_poll_interval_ms()         └─ blocks until exit
//         └─ with_asset_path() ...
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::bridge::EngineBridge;
use crate::core::input::{JoystickConfig, LayoutConfig};
use crate::core::session::{SessionConfig, SessionError, SessionLoop, DEFAULT_POLL_INTERVAL_MS};
use crate::platform::{Platform, PlatformConfig, PlatformError};

//=== FrontendError =======================================================

/// Errors that end [`Frontend::run`].
#[derive(Debug)]
pub enum FrontendError {
    /// The host event loop could not be created or failed.
    Platform(PlatformError),

    /// The engine session stopped with a fatal error.
    Session(SessionError),
}

impl std::fmt::Display for FrontendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Platform(e) => write!(f, "Platform error: {}", e),
            Self::Session(e) => write!(f, "Session error: {}", e),
        }
    }
}

impl std::error::Error for FrontendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(e) => Some(e),
            Self::Session(e) => Some(e),
        }
    }
}

impl From<PlatformError> for FrontendError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

impl From<SessionError> for FrontendError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

//=== FrontendBuilder =====================================================

/// Builder for configuring and constructing a [`Frontend`].
///
/// # Default Values
///
/// - **Joystick size**: 160 px, knob margin 20 px (max drag 60 px)
/// - **Poll interval**: 100 ms
/// - **Asset path**: "assets"
/// - **Control strip**: 200 px below the engine viewport
/// - **Window**: "Touch Bridge", 800 x 600
///
/// # Examples
///
/// ```no_run
/// use touch_bridge::prelude::*;
/// # fn connect() -> WorkerBridge { unimplemented!() }
///
/// let bridge = connect();
/// FrontendBuilder::new()
///     .with_asset_path("data/levels")
///     .with_joystick_size(200.0)
///     .build(bridge)
///     .init(|session| {
///         session.registry_mut().subscribe(|e: &ScoreChanged| println!("score {}", e.score));
///     })
///     .run()?;
/// # Ok::<(), FrontendError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FrontendBuilder {
    joystick: JoystickConfig,
    layout: LayoutConfig,
    poll_interval_ms: u64,
    asset_path: String,
    window_title: String,
    window_size: (u32, u32),
}

impl FrontendBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            joystick: JoystickConfig::default(),
            layout: LayoutConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            asset_path: "assets".into(),
            window_title: "Touch Bridge".into(),
            window_size: (800, 600),
        }
    }

    /// Sets the joystick base diameter in pixels.
    ///
    /// Default: 160.0
    ///
    /// # Panics
    ///
    /// Panics if the size leaves no room to drag past the knob margin.
    pub fn with_joystick_size(mut self, size: f32) -> Self {
        assert!(
            size / 2.0 > self.joystick.knob_margin,
            "Joystick size must exceed twice the knob margin, got {}",
            size
        );
        self.joystick.size = size;
        self.layout.joystick_size = size;
        self
    }

    /// Sets the distance kept between the knob and the base edge.
    ///
    /// Default: 20.0
    ///
    /// # Panics
    ///
    /// Panics if the margin is negative or leaves no drag distance.
    pub fn with_knob_margin(mut self, margin: f32) -> Self {
        assert!(margin >= 0.0, "Knob margin must not be negative, got {}", margin);
        assert!(
            self.joystick.size / 2.0 > margin,
            "Knob margin must be less than the joystick radius, got {}",
            margin
        );
        self.joystick.knob_margin = margin;
        self
    }

    /// Sets how often engine state is polled for the HUD.
    ///
    /// Default: 100
    ///
    /// # Panics
    ///
    /// Panics if `interval_ms == 0`.
    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        assert!(interval_ms > 0, "Poll interval must be positive");
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Sets the asset directory handed to the engine at initialization.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty.
    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        assert!(!path.is_empty(), "Asset path must not be empty");
        self.asset_path = path;
        self
    }

    /// Sets the height reserved for the controls below the engine viewport.
    ///
    /// Default: 200.0
    ///
    /// # Panics
    ///
    /// Panics if `height` is negative.
    pub fn with_control_strip_height(mut self, height: f32) -> Self {
        assert!(height >= 0.0, "Control strip height must not be negative, got {}", height);
        self.layout.control_strip_height = height;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive");
        self.window_size = (width, height);
        self
    }

    /// Builds the frontend around `engine`.
    pub fn build<E: EngineBridge>(self, engine: E) -> Frontend<E> {
        info!(
            "Building frontend (joystick: {}px, poll: {}ms, assets: '{}')",
            self.joystick.size, self.poll_interval_ms, self.asset_path
        );

        let session = SessionLoop::new(
            engine,
            SessionConfig {
                asset_path: self.asset_path,
                poll_interval_ms: self.poll_interval_ms,
                viewport: (0, 0),
            },
        );

        Frontend {
            session,
            platform: PlatformConfig {
                window_title: self.window_title,
                window_size: self.window_size,
                joystick: self.joystick,
                layout: self.layout,
            },
        }
    }
}

impl Default for FrontendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Frontend ============================================================

/// Touch front-end runtime. Create via [`FrontendBuilder`].
pub struct Frontend<E: EngineBridge> {
    session: SessionLoop<E>,
    platform: PlatformConfig,
}

impl<E: EngineBridge> Frontend<E> {
    //--- Initialization ---------------------------------------------------

    /// Gives access to the session before it starts, e.g. to subscribe to
    /// engine events or apply settings.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SessionLoop<E>),
    {
        info!("Initializing frontend session");
        init_fn(&mut self.session);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and runs until it closes.
    ///
    /// # Errors
    ///
    /// [`FrontendError::Platform`] if the event loop fails,
    /// [`FrontendError::Session`] if the engine failed to initialize.
    pub fn run(self) -> Result<(), FrontendError> {
        info!("Starting frontend runtime");

        let mut platform = Platform::new(self.session, self.platform);
        let result = platform.run();

        if let Err(e) = &result {
            error!("Platform error: {}", e);
        }
        result?;

        if let Some(e) = platform.take_session_error() {
            return Err(FrontendError::Session(e));
        }

        info!("Frontend shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bridge::fake::FakeEngine;
    use crate::core::bridge::GraphicsQuality;

    //=====================================================================
    // FrontendBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = FrontendBuilder::new();
        assert_eq!(builder.joystick.size, 160.0);
        assert_eq!(builder.joystick.max_distance(), 60.0);
        assert_eq!(builder.poll_interval_ms, 100);
        assert_eq!(builder.asset_path, "assets");
        assert_eq!(builder.layout.control_strip_height, 200.0);
        assert_eq!(builder.window_size, (800, 600));
    }

    #[test]
    fn builder_with_joystick_size_updates_layout() {
        let builder = FrontendBuilder::new().with_joystick_size(200.0);
        assert_eq!(builder.joystick.size, 200.0);
        assert_eq!(builder.layout.joystick_size, 200.0);
        assert_eq!(builder.joystick.max_distance(), 80.0);
    }

    #[test]
    #[should_panic(expected = "Joystick size must exceed twice the knob margin")]
    fn builder_with_joystick_size_panics_when_too_small() {
        FrontendBuilder::new().with_joystick_size(40.0);
    }

    #[test]
    fn builder_with_knob_margin() {
        let builder = FrontendBuilder::new().with_knob_margin(0.0);
        assert_eq!(builder.joystick.max_distance(), 80.0);
    }

    #[test]
    #[should_panic(expected = "Knob margin must be less than the joystick radius")]
    fn builder_with_knob_margin_panics_when_too_large() {
        FrontendBuilder::new().with_knob_margin(80.0);
    }

    #[test]
    #[should_panic(expected = "Knob margin must not be negative")]
    fn builder_with_knob_margin_panics_on_negative() {
        FrontendBuilder::new().with_knob_margin(-1.0);
    }

    #[test]
    #[should_panic(expected = "Poll interval must be positive")]
    fn builder_with_poll_interval_panics_on_zero() {
        FrontendBuilder::new().with_poll_interval_ms(0);
    }

    #[test]
    #[should_panic(expected = "Asset path must not be empty")]
    fn builder_with_asset_path_panics_on_empty() {
        FrontendBuilder::new().with_asset_path("");
    }

    #[test]
    #[should_panic(expected = "Control strip height must not be negative")]
    fn builder_with_control_strip_panics_on_negative() {
        FrontendBuilder::new().with_control_strip_height(-10.0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero() {
        FrontendBuilder::new().with_window_size(0, 600);
    }

    #[test]
    fn build_carries_session_settings() {
        let frontend = FrontendBuilder::new()
            .with_asset_path("data")
            .with_poll_interval_ms(250)
            .with_window_title("Demo")
            .build(FakeEngine::new());

        assert_eq!(frontend.session.config().asset_path, "data");
        assert_eq!(frontend.session.config().poll_interval_ms, 250);
        assert_eq!(frontend.platform.window_title, "Demo");
    }

    //=====================================================================
    // Frontend Tests
    //=====================================================================

    #[test]
    fn init_runs_before_start() {
        let frontend = FrontendBuilder::new()
            .build(FakeEngine::new())
            .init(|session| session.set_graphics_quality(GraphicsQuality::Low));

        assert_eq!(frontend.session.engine().calls, vec!["quality 0"]);
    }

    #[test]
    fn frontend_error_wraps_session_error() {
        let err: FrontendError = SessionError::InitializationDeclined.into();
        assert_eq!(err.to_string(), "Session error: Engine declined to initialize");
    }
}
