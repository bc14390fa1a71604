//=========================================================================
// Platform Subsystem
//
// Hosts the touch controls and the engine session inside a Winit event
// loop on the main thread.
//
// Architecture:
// ```text
//  Main Thread (Winit Event Loop)
//  ┌────────────────────────────────────────────────────────────┐
//  │  Touch / mouse / keyboard                                  │
//  │   ↓                                                        │
//  │  InputProcessor ── TouchPoint ──► TouchControls            │
//  │                                     ├─ InputFrame (latched)│
//  │                                     └─ ControlSignal       │
//  │                                                            │
//  │  RedrawRequested (frame boundary)                          │
//  │   ├─ knob spring animation                                 │
//  │   ├─ SessionLoop::tick(now) ──► EngineBridge               │
//  │   ├─ HUD summary → window title                            │
//  │   └─ request_redraw() while the session wants ticks        │
//  └────────────────────────────────────────────────────────────┘
// ```
//
// Lifecycle mapping:
// - `resumed`: create window (first time), start or resume the session
// - `suspended`: pause the session, remembering it was paused by the host
// - `Resized`: recompute layout, forward the new viewport
// - `CloseRequested` / `exiting`: shut the session down
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::time::Instant;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::bridge::EngineBridge;
use crate::core::input::{
    ControlSignal, HudButton, JoystickConfig, LayoutConfig, TouchControls, TouchPhase, TouchPoint,
    TouchTarget,
};
use crate::core::session::{SessionError, SessionLoop, TickControl};
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal: if the event loop can't be created, the
/// front-end cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=== PlatformConfig ======================================================

/// Window and control settings handed over by the frontend builder.
#[derive(Debug, Clone)]
pub(crate) struct PlatformConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    pub joystick: JoystickConfig,
    pub layout: LayoutConfig,
}

//=== Platform ============================================================

/// Window owner, touch router and session driver.
///
/// This type is NOT Send/Sync: it must remain on the main thread.
///
/// # Fields
///
/// - `window`: Created lazily in `resumed()` (mobile compatibility)
/// - `controls`: Per-touch routing into the session's input frame
/// - `session`: The engine session ticked on every redraw
/// - `clock`: Origin of the millisecond timestamps passed to the session
pub(crate) struct Platform<E: EngineBridge> {
    window: Option<Window>,
    config: PlatformConfig,
    controls: TouchControls,
    input_processor: InputProcessor,
    session: SessionLoop<E>,

    clock: Instant,
    last_frame: Option<Instant>,

    /// Set when the host suspended a running session.
    paused_by_host: bool,
    started: bool,
    hud_line: String,
    fatal: Option<SessionError>,
}

impl<E: EngineBridge> Platform<E> {
    //--- Construction -----------------------------------------------------

    /// Creates the platform. The window is created later in `resumed()`.
    pub fn new(session: SessionLoop<E>, config: PlatformConfig) -> Self {
        let (width, height) = config.window_size;
        let controls = TouchControls::new(config.joystick, config.layout, width as f32, height as f32);

        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            controls,
            input_processor: InputProcessor::new(),
            session,
            clock: Instant::now(),
            last_frame: None,
            paused_by_host: false,
            started: false,
            hud_line: String::new(),
            fatal: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running. A fatal session error is reported separately
    /// through [`Platform::take_session_error`].
    pub fn run(&mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(self)
            .map_err(PlatformError::EventLoopExecution)
    }

    /// The error that stopped the session, if any.
    pub fn take_session_error(&mut self) -> Option<SessionError> {
        self.fatal.take()
    }

    //--- Session Lifecycle ------------------------------------------------

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    /// Starts the session the first time, resumes it after a host pause.
    /// Returns `false` if the session failed to start.
    fn activate_session(&mut self) -> bool {
        let now = self.now_ms();

        if !self.started {
            self.started = true;
            if let Err(e) = self.session.start(now) {
                self.fail(e);
                return false;
            }
        } else if self.paused_by_host {
            self.paused_by_host = false;
            self.last_frame = None;
            self.session.resume(now);
        }
        true
    }

    /// Pauses the session on behalf of the host (app backgrounded).
    fn suspend_session(&mut self) {
        self.controls.cancel_all(self.session.input_mut());
        if self.session.pause() {
            self.paused_by_host = true;
        }
    }

    fn fail(&mut self, error: SessionError) {
        error!(target: "platform", "Session stopped: {}", error);
        self.session.shutdown();
        self.fatal = Some(error);
    }

    //--- Input ------------------------------------------------------------

    /// Routes a touch to the controls. While the session is not running
    /// only the pause button accepts new touches.
    fn route_touch(&mut self, touch: TouchPoint) {
        if touch.phase == TouchPhase::Started && !self.session.is_running() {
            let target = self.controls.layout().hit_test(touch.x, touch.y);
            if target != TouchTarget::Button(HudButton::Pause) {
                debug!(target: "platform::input", "Touch {} ignored, session not running", touch.id);
                return;
            }
        }

        let signal = self.controls.handle(touch, self.session.input_mut());
        if let Some(signal) = signal {
            self.handle_signal(signal);
        }
    }

    fn handle_signal(&mut self, signal: ControlSignal) {
        match signal {
            ControlSignal::TogglePause => {
                let now = self.now_ms();
                if !self.session.toggle_pause(now) {
                    return;
                }
                self.paused_by_host = false;
                if self.session.is_running() {
                    self.last_frame = None;
                    self.request_redraw();
                } else {
                    self.controls.cancel_all(self.session.input_mut());
                    self.session.input_mut().clear();
                    // Let the knob spring settle.
                    self.request_redraw();
                }
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.controls.resize(width as f32, height as f32);
        let (viewport_w, viewport_h) = self.controls.layout().viewport();
        debug!(target: "platform", "Resized to {}x{}, viewport {}x{}", width, height, viewport_w, viewport_h);
        self.session.set_viewport(viewport_w, viewport_h);
    }

    //--- Frame ------------------------------------------------------------

    /// One redraw: animate, tick, refresh the HUD. Returns whether another
    /// frame should be scheduled: while the session wants ticks or the
    /// knob is still springing back.
    fn frame(&mut self) -> Result<bool, SessionError> {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);

        let animating = self.controls.animate(dt);
        let control = self.session.tick(self.now_ms())?;
        self.refresh_hud();

        Ok(control == TickControl::Continue || animating)
    }

    fn refresh_hud(&mut self) {
        let Some(state) = self.session.game_state() else {
            return;
        };

        let line = state.hud_line();
        if line == self.hud_line {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&format!("{} | {}", self.config.window_title, line));
        }
        self.hud_line = line;
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn session(&self) -> &SessionLoop<E> {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut SessionLoop<E> {
        &mut self.session
    }
}

//=== Winit Integration ===================================================

impl<E: EngineBridge> ApplicationHandler for Platform<E> {
    /// Called when the app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let (width, height) = self.config.window_size;
            let attrs = WindowAttributes::default()
                .with_title(self.config.window_title.clone())
                .with_inner_size(LogicalSize::new(width, height));

            match event_loop.create_window(attrs) {
                Ok(window) => {
                    let size = window.inner_size();
                    info!(
                        target: "platform",
                        "Window created: {}x{} @ {}x DPI",
                        size.width,
                        size.height,
                        window.scale_factor()
                    );
                    self.window = Some(window);
                    self.resize(size.width, size.height);
                }
                Err(e) => {
                    error!(target: "platform", "Window creation failed: {}", e);
                    self.session.shutdown();
                    event_loop.exit();
                    return;
                }
            }
        } else {
            debug!(target: "platform", "Window already exists (mobile resume?)");
        }

        if !self.activate_session() {
            event_loop.exit();
            return;
        }
        self.request_redraw();
    }

    /// Called when the app is backgrounded (mobile).
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "Application suspended");
        self.suspend_session();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.session.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => self.resize(size.width, size.height),

            WindowEvent::Touch(touch) => {
                let point = self.input_processor.process_touch(
                    touch.phase,
                    touch.id,
                    touch.location.x,
                    touch.location.y,
                );
                self.route_touch(point);
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(point) = self.input_processor.process_cursor_moved(position.x, position.y) {
                    self.route_touch(point);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(point) = self.input_processor.process_mouse_button(button, state) {
                    self.route_touch(point);
                }
            }

            WindowEvent::Focused(false) => {
                if let Some(point) = self.input_processor.process_focus_lost() {
                    self.route_touch(point);
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let signal = self.input_processor.process_key(
                    key_event.physical_key,
                    key_event.state,
                    key_event.repeat,
                );
                if let Some(signal) = signal {
                    self.handle_signal(signal);
                }
            }

            WindowEvent::RedrawRequested => match self.frame() {
                Ok(true) => self.request_redraw(),
                Ok(false) => trace!(target: "platform", "Session idle, frame scheduling stopped"),
                Err(e) => {
                    self.fail(e);
                    event_loop.exit();
                }
            },

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "Event loop exiting");
        self.session.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
