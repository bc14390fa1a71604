//=========================================================================
// Session Loop
//=========================================================================
//
// Drives an `EngineBridge` from host frame ticks.
//
// Architecture:
//   start(now) ─► set_event_sink + initialize ─► Initializing
//                                                    │ Pending<bool> (polled)
//   tick(now)  ─► Running:                           ▼
//                   1. forward changed inputs (InputFrame)
//                   2. engine.update(now - last_tick)
//                   3. dispatch engine events (bounded)
//                   4. poll gate → get_game_state (≤ one in flight)
//                   5. collect finished poll → cached GameState
//
// Lifecycle:
//   Idle → Initializing → Running ⇄ Paused
//                 └────► Failed
//   any → ShutDown (idempotent, also on drop)
//
// Nothing here blocks: every engine result is a `Pending` checked with a
// non-blocking take.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::unbounded;
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::poll_gate::{PollGate, DEFAULT_POLL_INTERVAL_MS};
use crate::core::bridge::{
    BridgeError, EngineBridge, EventCollector, EventRegistry, GameState, GraphicsQuality, Pending,
    PendingState,
};
use crate::core::input::{InputFrame, WeaponCycle};

//=== TickControl =========================================================

/// Whether the host should keep scheduling ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== SessionState ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, `start` not yet called.
    Idle,
    /// Waiting for the engine to finish initializing.
    Initializing,
    Running,
    Paused,
    /// Initialization was declined or failed. Not retried.
    Failed,
    ShutDown,
}

//=== SessionError ========================================================

/// Fatal session errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The engine reported that it could not initialize.
    InitializationDeclined,

    /// The initialize call itself failed.
    InitializationFailed(BridgeError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitializationDeclined => write!(f, "Engine declined to initialize"),
            Self::InitializationFailed(e) => write!(f, "Engine initialization failed: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InitializationFailed(e) => Some(e),
            Self::InitializationDeclined => None,
        }
    }
}

//=== SessionConfig =======================================================

/// Session settings.
///
/// # Default Values
///
/// - **asset_path**: "assets"
/// - **poll_interval_ms**: 100 (10 Hz state polling)
/// - **viewport**: 0 x 0 (set from the window before `start`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub asset_path: String,
    pub poll_interval_ms: u64,
    pub viewport: (u32, u32),
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset_path: "assets".into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            viewport: (0, 0),
        }
    }
}

//=== SessionLoop =========================================================

/// Owns the engine bridge and everything the tick needs.
pub struct SessionLoop<E: EngineBridge> {
    engine: E,
    config: SessionConfig,
    state: SessionState,

    //--- Timing -----------------------------------------------------------
    last_tick_ms: u64,
    poll_gate: PollGate,

    //--- Outstanding Results ----------------------------------------------
    init: Option<Pending<bool>>,
    in_flight_poll: Option<Pending<GameState>>,

    //--- Shared State -----------------------------------------------------
    game_state: Option<GameState>,
    input: InputFrame,
    registry: EventRegistry,
    events: Option<EventCollector>,
}

impl<E: EngineBridge> SessionLoop<E> {
    //--- Construction -----------------------------------------------------

    pub fn new(engine: E, config: SessionConfig) -> Self {
        let poll_gate = PollGate::new(config.poll_interval_ms);
        Self {
            engine,
            config,
            state: SessionState::Idle,
            last_tick_ms: 0,
            poll_gate,
            init: None,
            in_flight_poll: None,
            game_state: None,
            input: InputFrame::new(),
            registry: EventRegistry::new(),
            events: None,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Registers the event sink and starts engine initialization.
    ///
    /// Returns an error only if initialization already finished
    /// unsuccessfully; otherwise the outcome is picked up by `tick`.
    pub fn start(&mut self, now_ms: u64) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            warn!(target: "session", "start() ignored in state {:?}", self.state);
            return Ok(());
        }

        let (sink, receiver) = unbounded();
        self.engine.set_event_sink(sink);
        self.events = Some(EventCollector::new(receiver));

        info!(target: "session", "Initializing engine with assets at '{}'", self.config.asset_path);
        self.init = Some(self.engine.initialize(&self.config.asset_path));
        self.state = SessionState::Initializing;
        self.last_tick_ms = now_ms;

        self.poll_init(now_ms)
    }

    /// Advances the session to `now_ms`.
    ///
    /// The tick that sees initialization finish only records the start
    /// time; the first `update` goes out on the following tick.
    pub fn tick(&mut self, now_ms: u64) -> Result<TickControl, SessionError> {
        if self.state == SessionState::Initializing {
            self.poll_init(now_ms)?;
            return Ok(TickControl::Continue);
        }

        match self.state {
            SessionState::Idle | SessionState::Initializing => Ok(TickControl::Continue),
            SessionState::Paused | SessionState::Failed | SessionState::ShutDown => {
                Ok(TickControl::Exit)
            }
            SessionState::Running => {
                self.run_frame(now_ms);
                Ok(TickControl::Continue)
            }
        }
    }

    /// Stops updates and clears latched input. Returns `false` if the
    /// session was not running.
    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Running {
            debug!(target: "session", "pause() ignored in state {:?}", self.state);
            return false;
        }

        self.engine.pause();
        self.input.clear();
        self.state = SessionState::Paused;
        info!(target: "session", "Session paused");
        true
    }

    /// Resumes updates. The first resumed delta is measured from `now_ms`.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.state != SessionState::Paused {
            debug!(target: "session", "resume() ignored in state {:?}", self.state);
            return false;
        }

        self.engine.resume();
        self.last_tick_ms = now_ms;
        self.state = SessionState::Running;
        info!(target: "session", "Session resumed");
        true
    }

    /// Pauses a running session or resumes a paused one.
    pub fn toggle_pause(&mut self, now_ms: u64) -> bool {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(now_ms),
            _ => false,
        }
    }

    /// Tears the session down. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::ShutDown {
            return;
        }

        self.init = None;
        self.in_flight_poll = None;
        self.events = None;

        let removed = self.registry.unsubscribe_all();
        if removed > 0 {
            debug!(target: "session", "Removed {} event subscription(s)", removed);
        }

        if self.state != SessionState::Idle {
            self.engine.shutdown();
        }
        self.state = SessionState::ShutDown;
        info!(target: "session", "Session shut down");
    }

    //--- Passthroughs -----------------------------------------------------

    /// Records the viewport and forwards it once the engine is up.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.config.viewport = (width, height);
        if matches!(self.state, SessionState::Running | SessionState::Paused) {
            self.engine.set_viewport(width, height);
        }
    }

    pub fn load_level(&mut self, level_name: &str) -> Pending<bool> {
        if self.state == SessionState::ShutDown {
            return Pending::ready(Err(BridgeError::Disconnected));
        }
        self.engine.load_level(level_name)
    }

    pub fn save_game(&mut self, slot: u32) -> Pending<bool> {
        if self.state == SessionState::ShutDown {
            return Pending::ready(Err(BridgeError::Disconnected));
        }
        self.engine.save_game(slot)
    }

    pub fn load_game(&mut self, slot: u32) -> Pending<bool> {
        if self.state == SessionState::ShutDown {
            return Pending::ready(Err(BridgeError::Disconnected));
        }
        self.engine.load_game(slot)
    }

    /// Forwards volume levels clamped to [0, 1].
    pub fn set_volume(&mut self, music: f32, sfx: f32) {
        self.engine.set_volume(music.clamp(0.0, 1.0), sfx.clamp(0.0, 1.0));
    }

    pub fn set_graphics_quality(&mut self, quality: GraphicsQuality) {
        self.engine.set_graphics_quality(quality);
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Last polled engine state, if any poll has completed.
    pub fn game_state(&self) -> Option<&GameState> {
        self.game_state.as_ref()
    }

    pub fn input(&self) -> &InputFrame {
        &self.input
    }

    /// Input written by the touch handlers between ticks.
    pub fn input_mut(&mut self) -> &mut InputFrame {
        &mut self.input
    }

    pub fn registry_mut(&mut self) -> &mut EventRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    //--- Internal Helpers -------------------------------------------------

    fn poll_init(&mut self, now_ms: u64) -> Result<(), SessionError> {
        let Some(init) = &self.init else {
            return Ok(());
        };

        let result = match init.try_take() {
            PendingState::Waiting => return Ok(()),
            PendingState::Ready(result) => result,
        };
        self.init = None;

        match result {
            Ok(true) => {
                let (width, height) = self.config.viewport;
                self.engine.set_viewport(width, height);
                self.last_tick_ms = now_ms;
                self.state = SessionState::Running;
                info!(target: "session", "Engine initialized, viewport {}x{}", width, height);
                Ok(())
            }
            Ok(false) => {
                self.state = SessionState::Failed;
                error!(target: "session", "Engine declined to initialize");
                Err(SessionError::InitializationDeclined)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                error!(target: "session", "Engine initialization failed: {}", e);
                Err(SessionError::InitializationFailed(e))
            }
        }
    }

    fn run_frame(&mut self, now_ms: u64) {
        let delta_ms = now_ms.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = now_ms;

        self.forward_input();
        self.engine.update(delta_ms);
        self.dispatch_events();

        if self.poll_gate.should_poll(now_ms, delta_ms) {
            if self.in_flight_poll.is_some() {
                trace!(target: "session", "State poll still in flight at {}ms, skipped", now_ms);
            } else {
                self.in_flight_poll = Some(self.engine.get_game_state());
            }
        }
        self.collect_poll();
    }

    fn forward_input(&mut self) {
        let changes = self.input.take_changes();
        if changes.is_empty() {
            return;
        }

        if let Some(movement) = changes.movement {
            let movement = movement.clamped();
            self.engine.set_movement_input(movement.x, movement.y);
        }
        if let Some((x, y)) = changes.aim {
            self.engine.set_aim_position(x, y);
        }
        if let Some(firing) = changes.fire {
            self.engine.set_fire_button(firing);
        }
        if let Some(pressed) = changes.jump {
            self.engine.set_jump_button(pressed);
        }
        if changes.special {
            self.engine.use_special_ability();
        }
        for cycle in changes.weapon_cycles {
            match cycle {
                WeaponCycle::Next => self.engine.next_weapon(),
                WeaponCycle::Previous => self.engine.prev_weapon(),
            }
        }
    }

    fn dispatch_events(&mut self) {
        let Some(collector) = &mut self.events else {
            return;
        };
        if collector.collect_frame() == 0 {
            return;
        }

        for event in collector.take_events() {
            let handled = self.registry.dispatch(&event);
            trace!(target: "session", "{} dispatched to {} handler(s)", event.kind(), handled);
        }
    }

    fn collect_poll(&mut self) {
        let Some(poll) = &self.in_flight_poll else {
            return;
        };

        match poll.try_take() {
            PendingState::Waiting => {}
            PendingState::Ready(Ok(state)) => {
                self.in_flight_poll = None;
                self.game_state = Some(state);
            }
            PendingState::Ready(Err(e)) => {
                self.in_flight_poll = None;
                error!(target: "session", "Failed to get game state: {}", e);
                self.game_state = Some(GameState::fallback());
            }
        }
    }
}

impl<E: EngineBridge> Drop for SessionLoop<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<E: EngineBridge> std::fmt::Debug for SessionLoop<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLoop")
            .field("state", &self.state)
            .field("last_tick_ms", &self.last_tick_ms)
            .field("poll_in_flight", &self.in_flight_poll.is_some())
            .field("game_state", &self.game_state)
            .field(
                "events_connected",
                &self.events.as_ref().is_some_and(|c| !c.is_disconnected()),
            )
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
