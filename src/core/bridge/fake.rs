//=========================================================================
// Fake Engine (tests only)
//=========================================================================
//
// In-process `EngineBridge` that records every call as a string and lets
// tests script initialization and polling outcomes.
//
//=========================================================================

use crossbeam_channel::Sender;

use super::event::EngineEvent;
use super::interface::{BridgeError, EngineBridge, GameState, GraphicsQuality};
use super::pending::{self, Completer, Pending};

//=== FakeEngine ==========================================================

pub(crate) struct FakeEngine {
    pub calls: Vec<String>,

    /// `None` holds the init completer in `held_init` instead of resolving.
    pub init_result: Option<Result<bool, BridgeError>>,
    pub held_init: Option<Completer<bool>>,

    pub poll_result: Result<GameState, BridgeError>,
    /// When set, polls are held in `held_polls` instead of resolving.
    pub hold_polls: bool,
    pub held_polls: Vec<Completer<GameState>>,

    pub command_result: Result<bool, BridgeError>,
    pub sink: Option<Sender<EngineEvent>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            init_result: Some(Ok(true)),
            held_init: None,
            poll_result: Ok(Self::running_state()),
            hold_polls: false,
            held_polls: Vec::new(),
            command_result: Ok(true),
            sink: None,
        }
    }

    pub fn running_state() -> GameState {
        GameState {
            health: 100,
            max_health: 100,
            current_weapon: 1,
            ammo: 50,
            score: 0,
            lives: 3,
            level: "level_01".into(),
            is_paused: false,
            is_game_over: false,
        }
    }

    /// Calls whose text starts with `prefix`.
    pub fn calls_named(&self, prefix: &str) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls_named(prefix).len()
    }

    /// Pushes an event through the registered sink.
    pub fn emit(&self, event: impl Into<EngineEvent>) {
        if let Some(sink) = &self.sink {
            sink.send(event.into()).unwrap();
        }
    }

    fn record(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }
}

//=== EngineBridge Implementation =========================================

impl EngineBridge for FakeEngine {
    fn initialize(&mut self, asset_path: &str) -> Pending<bool> {
        self.record(format!("initialize {}", asset_path));
        match self.init_result.clone() {
            Some(result) => Pending::ready(result),
            None => {
                let (completer, pending) = pending::channel();
                self.held_init = Some(completer);
                pending
            }
        }
    }

    fn shutdown(&mut self) {
        self.record("shutdown");
    }

    fn pause(&mut self) {
        self.record("pause");
    }

    fn resume(&mut self) {
        self.record("resume");
    }

    fn update(&mut self, delta_ms: u64) {
        self.record(format!("update {}", delta_ms));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.record(format!("viewport {}x{}", width, height));
    }

    fn set_movement_input(&mut self, x: f32, y: f32) {
        self.record(format!("move {} {}", x, y));
    }

    fn set_aim_position(&mut self, screen_x: f32, screen_y: f32) {
        self.record(format!("aim {} {}", screen_x, screen_y));
    }

    fn set_fire_button(&mut self, pressed: bool) {
        self.record(format!("fire {}", pressed));
    }

    fn set_jump_button(&mut self, pressed: bool) {
        self.record(format!("jump {}", pressed));
    }

    fn next_weapon(&mut self) {
        self.record("next_weapon");
    }

    fn prev_weapon(&mut self) {
        self.record("prev_weapon");
    }

    fn use_special_ability(&mut self) {
        self.record("special");
    }

    fn get_game_state(&mut self) -> Pending<GameState> {
        self.record("get_game_state");
        if self.hold_polls {
            let (completer, pending) = pending::channel();
            self.held_polls.push(completer);
            pending
        } else {
            Pending::ready(self.poll_result.clone())
        }
    }

    fn load_level(&mut self, level_name: &str) -> Pending<bool> {
        self.record(format!("load_level {}", level_name));
        Pending::ready(self.command_result.clone())
    }

    fn save_game(&mut self, slot: u32) -> Pending<bool> {
        self.record(format!("save {}", slot));
        Pending::ready(self.command_result.clone())
    }

    fn load_game(&mut self, slot: u32) -> Pending<bool> {
        self.record(format!("load {}", slot));
        Pending::ready(self.command_result.clone())
    }

    fn set_volume(&mut self, music: f32, sfx: f32) {
        self.record(format!("volume {} {}", music, sfx));
    }

    fn set_graphics_quality(&mut self, quality: GraphicsQuality) {
        self.record(format!("quality {}", quality.wire_value()));
    }

    fn set_event_sink(&mut self, sink: Sender<EngineEvent>) {
        self.record("set_event_sink");
        self.sink = Some(sink);
    }
}
