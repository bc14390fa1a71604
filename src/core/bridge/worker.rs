//=========================================================================
// Worker Bridge
//=========================================================================
//
// Runs a blocking engine on a dedicated thread behind `EngineBridge`.
//
// Architecture:
//   UI thread                         worker thread
//   ─────────                         ─────────────
//   WorkerBridge::pause() ──┐
//   WorkerBridge::update()  ├─ Command ─► NativeEngine::<call>()
//   get_game_state() ───────┘  (unbounded)      │
//        ▲                                      ├─► Completer::complete()
//        └── Pending<GameState> ◄───────────────┘
//                                               └─► drain_events() → sink
//
// Commands run in the order they were sent. Sending never blocks. Updates
// queued back to back while the engine is busy are folded into one call
// carrying the summed delta. When the worker is gone, fire-and-forget
// commands are dropped with a warning and async commands resolve to
// `BridgeError::Disconnected` (their completer is dropped with the unsent
// command).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::event::EngineEvent;
use super::interface::{BridgeError, EngineBridge, GameState, GraphicsQuality};
use super::pending::{self, Completer, Pending};

//=== NativeEngine ========================================================

/// A synchronous engine implementation.
///
/// Calls may block; they run on the worker thread only.
pub trait NativeEngine: Send + 'static {
    fn initialize(&mut self, asset_path: &str) -> Result<bool, BridgeError>;
    fn shutdown(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn update(&mut self, delta_ms: u64);
    fn set_viewport(&mut self, width: u32, height: u32);

    fn set_movement_input(&mut self, x: f32, y: f32);
    fn set_aim_position(&mut self, screen_x: f32, screen_y: f32);
    fn set_fire_button(&mut self, pressed: bool);
    fn set_jump_button(&mut self, pressed: bool);
    fn next_weapon(&mut self);
    fn prev_weapon(&mut self);
    fn use_special_ability(&mut self);

    fn get_game_state(&mut self) -> Result<GameState, BridgeError>;
    fn load_level(&mut self, level_name: &str) -> Result<bool, BridgeError>;
    fn save_game(&mut self, slot: u32) -> Result<bool, BridgeError>;
    fn load_game(&mut self, slot: u32) -> Result<bool, BridgeError>;

    fn set_volume(&mut self, music: f32, sfx: f32);
    fn set_graphics_quality(&mut self, quality: GraphicsQuality);

    /// Notifications raised since the previous call.
    fn drain_events(&mut self) -> Vec<EngineEvent>;
}

//=== Command =============================================================

enum Command {
    Initialize { asset_path: String, reply: Completer<bool> },
    Shutdown,
    Pause,
    Resume,
    Update(u64),
    SetViewport(u32, u32),
    Movement(f32, f32),
    Aim(f32, f32),
    Fire(bool),
    Jump(bool),
    NextWeapon,
    PrevWeapon,
    Special,
    GetGameState(Completer<GameState>),
    LoadLevel { level_name: String, reply: Completer<bool> },
    SaveGame { slot: u32, reply: Completer<bool> },
    LoadGame { slot: u32, reply: Completer<bool> },
    SetVolume(f32, f32),
    SetGraphicsQuality(GraphicsQuality),
    SetEventSink(Sender<EngineEvent>),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "initialize",
            Self::Shutdown => "shutdown",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Update(_) => "update",
            Self::SetViewport(..) => "set_viewport",
            Self::Movement(..) => "set_movement_input",
            Self::Aim(..) => "set_aim_position",
            Self::Fire(_) => "set_fire_button",
            Self::Jump(_) => "set_jump_button",
            Self::NextWeapon => "next_weapon",
            Self::PrevWeapon => "prev_weapon",
            Self::Special => "use_special_ability",
            Self::GetGameState(_) => "get_game_state",
            Self::LoadLevel { .. } => "load_level",
            Self::SaveGame { .. } => "save_game",
            Self::LoadGame { .. } => "load_game",
            Self::SetVolume(..) => "set_volume",
            Self::SetGraphicsQuality(_) => "set_graphics_quality",
            Self::SetEventSink(_) => "set_event_sink",
        }
    }
}

//=== WorkerBridge ========================================================

/// `EngineBridge` backed by a `NativeEngine` on its own thread.
#[derive(Debug)]
pub struct WorkerBridge {
    commands: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl WorkerBridge {
    /// Moves `engine` onto a new worker thread.
    pub fn spawn<N: NativeEngine>(engine: N) -> std::io::Result<Self> {
        let (sender, receiver) = unbounded();

        let worker = thread::Builder::new()
            .name("engine-worker".into())
            .spawn(move || run_worker(engine, receiver))?;

        info!(target: "bridge", "Engine worker started");

        Ok(Self {
            commands: Some(sender),
            worker: Some(worker),
        })
    }

    /// Whether the worker is still accepting commands.
    pub fn is_alive(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    fn send(&self, command: Command) {
        let Some(sender) = &self.commands else {
            return;
        };
        if let Err(err) = sender.send(command) {
            warn!(target: "bridge", "Engine worker gone, dropped {}", err.0.name());
        }
    }

    fn request<T>(&self, build: impl FnOnce(Completer<T>) -> Command) -> Pending<T> {
        let (completer, pending) = pending::channel();
        self.send(build(completer));
        pending
    }
}

impl Drop for WorkerBridge {
    fn drop(&mut self) {
        self.commands.take();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!(target: "bridge", "Engine worker panicked");
            } else {
                info!(target: "bridge", "Engine worker stopped");
            }
        }
    }
}

//--- Worker Loop ----------------------------------------------------------

fn run_worker<N: NativeEngine>(mut engine: N, commands: Receiver<Command>) {
    let mut sink: Option<Sender<EngineEvent>> = None;
    let mut next: Option<Command> = None;

    loop {
        let command = match next.take() {
            Some(command) => command,
            None => match commands.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
        };

        let command = match command {
            Command::Update(delta_ms) => {
                let (delta_ms, following) = merge_updates(delta_ms, &commands);
                next = following;
                Command::Update(delta_ms)
            }
            other => other,
        };
        execute(&mut engine, command, &mut sink);

        let events = engine.drain_events();
        if events.is_empty() {
            continue;
        }
        match &sink {
            Some(sink) => {
                for event in events {
                    if sink.send(event).is_err() {
                        debug!(target: "bridge", "Event sink closed, dropping events");
                        break;
                    }
                }
            }
            None => debug!(target: "bridge", "No event sink, dropped {} event(s)", events.len()),
        }
    }
}

/// Folds the updates queued right after the current one into its delta.
/// Returns the first queued command that is not an update.
fn merge_updates(mut delta_ms: u64, commands: &Receiver<Command>) -> (u64, Option<Command>) {
    let mut merged = 0;
    let mut following = None;

    while let Ok(command) = commands.try_recv() {
        match command {
            Command::Update(more) => {
                delta_ms = delta_ms.saturating_add(more);
                merged += 1;
            }
            other => {
                following = Some(other);
                break;
            }
        }
    }

    if merged > 0 {
        trace!(target: "bridge", "Merged {} queued update(s) into {}ms", merged, delta_ms);
    }
    (delta_ms, following)
}

fn execute<N: NativeEngine>(engine: &mut N, command: Command, sink: &mut Option<Sender<EngineEvent>>) {
    match command {
        Command::Initialize { asset_path, reply } => reply.complete(engine.initialize(&asset_path)),
        Command::Shutdown => engine.shutdown(),
        Command::Pause => engine.pause(),
        Command::Resume => engine.resume(),
        Command::Update(delta_ms) => engine.update(delta_ms),
        Command::SetViewport(width, height) => engine.set_viewport(width, height),
        Command::Movement(x, y) => engine.set_movement_input(x, y),
        Command::Aim(x, y) => engine.set_aim_position(x, y),
        Command::Fire(pressed) => engine.set_fire_button(pressed),
        Command::Jump(pressed) => engine.set_jump_button(pressed),
        Command::NextWeapon => engine.next_weapon(),
        Command::PrevWeapon => engine.prev_weapon(),
        Command::Special => engine.use_special_ability(),
        Command::GetGameState(reply) => reply.complete(engine.get_game_state()),
        Command::LoadLevel { level_name, reply } => reply.complete(engine.load_level(&level_name)),
        Command::SaveGame { slot, reply } => reply.complete(engine.save_game(slot)),
        Command::LoadGame { slot, reply } => reply.complete(engine.load_game(slot)),
        Command::SetVolume(music, sfx) => engine.set_volume(music, sfx),
        Command::SetGraphicsQuality(quality) => engine.set_graphics_quality(quality),
        Command::SetEventSink(new_sink) => *sink = Some(new_sink),
    }
}

//=== EngineBridge Implementation =========================================

impl EngineBridge for WorkerBridge {
    fn initialize(&mut self, asset_path: &str) -> Pending<bool> {
        let asset_path = asset_path.to_owned();
        self.request(|reply| Command::Initialize { asset_path, reply })
    }

    fn shutdown(&mut self) {
        self.send(Command::Shutdown);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn resume(&mut self) {
        self.send(Command::Resume);
    }

    fn update(&mut self, delta_ms: u64) {
        self.send(Command::Update(delta_ms));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.send(Command::SetViewport(width, height));
    }

    fn set_movement_input(&mut self, x: f32, y: f32) {
        self.send(Command::Movement(x, y));
    }

    fn set_aim_position(&mut self, screen_x: f32, screen_y: f32) {
        self.send(Command::Aim(screen_x, screen_y));
    }

    fn set_fire_button(&mut self, pressed: bool) {
        self.send(Command::Fire(pressed));
    }

    fn set_jump_button(&mut self, pressed: bool) {
        self.send(Command::Jump(pressed));
    }

    fn next_weapon(&mut self) {
        self.send(Command::NextWeapon);
    }

    fn prev_weapon(&mut self) {
        self.send(Command::PrevWeapon);
    }

    fn use_special_ability(&mut self) {
        self.send(Command::Special);
    }

    fn get_game_state(&mut self) -> Pending<GameState> {
        self.request(Command::GetGameState)
    }

    fn load_level(&mut self, level_name: &str) -> Pending<bool> {
        let level_name = level_name.to_owned();
        self.request(|reply| Command::LoadLevel { level_name, reply })
    }

    fn save_game(&mut self, slot: u32) -> Pending<bool> {
        self.request(|reply| Command::SaveGame { slot, reply })
    }

    fn load_game(&mut self, slot: u32) -> Pending<bool> {
        self.request(|reply| Command::LoadGame { slot, reply })
    }

    fn set_volume(&mut self, music: f32, sfx: f32) {
        self.send(Command::SetVolume(music, sfx));
    }

    fn set_graphics_quality(&mut self, quality: GraphicsQuality) {
        self.send(Command::SetGraphicsQuality(quality));
    }

    fn set_event_sink(&mut self, sink: Sender<EngineEvent>) {
        self.send(Command::SetEventSink(sink));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bridge::event::ScoreChanged;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    //--- Test Engine ------------------------------------------------------

    #[derive(Default)]
    struct ScriptedEngine {
        calls: Arc<Mutex<Vec<String>>>,
        score: i64,
        queued: Vec<EngineEvent>,
        /// When set, `initialize` blocks until a value arrives.
        gate: Option<Receiver<()>>,
    }

    impl ScriptedEngine {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    impl NativeEngine for ScriptedEngine {
        fn initialize(&mut self, asset_path: &str) -> Result<bool, BridgeError> {
            self.record(format!("initialize {}", asset_path));
            if let Some(gate) = &self.gate {
                let _ = gate.recv();
            }
            if asset_path.is_empty() {
                return Err(BridgeError::rejected("INIT_ERROR", "no asset path"));
            }
            Ok(true)
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
            if delta_ms == u64::MAX {
                panic!("engine crashed");
            }
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
            self.score += 100;
            self.queued.push(ScoreChanged { score: self.score }.into());
            self.record("special");
        }
        fn get_game_state(&mut self) -> Result<GameState, BridgeError> {
            self.record("get_game_state");
            Ok(GameState {
                score: self.score,
                is_paused: false,
                is_game_over: false,
                ..GameState::fallback()
            })
        }
        fn load_level(&mut self, level_name: &str) -> Result<bool, BridgeError> {
            self.record(format!("load_level {}", level_name));
            Ok(level_name.starts_with("level_"))
        }
        fn save_game(&mut self, slot: u32) -> Result<bool, BridgeError> {
            self.record(format!("save {}", slot));
            Err(BridgeError::rejected("SAVE_ERROR", "read-only storage"))
        }
        fn load_game(&mut self, slot: u32) -> Result<bool, BridgeError> {
            self.record(format!("load {}", slot));
            Ok(true)
        }
        fn set_volume(&mut self, music: f32, sfx: f32) {
            self.record(format!("volume {} {}", music, sfx));
        }
        fn set_graphics_quality(&mut self, quality: GraphicsQuality) {
            self.record(format!("quality {}", quality.wire_value()));
        }
        fn drain_events(&mut self) -> Vec<EngineEvent> {
            std::mem::take(&mut self.queued)
        }
    }

    fn spawn() -> (WorkerBridge, Arc<Mutex<Vec<String>>>) {
        let engine = ScriptedEngine::default();
        let calls = Arc::clone(&engine.calls);
        (WorkerBridge::spawn(engine).unwrap(), calls)
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn commands_run_in_order() {
        let (mut bridge, calls) = spawn();

        assert_eq!(bridge.initialize("assets").wait(), Ok(true));
        bridge.set_viewport(800, 400);
        bridge.set_movement_input(0.5, -1.0);
        bridge.set_fire_button(true);
        bridge.update(16);
        bridge.next_weapon();
        bridge.set_graphics_quality(GraphicsQuality::Ultra);
        bridge.shutdown();
        drop(bridge);

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "initialize assets",
                "viewport 800x400",
                "move 0.5 -1",
                "fire true",
                "update 16",
                "next_weapon",
                "quality 3",
                "shutdown",
            ]
        );
    }

    #[test]
    fn updates_queued_behind_a_busy_engine_are_merged() {
        let (release, gate) = crossbeam_channel::bounded(1);
        let engine = ScriptedEngine { gate: Some(gate), ..ScriptedEngine::default() };
        let calls = Arc::clone(&engine.calls);
        let mut bridge = WorkerBridge::spawn(engine).unwrap();

        let init = bridge.initialize("assets");
        bridge.update(16);
        bridge.update(16);
        bridge.update(17);
        bridge.set_fire_button(true);
        bridge.update(16);
        release.send(()).unwrap();

        assert_eq!(init.wait(), Ok(true));
        drop(bridge);

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["initialize assets", "update 49", "fire true", "update 16"]
        );
    }

    #[test]
    fn async_results_resolve() {
        let (mut bridge, _calls) = spawn();

        assert_eq!(bridge.get_game_state().wait().map(|s| s.is_game_over), Ok(false));
        assert!(bridge.load_level("level_02").wait_succeeded());
        assert!(!bridge.load_level("menu").wait_succeeded());
        assert_eq!(bridge.load_game(1).wait(), Ok(true));
    }

    #[test]
    fn engine_errors_propagate() {
        let (mut bridge, _calls) = spawn();

        assert_eq!(
            bridge.save_game(3).wait(),
            Err(BridgeError::rejected("SAVE_ERROR", "read-only storage"))
        );
        assert_eq!(
            bridge.initialize("").wait(),
            Err(BridgeError::rejected("INIT_ERROR", "no asset path"))
        );
    }

    #[test]
    fn engine_events_reach_sink() {
        let (mut bridge, _calls) = spawn();
        let (tx, rx) = crossbeam_channel::unbounded();

        bridge.set_event_sink(tx);
        bridge.use_special_ability();
        bridge.use_special_ability();

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, ScoreChanged { score: 100 }.into());
        assert_eq!(second, ScoreChanged { score: 200 }.into());
    }

    #[test]
    fn crashed_worker_resolves_disconnected() {
        let (mut bridge, _calls) = spawn();

        bridge.update(u64::MAX);
        let state = bridge.get_game_state();

        assert_eq!(state.wait(), Err(BridgeError::Disconnected));

        bridge.pause();
        assert_eq!(bridge.save_game(1).wait(), Err(BridgeError::Disconnected));
    }
}
