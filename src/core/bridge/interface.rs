//=========================================================================
// Engine Bridge Interface
//=========================================================================
//
// Contract between the front-end and the external game engine.
//
// Fire-and-forget commands return nothing and must not block. Queries and
// commands with an outcome return a `Pending` that the caller checks
// without blocking. Engine-pushed notifications go to the sink registered
// with `set_event_sink`.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;

//=== Internal Dependencies ===============================================

use super::event::EngineEvent;
use super::pending::Pending;

//=== GameState ===========================================================

/// Aggregate engine state mirrored for the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub health: i32,
    pub max_health: i32,
    pub current_weapon: i32,
    pub ammo: i32,
    pub score: i64,
    pub lives: i32,
    pub level: String,
    pub is_paused: bool,
    pub is_game_over: bool,
}

impl GameState {
    /// Snapshot used when the engine cannot be queried: nothing playable,
    /// paused and over.
    pub fn fallback() -> Self {
        Self {
            health: 0,
            max_health: 100,
            current_weapon: 0,
            ammo: 0,
            score: 0,
            lives: 0,
            level: String::new(),
            is_paused: true,
            is_game_over: true,
        }
    }

    /// One-line HUD summary.
    pub fn hud_line(&self) -> String {
        if self.is_game_over {
            return format!("GAME OVER  score {}", self.score);
        }

        let mut line = format!(
            "HP {}/{}  W{} ({})  score {}  lives {}",
            self.health, self.max_health, self.current_weapon, self.ammo, self.score, self.lives
        );
        if !self.level.is_empty() {
            line.push_str("  ");
            line.push_str(&self.level);
        }
        if self.is_paused {
            line.push_str("  [paused]");
        }
        line
    }
}

//=== GraphicsQuality =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsQuality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl GraphicsQuality {
    /// Numeric value understood by the engine.
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Ultra => 3,
        }
    }

    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            3 => Some(Self::Ultra),
            _ => None,
        }
    }
}

//=== BridgeError =========================================================

/// Failures reported through a `Pending` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The engine rejected the request.
    Rejected { code: String, message: String },

    /// The engine side went away before answering.
    Disconnected,
}

impl BridgeError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { code, message } => write!(f, "Engine rejected request ({}): {}", code, message),
            Self::Disconnected => write!(f, "Engine disconnected"),
        }
    }
}

impl std::error::Error for BridgeError {}

//=== EngineBridge ========================================================

/// Capabilities of the external engine.
///
/// Implementations must return from every method promptly; the session
/// loop calls them from the UI thread.
pub trait EngineBridge {
    //--- Lifecycle --------------------------------------------------------

    fn initialize(&mut self, asset_path: &str) -> Pending<bool>;
    fn shutdown(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);

    //--- Frame ------------------------------------------------------------

    /// Advances the simulation by `delta_ms` milliseconds.
    fn update(&mut self, delta_ms: u64);
    fn set_viewport(&mut self, width: u32, height: u32);

    //--- Input ------------------------------------------------------------

    fn set_movement_input(&mut self, x: f32, y: f32);
    fn set_aim_position(&mut self, screen_x: f32, screen_y: f32);
    fn set_fire_button(&mut self, pressed: bool);
    fn set_jump_button(&mut self, pressed: bool);
    fn next_weapon(&mut self);
    fn prev_weapon(&mut self);
    fn use_special_ability(&mut self);

    //--- State and Commands -----------------------------------------------

    fn get_game_state(&mut self) -> Pending<GameState>;
    fn load_level(&mut self, level_name: &str) -> Pending<bool>;
    fn save_game(&mut self, slot: u32) -> Pending<bool>;
    fn load_game(&mut self, slot: u32) -> Pending<bool>;

    //--- Settings ---------------------------------------------------------

    fn set_volume(&mut self, music: f32, sfx: f32);
    fn set_graphics_quality(&mut self, quality: GraphicsQuality);

    //--- Events -----------------------------------------------------------

    /// Registers where engine notifications are delivered. Replaces any
    /// previously registered sink.
    fn set_event_sink(&mut self, sink: Sender<EngineEvent>);
}

//=========================================================================
// Unit Tests
//=========================================================================
