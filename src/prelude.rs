//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use touch_bridge::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Frontend facade
pub use crate::frontend::{Frontend, FrontendBuilder, FrontendError};

// Engine bridge
pub use crate::core::bridge::{
    BridgeError, EngineBridge, EngineEvent, EngineEventKind, GameOver, GameState,
    GraphicsQuality, HealthChanged, LevelComplete, NativeEngine, Pending, PendingState,
    ScoreChanged, SubscriptionHandle, WeaponChanged, WorkerBridge,
};

// Session loop
pub use crate::core::session::{SessionConfig, SessionError, SessionLoop, SessionState, TickControl};

// Touch input
pub use crate::core::input::{
    AimFireMapper, AimGesture, InputFrame, JoystickConfig, JoystickMapper, LayoutConfig,
    NormalizedInput, TouchControls, TouchPhase, TouchPoint,
};
