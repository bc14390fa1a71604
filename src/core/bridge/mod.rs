//=========================================================================
// Engine Bridge
//=========================================================================
//
// Bridges the front-end with the external game engine.
//
// The engine is opaque: the front-end only talks to it through the
// `EngineBridge` trait, so a different engine backend can be dropped in
// without touching the session loop.
//
// Components:
// - `interface`: The bridge trait, game state and error definitions
// - `pending`: Single-shot asynchronous results
// - `event`: Typed engine notifications
// - `registry`: Subscriptions to engine notifications
// - `event_collector`: Bounded draining of the notification channel
// - `worker`: Thread-hosted adapter for blocking engines
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
pub(crate) mod event_collector;
pub mod interface;
pub mod pending;
pub mod registry;
pub mod worker;

#[cfg(test)]
pub(crate) mod fake;

//=== Public API ==========================================================

pub use event::{
    EngineEvent, EngineEventKind, EventPayload, GameOver, HealthChanged, LevelComplete,
    ScoreChanged, WeaponChanged,
};
pub use interface::{BridgeError, EngineBridge, GameState, GraphicsQuality};
pub use pending::{Completer, Pending, PendingState};
pub use registry::{EventRegistry, SubscriptionHandle};
pub use worker::{NativeEngine, WorkerBridge};

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
