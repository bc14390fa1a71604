//=========================================================================
// Engine Session
//=========================================================================
//
// Per-frame driver for the external engine: forwards delta time and
// changed input every tick, polls aggregate state at a bounded rate and
// dispatches engine notifications.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod poll_gate;
pub mod session_loop;

//=== Public API ==========================================================

pub use poll_gate::{PollGate, DEFAULT_POLL_INTERVAL_MS};
pub use session_loop::{SessionConfig, SessionError, SessionLoop, SessionState, TickControl};
