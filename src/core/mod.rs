//=========================================================================
// Core Systems
//
// Platform-independent parts of the front-end.
//
// Responsibilities:
// - Map touch gestures to normalized movement, aim and fire input
// - Define the contract with the external engine (bridge, events, results)
// - Drive the engine from frame ticks (session loop)
//
// Notes:
// Nothing in `core` depends on Winit. The platform layer feeds it
// `TouchPoint`s and millisecond timestamps, so everything here is testable
// without a window.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod bridge;
pub mod input;
pub mod session;
