//=========================================================================
// Touch Bridge: Library Root
//
// Touch-control front-end for an external game engine.
//
// Responsibilities:
// - Expose the front-end facade (`FrontendBuilder` / `Frontend`)
// - Expose the engine contract (`EngineBridge`, `NativeEngine`) so hosts
//   can plug in their engine
// - Keep the Winit integration (`platform`) internal
//
// Typical usage:
// ```no_run
// use touch_bridge::prelude::*;
//
// fn run(engine: impl NativeEngine) -> Result<(), Box<dyn std::error::Error>> {
//     let bridge = WorkerBridge::spawn(engine)?;
//     FrontendBuilder::new().build(bridge).run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the gesture mappers, the engine bridge contract and the
// session loop. None of it depends on the windowing backend.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit event loop host and is not part of the
// public API surface.
//
mod frontend;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use frontend::{Frontend, FrontendBuilder, FrontendError};
pub use platform::PlatformError;
