pub mod dispatcher;
#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
mod keyboard;

pub use self::dispatcher::{
    Controls, IgnoreReason, InputDispatcher, KeyOutcome, StaticControls, Surface,
};
#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
pub use self::keyboard::{key_id, ControlEvent, KeyboardHandler};
