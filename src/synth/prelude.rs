// Prelude module for the wasm/native split

// fmt
#[cfg(target_arch = "wasm32")]
pub use core::fmt;
#[cfg(not(target_arch = "wasm32"))]
pub use std::fmt;

// OnceLock / OnceCell
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use once_cell::sync::OnceCell as OnceLock;
#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub use std::sync::OnceLock;

// collections
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use hashbrown::HashMap;
#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub use std::collections::HashMap;

// PI constant
pub use core::f32::consts::PI;
