//! `wasm-bindgen` bridge for `attractor_core`.
//!
//! The browser owns the canvas, camera and animation loop; it pulls batches of
//! points from these wrappers once per frame.

mod lorenz;
mod lyapunov;
mod search;

pub use lorenz::WasmLorenzTrail;
pub use lyapunov::WasmLyapunov;
pub use search::{search_attractor, search_simulator};
