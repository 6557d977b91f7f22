//! The `attractor_core` crate simulates low-dimensional chaotic systems and
//! classifies their long-run behaviour.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `Flow`/`Map` (continuous and discrete systems), `Steppable` (solvers).
//! - **Solvers**: fixed-step classic RK4.
//! - **Lorenz**: the Lorenz vector field with an inverse-speed step heuristic.
//! - **Quadratic**: 12-coefficient planar quadratic maps, random or from Sprott letter codes.
//! - **Lyapunov**: shadow-orbit exponent estimation, bounds, and classification.
//! - **Buffer** / **Trace**: bounded trajectory history and a Lorenz trail driver.
//! - **Search**: retry loop that hunts random maps for strange attractors.

pub mod buffer;
pub mod lorenz;
pub mod lyapunov;
pub mod quadratic;
pub mod search;
pub mod solvers;
pub mod trace;
pub mod traits;

/// A point in the plane, `[x, y]`.
pub type Point2 = [f64; 2];

/// A point in space, `[x, y, z]`.
pub type Point3 = [f64; 3];
