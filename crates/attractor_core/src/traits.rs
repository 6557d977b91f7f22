use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our dynamical systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A continuous-time system dx/dt = f(x) on an `N`-dimensional state.
pub trait Flow<T: Scalar, const N: usize> {
    /// Evaluates the vector field at `x`.
    fn derivative(&self, x: &[T; N]) -> [T; N];
}

/// A discrete-time system x_{n+1} = f(x_n) on an `N`-dimensional state.
///
/// Implementations must be pure: the same input always yields the same
/// output, and no internal state changes.
pub trait Map<T: Scalar, const N: usize> {
    fn apply(&self, x: &[T; N]) -> [T; N];
}

impl<T: Scalar, const N: usize, M: Map<T, N> + ?Sized> Map<T, N> for &M {
    fn apply(&self, x: &[T; N]) -> [T; N] {
        (**self).apply(x)
    }
}

/// A trait for solvers that can step a flow forward.
pub trait Steppable<T: Scalar, const N: usize> {
    /// Performs one step of size dt starting at `state` and returns the new state.
    fn step(&self, flow: &impl Flow<T, N>, state: &[T; N], dt: T) -> [T; N];
}
