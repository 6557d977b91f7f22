use crate::traits::{Flow, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
///
/// Fixed step only. All stages live on the stack, so a single `Rk4` can be
/// shared freely between trajectories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4;

impl Rk4 {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Scalar, const N: usize> Steppable<T, N> for Rk4 {
    fn step(&self, flow: &impl Flow<T, N>, state: &[T; N], dt: T) -> [T; N] {
        let two = T::one() + T::one();
        let half_dt = dt / two;
        let sixth_dt = dt / (two + two + two);

        // k1 = f(y)
        let k1 = flow.derivative(state);

        // k2 = f(y + dt*k1/2)
        let k2 = flow.derivative(&offset(state, &k1, half_dt));

        // k3 = f(y + dt*k2/2)
        let k3 = flow.derivative(&offset(state, &k2, half_dt));

        // k4 = f(y + dt*k3)
        let k4 = flow.derivative(&offset(state, &k3, dt));

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        let mut next = *state;
        for i in 0..N {
            next[i] = state[i] + sixth_dt * (k1[i] + two * k2[i] + two * k3[i] + k4[i]);
        }
        next
    }
}

fn offset<T: Scalar, const N: usize>(state: &[T; N], slope: &[T; N], h: T) -> [T; N] {
    let mut out = *state;
    for i in 0..N {
        out[i] = state[i] + h * slope[i];
    }
    out
}
