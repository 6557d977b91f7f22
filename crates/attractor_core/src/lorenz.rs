//! The Lorenz vector field and its fixed-step integration.

use crate::solvers::Rk4;
use crate::traits::{Flow, Scalar, Steppable};
use crate::Point3;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the Lorenz system. Defaults are the classic chaotic values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LorenzField {
    params: LorenzParams,
}

impl LorenzField {
    pub fn new(params: LorenzParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> LorenzParams {
        self.params
    }

    pub fn derivative(&self, x: f64, y: f64, z: f64) -> Point3 {
        let LorenzParams { sigma, rho, beta } = self.params;
        [sigma * (y - x), x * (rho - z) - y, x * y - beta * z]
    }

    /// Advances `point` by one RK4 step of size `dt`.
    pub fn step(&self, point: Point3, dt: f64) -> Result<Point3> {
        if !dt.is_finite() || dt <= 0.0 {
            bail!("Step size dt must be positive and finite (got {dt}).");
        }
        Ok(Rk4.step(self, &point, dt))
    }

    /// Time step that moves roughly `target` units of arc length from `point`.
    ///
    /// Returns `target / |f(point)|` unclamped, so the result is infinite at an
    /// equilibrium. Callers must clamp it before stepping.
    pub fn suggested_timestep(&self, point: Point3, target: f64) -> f64 {
        let [dx, dy, dz] = self.derivative(point[0], point[1], point[2]);
        let magnitude = (dx * dx + dy * dy + dz * dz).sqrt();
        target / magnitude
    }
}

impl<T: Scalar> Flow<T, 3> for LorenzField {
    fn derivative(&self, x: &[T; 3]) -> [T; 3] {
        let cast = |v: f64| T::from_f64(v).unwrap_or_else(T::nan);
        let sigma = cast(self.params.sigma);
        let rho = cast(self.params.rho);
        let beta = cast(self.params.beta);
        [
            sigma * (x[1] - x[0]),
            x[0] * (rho - x[2]) - x[1],
            x[0] * x[1] - beta * x[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{LorenzField, LorenzParams};
    use crate::traits::Flow;

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn default_params_are_classic_values() {
        let params = LorenzParams::default();
        assert_eq!(params.sigma, 10.0);
        assert_eq!(params.rho, 28.0);
        assert_eq!(params.beta, 8.0 / 3.0);
    }

    #[test]
    fn params_deserialize_with_partial_overrides() {
        let params: LorenzParams = serde_json::from_str(r#"{"rho": 99.96}"#).expect("params");
        assert_eq!(params.sigma, 10.0);
        assert_eq!(params.rho, 99.96);
        assert_eq!(params.beta, 8.0 / 3.0);
    }

    #[test]
    fn derivative_matches_closed_form() {
        let field = LorenzField::default();
        let [dx, dy, dz] = field.derivative(1.0, 2.0, 3.0);
        assert_eq!(dx, 10.0);
        assert_eq!(dy, 1.0 * (28.0 - 3.0) - 2.0);
        assert!((dz - (2.0 - 8.0)).abs() < 1e-12);
    }

    #[test]
    fn generic_flow_agrees_with_f64_derivative() {
        let field = LorenzField::default();
        let direct = field.derivative(0.5, -1.0, 20.0);
        let via_trait = Flow::<f64, 3>::derivative(&field, &[0.5, -1.0, 20.0]);
        assert_eq!(direct, via_trait);
    }

    #[test]
    fn rk4_step_matches_reference_near_origin() {
        let field = LorenzField::default();
        let next = field.step([0.1, 0.0, 0.0], 1e-4).expect("step");
        let expected = [0.09990018988540762, 0.00027984618237717927, 1.3984311627152893e-09];
        for i in 0..3 {
            assert!(
                (next[i] - expected[i]).abs() < 1e-9,
                "component {i}: {} vs {}",
                next[i],
                expected[i]
            );
        }
    }

    #[test]
    fn rk4_thousand_steps_match_reference() {
        let field = LorenzField::default();
        let mut point = [0.1, 0.0, 0.0];
        for _ in 0..1000 {
            point = field.step(point, 1e-4).expect("step");
        }
        let expected = [0.12721896942935987, 0.2554231242388394, 0.0011425722297121045];
        for i in 0..3 {
            assert!((point[i] - expected[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn step_is_deterministic() {
        let field = LorenzField::default();
        let a = field.step([1.0, 1.0, 1.0], 0.01).expect("step");
        let b = field.step([1.0, 1.0, 1.0], 0.01).expect("step");
        assert_eq!(a, b);
    }

    #[test]
    fn step_rejects_non_positive_dt() {
        let field = LorenzField::default();
        assert_err_contains(field.step([1.0, 1.0, 1.0], 0.0), "dt must be positive");
        assert_err_contains(field.step([1.0, 1.0, 1.0], -0.01), "dt must be positive");
        assert_err_contains(field.step([1.0, 1.0, 1.0], f64::NAN), "dt must be positive");
    }

    #[test]
    fn suggested_timestep_is_target_over_speed() {
        let field = LorenzField::default();
        let [dx, dy, dz] = field.derivative(1.0, 1.0, 1.0);
        let magnitude = (dx * dx + dy * dy + dz * dz).sqrt();
        let dt = field.suggested_timestep([1.0, 1.0, 1.0], 0.5);
        assert_eq!(dt, 0.5 / magnitude);
        assert!((dt - 0.01919137963300291).abs() < 1e-15);
    }

    #[test]
    fn suggested_timestep_is_unbounded_at_equilibrium() {
        let field = LorenzField::default();
        let dt = field.suggested_timestep([0.0, 0.0, 0.0], 0.5);
        assert!(dt.is_infinite());
    }
}
