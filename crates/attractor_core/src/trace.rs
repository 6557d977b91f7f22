//! Lorenz trajectories with a bounded trail, for streaming to a renderer.

use crate::buffer::HistoryBuffer;
use crate::lorenz::LorenzField;
use crate::Point3;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// How the tracer chooses the next integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimestepPolicy {
    Fixed { dt: f64 },
    /// Aims for `target` units of arc length per step, clamped to `[min_dt, max_dt]`.
    Adaptive { target: f64, min_dt: f64, max_dt: f64 },
}

impl Default for TimestepPolicy {
    fn default() -> Self {
        TimestepPolicy::Fixed { dt: 0.01 }
    }
}

impl TimestepPolicy {
    pub fn adaptive(target: f64) -> Self {
        TimestepPolicy::Adaptive {
            target,
            min_dt: 1e-3,
            max_dt: 0.05,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            TimestepPolicy::Fixed { dt } => {
                if !dt.is_finite() || dt <= 0.0 {
                    bail!("Fixed dt must be positive and finite.");
                }
            }
            TimestepPolicy::Adaptive {
                target,
                min_dt,
                max_dt,
            } => {
                if !target.is_finite() || target <= 0.0 {
                    bail!("Adaptive target step length must be positive and finite.");
                }
                if !min_dt.is_finite() || min_dt <= 0.0 {
                    bail!("min_dt must be positive and finite.");
                }
                if !max_dt.is_finite() || max_dt < min_dt {
                    bail!("max_dt must be finite and at least min_dt.");
                }
            }
        }
        Ok(())
    }

    /// Step size to take from `point`. Always positive and finite for a valid policy.
    pub fn timestep(&self, field: &LorenzField, point: Point3) -> f64 {
        match *self {
            TimestepPolicy::Fixed { dt } => dt,
            TimestepPolicy::Adaptive {
                target,
                min_dt,
                max_dt,
            } => {
                let suggested = field.suggested_timestep(point, target);
                if suggested.is_finite() {
                    suggested.clamp(min_dt, max_dt)
                } else {
                    // Zero velocity (an equilibrium) or a non-finite state.
                    max_dt
                }
            }
        }
    }
}

pub struct FlowTracer {
    field: LorenzField,
    policy: TimestepPolicy,
    trail: HistoryBuffer<Point3>,
    current: Point3,
    elapsed: f64,
}

impl FlowTracer {
    pub fn new(
        field: LorenzField,
        initial: Point3,
        capacity: usize,
        policy: TimestepPolicy,
    ) -> Result<Self> {
        policy.validate().context("Invalid timestep policy.")?;
        if initial.iter().any(|c| !c.is_finite()) {
            bail!("Initial point must be finite.");
        }
        let mut trail = HistoryBuffer::new(capacity)?;
        trail.add(initial);
        Ok(Self {
            field,
            policy,
            trail,
            current: initial,
            elapsed: 0.0,
        })
    }

    pub fn field(&self) -> &LorenzField {
        &self.field
    }

    pub fn policy(&self) -> TimestepPolicy {
        self.policy
    }

    pub fn current(&self) -> Point3 {
        self.current
    }

    /// Integrates one step, appends it to the trail, and returns it.
    pub fn step(&mut self) -> Result<Point3> {
        let dt = self.policy.timestep(&self.field, self.current);
        let next = self.field.step(self.current, dt)?;
        self.trail.add(next);
        self.current = next;
        self.elapsed += dt;
        Ok(next)
    }

    pub fn advance(&mut self, count: usize) -> Result<Point3> {
        let mut point = self.current();
        for _ in 0..count {
            point = self.step()?;
        }
        Ok(point)
    }

    pub fn trail(&self) -> &HistoryBuffer<Point3> {
        &self.trail
    }

    /// Simulated time covered so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowTracer, TimestepPolicy};
    use crate::lorenz::LorenzField;

    fn assert_err_contains<T>(result: anyhow::Result<T>, needle: &str) {
        let err = match result {
            Ok(_) => panic!("expected error"),
            Err(err) => err,
        };
        let message = format!("{err:#}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn fixed_policy_matches_direct_integration() {
        let field = LorenzField::default();
        let mut tracer =
            FlowTracer::new(field, [1.0, 1.0, 1.0], 16, TimestepPolicy::default()).expect("tracer");
        let mut expected = [1.0, 1.0, 1.0];
        for _ in 0..10 {
            expected = field.step(expected, 0.01).expect("step");
            assert_eq!(tracer.step().expect("step"), expected);
        }
        assert!((tracer.elapsed() - 0.1).abs() < 1e-12);
        assert_eq!(tracer.trail().len(), 11);
    }

    #[test]
    fn trail_keeps_only_latest_points() {
        let mut tracer = FlowTracer::new(
            LorenzField::default(),
            [1.0, 1.0, 1.0],
            100,
            TimestepPolicy::default(),
        )
        .expect("tracer");
        let last = tracer.advance(2_000).expect("advance");
        assert_eq!(tracer.trail().len(), 100);
        assert_eq!(tracer.trail().current(), Some(&last));
        // The reference run stays on the butterfly.
        let expected = [13.472905743332278, 12.691475056103124, 34.39214731917505];
        for i in 0..3 {
            assert!((last[i] - expected[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn adaptive_policy_clamps_suggestion() {
        let field = LorenzField::default();
        let policy = TimestepPolicy::adaptive(0.5);
        let dt = policy.timestep(&field, [1.0, 1.0, 1.0]);
        assert_eq!(dt, field.suggested_timestep([1.0, 1.0, 1.0], 0.5));

        let fast = policy.timestep(&field, [15.0, -15.0, 5.0]);
        assert_eq!(fast, 1e-3);
    }

    #[test]
    fn adaptive_policy_floors_infinite_step_at_equilibrium() {
        let field = LorenzField::default();
        assert!(field.suggested_timestep([0.0, 0.0, 0.0], 0.5).is_infinite());

        let policy = TimestepPolicy::adaptive(0.5);
        assert_eq!(policy.timestep(&field, [0.0, 0.0, 0.0]), 0.05);

        let mut tracer = FlowTracer::new(field, [0.0, 0.0, 0.0], 4, policy).expect("tracer");
        assert_eq!(tracer.step().expect("step"), [0.0, 0.0, 0.0]);
        assert!((tracer.elapsed() - 0.05).abs() < 1e-15);
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let field = LorenzField::default();
        assert_err_contains(
            FlowTracer::new(field, [1.0; 3], 0, TimestepPolicy::default()),
            "capacity",
        );
        assert_err_contains(
            FlowTracer::new(field, [1.0; 3], 8, TimestepPolicy::Fixed { dt: 0.0 }),
            "dt must be positive",
        );
        assert_err_contains(
            FlowTracer::new(
                field,
                [1.0; 3],
                8,
                TimestepPolicy::Adaptive {
                    target: 0.5,
                    min_dt: 0.1,
                    max_dt: 0.01,
                },
            ),
            "max_dt",
        );
        assert_err_contains(
            FlowTracer::new(field, [f64::NAN, 0.0, 0.0], 8, TimestepPolicy::default()),
            "finite",
        );
    }

    #[test]
    fn policy_round_trips_through_json() {
        let policy: TimestepPolicy =
            serde_json::from_str(r#"{"kind":"adaptive","target":0.5,"min_dt":0.001,"max_dt":0.05}"#)
                .expect("policy");
        assert_eq!(policy, TimestepPolicy::adaptive(0.5));
        let fixed: TimestepPolicy = serde_json::from_str(r#"{"kind":"fixed","dt":0.01}"#).expect("policy");
        assert_eq!(fixed, TimestepPolicy::default());
    }
}
