//! Random search for strange attractors.
//!
//! Most random coefficient sets escape to infinity or collapse onto a fixed
//! point within a few hundred iterations. The search draws a map, runs it
//! for a fixed budget, and retries with fresh coefficients until the orbit
//! lands in an accepted classification.

use crate::lyapunov::{Bounds, Classification, LyapunovEstimator, WARMUP};
use crate::quadratic::QuadraticMap;
use crate::traits::Map;
use crate::Point2;
use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_attempts: usize,
    /// Iteration budget per attempt, warmup included.
    pub iterations: usize,
    pub accept: Vec<Classification>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            iterations: 50_000,
            accept: vec![Classification::Chaotic],
        }
    }
}

impl SearchSettings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: SearchSettings =
            serde_json::from_str(text).context("Failed to parse search settings.")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            bail!("max_attempts must be greater than zero.");
        }
        if self.iterations <= WARMUP {
            bail!(
                "iterations must exceed the warmup of {} steps (got {}).",
                WARMUP,
                self.iterations
            );
        }
        if self.accept.is_empty() {
            bail!("accept must name at least one classification.");
        }
        Ok(())
    }
}

/// Result of running one estimator to completion.
#[derive(Debug, Clone, Serialize)]
pub struct Orbit {
    pub points: Vec<Point2>,
    pub classification: Classification,
    pub exponent: f64,
    pub lyapunov_sum: f64,
    pub iterations: usize,
    pub bounds: Bounds,
}

/// Iterates `map` from `initial` for up to `iterations` steps.
///
/// Stops as soon as the orbit is divergent or convergent, since neither can
/// recover. `points` holds every point returned by the estimator.
pub fn run_orbit<M: Map<f64, 2>>(map: M, initial: Point2, iterations: usize) -> Orbit {
    let mut estimator = LyapunovEstimator::new(map, initial);
    let mut points = Vec::new();
    for _ in 0..iterations {
        points.push(estimator.step());
        if estimator.classify().is_terminal() {
            break;
        }
    }
    Orbit {
        points,
        classification: estimator.classify(),
        exponent: estimator.exponent(),
        lyapunov_sum: estimator.lyapunov_sum(),
        iterations: estimator.iterations(),
        bounds: estimator.bounds(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Found {
    pub map: QuadraticMap,
    pub initial: Point2,
    pub orbit: Orbit,
    /// 1-based index of the accepted attempt.
    pub attempts: usize,
}

/// Draws random maps until one produces an accepted classification.
///
/// Each attempt gets fresh coefficients and an initial point uniform in
/// [-0.5, 0.5)^2; nothing carries over between attempts.
pub fn find_attractor<R: Rng>(rng: &mut R, settings: &SearchSettings) -> Result<Found> {
    settings.validate()?;

    for attempt in 1..=settings.max_attempts {
        let map = QuadraticMap::random(rng);
        let initial = [rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5];
        let orbit = run_orbit(&map, initial, settings.iterations);

        if settings.accept.contains(&orbit.classification) {
            info!(
                attempt,
                classification = %orbit.classification,
                exponent = orbit.exponent,
                %map,
                "accepted attractor"
            );
            return Ok(Found {
                map,
                initial,
                orbit,
                attempts: attempt,
            });
        }

        debug!(
            attempt,
            classification = %orbit.classification,
            iterations = orbit.iterations,
            exponent = orbit.exponent,
            "rejected attractor"
        );
    }

    warn!(
        max_attempts = settings.max_attempts,
        "attractor search exhausted its attempts"
    );
    bail!(
        "No accepted attractor found in {} attempts.",
        settings.max_attempts
    )
}
