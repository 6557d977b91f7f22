//! Largest-Lyapunov-exponent estimation for planar maps.
//!
//! A primary orbit and a nearby shadow orbit are iterated together. After a
//! warmup, the separation is measured each step and its log growth
//! accumulated. The shadow is then placed back at the initial separation from
//! the primary point, along the shadow-to-primary direction.

use crate::traits::Map;
use crate::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Iterations excluded from the Lyapunov sum while transients settle.
pub const WARMUP: usize = 1000;
/// Coordinates beyond this magnitude count as escaped to infinity.
pub const MAX_COORD: f64 = 1e10;
/// Floor for the separation before taking its logarithm.
pub const EPS: f64 = 1e-20;
/// Offset of the shadow orbit from the initial point, per coordinate.
pub const SHADOW_OFFSET: f64 = 1e-4;
/// Per-coordinate displacement below which the orbit counts as stopped.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-10;
/// Lyapunov statistic below which the orbit is periodic.
pub const PERIODIC_THRESHOLD: f64 = -10.0;
/// Lyapunov statistic at or above which the orbit is chaotic.
pub const CHAOTIC_THRESHOLD: f64 = 10.0;

/// Axis-aligned bounding box of the accepted primary orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    pub fn include(&mut self, [x, y]: Point2) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    /// Records a point that escaped. A NaN coordinate opens its axis in both
    /// directions, since `f64::min`/`max` would otherwise ignore it.
    fn include_escape(&mut self, [x, y]: Point2) {
        let widen = |lo: &mut f64, hi: &mut f64, v: f64| {
            if v.is_nan() {
                *lo = f64::NEG_INFINITY;
                *hi = f64::INFINITY;
            } else {
                *lo = lo.min(v);
                *hi = hi.max(v);
            }
        };
        widen(&mut self.xmin, &mut self.xmax, x);
        widen(&mut self.ymin, &mut self.ymax, y);
    }

    pub fn exceeds(&self, limit: f64) -> bool {
        self.xmin < -limit || self.ymin < -limit || self.xmax > limit || self.ymax > limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// The orbit escaped past `MAX_COORD`.
    Divergent,
    /// The orbit came to rest on a fixed point.
    Convergent,
    Periodic,
    Stable,
    Chaotic,
}

impl Classification {
    /// Buckets a cumulative Lyapunov sum.
    pub fn from_lyapunov_sum(sum: f64) -> Self {
        if sum < PERIODIC_THRESHOLD {
            Classification::Periodic
        } else if sum < CHAOTIC_THRESHOLD {
            Classification::Stable
        } else {
            Classification::Chaotic
        }
    }

    /// Divergent and convergent orbits never recover; the others can still change.
    pub fn is_terminal(self) -> bool {
        matches!(self, Classification::Divergent | Classification::Convergent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Divergent => "divergent",
            Classification::Convergent => "convergent",
            Classification::Periodic => "periodic",
            Classification::Stable => "stable",
            Classification::Chaotic => "chaotic",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of an estimator for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatorSnapshot {
    pub iterations: usize,
    pub exponent: f64,
    pub lyapunov_sum: f64,
    pub classification: Classification,
    pub bounds: Bounds,
    pub current: Point2,
}

pub struct LyapunovEstimator<M> {
    map: M,
    current: Point2,
    previous: Point2,
    shadow: Point2,
    initial_distance: f64,
    lyapunov_sum: f64,
    iterations: usize,
    bounds: Bounds,
}

impl<M: Map<f64, 2>> LyapunovEstimator<M> {
    /// Starts a primary orbit at `initial` with its shadow offset by
    /// `SHADOW_OFFSET` in both coordinates.
    ///
    /// Pass `&map` to share one map between several estimators.
    pub fn new(map: M, initial: Point2) -> Self {
        let shadow = [initial[0] + SHADOW_OFFSET, initial[1] + SHADOW_OFFSET];
        let initial_distance = distance(&initial, &shadow);
        Self {
            map,
            current: initial,
            previous: initial,
            shadow,
            initial_distance,
            lyapunov_sum: 0.0,
            iterations: 0,
            bounds: Bounds::default(),
        }
    }

    /// Advances both orbits by one map application and returns the primary point.
    ///
    /// A primary step that escapes (non-finite, or beyond `MAX_COORD`) is not
    /// committed: the escape is written into the bounds, the last accepted
    /// point is returned, and the sum is left alone. The iteration counter
    /// still advances.
    ///
    /// If only the shadow escapes, the primary step is kept and the shadow
    /// restarts at `SHADOW_OFFSET` from it, without touching the sum.
    pub fn step(&mut self) -> Point2 {
        self.previous = self.current;

        let next = self.map.apply(&self.current);
        let next_shadow = self.map.apply(&self.shadow);
        self.iterations += 1;

        if escaped(&next) {
            self.bounds.include_escape(next);
            return self.previous;
        }

        self.current = next;
        self.bounds.include(next);

        if escaped(&next_shadow) {
            self.shadow = [next[0] + SHADOW_OFFSET, next[1] + SHADOW_OFFSET];
            return self.current;
        }
        self.shadow = next_shadow;

        if self.iterations <= WARMUP {
            return self.current;
        }

        let dx = self.current[0] - self.shadow[0];
        let dy = self.current[1] - self.shadow[1];
        let separation = (dx * dx + dy * dy).sqrt().max(EPS);
        self.lyapunov_sum += (separation / self.initial_distance).ln();

        let scale = self.initial_distance / separation;
        self.shadow = [self.current[0] + dx * scale, self.current[1] + dy * scale];

        self.current
    }

    /// Runs `count` steps and returns the final point.
    pub fn advance(&mut self, count: usize) -> Point2 {
        let mut point = self.current;
        for _ in 0..count {
            point = self.step();
        }
        point
    }

    /// Mean log-stretching per post-warmup iteration (0 before warmup ends).
    pub fn exponent(&self) -> f64 {
        let effective = self.iterations.saturating_sub(WARMUP);
        if effective > 0 {
            self.lyapunov_sum / effective as f64
        } else {
            0.0
        }
    }

    /// Buckets the cumulative `lyapunov_sum()`, not the per-iteration `exponent()`.
    pub fn classify(&self) -> Classification {
        if self.bounds.exceeds(MAX_COORD) {
            return Classification::Divergent;
        }

        let dx = self.current[0] - self.previous[0];
        let dy = self.current[1] - self.previous[1];
        if dx.abs() < CONVERGENCE_TOLERANCE && dy.abs() < CONVERGENCE_TOLERANCE {
            return Classification::Convergent;
        }

        Classification::from_lyapunov_sum(self.lyapunov_sum)
    }

    pub fn snapshot(&self) -> EstimatorSnapshot {
        EstimatorSnapshot {
            iterations: self.iterations,
            exponent: self.exponent(),
            lyapunov_sum: self.lyapunov_sum,
            classification: self.classify(),
            bounds: self.bounds,
            current: self.current,
        }
    }
}

impl<M> LyapunovEstimator<M> {
    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn current(&self) -> Point2 {
        self.current
    }

    pub fn previous(&self) -> Point2 {
        self.previous
    }

    pub fn shadow(&self) -> Point2 {
        self.shadow
    }

    pub fn initial_distance(&self) -> f64 {
        self.initial_distance
    }

    pub fn lyapunov_sum(&self) -> f64 {
        self.lyapunov_sum
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

fn escaped(point: &Point2) -> bool {
    point.iter().any(|c| !c.is_finite() || c.abs() > MAX_COORD)
}

fn distance(a: &Point2, b: &Point2) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}
