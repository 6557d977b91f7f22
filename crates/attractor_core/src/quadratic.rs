//! Two-dimensional quadratic maps ("Lyapunov attractors").

use crate::traits::Map;
use crate::Point2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of coefficients per output axis.
pub const COEFFICIENTS: usize = 6;

/// Length of a Sprott letter code: six letters per axis.
pub const CODE_LENGTH: usize = 2 * COEFFICIENTS;

/// Coefficient encoded by the letter `A`; each following letter adds 0.1.
const CODE_ORIGIN: f64 = -1.2;
const CODE_STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("attractor code must have 12 letters, got {0}")]
    Length(usize),
    #[error("invalid letter {letter:?} at position {position} (expected A-Y)")]
    Letter { position: usize, letter: char },
}

/// x' = a0 + a1 x + a2 x^2 + a3 xy + a4 y + a5 y^2, and likewise for y' with `b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticMap {
    a: [f64; COEFFICIENTS],
    b: [f64; COEFFICIENTS],
}

impl QuadraticMap {
    pub fn new(a: [f64; COEFFICIENTS], b: [f64; COEFFICIENTS]) -> Self {
        Self { a, b }
    }

    /// Draws every coefficient independently as `2 * (U - 0.5)`, `U ~ U[0, 1)`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut draw = || 2.0 * (rng.gen::<f64>() - 0.5);
        let a: [f64; COEFFICIENTS] = std::array::from_fn(|_| draw());
        let b: [f64; COEFFICIENTS] = std::array::from_fn(|_| draw());
        Self { a, b }
    }

    /// Parses a Sprott-style code such as `"MSSSRRPADDSO"`.
    ///
    /// Letters map onto the grid A = -1.2, B = -1.1, ..., Y = 1.2. Lowercase is
    /// accepted.
    pub fn from_code(code: &str) -> Result<Self, CodeError> {
        let letters: Vec<char> = code.chars().collect();
        if letters.len() != CODE_LENGTH {
            return Err(CodeError::Length(letters.len()));
        }
        let mut values = [0.0; CODE_LENGTH];
        for (position, &letter) in letters.iter().enumerate() {
            let upper = letter.to_ascii_uppercase();
            if !('A'..='Y').contains(&upper) {
                return Err(CodeError::Letter { position, letter });
            }
            let index = (upper as u8 - b'A') as f64;
            values[position] = decode_letter(index);
        }
        let mut a = [0.0; COEFFICIENTS];
        let mut b = [0.0; COEFFICIENTS];
        a.copy_from_slice(&values[..COEFFICIENTS]);
        b.copy_from_slice(&values[COEFFICIENTS..]);
        Ok(Self { a, b })
    }

    pub fn x_coefficients(&self) -> &[f64; COEFFICIENTS] {
        &self.a
    }

    pub fn y_coefficients(&self) -> &[f64; COEFFICIENTS] {
        &self.b
    }

    pub fn apply(&self, [x, y]: Point2) -> Point2 {
        let x2 = x * x;
        let xy = x * y;
        let y2 = y * y;
        [
            eval(&self.a, x, y, x2, xy, y2),
            eval(&self.b, x, y, x2, xy, y2),
        ]
    }
}

// Rounded to one decimal so that "M" decodes to exactly 0.0.
fn decode_letter(index: f64) -> f64 {
    ((CODE_ORIGIN + CODE_STEP * index) * 10.0).round() / 10.0
}

fn eval(c: &[f64; COEFFICIENTS], x: f64, y: f64, x2: f64, xy: f64, y2: f64) -> f64 {
    c[0] + c[1] * x + c[2] * x2 + c[3] * xy + c[4] * y + c[5] * y2
}

impl Map<f64, 2> for QuadraticMap {
    fn apply(&self, x: &Point2) -> Point2 {
        QuadraticMap::apply(self, *x)
    }
}

impl FromStr for QuadraticMap {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for QuadraticMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
