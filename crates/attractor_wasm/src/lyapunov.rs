//! Quadratic-map simulator exposed to JavaScript.

use attractor_core::lyapunov::LyapunovEstimator;
use attractor_core::quadratic::{QuadraticMap, COEFFICIENTS};
use js_sys::Float64Array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmLyapunov {
    pub(crate) estimator: LyapunovEstimator<QuadraticMap>,
}

fn coefficient_array(values: &[f64], axis: &str) -> Result<[f64; COEFFICIENTS], JsValue> {
    values.try_into().map_err(|_| {
        JsValue::from_str(&format!(
            "Expected {} {} coefficients, got {}.",
            COEFFICIENTS,
            axis,
            values.len()
        ))
    })
}

#[wasm_bindgen]
impl WasmLyapunov {
    #[wasm_bindgen(constructor)]
    pub fn new(
        x_coefficients: Vec<f64>,
        y_coefficients: Vec<f64>,
        x0: f64,
        y0: f64,
    ) -> Result<WasmLyapunov, JsValue> {
        console_error_panic_hook::set_once();

        let a = coefficient_array(&x_coefficients, "x")?;
        let b = coefficient_array(&y_coefficients, "y")?;
        Ok(Self::from_map(QuadraticMap::new(a, b), x0, y0))
    }

    pub fn from_code(code: &str, x0: f64, y0: f64) -> Result<WasmLyapunov, JsValue> {
        console_error_panic_hook::set_once();

        let map = QuadraticMap::from_code(code).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_map(map, x0, y0))
    }

    /// Random coefficients from a caller-supplied seed, so a page reload can
    /// reproduce the same attractor.
    pub fn random(seed: u32, x0: f64, y0: f64) -> WasmLyapunov {
        console_error_panic_hook::set_once();

        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        Self::from_map(QuadraticMap::random(&mut rng), x0, y0)
    }

    pub fn step(&mut self) -> Vec<f64> {
        self.estimator.step().to_vec()
    }

    /// Runs `count` steps and returns the points flattened as `[x0, y0, x1, y1, ...]`.
    pub fn step_many(&mut self, count: u32) -> Float64Array {
        Float64Array::from(self.advance_flat(count as usize).as_slice())
    }

    pub fn exponent(&self) -> f64 {
        self.estimator.exponent()
    }

    pub fn classification(&self) -> String {
        self.estimator.classify().to_string()
    }

    pub fn iterations(&self) -> usize {
        self.estimator.iterations()
    }

    pub fn current(&self) -> Vec<f64> {
        self.estimator.current().to_vec()
    }

    /// JSON dump of the coefficients.
    pub fn coefficients(&self) -> String {
        self.estimator.map().to_string()
    }

    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        to_value(&self.estimator.bounds())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_value(&self.estimator.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl WasmLyapunov {
    pub(crate) fn from_map(map: QuadraticMap, x0: f64, y0: f64) -> Self {
        Self {
            estimator: LyapunovEstimator::new(map, [x0, y0]),
        }
    }

    pub(crate) fn advance_flat(&mut self, count: usize) -> Vec<f64> {
        let mut flat = Vec::with_capacity(count * 2);
        for _ in 0..count {
            flat.extend_from_slice(&self.estimator.step());
        }
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasm_lyapunov_steps_match_core_estimator() {
        let mut wasm = WasmLyapunov::from_code("MSSSRRPADDSO", 0.1, 0.1).expect("simulator");
        let map = QuadraticMap::from_code("MSSSRRPADDSO").expect("code");
        let mut core = LyapunovEstimator::new(map, [0.1, 0.1]);

        let flat = wasm.advance_flat(50);
        assert_eq!(flat.len(), 100);
        for i in 0..50 {
            let point = core.step();
            assert_eq!(flat[2 * i], point[0]);
            assert_eq!(flat[2 * i + 1], point[1]);
        }
        assert_eq!(wasm.iterations(), 50);
        assert_eq!(wasm.current(), core.current().to_vec());
    }

    #[test]
    fn wasm_lyapunov_reports_classification_names() {
        let mut wasm =
            WasmLyapunov::new(vec![2.0; 6], vec![2.0; 6], 0.1, 0.1).expect("simulator");
        wasm.advance_flat(20);
        assert_eq!(wasm.classification(), "divergent");
        assert_eq!(wasm.exponent(), 0.0);
    }


    #[test]
    fn wasm_lyapunov_random_is_seeded() {
        let a = WasmLyapunov::random(9, 0.0, 0.0);
        let b = WasmLyapunov::random(9, 0.0, 0.0);
        assert_eq!(a.coefficients(), b.coefficients());
        assert!(a.coefficients().starts_with("{\"a\":["));
    }

    #[test]
    fn wasm_lyapunov_single_step_returns_pair() {
        let mut wasm = WasmLyapunov::new(
            vec![1.0, 0.0, -1.4, 0.0, 1.0, 0.0],
            vec![0.0, 0.3, 0.0, 0.0, 0.0, 0.0],
            0.0,
            0.0,
        )
        .expect("simulator");
        assert_eq!(wasm.step(), vec![1.0, 0.0]);
    }
}
