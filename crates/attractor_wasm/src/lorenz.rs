//! Lorenz trail runner exposed to JavaScript.

use attractor_core::lorenz::{LorenzField, LorenzParams};
use attractor_core::trace::{FlowTracer, TimestepPolicy};
use js_sys::Float64Array;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmLorenzTrail {
    tracer: FlowTracer,
}

#[wasm_bindgen]
impl WasmLorenzTrail {
    /// Fixed-step trail. `sigma`, `rho`, `beta` default to 10, 28, 8/3 when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(
        initial: Vec<f64>,
        capacity: usize,
        dt: f64,
        sigma: Option<f64>,
        rho: Option<f64>,
        beta: Option<f64>,
    ) -> Result<WasmLorenzTrail, JsValue> {
        console_error_panic_hook::set_once();
        Self::build(initial, capacity, TimestepPolicy::Fixed { dt }, sigma, rho, beta)
            .map_err(|e| JsValue::from_str(&format!("Invalid Lorenz trail: {:#}", e)))
    }

    /// Trail whose step length adapts to the local speed of the flow.
    pub fn adaptive(
        initial: Vec<f64>,
        capacity: usize,
        target: f64,
        min_dt: f64,
        max_dt: f64,
    ) -> Result<WasmLorenzTrail, JsValue> {
        console_error_panic_hook::set_once();
        let policy = TimestepPolicy::Adaptive {
            target,
            min_dt,
            max_dt,
        };
        Self::build(initial, capacity, policy, None, None, None)
            .map_err(|e| JsValue::from_str(&format!("Invalid Lorenz trail: {:#}", e)))
    }

    pub fn step(&mut self) -> Result<Vec<f64>, JsValue> {
        self.tracer
            .step()
            .map(|p| p.to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn step_many(&mut self, count: u32) -> Result<Vec<f64>, JsValue> {
        self.tracer
            .advance(count as usize)
            .map(|p| p.to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn current(&self) -> Vec<f64> {
        self.tracer.current().to_vec()
    }

    pub fn elapsed(&self) -> f64 {
        self.tracer.elapsed()
    }

    pub fn len(&self) -> usize {
        self.tracer.trail().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracer.trail().is_empty()
    }

    /// Lorenz parameters as `{ sigma, rho, beta }`.
    pub fn params(&self) -> Result<JsValue, JsValue> {
        to_value(&self.tracer.field().params())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Timestep policy, tagged by `kind`.
    pub fn policy(&self) -> Result<JsValue, JsValue> {
        to_value(&self.tracer.policy())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Trail points oldest first, flattened as `[x, y, z, x, y, z, ...]`.
    pub fn trail(&self) -> Float64Array {
        Float64Array::from(self.trail_flat().as_slice())
    }
}

impl WasmLorenzTrail {
    fn build(
        initial: Vec<f64>,
        capacity: usize,
        policy: TimestepPolicy,
        sigma: Option<f64>,
        rho: Option<f64>,
        beta: Option<f64>,
    ) -> anyhow::Result<Self> {
        let initial: [f64; 3] = initial.as_slice().try_into().map_err(|_| {
            anyhow::anyhow!("Initial point must have 3 coordinates, got {}.", initial.len())
        })?;
        let defaults = LorenzParams::default();
        let params = LorenzParams {
            sigma: sigma.unwrap_or(defaults.sigma),
            rho: rho.unwrap_or(defaults.rho),
            beta: beta.unwrap_or(defaults.beta),
        };
        let tracer = FlowTracer::new(LorenzField::new(params), initial, capacity, policy)?;
        Ok(Self { tracer })
    }

    pub(crate) fn trail_flat(&self) -> Vec<f64> {
        let trail = self.tracer.trail();
        let mut flat = Vec::with_capacity(trail.len() * 3);
        for point in trail {
            flat.extend_from_slice(point);
        }
        flat
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::WasmLorenzTrail;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn wasm_lorenz_trail_rejects_bad_initial_point() {
        let result = WasmLorenzTrail::new(vec![1.0, 1.0], 8, 0.01, None, None, None);
        assert!(result.is_err(), "expected dimension error");
    }

    #[wasm_bindgen_test]
    fn wasm_lorenz_trail_exports_params_and_policy() {
        let trail =
            WasmLorenzTrail::new(vec![1.0, 1.0, 1.0], 8, 0.01, None, None, None).expect("trail");
        assert!(trail.params().expect("params").is_object());
        assert!(trail.policy().expect("policy").is_object());
    }
}
