//! Attractor search entry point for JavaScript.

use crate::lyapunov::WasmLyapunov;
use attractor_core::search::{find_attractor, Found, SearchSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Searches random maps for an attractor. `settings` may be `undefined` for
/// the defaults, or a partial `SearchSettings` object.
#[wasm_bindgen]
pub fn search_attractor(seed: u32, settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let settings: SearchSettings = if settings.is_undefined() || settings.is_null() {
        SearchSettings::default()
    } else {
        from_value(settings)
            .map_err(|e| JsValue::from_str(&format!("Invalid search settings: {}", e)))?
    };
    let found = search_with_seed(seed, &settings)
        .map_err(|e| JsValue::from_str(&format!("Attractor search failed: {}", e)))?;
    to_value(&found).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Like `search_attractor`, but hands back a live simulator positioned at the
/// accepted map's initial point.
#[wasm_bindgen]
pub fn search_simulator(seed: u32, max_attempts: u32, iterations: u32) -> Result<WasmLyapunov, JsValue> {
    console_error_panic_hook::set_once();

    let settings = SearchSettings {
        max_attempts: max_attempts as usize,
        iterations: iterations as usize,
        ..SearchSettings::default()
    };
    let found = search_with_seed(seed, &settings)
        .map_err(|e| JsValue::from_str(&format!("Attractor search failed: {}", e)))?;
    Ok(WasmLyapunov::from_map(found.map, found.initial[0], found.initial[1]))
}

pub(crate) fn search_with_seed(seed: u32, settings: &SearchSettings) -> anyhow::Result<Found> {
    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    find_attractor(&mut rng, settings)
}
