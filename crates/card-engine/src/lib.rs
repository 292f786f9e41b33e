pub mod card;
pub mod config;
pub mod controls;
pub mod display;
pub mod entity;
pub mod format;
pub mod icons;
pub mod render;
pub mod selection;

pub use card::{CardError, ClimateCard, HostContext, SensorCard};
pub use render::RenderSpec;

use wasm_bindgen::prelude::*;

fn parse_config(config: &str) -> Result<serde_json::Value, CardError> {
    serde_json::from_str(config).map_err(|e| CardError::Config(e.into()))
}

fn parse_inputs(states: &str, context: &str) -> Result<(entity::HassStates, HostContext), CardError> {
    Ok((card::parse_states(states)?, HostContext::from_json(context)?))
}

fn spec_json(result: Result<RenderSpec, CardError>) -> String {
    result
        .unwrap_or_else(|e| RenderSpec::error(e.to_string()))
        .to_json()
}

/// The WASM-exposed climate card instance.
/// TypeScript creates one of these per card element and forwards config
/// and state updates to it.
#[wasm_bindgen]
pub struct WasmClimateCard {
    inner: ClimateCard,
}

#[wasm_bindgen]
impl WasmClimateCard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: ClimateCard::new(),
        }
    }

    /// Apply the card config (JSON object) and return a JSON render spec.
    /// An invalid config returns an `error` spec and keeps the old config.
    #[wasm_bindgen]
    pub fn set_config(&mut self, config: &str) -> String {
        spec_json(parse_config(config).and_then(|value| self.inner.set_config(value)))
    }

    /// Feed `hass.states` and the host context, both JSON, and return the
    /// render spec for them.
    #[wasm_bindgen]
    pub fn update(&mut self, states: &str, context: &str) -> String {
        spec_json(parse_inputs(states, context).map(|(states, context)| self.inner.update(states, context)))
    }

    /// Switch the active control, e.g. `"hvac_mode_control"`.
    #[wasm_bindgen]
    pub fn select_control(&mut self, control: &str) -> String {
        spec_json(self.inner.select_control(control))
    }

    /// Re-render from the last inputs.
    #[wasm_bindgen]
    pub fn render(&self) -> String {
        self.inner.render().to_json()
    }

    /// Stub card config for the dashboard's card picker.
    #[wasm_bindgen]
    pub fn stub_config(states: &str) -> String {
        match card::parse_states(states) {
            Ok(states) => ClimateCard::stub_config(&states).to_string(),
            Err(e) => RenderSpec::error(e.to_string()).to_json(),
        }
    }
}

impl Default for WasmClimateCard {
    fn default() -> Self {
        Self::new()
    }
}

/// The WASM-exposed sensor card instance.
#[wasm_bindgen]
pub struct WasmSensorCard {
    inner: SensorCard,
}

#[wasm_bindgen]
impl WasmSensorCard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: SensorCard::new(),
        }
    }

    #[wasm_bindgen]
    pub fn set_config(&mut self, config: &str) -> String {
        spec_json(parse_config(config).and_then(|value| self.inner.set_config(value)))
    }

    #[wasm_bindgen]
    pub fn update(&mut self, states: &str, context: &str) -> String {
        spec_json(parse_inputs(states, context).map(|(states, context)| self.inner.update(states, context)))
    }

    #[wasm_bindgen]
    pub fn render(&self) -> String {
        self.inner.render().to_json()
    }

    #[wasm_bindgen]
    pub fn stub_config(states: &str) -> String {
        match card::parse_states(states) {
            Ok(states) => SensorCard::stub_config(&states).to_string(),
            Err(e) => RenderSpec::error(e.to_string()).to_json(),
        }
    }
}

impl Default for WasmSensorCard {
    fn default() -> Self {
        Self::new()
    }
}
