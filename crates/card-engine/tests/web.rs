//! Runs in a JS host: `wasm-pack test --node crates/card-engine`.

#![cfg(target_arch = "wasm32")]

use climate_cards_engine::{WasmClimateCard, WasmSensorCard};
use wasm_bindgen_test::*;

const STATES: &str = r#"{
    "climate.hall": {
        "entity_id": "climate.hall",
        "state": "cool",
        "attributes": {"temperature": 24, "current_temperature": 26, "hvac_modes": ["cool", "off"]}
    },
    "sensor.hall_humidity": {
        "entity_id": "sensor.hall_humidity",
        "state": "55",
        "attributes": {"unit_of_measurement": "%"}
    }
}"#;

#[wasm_bindgen_test]
fn climate_card_renders_in_js_host() {
    let mut card = WasmClimateCard::new();
    card.set_config(r#"{"entity": "climate.hall", "hvac_modes": ["cool", "off"]}"#);
    let json = card.update(STATES, "{}");
    assert!(json.contains(r#""type":"climate_card""#));
    assert!(json.contains(r#""state_display":"Cool - 26 °C""#));
    assert!(json.contains(r#""control":"hvac_mode_control""#));
}

#[wasm_bindgen_test]
fn sensor_card_renders_in_js_host() {
    let mut card = WasmSensorCard::new();
    card.set_config(r#"{"entity": "sensor.hall_humidity"}"#);
    let json = card.update(STATES, "");
    assert!(json.contains(r#""type":"sensor_card""#));
    assert!(json.contains(r#""value":"55.0 %""#));
}

#[wasm_bindgen_test]
fn errors_become_error_specs() {
    let mut card = WasmClimateCard::new();
    let json = card.set_config("42");
    assert!(json.contains(r#""type":"error""#));
}
