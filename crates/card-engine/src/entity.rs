use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// State reported by the host when an entity cannot be reached.
pub const UNAVAILABLE: &str = "unavailable";
/// State reported by the host when an entity has no known value.
pub const UNKNOWN: &str = "unknown";
/// Both "no usable value" sentinels.
pub const UNAVAILABLE_STATES: [&str; 2] = [UNAVAILABLE, UNKNOWN];
/// States that read as "not doing anything", whatever the domain.
pub const OFF_STATES: [&str; 2] = ["off", "idle"];
/// State of a binary sensor that is triggered (window open, motion seen...).
pub const ON: &str = "on";

/// One entity as the host pushes it on every update tick.
///
/// The snapshot is never mutated in place: a new one replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntityState {
    pub entity_id: String,
    #[serde(default = "unknown_state", deserialize_with = "deserialize_state")]
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<String>,
}

fn unknown_state() -> String {
    UNKNOWN.to_string()
}

/// The host sends numeric sensor states as numbers now and then, and `null`
/// for entities that never reported.
fn deserialize_state<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if b { ON } else { "off" }).to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => unknown_state(),
    })
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: serde_json::Map::new(),
            last_changed: None,
        }
    }

    /// Builder-style attribute setter, mostly for hosts assembling snapshots by hand.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The domain part of the entity id (`climate` for `climate.living_room`).
    pub fn domain(&self) -> &str {
        self.entity_id.split('.').next().unwrap_or("")
    }

    pub fn is_available(&self) -> bool {
        !UNAVAILABLE_STATES.contains(&self.state.as_str())
    }

    /// Whether the entity is currently "doing something".
    pub fn is_active(&self) -> bool {
        let state = self.state.as_str();
        if UNAVAILABLE_STATES.contains(&state) || OFF_STATES.contains(&state) {
            return false;
        }
        match self.domain() {
            "cover" => !matches!(state, "closed" | "closing"),
            "device_tracker" | "person" => state != "not_home",
            "media_player" => state != "standby",
            "vacuum" => !matches!(state, "docked" | "paused"),
            "plant" => state == "problem",
            _ => true,
        }
    }

    /// Raw attribute value. `null` reads as absent.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Numeric attribute; numeric strings are accepted too.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        match self.attr(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(|v| v.as_str())
    }

    /// List-of-strings attribute such as `hvac_modes`. Non-string items are skipped.
    pub fn attr_str_list(&self, key: &str) -> Vec<&str> {
        self.attr(key)
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.attr_str("friendly_name")
    }

    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.attr_str("unit_of_measurement")
    }

    /// The state itself as a number, for sensors.
    pub fn numeric_state(&self) -> Option<f64> {
        self.state.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Operating modes of a climate entity, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Auto,
    HeatCool,
    Heat,
    Cool,
    Dry,
    FanOnly,
    Off,
}

impl HvacMode {
    pub const ALL: [HvacMode; 7] = [
        HvacMode::Auto,
        HvacMode::HeatCool,
        HvacMode::Heat,
        HvacMode::Cool,
        HvacMode::Dry,
        HvacMode::FanOnly,
        HvacMode::Off,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HvacMode::Auto => "auto",
            HvacMode::HeatCool => "heat_cool",
            HvacMode::Heat => "heat",
            HvacMode::Cool => "cool",
            HvacMode::Dry => "dry",
            HvacMode::FanOnly => "fan_only",
            HvacMode::Off => "off",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == value)
    }
}

/// The host's `hass.states`: every known entity keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HassStates {
    entities: BTreeMap<String, EntityState>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatesPayload {
    Map(BTreeMap<String, EntityState>),
    List(Vec<EntityState>),
}

impl HassStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse either the `hass.states` object or a plain array of state objects.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let entities = match serde_json::from_str::<StatesPayload>(data)? {
            StatesPayload::Map(map) => map,
            StatesPayload::List(list) => list
                .into_iter()
                .map(|entity| (entity.entity_id.clone(), entity))
                .collect(),
        };
        Ok(Self { entities })
    }

    pub fn insert(&mut self, entity: EntityState) {
        self.entities.insert(entity.entity_id.clone(), entity);
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    /// Resolve an optional configured id; unset or unknown ids both yield `None`.
    pub fn resolve(&self, entity_id: Option<&str>) -> Option<&EntityState> {
        entity_id.and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First entity id (by id order) whose domain is one of `domains`.
    /// An empty `domains` slice matches everything.
    pub fn first_in_domains(&self, domains: &[&str]) -> Option<&str> {
        self.entities
            .values()
            .find(|entity| domains.is_empty() || domains.contains(&entity.domain()))
            .map(|entity| entity.entity_id.as_str())
    }
}

impl FromIterator<EntityState> for HassStates {
    fn from_iter<T: IntoIterator<Item = EntityState>>(iter: T) -> Self {
        let mut states = HassStates::new();
        for entity in iter {
            states.insert(entity);
        }
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state_object() {
        let data = r#"{"entity_id": "climate.office", "state": "heat", "attributes": {"current_temperature": 21.5, "friendly_name": "Office"}}"#;
        let entity: EntityState = serde_json::from_str(data).unwrap();
        assert_eq!(entity.state, "heat");
        assert_eq!(entity.domain(), "climate");
        assert_eq!(entity.attr_f64("current_temperature"), Some(21.5));
        assert_eq!(entity.friendly_name(), Some("Office"));
    }

    #[test]
    fn test_numeric_and_null_states() {
        let number: EntityState =
            serde_json::from_str(r#"{"entity_id": "sensor.valve", "state": 42}"#).unwrap();
        assert_eq!(number.state, "42");
        let null: EntityState =
            serde_json::from_str(r#"{"entity_id": "sensor.valve", "state": null}"#).unwrap();
        assert_eq!(null.state, UNKNOWN);
        let missing: EntityState = serde_json::from_str(r#"{"entity_id": "sensor.valve"}"#).unwrap();
        assert_eq!(missing.state, UNKNOWN);
    }

    #[test]
    fn test_null_attribute_reads_as_absent() {
        let entity = EntityState::new("climate.office", "heat")
            .with_attribute("current_temperature", Value::Null);
        assert!(entity.attr("current_temperature").is_none());
        assert!(entity.attr_f64("current_temperature").is_none());
    }

    #[test]
    fn test_numeric_string_attribute() {
        let entity = EntityState::new("climate.office", "heat").with_attribute("temperature", "20.5");
        assert_eq!(entity.attr_f64("temperature"), Some(20.5));
    }

    #[test]
    fn test_availability() {
        assert!(!EntityState::new("sensor.a", UNAVAILABLE).is_available());
        assert!(!EntityState::new("sensor.a", UNKNOWN).is_available());
        assert!(EntityState::new("sensor.a", "12").is_available());
    }

    #[test]
    fn test_activity() {
        assert!(EntityState::new("climate.a", "heat").is_active());
        assert!(!EntityState::new("climate.a", "off").is_active());
        assert!(!EntityState::new("climate.a", "idle").is_active());
        assert!(!EntityState::new("climate.a", UNKNOWN).is_active());
        assert!(!EntityState::new("cover.a", "closed").is_active());
        assert!(EntityState::new("cover.a", "open").is_active());
        assert!(!EntityState::new("person.a", "not_home").is_active());
        assert!(!EntityState::new("plant.a", "ok").is_active());
        assert!(EntityState::new("plant.a", "problem").is_active());
    }

    #[test]
    fn test_str_list_skips_non_strings() {
        let entity = EntityState::new("climate.a", "heat")
            .with_attribute("hvac_modes", serde_json::json!(["heat", 3, "off"]));
        assert_eq!(entity.attr_str_list("hvac_modes"), vec!["heat", "off"]);
        assert!(entity.attr_str_list("fan_modes").is_empty());
    }

    #[test]
    fn test_hvac_mode_parse() {
        assert_eq!(HvacMode::parse("heat_cool"), Some(HvacMode::HeatCool));
        assert_eq!(HvacMode::parse("fan_only"), Some(HvacMode::FanOnly));
        assert_eq!(HvacMode::parse("eco"), None);
    }

    #[test]
    fn test_states_from_map() {
        let data = r#"{
            "sensor.b": {"entity_id": "sensor.b", "state": "1"},
            "climate.a": {"entity_id": "climate.a", "state": "heat"}
        }"#;
        let states = HassStates::from_json(data).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states.get("climate.a").map(|e| e.state.as_str()), Some("heat"));
    }

    #[test]
    fn test_states_from_list() {
        let data = r#"[{"entity_id": "sensor.b", "state": "1"}, {"entity_id": "climate.a", "state": "off"}]"#;
        let states = HassStates::from_json(data).unwrap();
        assert_eq!(states.get("sensor.b").map(|e| e.state.as_str()), Some("1"));
    }

    #[test]
    fn test_first_in_domains() {
        let states: HassStates = [
            EntityState::new("sensor.b", "1"),
            EntityState::new("climate.z", "heat"),
            EntityState::new("climate.c", "off"),
        ]
        .into_iter()
        .collect();
        assert_eq!(states.first_in_domains(&["climate"]), Some("climate.c"));
        assert_eq!(states.first_in_domains(&[]), Some("climate.c"));
        assert_eq!(states.first_in_domains(&["light"]), None);
    }

    #[test]
    fn test_resolve() {
        let states: HassStates = [EntityState::new("sensor.b", "1")].into_iter().collect();
        assert!(states.resolve(None).is_none());
        assert!(states.resolve(Some("sensor.x")).is_none());
        assert!(states.resolve(Some("sensor.b")).is_some());
    }
}
