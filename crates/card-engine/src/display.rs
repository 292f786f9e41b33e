//! The status line under a card's name, e.g. `Heat - 21.5 °C - 42%`.

use std::collections::BTreeMap;

use crate::entity::{EntityState, UNAVAILABLE, UNKNOWN};
use crate::format::{FormatOptions, NumberFormatter, with_unit};

/// Separator between the parts of a composed status line.
pub const DELIMITER: &str = " - ";

/// Built-in English labels, used when the host sends no translation.
const STATE_LABELS: &[(&str, &str)] = &[
    ("auto", "Auto"),
    ("heat_cool", "Heat/Cool"),
    ("heat", "Heat"),
    ("cool", "Cool"),
    ("dry", "Dry"),
    ("fan_only", "Fan only"),
    ("off", "Off"),
    ("on", "On"),
    ("idle", "Idle"),
    (UNAVAILABLE, "Unavailable"),
    (UNKNOWN, "Unknown"),
];

/// Localized state label of an entity.
///
/// Host labels are looked up as `<domain>.<state>` first, then as the bare
/// state. Numeric states show the formatted number with the entity's unit.
pub fn state_label(entity: &EntityState, labels: &BTreeMap<String, String>, formatter: &dyn NumberFormatter) -> String {
    let state = entity.state.as_str();
    let host = labels
        .get(&format!("{}.{state}", entity.domain()))
        .or_else(|| labels.get(state));
    if let Some(label) = host {
        return label.clone();
    }
    if entity.is_available() {
        if let Some(value) = entity.numeric_state() {
            let text = formatter.format(value, FormatOptions::default());
            return with_unit(&text, entity.unit_of_measurement());
        }
    }
    default_state_label(state)
}

/// Fallback label: the built-in table, or the raw state made readable.
pub fn default_state_label(state: &str) -> String {
    if let Some((_, label)) = STATE_LABELS.iter().find(|(key, _)| *key == state) {
        return (*label).to_string();
    }
    let readable = state.replace('_', " ");
    let mut chars = readable.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => readable,
    }
}

/// Compose the status line.
///
/// The current temperature is appended when the entity reports one, and the
/// auxiliary display text when the auxiliary entity resolved. A missing part
/// is skipped along with its delimiter.
pub fn compose_state_display(
    label: &str,
    entity: &EntityState,
    temperature_unit: &str,
    auxiliary_display: Option<&str>,
    formatter: &dyn NumberFormatter,
) -> String {
    let mut parts = vec![label.to_string()];
    if let Some(current) = entity.attr_f64("current_temperature") {
        parts.push(format!("{} {temperature_unit}", formatter.format(current, FormatOptions::default())));
    }
    if let Some(auxiliary) = auxiliary_display {
        parts.push(auxiliary.to_string());
    }
    parts.join(DELIMITER)
}

/// Card title: configured name, then the entity's friendly name.
pub fn card_name(configured: Option<&str>, entity: &EntityState) -> String {
    configured
        .filter(|name| !name.is_empty())
        .or_else(|| entity.friendly_name())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LocaleFormatter;

    fn no_labels() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn test_compose_with_temperature() {
        let f = LocaleFormatter::default();
        let entity = EntityState::new("climate.office", "heat").with_attribute("current_temperature", 21.5);
        assert_eq!(compose_state_display("Heat", &entity, "°C", None, &f), "Heat - 21.5 °C");
        assert_eq!(compose_state_display("Heat", &entity, "°C", Some("42%"), &f), "Heat - 21.5 °C - 42%");
    }

    #[test]
    fn test_compose_skips_missing_parts() {
        let f = LocaleFormatter::default();
        let bare = EntityState::new("climate.office", "heat");
        assert_eq!(compose_state_display("Heat", &bare, "°C", None, &f), "Heat");
        assert_eq!(compose_state_display("Heat", &bare, "°C", Some("42%"), &f), "Heat - 42%");
        let null_temp = bare.clone().with_attribute("current_temperature", serde_json::Value::Null);
        assert_eq!(compose_state_display("Heat", &null_temp, "°C", None, &f), "Heat");
    }

    #[test]
    fn test_compose_localized_number() {
        let de = LocaleFormatter::new(crate::format::NumberFormat::Language, "de");
        let entity = EntityState::new("climate.office", "cool").with_attribute("current_temperature", 23.25);
        assert_eq!(compose_state_display("Kühlen", &entity, "°C", None, &de), "Kühlen - 23,25 °C");
    }

    #[test]
    fn test_state_labels() {
        let f = LocaleFormatter::default();
        let label = |state: &str| state_label(&EntityState::new("climate.office", state), &no_labels(), &f);
        assert_eq!(label("heat"), "Heat");
        assert_eq!(label("heat_cool"), "Heat/Cool");
        assert_eq!(label("fan_only"), "Fan only");
        assert_eq!(label("unavailable"), "Unavailable");
        assert_eq!(label("preset_eco"), "Preset eco");
    }

    #[test]
    fn test_host_labels_win() {
        let f = LocaleFormatter::default();
        let mut labels = no_labels();
        labels.insert("climate.heat".into(), "Heizen".into());
        labels.insert("off".into(), "Aus".into());
        let heat = EntityState::new("climate.office", "heat");
        assert_eq!(state_label(&heat, &labels, &f), "Heizen");
        let off = EntityState::new("climate.office", "off");
        assert_eq!(state_label(&off, &labels, &f), "Aus");
    }

    #[test]
    fn test_numeric_state_label() {
        let f = LocaleFormatter::default();
        let valve = EntityState::new("sensor.valve", "42").with_attribute("unit_of_measurement", "%");
        assert_eq!(state_label(&valve, &no_labels(), &f), "42%");
        let power = EntityState::new("sensor.power", "1234.5").with_attribute("unit_of_measurement", "W");
        assert_eq!(state_label(&power, &no_labels(), &f), "1,234.5 W");
    }

    #[test]
    fn test_card_name() {
        let entity = EntityState::new("climate.office", "heat").with_attribute("friendly_name", "Office");
        assert_eq!(card_name(Some("Study"), &entity), "Study");
        assert_eq!(card_name(None, &entity), "Office");
        assert_eq!(card_name(Some(""), &entity), "Office");
        assert_eq!(card_name(None, &EntityState::new("climate.x", "heat")), "");
    }
}
