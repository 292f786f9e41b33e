//! Which interactive controls a climate card offers, and what they show.

use serde::{Deserialize, Serialize};

use crate::config::ClimateCardConfig;
use crate::entity::{EntityState, HvacMode};
use crate::format::{FormatOptions, NumberFormatter};
use crate::icons::HVAC_MODE_STYLES;

/// Controls a climate card can put in its action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    TemperatureControl,
    HvacModeControl,
}

impl ControlKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlKind::TemperatureControl => "temperature_control",
            ControlKind::HvacModeControl => "hvac_mode_control",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "temperature_control" => Some(ControlKind::TemperatureControl),
            "hvac_mode_control" => Some(ControlKind::HvacModeControl),
            _ => None,
        }
    }

    /// Icon of the button that switches to this control.
    pub fn icon(self) -> &'static str {
        match self {
            ControlKind::TemperatureControl => "mdi:thermometer",
            ControlKind::HvacModeControl => "mdi:thermostat",
        }
    }
}

/// The entity exposes a target to adjust: a single setpoint or a low/high
/// range. Nothing to adjust while the unit is off.
pub fn is_temperature_control_visible(entity: &EntityState) -> bool {
    if entity.state == HvacMode::Off.as_str() {
        return false;
    }
    entity.attr_f64("temperature").is_some()
        || (entity.attr_f64("target_temp_low").is_some() && entity.attr_f64("target_temp_high").is_some())
}

/// Modes the entity reports in its `hvac_modes` attribute.
pub fn supported_modes(entity: &EntityState) -> Vec<HvacMode> {
    entity
        .attr_str_list("hvac_modes")
        .into_iter()
        .filter_map(HvacMode::parse)
        .collect()
}

/// At least one permitted mode is one the entity supports.
pub fn is_hvac_modes_visible(entity: &EntityState, permitted: &[HvacMode]) -> bool {
    !permitted.is_empty() && supported_modes(entity).iter().any(|mode| permitted.contains(mode))
}

/// Eligible controls in tab order. The first one is the default selection.
pub fn compute_eligible_controls(entity: &EntityState, config: &ClimateCardConfig) -> Vec<ControlKind> {
    let mut controls = Vec::with_capacity(2);
    if config.show_temperature_control && is_temperature_control_visible(entity) {
        controls.push(ControlKind::TemperatureControl);
    }
    if is_hvac_modes_visible(entity, &config.hvac_modes) {
        controls.push(ControlKind::HvacModeControl);
    }
    controls
}

/// Card-level gate on the whole action row.
///
/// With `collapsible_controls` the row only shows while the entity is active.
pub fn controls_visible(entity: &EntityState, config: &ClimateCardConfig, eligible: &[ControlKind]) -> bool {
    !eligible.is_empty() && (!config.collapsible_controls || entity.is_active())
}

/// One adjustable setpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setpoint {
    pub value: f64,
    pub display: String,
    pub color: &'static str,
}

/// Everything the temperature control widget needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureControlView {
    /// One entry for a single target, two (low, high) for a range.
    pub setpoints: Vec<Setpoint>,
    pub step: f64,
    pub min: f64,
    pub max: f64,
    pub fraction_digits: u8,
    pub disabled: bool,
}

pub const DEFAULT_MIN_TEMP: f64 = 7.0;
pub const DEFAULT_MAX_TEMP: f64 = 35.0;
pub const FAHRENHEIT: &str = "°F";

pub fn temperature_control_view(
    entity: &EntityState,
    temperature_unit: &str,
    formatter: &dyn NumberFormatter,
) -> TemperatureControlView {
    let step = entity
        .attr_f64("target_temp_step")
        .filter(|step| *step > 0.0)
        .unwrap_or(if temperature_unit == FAHRENHEIT { 1.0 } else { 0.5 });
    let fraction_digits = if step.fract() == 0.0 { 0 } else { 1 };
    let options = FormatOptions::fixed(fraction_digits);

    let setpoint = |value: f64, color: &'static str| Setpoint {
        value,
        display: formatter.format(value, options),
        color,
    };

    let setpoints = match (
        entity.attr_f64("temperature"),
        entity.attr_f64("target_temp_low"),
        entity.attr_f64("target_temp_high"),
    ) {
        (Some(target), _, _) => vec![setpoint(target, "var(--rgb-state-climate-heat)")],
        (None, Some(low), Some(high)) => vec![
            setpoint(low, "var(--rgb-state-climate-heat)"),
            setpoint(high, "var(--rgb-state-climate-cool)"),
        ],
        _ => Vec::new(),
    };

    TemperatureControlView {
        setpoints,
        step,
        min: entity.attr_f64("min_temp").unwrap_or(DEFAULT_MIN_TEMP),
        max: entity.attr_f64("max_temp").unwrap_or(DEFAULT_MAX_TEMP),
        fraction_digits,
        disabled: !entity.is_available(),
    }
}

/// One button of the mode selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HvacModeOption {
    pub mode: HvacMode,
    pub icon: &'static str,
    pub color: &'static str,
    pub selected: bool,
    pub disabled: bool,
}

/// Buttons for the modes that are both supported and permitted, in the
/// fixed display order.
pub fn hvac_mode_options(entity: &EntityState, permitted: &[HvacMode]) -> Vec<HvacModeOption> {
    let supported = supported_modes(entity);
    let disabled = !entity.is_available();
    HVAC_MODE_STYLES
        .iter()
        .filter(|(mode, _, _)| supported.contains(mode) && permitted.contains(mode))
        .map(|(mode, icon, color)| HvacModeOption {
            mode: *mode,
            icon: *icon,
            color: *color,
            selected: entity.state == mode.as_str(),
            disabled,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LocaleFormatter;
    use serde_json::json;

    fn thermostat(state: &str) -> EntityState {
        EntityState::new("climate.office", state)
            .with_attribute("temperature", 20.5)
            .with_attribute("hvac_modes", json!(["off", "heat", "auto"]))
    }

    fn config(show_temperature: bool, modes: &[HvacMode]) -> ClimateCardConfig {
        ClimateCardConfig {
            show_temperature_control: show_temperature,
            hvac_modes: modes.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_temperature_visibility() {
        assert!(is_temperature_control_visible(&thermostat("heat")));
        assert!(!is_temperature_control_visible(&thermostat("off")));
        assert!(!is_temperature_control_visible(&EntityState::new("climate.a", "heat")));
        let range = EntityState::new("climate.a", "heat_cool")
            .with_attribute("target_temp_low", 19)
            .with_attribute("target_temp_high", 24);
        assert!(is_temperature_control_visible(&range));
        let half_range = EntityState::new("climate.a", "heat_cool").with_attribute("target_temp_low", 19);
        assert!(!is_temperature_control_visible(&half_range));
    }

    #[test]
    fn test_hvac_modes_visibility() {
        let entity = thermostat("heat");
        assert!(is_hvac_modes_visible(&entity, &[HvacMode::Heat]));
        assert!(!is_hvac_modes_visible(&entity, &[HvacMode::Cool]));
        assert!(!is_hvac_modes_visible(&entity, &[]));
    }

    #[test]
    fn test_eligible_order() {
        let entity = thermostat("heat");
        assert_eq!(
            compute_eligible_controls(&entity, &config(true, &[HvacMode::Heat])),
            vec![ControlKind::TemperatureControl, ControlKind::HvacModeControl]
        );
        assert_eq!(
            compute_eligible_controls(&entity, &config(false, &[HvacMode::Heat])),
            vec![ControlKind::HvacModeControl]
        );
        assert_eq!(
            compute_eligible_controls(&thermostat("off"), &config(true, &[HvacMode::Cool])),
            Vec::<ControlKind>::new()
        );
    }

    #[test]
    fn test_collapsible_gate() {
        let mut cfg = config(true, &[HvacMode::Heat]);
        let off = thermostat("off");
        let eligible = compute_eligible_controls(&off, &cfg);
        assert!(controls_visible(&off, &cfg, &eligible));
        cfg.collapsible_controls = true;
        assert!(!controls_visible(&off, &cfg, &eligible));
        let heat = thermostat("heat");
        assert!(controls_visible(&heat, &cfg, &compute_eligible_controls(&heat, &cfg)));
        assert!(!controls_visible(&heat, &cfg, &[]));
    }

    #[test]
    fn test_temperature_view_single() {
        let view = temperature_control_view(&thermostat("heat"), "°C", &LocaleFormatter::default());
        assert_eq!(view.setpoints.len(), 1);
        assert_eq!(view.setpoints[0].display, "20.5");
        assert_eq!(view.step, 0.5);
        assert_eq!(view.fraction_digits, 1);
        assert_eq!((view.min, view.max), (DEFAULT_MIN_TEMP, DEFAULT_MAX_TEMP));
        assert!(!view.disabled);
    }

    #[test]
    fn test_temperature_view_range_fahrenheit() {
        let entity = EntityState::new("climate.a", "heat_cool")
            .with_attribute("target_temp_low", 68)
            .with_attribute("target_temp_high", 75)
            .with_attribute("min_temp", 45)
            .with_attribute("max_temp", 95);
        let view = temperature_control_view(&entity, FAHRENHEIT, &LocaleFormatter::default());
        let displays: Vec<&str> = view.setpoints.iter().map(|s| s.display.as_str()).collect();
        assert_eq!(displays, vec!["68", "75"]);
        assert_eq!(view.step, 1.0);
        assert_eq!(view.fraction_digits, 0);
        assert_eq!((view.min, view.max), (45.0, 95.0));
    }

    #[test]
    fn test_temperature_view_entity_step() {
        let entity = thermostat("heat")
            .with_attribute("temperature", 21.4)
            .with_attribute("target_temp_step", 1);
        let view = temperature_control_view(&entity, "°C", &LocaleFormatter::default());
        assert_eq!(view.step, 1.0);
        assert_eq!(view.setpoints[0].display, "21");
    }

    #[test]
    fn test_mode_options_order_and_selection() {
        let entity = thermostat("heat");
        let options = hvac_mode_options(&entity, &[HvacMode::Off, HvacMode::Heat, HvacMode::Cool, HvacMode::Auto]);
        let modes: Vec<HvacMode> = options.iter().map(|o| o.mode).collect();
        assert_eq!(modes, vec![HvacMode::Auto, HvacMode::Heat, HvacMode::Off]);
        assert!(options[1].selected);
        assert!(!options[0].selected);
        assert_eq!(options[1].icon, "mdi:fire");
    }

    #[test]
    fn test_mode_options_disabled_when_unavailable() {
        let entity = thermostat("unavailable");
        let options = hvac_mode_options(&entity, &[HvacMode::Heat]);
        assert!(options.iter().all(|o| o.disabled && !o.selected));
    }

    #[test]
    fn test_control_kind_names() {
        for kind in [ControlKind::TemperatureControl, ControlKind::HvacModeControl] {
            assert_eq!(ControlKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ControlKind::parse("fan_control"), None);
        assert_eq!(ControlKind::HvacModeControl.icon(), "mdi:thermostat");
    }
}
