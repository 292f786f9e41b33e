//! Card instances.
//!
//! The shell creates one card per dashboard slot and feeds it the card
//! config once, then the host's states on every update tick. Each call
//! returns the render spec for the new inputs.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::{
    BaseCardConfig, ClimateCardConfig, ConfigError, IconType, SensorCardConfig, has_action,
};
use crate::controls::{
    ControlKind, compute_eligible_controls, controls_visible, hvac_mode_options,
    temperature_control_view,
};
use crate::display::{card_name, compose_state_display, state_label};
use crate::entity::{EntityState, HassStates};
use crate::format::{LocaleFormatter, NumberFormat, format_sensor_value};
use crate::icons::{
    Badge, compute_badge, compute_icon_and_color, compute_rgb_color, entity_icon,
};
use crate::render::{
    ClimateCardView, ControlView, IconView, InteractionView, OtherControlView, RenderSpec,
    SensorCardView, SensorValueView, StateInfoView,
};
use crate::selection::{ControlSelector, Selection, reconcile_active_control};

pub const CLIMATE_CARD_TYPE: &str = "custom:climate-card";
pub const SENSOR_CARD_TYPE: &str = "custom:sensor-card";

/// Domains the climate card can drive.
const CLIMATE_DOMAINS: &[&str] = &["climate"];

pub type ActiveControl = Selection<ControlKind>;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid states payload: {0}")]
    States(#[source] serde_json::Error),

    #[error("Invalid host context: {0}")]
    Context(#[source] serde_json::Error),

    #[error("Unknown control: {0}")]
    UnknownControl(String),
}

/// User and installation settings the host renders with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostContext {
    pub number_format: NumberFormat,
    pub language: String,
    /// The installation's temperature unit, `°C` or `°F`.
    pub temperature_unit: String,
    /// Translated state labels keyed by `<domain>.<state>` or bare state.
    pub labels: BTreeMap<String, String>,
}

impl Default for HostContext {
    fn default() -> Self {
        Self {
            number_format: NumberFormat::Language,
            language: "en".to_string(),
            temperature_unit: "°C".to_string(),
            labels: BTreeMap::new(),
        }
    }
}

impl HostContext {
    pub fn from_json(data: &str) -> Result<Self, CardError> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(data).map_err(CardError::Context)
    }

    pub fn formatter(&self) -> LocaleFormatter {
        LocaleFormatter::new(self.number_format, &self.language)
    }
}

/// Parse the host's states payload, logging what was rejected.
pub fn parse_states(data: &str) -> Result<HassStates, CardError> {
    HassStates::from_json(data).map_err(|e| {
        warn!(error = %e, "rejected states payload");
        CardError::States(e)
    })
}

/// Eligible controls for the current inputs. Nothing is eligible without an
/// entity.
pub fn eligible_controls(entity: Option<&EntityState>, config: &ClimateCardConfig) -> Vec<ControlKind> {
    entity.map_or_else(Vec::new, |entity| compute_eligible_controls(entity, config))
}

/// One update tick: recompute eligibility, then reconcile the previous
/// selection against it.
pub fn on_inputs_changed(
    previous: ActiveControl,
    entity: Option<&EntityState>,
    config: &ClimateCardConfig,
) -> (Vec<ControlKind>, ActiveControl) {
    let eligible = eligible_controls(entity, config);
    let next = reconcile_active_control(previous, &eligible, None);
    (eligible, next)
}

fn interactions(base: &BaseCardConfig) -> InteractionView {
    InteractionView {
        tap: has_action(base.tap_action.as_ref()),
        hold: has_action(base.hold_action.as_ref()),
        double_tap: has_action(base.double_tap_action.as_ref()),
    }
}

fn entity_picture(entity: &EntityState, icon_type: IconType) -> Option<String> {
    if icon_type != IconType::EntityPicture {
        return None;
    }
    entity.attr_str("entity_picture").map(str::to_string)
}

fn stub_config(card_type: &str, entity: Option<&str>) -> Value {
    match entity {
        Some(entity) => json!({ "type": card_type, "entity": entity }),
        None => json!({ "type": card_type }),
    }
}

/// Climate card: one climate entity with an optional valve badge entity
/// and window sensor.
#[derive(Debug, Default)]
pub struct ClimateCard {
    config: Option<ClimateCardConfig>,
    selector: ControlSelector<ControlKind>,
    states: HassStates,
    context: HostContext,
}

impl ClimateCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a new card config. A rejected config leaves the previous one
    /// in place.
    pub fn set_config(&mut self, value: Value) -> Result<RenderSpec, CardError> {
        let config = ClimateCardConfig::from_value(value).inspect_err(|e| {
            warn!(error = %e, "rejected climate card config");
        })?;
        debug!(
            entity = config.base.entity_id().unwrap_or_default(),
            badge_entity = config.badge_entity_id().unwrap_or_default(),
            window_entity = config.window_entity_id().unwrap_or_default(),
            "climate card configured"
        );
        self.config = Some(config);
        self.reconcile();
        Ok(self.render())
    }

    /// New states from the host.
    pub fn update(&mut self, states: HassStates, context: HostContext) -> RenderSpec {
        self.states = states;
        self.context = context;
        self.reconcile();
        self.render()
    }

    /// The user tapped one of the other-controls buttons.
    pub fn select_control(&mut self, control: &str) -> Result<RenderSpec, CardError> {
        let kind = ControlKind::parse(control).ok_or_else(|| CardError::UnknownControl(control.to_string()))?;
        self.selector.select(kind);
        Ok(self.render())
    }

    pub fn controls(&self) -> &[ControlKind] {
        self.selector.eligible()
    }

    pub fn active_control(&self) -> ActiveControl {
        self.selector.selection()
    }

    pub fn config(&self) -> Option<&ClimateCardConfig> {
        self.config.as_ref()
    }

    /// Config for a freshly added card: the first climate entity, if any.
    pub fn stub_config(states: &HassStates) -> Value {
        stub_config(CLIMATE_CARD_TYPE, states.first_in_domains(CLIMATE_DOMAINS))
    }

    fn entity(&self) -> Option<&EntityState> {
        let config = self.config.as_ref()?;
        self.states.resolve(config.base.entity_id())
    }

    fn reconcile(&mut self) {
        let eligible = match &self.config {
            Some(config) => eligible_controls(self.entity(), config),
            None => Vec::new(),
        };
        self.selector.update(eligible);
    }

    pub fn render(&self) -> RenderSpec {
        let Some(config) = &self.config else {
            return RenderSpec::nothing();
        };
        let Some(entity_id) = config.base.entity_id() else {
            return RenderSpec::nothing();
        };
        let Some(entity) = self.states.get(entity_id) else {
            return RenderSpec::not_found(entity_id);
        };

        let formatter = self.context.formatter();
        let appearance = config.base.appearance();
        let auxiliary = self.states.resolve(config.badge_entity_id());
        let window = self.states.resolve(config.window_entity_id());

        let style = compute_icon_and_color(entity, config.base.icon.as_deref(), window);
        let icon = IconView {
            icon: style.icon,
            color: Some(style.color),
            picture: entity_picture(entity, appearance.icon_type),
            disabled: !entity.is_available(),
            // Only the valve entity drives the badge.
            badge: auxiliary.map(|aux| compute_badge(aux, &formatter)),
            visible: appearance.icon_type != IconType::None,
        };

        let label = state_label(entity, &self.context.labels, &formatter);
        let auxiliary_display = auxiliary.map(|aux| state_label(aux, &self.context.labels, &formatter));
        let info = StateInfoView {
            name: card_name(config.base.name.as_deref(), entity),
            state_display: compose_state_display(
                &label,
                entity,
                &self.context.temperature_unit,
                auxiliary_display.as_deref(),
                &formatter,
            ),
            primary_info: appearance.primary_info,
            secondary_info: appearance.secondary_info,
            last_changed: entity.last_changed.clone(),
        };

        let eligible = self.selector.eligible();
        let active = self.selector.selection();
        let control = active.control().map(|kind| match kind {
            ControlKind::TemperatureControl => ControlView::TemperatureControl(temperature_control_view(
                entity,
                &self.context.temperature_unit,
                &formatter,
            )),
            ControlKind::HvacModeControl => ControlView::HvacModeControl {
                options: hvac_mode_options(entity, &config.hvac_modes),
            },
        });

        RenderSpec::climate_card(ClimateCardView {
            entity_id: entity.entity_id.clone(),
            appearance,
            icon,
            info,
            interactions: interactions(&config.base),
            controls_visible: controls_visible(entity, config, eligible),
            fill_controls: appearance.fill_controls(),
            active_control: active,
            control,
            other_controls: self.selector.others().into_iter().map(OtherControlView::from).collect(),
        })
    }
}

/// Sensor card: one sensor value, plus an optional second one.
#[derive(Debug, Default)]
pub struct SensorCard {
    config: Option<SensorCardConfig>,
    states: HassStates,
    context: HostContext,
}

impl SensorCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, value: Value) -> Result<RenderSpec, CardError> {
        let config = SensorCardConfig::from_value(value).inspect_err(|e| {
            warn!(error = %e, "rejected sensor card config");
        })?;
        debug!(
            entity = config.base.entity_id().unwrap_or_default(),
            second_entity = config.second_entity_id().unwrap_or_default(),
            "sensor card configured"
        );
        self.config = Some(config);
        Ok(self.render())
    }

    pub fn update(&mut self, states: HassStates, context: HostContext) -> RenderSpec {
        self.states = states;
        self.context = context;
        self.render()
    }

    pub fn config(&self) -> Option<&SensorCardConfig> {
        self.config.as_ref()
    }

    /// Config for a freshly added card: the first entity of any domain.
    pub fn stub_config(states: &HassStates) -> Value {
        stub_config(SENSOR_CARD_TYPE, states.first_in_domains(&[]))
    }

    pub fn render(&self) -> RenderSpec {
        let Some(config) = &self.config else {
            return RenderSpec::nothing();
        };
        let Some(entity_id) = config.base.entity_id() else {
            return RenderSpec::nothing();
        };
        let Some(entity) = self.states.get(entity_id) else {
            return RenderSpec::not_found(entity_id);
        };

        let formatter = self.context.formatter();
        let appearance = config.base.appearance();

        let icon = IconView {
            icon: config
                .base
                .icon
                .as_deref()
                .or_else(|| entity.attr_str("icon"))
                .unwrap_or_else(|| entity_icon(entity))
                .to_string(),
            color: config.base.icon_color.as_deref().map(compute_rgb_color),
            picture: entity_picture(entity, appearance.icon_type),
            disabled: !entity.is_active(),
            badge: (!entity.is_available()).then_some(Badge::Unavailable),
            visible: appearance.icon_type != IconType::None,
        };

        let info = StateInfoView {
            name: card_name(config.base.name.as_deref(), entity),
            state_display: state_label(entity, &self.context.labels, &formatter),
            primary_info: appearance.primary_info,
            secondary_info: appearance.secondary_info,
            last_changed: entity.last_changed.clone(),
        };

        let value_view = |e: &EntityState| SensorValueView {
            entity_id: e.entity_id.clone(),
            value: format_sensor_value(&e.state, e.unit_of_measurement(), &formatter),
        };
        let mut values = vec![value_view(entity)];
        values.extend(self.states.resolve(config.second_entity_id()).map(value_view));

        RenderSpec::sensor_card(SensorCardView {
            entity_id: entity.entity_id.clone(),
            appearance,
            icon,
            info,
            interactions: interactions(&config.base),
            fill_controls: appearance.fill_controls(),
            values,
        })
    }
}
