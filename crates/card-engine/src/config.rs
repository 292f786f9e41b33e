//! Card configuration as authored in the dashboard editor.
//!
//! The host hands us the user's YAML/JSON card config verbatim. We parse it
//! once per reconfiguration; the result is immutable until the next one.

use serde::{Deserialize, Serialize};

use crate::entity::HvacMode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Card configuration must be an object")]
    NotAnObject,

    #[error("Invalid card configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A tap/hold/double-tap binding. Only the action name matters here; the
/// rest (service, navigation path, ...) is passed back to the shell untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub action: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ActionConfig {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Whether a binding does anything when triggered.
pub fn has_action(action: Option<&ActionConfig>) -> bool {
    action.is_some_and(|a| a.action != "none")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Default,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Info {
    Name,
    State,
    LastChanged,
    LastUpdated,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconType {
    #[default]
    Icon,
    EntityPicture,
    None,
}

/// Resolved appearance options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub layout: Layout,
    pub fill_container: bool,
    pub primary_info: Info,
    pub secondary_info: Info,
    pub icon_type: IconType,
}

impl Appearance {
    /// Controls stretch to fill the row unless the card is laid out horizontally.
    pub fn fill_controls(&self) -> bool {
        self.layout != Layout::Horizontal
    }
}

/// Keys every card understands.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaseCardConfig {
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub entity: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,

    pub layout: Option<Layout>,
    pub fill_container: Option<bool>,
    pub primary_info: Option<Info>,
    pub secondary_info: Option<Info>,
    pub icon_type: Option<IconType>,

    // Pre-`layout`/`*_info` spellings still found in older dashboards.
    pub vertical: Option<bool>,
    pub hide_name: Option<bool>,
    pub hide_state: Option<bool>,
    pub hide_icon: Option<bool>,

    pub tap_action: Option<ActionConfig>,
    pub hold_action: Option<ActionConfig>,
    pub double_tap_action: Option<ActionConfig>,
}

impl BaseCardConfig {
    pub fn appearance(&self) -> Appearance {
        Appearance {
            layout: self.layout.unwrap_or(if self.vertical == Some(true) {
                Layout::Vertical
            } else {
                Layout::Default
            }),
            fill_container: self.fill_container.unwrap_or(false),
            primary_info: self.primary_info.unwrap_or(if self.hide_name == Some(true) {
                Info::None
            } else {
                Info::Name
            }),
            secondary_info: self.secondary_info.unwrap_or(if self.hide_state == Some(true) {
                Info::None
            } else {
                Info::State
            }),
            icon_type: self.icon_type.unwrap_or(if self.hide_icon == Some(true) {
                IconType::None
            } else {
                IconType::Icon
            }),
        }
    }

    /// The configured primary entity, treating an empty string as unset.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClimateCardConfig {
    #[serde(flatten)]
    pub base: BaseCardConfig,
    pub show_temperature_control: bool,
    pub hvac_modes: Vec<HvacMode>,
    pub collapsible_controls: bool,
    /// Auxiliary numeric entity, shown as the valve badge and on the state line.
    #[serde(rename = "PIE")]
    pub badge_entity: Option<String>,
    /// Auxiliary window sensor; an open window recolors the icon.
    #[serde(rename = "Window_Detect")]
    pub window_entity: Option<String>,
}

impl ClimateCardConfig {
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        let mut config: Self = serde_json::from_value(value)?;
        config
            .base
            .tap_action
            .get_or_insert_with(|| ActionConfig::new("toggle"));
        config
            .base
            .hold_action
            .get_or_insert_with(|| ActionConfig::new("more-info"));
        Ok(config)
    }

    pub fn badge_entity_id(&self) -> Option<&str> {
        self.badge_entity.as_deref().filter(|id| !id.is_empty())
    }

    pub fn window_entity_id(&self) -> Option<&str> {
        self.window_entity.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensorCardConfig {
    #[serde(flatten)]
    pub base: BaseCardConfig,
    /// A second sensor shown in its own value control.
    #[serde(rename = "second_Value")]
    pub second_value: Option<String>,
}

impl SensorCardConfig {
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn second_entity_id(&self) -> Option<&str> {
        self.second_value.as_deref().filter(|id| !id.is_empty())
    }
}
