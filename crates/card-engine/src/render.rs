use serde::Serialize;

use crate::config::{Appearance, Info};
use crate::controls::{ControlKind, HvacModeOption, TemperatureControlView};
use crate::icons::Badge;
use crate::selection::Selection;

/// A render spec is the output of a card.
/// TypeScript receives this as JSON and renders it to DOM.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RenderSpec {
    /// No entity configured: render nothing at all.
    #[serde(rename = "nothing")]
    Nothing,

    /// The configured entity is not in the states map.
    #[serde(rename = "not_found")]
    NotFound { entity_id: String },

    /// Error message.
    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "climate_card")]
    ClimateCard(ClimateCardView),

    #[serde(rename = "sensor_card")]
    SensorCard(SensorCardView),
}

/// The round shape icon at the start of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconView {
    pub icon: String,
    /// `r, g, b` color token; `None` draws in the theme's default color.
    pub color: Option<String>,
    /// Entity picture URL shown instead of the icon.
    pub picture: Option<String>,
    pub disabled: bool,
    pub badge: Option<Badge>,
    /// `false` when `icon_type: none` hides the shape.
    pub visible: bool,
}

/// Primary and secondary text lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateInfoView {
    pub name: String,
    pub state_display: String,
    pub primary_info: Info,
    pub secondary_info: Info,
    pub last_changed: Option<String>,
}

/// Which pointer gestures are bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteractionView {
    pub tap: bool,
    pub hold: bool,
    pub double_tap: bool,
}

/// The widget in the active control slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum ControlView {
    TemperatureControl(TemperatureControlView),
    HvacModeControl { options: Vec<HvacModeOption> },
}

/// A button switching the active slot to another control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OtherControlView {
    pub control: ControlKind,
    pub icon: &'static str,
}

impl From<ControlKind> for OtherControlView {
    fn from(control: ControlKind) -> Self {
        Self {
            control,
            icon: control.icon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateCardView {
    pub entity_id: String,
    pub appearance: Appearance,
    pub icon: IconView,
    pub info: StateInfoView,
    pub interactions: InteractionView,
    /// The controls row is shown at all.
    pub controls_visible: bool,
    /// Controls stretch across the row.
    pub fill_controls: bool,
    pub active_control: Selection<ControlKind>,
    pub control: Option<ControlView>,
    pub other_controls: Vec<OtherControlView>,
}

/// One number shown by the sensor card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorValueView {
    pub entity_id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorCardView {
    pub entity_id: String,
    pub appearance: Appearance,
    pub icon: IconView,
    pub info: StateInfoView,
    pub interactions: InteractionView,
    pub fill_controls: bool,
    /// Primary value first, then the secondary value when configured.
    pub values: Vec<SensorValueView>,
}

impl RenderSpec {
    pub fn nothing() -> Self {
        Self::Nothing
    }

    pub fn not_found(entity_id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_id: entity_id.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn climate_card(view: ClimateCardView) -> Self {
        Self::ClimateCard(view)
    }

    pub fn sensor_card(view: SensorCardView) -> Self {
        Self::SensorCard(view)
    }

    /// Serialize for the shell. Falls back to an error spec, which always
    /// serializes.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "render spec serialization failed");
            format!(r#"{{"type":"error","message":"Serialization error: {}"}}"#, e.to_string().replace('"', "'"))
        })
    }
}
