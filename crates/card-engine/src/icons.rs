//! Icon and color selection for the cards.
//!
//! Icons are Material Design Icon names (`mdi:*`) and colors are CSS
//! variables holding an `r, g, b` triple, so the shell can write
//! `rgb(<color>)` and `rgba(<color>, 0.2)` around them.

use serde::Serialize;

use crate::entity::{EntityState, HvacMode, ON};
use crate::format::{FormatOptions, NumberFormatter};

/// An icon with the color it is drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconStyle {
    pub icon: String,
    pub color: String,
}

impl IconStyle {
    pub fn new(icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// Climate mode icon and color, in the order modes are offered to the user.
pub const HVAC_MODE_STYLES: [(HvacMode, &str, &str); 7] = [
    (HvacMode::Auto, "mdi:thermostat-auto", "var(--rgb-state-climate-auto)"),
    (HvacMode::HeatCool, "mdi:sun-snowflake-variant", "var(--rgb-state-climate-heat-cool)"),
    (HvacMode::Heat, "mdi:fire", "var(--rgb-state-climate-heat)"),
    (HvacMode::Cool, "mdi:snowflake", "var(--rgb-state-climate-cool)"),
    (HvacMode::Dry, "mdi:water-percent", "var(--rgb-state-climate-dry)"),
    (HvacMode::FanOnly, "mdi:fan", "var(--rgb-state-climate-fan-only)"),
    (HvacMode::Off, "mdi:power", "var(--rgb-state-climate-off)"),
];

/// Shown instead of the mode styling while the window sensor reports open.
pub const WINDOW_OPEN_ICON: &str = "mdi:window-open-variant";
pub const WINDOW_OPEN_COLOR: &str = "var(--rgb-state-climate-cool)";

/// Color of the neutral / "off" look.
pub const OFF_COLOR: &str = "var(--rgb-state-climate-off)";

/// A numeric range of the badge table. Upper bounds are always exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    Exactly(f64),
    /// `(min, max)`
    Above { min: f64, max: f64 },
    /// `[min, max)`
    From { min: f64, max: f64 },
}

impl Span {
    pub fn contains(self, value: f64) -> bool {
        match self {
            Span::Exactly(v) => value == v,
            Span::Above { min, max } => value > min && value < max,
            Span::From { min, max } => value >= min && value < max,
        }
    }
}

/// Badge for the auxiliary percentage-like value, evaluated top to bottom.
pub const BADGE_BUCKETS: [(Span, &str, &str); 6] = [
    (Span::Exactly(0.0), "mdi:numeric-0-circle", OFF_COLOR),
    (Span::Above { min: 0.0, max: 21.0 }, "mdi:numeric-1-circle", "var(--rgb-blue)"),
    (Span::From { min: 21.0, max: 41.0 }, "mdi:numeric-2-circle", "var(--rgb-amber)"),
    (Span::From { min: 41.0, max: 61.0 }, "mdi:numeric-3-circle", "var(--rgb-orange)"),
    (Span::From { min: 61.0, max: 81.0 }, "mdi:numeric-4-circle", "var(--rgb-red)"),
    (Span::From { min: 81.0, max: 101.0 }, "mdi:numeric-5-circle", "var(--rgb-purple)"),
];

/// Anything the table does not cover, including unparsable values.
pub const UNKNOWN_BADGE: (&str, &str) = ("mdi:progress-question", OFF_COLOR);

/// Named colors accepted in `icon_color`.
const NAMED_COLORS: &[&str] = &[
    "primary", "accent", "red", "pink", "purple", "deep-purple", "indigo", "blue",
    "light-blue", "cyan", "teal", "green", "light-green", "lime", "yellow", "amber",
    "orange", "deep-orange", "brown", "light-grey", "grey", "dark-grey", "blue-grey",
    "black", "white", "disabled",
];

/// Badge overlaid on a card icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Badge {
    Icon(IconStyle),
    /// The shell's generic "entity unavailable" badge.
    Unavailable,
}

/// Mode styling for a climate state; unknown modes look "off".
pub fn hvac_mode_style(state: &str) -> (&'static str, &'static str) {
    let mode = HvacMode::parse(state).unwrap_or(HvacMode::Off);
    HVAC_MODE_STYLES
        .iter()
        .find(|(m, _, _)| *m == mode)
        .map(|(_, icon, color)| (*icon, *color))
        .unwrap_or(("mdi:power", OFF_COLOR))
}

/// Icon and color of a climate card's main icon.
///
/// An open window (auxiliary binary sensor `on`) always wins over the mode.
pub fn compute_icon_and_color(
    entity: &EntityState,
    icon_override: Option<&str>,
    window: Option<&EntityState>,
) -> IconStyle {
    if window.is_some_and(|w| w.state == ON) {
        return IconStyle::new(WINDOW_OPEN_ICON, WINDOW_OPEN_COLOR);
    }
    let (mode_icon, color) = hvac_mode_style(&entity.state);
    let icon = icon_override
        .or_else(|| entity.attr_str("icon"))
        .unwrap_or(mode_icon);
    IconStyle::new(icon, color)
}

/// Table lookup for an already-parsed badge value.
pub fn badge_bucket(value: Option<f64>) -> (&'static str, &'static str) {
    value
        .and_then(|v| BADGE_BUCKETS.iter().find(|(span, _, _)| span.contains(v)))
        .map(|(_, icon, color)| (*icon, *color))
        .unwrap_or(UNKNOWN_BADGE)
}

/// Badge for the auxiliary numeric entity.
///
/// The value is read back from its formatted display text, so whatever the
/// user sees is what gets bucketed.
pub fn compute_badge(auxiliary: &EntityState, formatter: &dyn NumberFormatter) -> Badge {
    if !auxiliary.is_available() {
        return Badge::Unavailable;
    }
    let display = match auxiliary.numeric_state() {
        Some(value) => formatter.format(value, FormatOptions::default()),
        None => auxiliary.state.clone(),
    };
    let (icon, color) = badge_bucket(formatter.parse(&display));
    Badge::Icon(IconStyle::new(icon, color))
}

/// Turn a user-supplied `icon_color` into a color token.
pub fn compute_rgb_color(color: &str) -> String {
    if color == "primary" || color == "accent" {
        return format!("var(--rgb-{color}-color)");
    }
    if NAMED_COLORS.contains(&color) {
        return format!("var(--rgb-{color})");
    }
    if let Some(hex) = color.strip_prefix('#') {
        return hex_to_rgb(hex).unwrap_or_default();
    }
    color.to_string()
}

fn hex_to_rgb(hex: &str) -> Option<String> {
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some(format!("{}, {}, {}", channel(0)?, channel(2)?, channel(4)?))
}

/// Fallback icon for an entity when neither the card nor the entity names one.
pub fn entity_icon(entity: &EntityState) -> &'static str {
    let state = entity.state.as_str();
    if let Some(device_class) = entity.attr_str("device_class") {
        if let Some(icon) = device_class_icon(entity.domain(), device_class, state) {
            return icon;
        }
    }
    domain_icon(entity.domain(), state)
}

/// Icon based on device_class (more specific).
fn device_class_icon(domain: &str, device_class: &str, state: &str) -> Option<&'static str> {
    match (domain, device_class) {
        ("binary_sensor", "window") => Some(if state == ON { "mdi:window-open" } else { "mdi:window-closed" }),
        ("binary_sensor", "door") => Some(if state == ON { "mdi:door-open" } else { "mdi:door-closed" }),
        ("binary_sensor", "motion") => Some(if state == ON { "mdi:motion-sensor" } else { "mdi:motion-sensor-off" }),

        ("sensor", "temperature") => Some("mdi:thermometer"),
        ("sensor", "humidity") | ("sensor", "moisture") => Some("mdi:water-percent"),
        ("sensor", "pressure") => Some("mdi:gauge"),
        ("sensor", "battery") => Some("mdi:battery"),
        ("sensor", "power") => Some("mdi:flash"),
        ("sensor", "energy") => Some("mdi:lightning-bolt"),
        ("sensor", "illuminance") => Some("mdi:brightness-5"),
        ("sensor", "co2") | ("sensor", "carbon_dioxide") => Some("mdi:molecule-co2"),
        _ => None,
    }
}

/// Icon based on domain (fallback).
fn domain_icon(domain: &str, state: &str) -> &'static str {
    match domain {
        "climate" => "mdi:thermostat",
        "sensor" => "mdi:eye",
        "binary_sensor" => if state == ON { "mdi:checkbox-marked-circle" } else { "mdi:radiobox-blank" },
        "number" | "input_number" => "mdi:ray-vertex",
        "switch" => if state == ON { "mdi:toggle-switch-variant" } else { "mdi:toggle-switch-variant-off" },
        _ => "mdi:bookmark",
    }
}
