use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::sanitize;

/// Default value for every known setting key.
/// Merging any saved map with this table yields a total record.
pub const DEFAULTS: &[(&str, &str)] = &[
    // Layout
    ("layout", "centered"),
    ("layout_density", "comfortable"),
    ("layout_valign", "center"),
    // Background
    ("background_mode", "solid"),
    ("background_color", "#f0f0f1"),
    ("gradient_type", "linear"),
    ("gradient_color_1", "#3858e9"),
    ("gradient_color_2", "#1d2327"),
    ("gradient_color_3", ""),
    ("gradient_angle", "135"),
    ("gradient_position", "center"),
    ("background_image_id", "0"),
    ("background_image_url", ""),
    ("background_preset", ""),
    ("background_blur", "0"),
    // Overlay
    ("overlay_enabled", "false"),
    ("overlay_color", "#000000"),
    ("overlay_opacity", "50"),
    // Form container
    ("form_background_color", "#ffffff"),
    ("form_border_radius", "0"),
    ("form_shadow_enabled", "true"),
    ("form_glass_enabled", "false"),
    // Labels and inputs
    ("label_text_color", "#3c434a"),
    ("input_background_color", "#ffffff"),
    ("input_text_color", "#2c3338"),
    ("input_border_color", "#8c8f94"),
    ("input_border_radius", "4"),
    // Button
    ("button_background_color", "#2271b1"),
    ("button_text_color", "#ffffff"),
    ("button_hover_color", ""),
    ("button_border_radius", "3"),
    // Footer links
    ("link_color", "#50575e"),
    ("link_hover_color", ""),
    // Logo
    ("logo_image_id", "0"),
    ("logo_width", "84"),
    ("logo_height", "0"),
    // Brand panel
    ("brand_enabled", "false"),
    ("brand_title", ""),
    ("brand_subtitle", ""),
    ("brand_logo_id", "0"),
    // Misc
    ("hide_backtoblog", "false"),
    ("hide_language_switcher", "false"),
];

/// Look up the default for a known key.
pub fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// A flat settings snapshot for the login screen.
///
/// Values are stored as strings, the way the host persists them; typed
/// accessors parse on demand and fall back to the key's default on any
/// malformed value, so readers never fail. The record is passed
/// explicitly to every consumer — there is no ambient settings lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginSettings {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl LoginSettings {
    /// Build a record from a saved key/value map, merged with defaults.
    pub fn from_map(saved: HashMap<String, String>) -> Self {
        let mut values: BTreeMap<String, String> = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in saved {
            values.insert(k, v);
        }
        LoginSettings { values }
    }

    /// Build a record from a JSON object (the shape the admin API and
    /// templates pass settings around in). Non-string scalars are
    /// stringified; nested values are ignored.
    pub fn from_json(json: &Value) -> Self {
        let mut saved = HashMap::new();
        if let Value::Object(map) = json {
            for (k, v) in map {
                let s = match v {
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    _ => continue,
                };
                saved.insert(k.clone(), s);
            }
        }
        Self::from_map(saved)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Raw value for a key; the key's default when absent.
    pub fn get(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(v) => v,
            None => default_for(key).unwrap_or(""),
        }
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        let v = self.get(key);
        if v.is_empty() { default } else { v }
    }

    pub fn get_bool(&self, key: &str) -> bool {
        let v = self.get(key);
        v == "true" || v == "1"
    }

    /// Integer value; falls back to the key's default, then 0, when the
    /// stored value does not parse.
    pub fn get_i64(&self, key: &str) -> i64 {
        self.get(key)
            .parse()
            .ok()
            .or_else(|| default_for(key).and_then(|d| d.parse().ok()))
            .unwrap_or(0)
    }

    /// A `#rrggbb` color; falls back to the key's default when the
    /// stored value is not a valid hex color.
    pub fn color(&self, key: &str) -> String {
        let v = self.get(key);
        if sanitize::is_valid_color(v) {
            return v.to_string();
        }
        default_for(key)
            .filter(|d| sanitize::is_valid_color(d))
            .unwrap_or("#000000")
            .to_string()
    }

    pub fn background_mode(&self) -> BackgroundMode {
        BackgroundMode::parse(self.get("background_mode"))
    }

    /// `None` for an unrecognized gradient type — the compiler renders
    /// its documented fallback (135° linear) in that case.
    pub fn gradient_type(&self) -> Option<GradientType> {
        GradientType::parse(self.get("gradient_type"))
    }

    pub fn layout(&self) -> LayoutMode {
        LayoutMode::parse(self.get("layout"))
    }

    pub fn logo_height(&self) -> LogoHeight {
        match self.get_i64("logo_height") {
            h if h > 0 => LogoHeight::Fixed(h),
            _ => LogoHeight::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    Solid,
    Gradient,
    Image,
}

impl BackgroundMode {
    /// Unknown values fall through to the solid branch.
    pub fn parse(s: &str) -> BackgroundMode {
        match s {
            "gradient" => BackgroundMode::Gradient,
            "image" => BackgroundMode::Image,
            _ => BackgroundMode::Solid,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            BackgroundMode::Solid => "solid",
            BackgroundMode::Gradient => "gradient",
            BackgroundMode::Image => "image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientType {
    Linear,
    Radial,
    Mesh,
}

impl GradientType {
    pub fn parse(s: &str) -> Option<GradientType> {
        match s {
            "linear" => Some(GradientType::Linear),
            "radial" => Some(GradientType::Radial),
            "mesh" => Some(GradientType::Mesh),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            GradientType::Linear => "linear",
            GradientType::Radial => "radial",
            GradientType::Mesh => "mesh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Centered,
    Simple,
    SplitLeft,
    SplitRight,
    CardSplit,
}

impl LayoutMode {
    /// Unknown values fall back to the native centered layout.
    pub fn parse(s: &str) -> LayoutMode {
        match s {
            "simple" => LayoutMode::Simple,
            "split_left" => LayoutMode::SplitLeft,
            "split_right" => LayoutMode::SplitRight,
            "card_split" => LayoutMode::CardSplit,
            _ => LayoutMode::Centered,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            LayoutMode::Centered => "centered",
            LayoutMode::Simple => "simple",
            LayoutMode::SplitLeft => "split_left",
            LayoutMode::SplitRight => "split_right",
            LayoutMode::CardSplit => "card_split",
        }
    }

    /// Split and card-split layouts carry the brand panel.
    pub fn has_brand_panel(&self) -> bool {
        matches!(
            self,
            LayoutMode::SplitLeft | LayoutMode::SplitRight | LayoutMode::CardSplit
        )
    }
}

/// Logo height, with the stored `0` sentinel made explicit: `Auto`
/// means "derive from the logo image's aspect ratio, or fall back to a
/// square scaled to the configured width".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoHeight {
    Auto,
    Fixed(i64),
}
