use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::settings::{
    default_for, BackgroundMode, GradientType, LayoutMode, LoginSettings,
};

/// Numeric keys and their allowed range, enforced when settings are
/// saved. The compiler trusts these invariants and never re-clamps.
const CLAMPS: &[(&str, i64, i64)] = &[
    ("form_border_radius", 0, 50),
    ("input_border_radius", 0, 25),
    ("button_border_radius", 0, 999),
    ("logo_width", 50, 500),
    ("logo_height", 0, 500),
    ("background_blur", 0, 50),
    ("overlay_opacity", 0, 100),
    ("gradient_angle", 0, 360),
    ("background_image_id", 0, i64::MAX),
    ("logo_image_id", 0, i64::MAX),
    ("brand_logo_id", 0, i64::MAX),
];

const COLOR_KEYS: &[&str] = &[
    "background_color",
    "gradient_color_1",
    "gradient_color_2",
    "overlay_color",
    "form_background_color",
    "label_text_color",
    "input_background_color",
    "input_text_color",
    "input_border_color",
    "button_background_color",
    "button_text_color",
    "link_color",
];

/// Color keys where empty means "unset" (derived at compile time).
const OPTIONAL_COLOR_KEYS: &[&str] = &[
    "gradient_color_3",
    "button_hover_color",
    "link_hover_color",
];

const URL_KEYS: &[&str] = &["background_image_url"];

const BOOL_KEYS: &[&str] = &[
    "overlay_enabled",
    "form_shadow_enabled",
    "form_glass_enabled",
    "brand_enabled",
    "hide_backtoblog",
    "hide_language_switcher",
];

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^#[0-9a-fA-F]{6}$").expect("valid regex"))
}

pub fn is_valid_color(s: &str) -> bool {
    hex_color_re().is_match(s)
}

/// Only http(s) URLs are accepted for image fields.
pub fn is_valid_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Normalize a saved settings record: clamp numeric ranges, restore
/// defaults for malformed colors and enums, drop non-http(s) URLs, and
/// canonicalize booleans. Unknown keys pass through untouched so
/// extensions can ride along in the same record.
pub fn sanitize(settings: LoginSettings) -> LoginSettings {
    let mut out = settings.clone();

    for (key, min, max) in CLAMPS {
        let n = settings.get(key).parse::<i64>().unwrap_or_else(|_| {
            default_for(key).and_then(|d| d.parse().ok()).unwrap_or(0)
        });
        out.set(key, &n.clamp(*min, *max).to_string());
    }

    for key in COLOR_KEYS {
        if !is_valid_color(settings.get(key)) {
            out.set(key, default_for(key).unwrap_or("#000000"));
        }
    }

    for key in OPTIONAL_COLOR_KEYS {
        let v = settings.get(key);
        if !v.is_empty() && !is_valid_color(v) {
            out.set(key, "");
        }
    }

    for key in URL_KEYS {
        let v = settings.get(key);
        if !v.is_empty() && !is_valid_url(v) {
            out.set(key, "");
        }
    }

    for key in BOOL_KEYS {
        let v = settings.get_bool(key);
        out.set(key, if v { "true" } else { "false" });
    }

    // Enum fields normalize to a recognized token or the default.
    out.set(
        "background_mode",
        BackgroundMode::parse(settings.get("background_mode")).token(),
    );
    out.set(
        "gradient_type",
        GradientType::parse(settings.get("gradient_type"))
            .map(|g| g.token())
            .unwrap_or("linear"),
    );
    out.set("layout", LayoutMode::parse(settings.get("layout")).token());

    let density = settings.get("layout_density");
    if !matches!(density, "comfortable" | "compact") {
        out.set("layout_density", "comfortable");
    }
    let valign = settings.get("layout_valign");
    if !matches!(valign, "top" | "center" | "bottom") {
        out.set("layout_valign", "center");
    }

    out
}
