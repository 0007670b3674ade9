use crate::media::ResolvedMedia;
use crate::sanitize;
use crate::settings::{BackgroundMode, GradientType, LoginSettings, LogoHeight};
use crate::wordmark;

/// Selector list for the form container. All three native form IDs are
/// addressed, plus generic `#login` descendants so markup variants the
/// host theme introduces still pick up the styling.
const FORM_SELECTOR: &str = "body.login #loginform, body.login #registerform, body.login #lostpasswordform, body.login #login form";

const INPUT_SELECTOR: &str = "body.login #login form .input, body.login #login input[type=\"text\"], body.login #login input[type=\"password\"], body.login #login input[type=\"email\"]";

const FOCUS_SELECTOR: &str = "body.login #login form .input:focus, body.login #login input[type=\"text\"]:focus, body.login #login input[type=\"password\"]:focus, body.login #login input[type=\"email\"]:focus";

/// Collaborators (e.g. a Pro add-on) implement this to append CSS of
/// their own, driven by the same settings record. Extension output is
/// inserted right after the button hover rules.
pub trait CssExtension {
    fn append_css(&self, settings: &LoginSettings) -> String;
}

/// One selector with its declarations. Every declaration is emitted
/// with `!important` so the host theme's native login stylesheet loses
/// the specificity fight.
struct Rule {
    selector: String,
    decls: Vec<(String, String)>,
}

impl Rule {
    fn new(selector: &str) -> Rule {
        Rule {
            selector: selector.to_string(),
            decls: Vec::new(),
        }
    }

    fn decl(&mut self, prop: &str, value: &str) -> &mut Rule {
        self.decls.push((prop.to_string(), value.to_string()));
        self
    }
}

enum Block {
    Rule(Rule),
    Raw(String),
}

/// Accumulates rules in section order and serializes once at the end,
/// so individual sections stay testable and append order cannot leak
/// into the middle of a rule.
struct Stylesheet {
    blocks: Vec<Block>,
}

impl Stylesheet {
    fn new() -> Stylesheet {
        Stylesheet { blocks: Vec::new() }
    }

    fn push(&mut self, rule: Rule) {
        if !rule.decls.is_empty() {
            self.blocks.push(Block::Rule(rule));
        }
    }

    fn raw(&mut self, css: &str) {
        if !css.trim().is_empty() {
            self.blocks.push(Block::Raw(css.trim().to_string()));
        }
    }

    fn render(&self) -> String {
        let mut css = String::new();
        for block in &self.blocks {
            match block {
                Block::Rule(rule) => {
                    css.push_str(&rule.selector);
                    css.push_str(" {\n");
                    for (prop, value) in &rule.decls {
                        css.push_str(&format!("    {}: {} !important;\n", prop, value));
                    }
                    css.push_str("}\n\n");
                }
                Block::Raw(raw) => {
                    css.push_str(raw);
                    css.push_str("\n\n");
                }
            }
        }
        css
    }
}

/// Compile a settings snapshot into the login stylesheet.
///
/// Pure and deterministic: the same settings and media always produce
/// byte-identical CSS, and malformed fields fall back to their
/// defaults instead of failing.
pub fn compile(settings: &LoginSettings, media: &ResolvedMedia) -> String {
    compile_with(settings, media, &[])
}

/// `compile`, with extension CSS appended after the button hover
/// section.
pub fn compile_with(
    settings: &LoginSettings,
    media: &ResolvedMedia,
    extensions: &[&dyn CssExtension],
) -> String {
    let mut sheet = Stylesheet::new();

    background_section(&mut sheet, settings, media);
    overlay_section(&mut sheet, settings, media);
    form_section(&mut sheet, settings);
    label_section(&mut sheet, settings);
    input_section(&mut sheet, settings);
    focus_section(&mut sheet, settings);
    button_section(&mut sheet, settings);
    button_hover_section(&mut sheet, settings);
    for ext in extensions {
        sheet.raw(&ext.append_css(settings));
    }
    footer_link_section(&mut sheet, settings);
    logo_section(&mut sheet, settings, media);
    message_section(&mut sheet, settings);
    misc_section(&mut sheet, settings);

    sheet.render()
}

// ── Background ─────────────────────────────────────────

fn background_section(sheet: &mut Stylesheet, settings: &LoginSettings, media: &ResolvedMedia) {
    match settings.background_mode() {
        BackgroundMode::Solid => solid_background(sheet, settings),
        BackgroundMode::Gradient => gradient_background(sheet, settings),
        BackgroundMode::Image => match &media.background_url {
            Some(url) => image_background(sheet, settings, url),
            // No attachment, explicit URL, or preset resolved: degrade
            // to the solid fill so the page never renders bare.
            None => solid_background(sheet, settings),
        },
    }
}

fn solid_background(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let mut rule = Rule::new("body.login");
    rule.decl("background", &settings.color("background_color"));
    sheet.push(rule);
}

fn gradient_background(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let c1 = settings.color("gradient_color_1");
    let c2 = settings.color("gradient_color_2");
    let angle = settings.get_i64("gradient_angle");
    let value = match settings.gradient_type() {
        Some(GradientType::Linear) => {
            format!("linear-gradient({}deg, {}, {})", angle, c1, c2)
        }
        Some(GradientType::Radial) => {
            let position = gradient_position(settings.get("gradient_position"));
            format!("radial-gradient(circle at {}, {}, {})", position, c1, c2)
        }
        Some(GradientType::Mesh) => {
            // Layered pseudo-mesh: three anchored radials over a linear
            // base. The third color borrows the first when unset.
            let c3 = {
                let v = settings.get("gradient_color_3");
                if sanitize::is_valid_color(v) {
                    v.to_string()
                } else {
                    c1.clone()
                }
            };
            format!(
                "radial-gradient(at 0% 0%, {c1} 0px, transparent 55%), \
                 radial-gradient(at 100% 100%, {c2} 0px, transparent 55%), \
                 radial-gradient(at 100% 0%, {c3} 0px, transparent 55%), \
                 linear-gradient(135deg, {c1}, {c2})"
            )
        }
        // Unrecognized gradient type: 135° linear between c1 and c2.
        None => format!("linear-gradient(135deg, {}, {})", c1, c2),
    };
    let mut rule = Rule::new("body.login");
    rule.decl("background", &value);
    sheet.push(rule);
}

fn gradient_position(position: &str) -> &str {
    match position {
        "center" | "top left" | "top right" | "bottom left" | "bottom right" | "top"
        | "bottom" | "left" | "right" => position,
        _ => "center",
    }
}

fn image_background(sheet: &mut Stylesheet, settings: &LoginSettings, url: &str) {
    let color = settings.color("background_color");
    let blur = settings.get_i64("background_blur");

    if blur > 0 {
        // The blurred image lives on a fixed pseudo-element behind the
        // page so the filter never touches the form. Scaling hides the
        // soft edges blurring pulls in from outside the viewport.
        let mut body = Rule::new("body.login");
        body.decl("background-color", &color);
        sheet.push(body);

        let mut before = Rule::new("body.login::before");
        before
            .decl("content", "\"\"")
            .decl("position", "fixed")
            .decl("top", "0")
            .decl("left", "0")
            .decl("width", "100%")
            .decl("height", "100%")
            .decl("z-index", "-1")
            .decl("background-color", &color)
            .decl("background-image", &format!("url(\"{}\")", url))
            .decl("background-size", "cover")
            .decl("background-position", "center center")
            .decl("background-repeat", "no-repeat")
            .decl("filter", &format!("blur({}px)", blur))
            .decl("transform", "scale(1.1)");
        sheet.push(before);
    } else {
        let mut body = Rule::new("body.login");
        body.decl("background-color", &color)
            .decl("background-image", &format!("url(\"{}\")", url))
            .decl("background-size", "cover")
            .decl("background-position", "center center")
            .decl("background-repeat", "no-repeat")
            .decl("background-attachment", "fixed");
        sheet.push(body);
    }
}

// ── Overlay ────────────────────────────────────────────

fn overlay_section(sheet: &mut Stylesheet, settings: &LoginSettings, media: &ResolvedMedia) {
    let enabled = settings.get_bool("overlay_enabled")
        && settings.background_mode() == BackgroundMode::Image
        && media.background_url.is_some();
    if !enabled {
        return;
    }

    let color = settings.color("overlay_color");
    let opacity = settings.get_i64("overlay_opacity") as f64 / 100.0;

    let mut overlay = Rule::new("body.login::after");
    overlay
        .decl("content", "\"\"")
        .decl("position", "fixed")
        .decl("top", "0")
        .decl("left", "0")
        .decl("width", "100%")
        .decl("height", "100%")
        .decl("background", &rgba(&color, opacity))
        .decl("z-index", "0")
        .decl("pointer-events", "none");
    sheet.push(overlay);

    // Keep the form above the overlay.
    let mut login = Rule::new("body.login #login");
    login.decl("position", "relative").decl("z-index", "1");
    sheet.push(login);
}

// ── Form container ─────────────────────────────────────

fn form_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let background = settings.color("form_background_color");
    let mut rule = Rule::new(FORM_SELECTOR);

    if settings.get_bool("form_glass_enabled") {
        rule.decl("background", &rgba(&background, 0.65))
            .decl("backdrop-filter", "blur(10px)")
            .decl("-webkit-backdrop-filter", "blur(10px)")
            .decl("border", "1px solid rgba(255, 255, 255, 0.25)");
    } else {
        rule.decl("background", &background);
    }

    rule.decl(
        "border-radius",
        &format!("{}px", settings.get_i64("form_border_radius")),
    );

    if settings.get_bool("form_shadow_enabled") {
        rule.decl("box-shadow", "0 8px 28px rgba(0, 0, 0, 0.18)");
    } else {
        rule.decl("box-shadow", "none");
    }

    sheet.push(rule);
}

// ── Labels ─────────────────────────────────────────────

fn label_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let mut rule = Rule::new("body.login #login label");
    rule.decl("color", &settings.color("label_text_color"));
    sheet.push(rule);
}

// ── Inputs ─────────────────────────────────────────────

fn input_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let mut rule = Rule::new(INPUT_SELECTOR);
    rule.decl("background-color", &settings.color("input_background_color"))
        .decl("color", &settings.color("input_text_color"))
        .decl("border-color", &settings.color("input_border_color"))
        .decl(
            "border-radius",
            &format!("{}px", settings.get_i64("input_border_radius")),
        );
    sheet.push(rule);
}

fn focus_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let accent = settings.color("button_background_color");
    let mut rule = Rule::new(FOCUS_SELECTOR);
    rule.decl("border-color", &accent)
        .decl("box-shadow", &format!("0 0 0 1px {}", accent))
        .decl("outline", "none");
    sheet.push(rule);
}

// ── Button ─────────────────────────────────────────────

fn button_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let background = settings.color("button_background_color");
    let mut rule = Rule::new("body.login #login .button-primary");
    rule.decl("background", &background)
        .decl("border-color", &background)
        .decl("color", &settings.color("button_text_color"))
        .decl(
            "border-radius",
            &format!("{}px", settings.get_i64("button_border_radius")),
        )
        .decl("text-shadow", "none");
    sheet.push(rule);
}

fn button_hover_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let hover = hover_color(settings);
    let mut rule = Rule::new(
        "body.login #login .button-primary:hover, body.login #login .button-primary:focus",
    );
    rule.decl("background", &hover).decl("border-color", &hover);
    sheet.push(rule);
}

/// Configured hover color when set, otherwise the button background
/// darkened a step.
fn hover_color(settings: &LoginSettings) -> String {
    let configured = settings.get("button_hover_color");
    if sanitize::is_valid_color(configured) {
        return configured.to_string();
    }
    darken(&settings.color("button_background_color"), 0.12)
}

// ── Footer links ───────────────────────────────────────

fn footer_link_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let color = settings.color("link_color");
    let mut rule = Rule::new(
        "body.login #nav a, body.login #backtoblog a, body.login .privacy-policy-page-link a",
    );
    rule.decl("color", &color);
    sheet.push(rule);

    let hover = {
        let configured = settings.get("link_hover_color");
        if sanitize::is_valid_color(configured) {
            configured.to_string()
        } else {
            darken(&color, 0.15)
        }
    };
    let mut rule = Rule::new(
        "body.login #nav a:hover, body.login #backtoblog a:hover, body.login .privacy-policy-page-link a:hover",
    );
    rule.decl("color", &hover);
    sheet.push(rule);
}

// ── Logo ───────────────────────────────────────────────

fn logo_section(sheet: &mut Stylesheet, settings: &LoginSettings, media: &ResolvedMedia) {
    let width = settings.get_i64("logo_width");
    let height = logo_height_px(settings, media);

    let image = match &media.logo_url {
        Some(url) => format!("url(\"{}\")", url),
        None => format!(
            "url(\"{}\")",
            wordmark::wordmark_data_uri(&settings.color("label_text_color"))
        ),
    };

    let mut rule = Rule::new("body.login #login h1 a");
    rule.decl("background-image", &image)
        .decl("width", &format!("{}px", width))
        .decl("height", &format!("{}px", height))
        .decl("background-size", "contain")
        .decl("background-repeat", "no-repeat")
        .decl("background-position", "center center")
        // content-box on both keeps padding from eating into the
        // visible logo region.
        .decl("background-origin", "content-box")
        .decl("box-sizing", "content-box");
    sheet.push(rule);
}

/// Logo height in pixels. Fixed heights are used literally; auto
/// scales the configured width by the custom logo's aspect ratio, or
/// assumes a square when no usable dimensions exist (the built-in
/// wordmark is close enough to square for that to hold).
fn logo_height_px(settings: &LoginSettings, media: &ResolvedMedia) -> i64 {
    let width = settings.get_i64("logo_width");
    match settings.logo_height() {
        LogoHeight::Fixed(px) => px,
        LogoHeight::Auto => match (&media.logo_url, media.logo_meta) {
            (Some(_), Some(meta)) if meta.width > 0 => {
                (width as f64 * (meta.height as f64 / meta.width as f64)).round() as i64
            }
            _ => width,
        },
    }
}

// ── Messages / errors ──────────────────────────────────

fn message_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    let form_background = settings.color("form_background_color");

    let mut rule = Rule::new("body.login .message, body.login .success");
    rule.decl("background-color", &form_background)
        .decl("border-left-color", &settings.color("button_background_color"))
        .decl("color", &settings.color("input_text_color"));
    sheet.push(rule);

    let mut rule = Rule::new("body.login #login_error");
    rule.decl("background-color", &form_background)
        .decl("color", &settings.color("input_text_color"));
    sheet.push(rule);
}

// ── Misc ───────────────────────────────────────────────

fn misc_section(sheet: &mut Stylesheet, settings: &LoginSettings) {
    if settings.get_bool("hide_backtoblog") {
        let mut rule = Rule::new("body.login #backtoblog");
        rule.decl("display", "none");
        sheet.push(rule);
    }
    if settings.get_bool("hide_language_switcher") {
        let mut rule = Rule::new("body.login .language-switcher");
        rule.decl("display", "none");
        sheet.push(rule);
    }
}

// ── Color helpers ──────────────────────────────────────

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// `#rrggbb` + alpha → `rgba(r, g, b, a)`.
pub(crate) fn rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex).unwrap_or((0, 0, 0));
    format!("rgba({}, {}, {}, {:.2})", r, g, b, alpha)
}

/// Darken a hex color by scaling each channel toward black.
pub(crate) fn darken(hex: &str, amount: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex).unwrap_or((0, 0, 0));
    let factor = (1.0 - amount).clamp(0.0, 1.0);
    format!(
        "#{:02x}{:02x}{:02x}",
        (r as f64 * factor).round() as u8,
        (g as f64 * factor).round() as u8,
        (b as f64 * factor).round() as u8
    )
}
