use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::sanitize;

/// The built-in wordmark shown above the form when no custom logo is
/// configured: a keyhole badge, drawn with the label text color so it
/// stays legible on whatever background the settings paint.
const WORDMARK_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 80 80"><path fill="#{color}" d="M40 4c14.4 0 26 11.6 26 26v8h4a4 4 0 0 1 4 4v30a4 4 0 0 1-4 4H10a4 4 0 0 1-4-4V42a4 4 0 0 1 4-4h4v-8C14 15.6 25.6 4 40 4zm0 10c-8.8 0-16 7.2-16 16v8h32v-8c0-8.8-7.2-16-16-16z"/><path fill="#{color}" d="M40 48a6 6 0 0 1 3 11.2V66a3 3 0 0 1-6 0v-6.8A6 6 0 0 1 40 48z"/></svg>"##;

/// Render the wordmark as a base64 `data:` URI, colorized by
/// substituting the given `#rrggbb` color (stripped of `#`) into the
/// SVG fill attributes. Invalid colors fall back to the default label
/// text color.
pub fn wordmark_data_uri(color: &str) -> String {
    let color = if sanitize::is_valid_color(color) {
        color
    } else {
        "#3c434a"
    };
    let hex = color.trim_start_matches('#');
    let svg = WORDMARK_SVG.replace("{color}", hex);
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}
