//! Style block assembly and head injection. The markers around the
//! block are stable so collaborators can locate and patch it.

use crate::css;
use crate::media::ResolvedMedia;
use crate::settings::LoginSettings;

pub const STYLE_MARKER_OPEN: &str = "<!-- entryway:login-styles -->";
pub const STYLE_MARKER_CLOSE: &str = "<!-- /entryway:login-styles -->";

/// The `<style>` block for the page head, wrapped in parseable marker
/// comments. Empty until the user has saved settings at least once —
/// a fresh install leaves the host's native login page untouched.
pub fn style_block(settings: &LoginSettings, media: &ResolvedMedia, has_saved: bool) -> String {
    if !has_saved {
        return String::new();
    }
    let compiled = css::compile(settings, media);
    format!(
        "{}\n<style id=\"entryway-login-styles\">\n{}</style>\n{}\n",
        STYLE_MARKER_OPEN, compiled, STYLE_MARKER_CLOSE
    )
}

/// Insert a style block before `</head>`; documents without a head get
/// the block appended so the styling still loads.
pub fn inject_into_head(html: &str, block: &str) -> String {
    if block.is_empty() {
        return html.to_string();
    }
    let lowered = html.to_ascii_lowercase();
    match lowered.find("</head>") {
        Some(i) => format!("{}{}{}", &html[..i], block, &html[i..]),
        None => format!("{}{}", html, block),
    }
}
