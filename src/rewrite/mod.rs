//! Layout shell rewriter: wraps the native login markup in a shell
//! that carries the configured layout, as the final transform over the
//! fully rendered page.

use crate::media::ResolvedMedia;
use crate::settings::{LayoutMode, LoginSettings};

mod splice;
#[cfg(feature = "dom")]
mod structural;

/// One way of getting the shell into the document. Strategies are
/// tried in order; a strategy that cannot handle the document returns
/// `None` and the next one runs.
trait ShellStrategy {
    fn apply(&self, html: &str, shell: &ShellSpec) -> Option<String>;
}

/// Rewrite a rendered login page so the login container sits inside
/// the layout shell for the configured mode.
///
/// Returns the input unchanged when the layout is the native centered
/// one, or when the document has no recognizable login container —
/// custom login pages the host swapped in must pass through untouched.
pub fn rewrite(
    html: &str,
    settings: &LoginSettings,
    media: &ResolvedMedia,
    action: &str,
) -> String {
    if settings.layout() == LayoutMode::Centered {
        return html.to_string();
    }
    if !has_login_container(html) {
        return html.to_string();
    }

    let shell = ShellSpec::build(settings, media, action);

    #[cfg(feature = "dom")]
    {
        if let Some(out) = structural::StructuralShell.apply(html, &shell) {
            return out;
        }
        log::debug!("structural rewrite could not parse the document, splicing instead");
    }

    match splice::SpliceShell.apply(html, &shell) {
        Some(out) => out,
        None => {
            log::debug!("shell splice found no insertion point, leaving page untouched");
            html.to_string()
        }
    }
}

/// Precondition for any rewriting: the native login container must be
/// present.
pub fn has_login_container(html: &str) -> bool {
    html.contains("id=\"login\"") || html.contains("id='login'")
}

/// The shell markup for one request, derived from the settings
/// snapshot. Built fresh per invocation; the rewriter holds no state
/// across requests.
pub(crate) struct ShellSpec {
    classes: String,
    brand_html: String,
}

impl ShellSpec {
    pub(crate) fn build(
        settings: &LoginSettings,
        media: &ResolvedMedia,
        action: &str,
    ) -> ShellSpec {
        let mode = settings.layout();
        let classes = format!(
            "lp-shell layout--{} density--{} valign--{} action--{}",
            mode.token(),
            css_token(settings.get("layout_density"), "comfortable"),
            css_token(settings.get("layout_valign"), "center"),
            css_token(action, "login"),
        );

        let mut brand_html = String::from("<aside class=\"lp-brand\">");
        if settings.get_bool("brand_enabled") && mode.has_brand_panel() {
            brand_html.push_str("<div class=\"lp-brand-content\">");
            if let Some(url) = &media.brand_logo_url {
                brand_html.push_str(&format!(
                    "<img class=\"lp-brand-logo\" src=\"{}\" alt=\"\">",
                    html_escape(url)
                ));
            }
            let title = settings.get("brand_title");
            if !title.is_empty() {
                brand_html.push_str(&format!(
                    "<h2 class=\"lp-brand-title\">{}</h2>",
                    html_escape(title)
                ));
            }
            let subtitle = settings.get("brand_subtitle");
            if !subtitle.is_empty() {
                brand_html.push_str(&format!(
                    "<p class=\"lp-brand-subtitle\">{}</p>",
                    html_escape(subtitle)
                ));
            }
            brand_html.push_str("</div>");
        }
        brand_html.push_str("</aside>");

        ShellSpec { classes, brand_html }
    }

    /// Everything that goes in front of the login container: shell,
    /// brand zone, main zone, content wrap.
    pub(crate) fn open_markup(&self) -> String {
        format!(
            "<div class=\"{}\">{}<main class=\"lp-main\"><div class=\"lp-content-wrap\">",
            self.classes, self.brand_html
        )
    }

    pub(crate) fn close_markup(&self) -> &'static str {
        "</div></main></div>"
    }
}

/// Reduce a free-form value (e.g. the login screen action from the
/// query string) to a CSS-safe class token.
pub(crate) fn css_token(value: &str, fallback: &str) -> String {
    let token: String = value
        .trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if token.is_empty() || token.chars().all(|c| c == '-') {
        fallback.to_string()
    } else {
        token
    }
}

/// Append a class to an element's opening tag without clobbering the
/// classes already on it. `tag` is the full `<... >` slice.
pub(crate) fn append_class(tag: &str, class: &str) -> String {
    if let Some(pos) = tag.find("class=\"") {
        let insert_at = pos + "class=\"".len();
        format!("{}{} {}", &tag[..insert_at], class, &tag[insert_at..])
    } else if let Some(pos) = tag.find("class='") {
        let insert_at = pos + "class='".len();
        format!("{}{} {}", &tag[..insert_at], class, &tag[insert_at..])
    } else if let Some(pos) = tag.rfind("/>") {
        format!("{} class=\"{}\"{}", &tag[..pos], class, &tag[pos..])
    } else if let Some(pos) = tag.rfind('>') {
        format!("{} class=\"{}\"{}", &tag[..pos], class, &tag[pos..])
    } else {
        tag.to_string()
    }
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
