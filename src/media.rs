use image::GenericImageView;

use crate::presets;
use crate::sanitize;
use crate::settings::LoginSettings;

/// Natural pixel dimensions of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
}

/// The seam to the host application: settings storage, the media
/// library, and the first-save gate all live behind this trait.
pub trait ThemeSource: Send + Sync {
    /// Current settings snapshot, already merged with defaults.
    fn settings(&self) -> LoginSettings;

    /// Public URL for a media attachment, if it exists.
    fn attachment_url(&self, id: i64) -> Option<String>;

    /// Natural dimensions for a media attachment, if known.
    fn attachment_meta(&self, id: i64) -> Option<ImageMeta>;

    /// Whether the user has ever saved login settings. Until then the
    /// host's native login styling is left untouched.
    fn has_saved(&self) -> bool;
}

/// Media lookups resolved once per request, then handed by value to
/// the pure compiler and rewriter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMedia {
    pub background_url: Option<String>,
    pub logo_url: Option<String>,
    pub logo_meta: Option<ImageMeta>,
    pub brand_logo_url: Option<String>,
}

impl ResolvedMedia {
    /// Resolve the background image (attachment, then explicit URL,
    /// then preset), the custom logo, and the brand-panel logo.
    pub fn resolve(settings: &LoginSettings, source: &dyn ThemeSource) -> ResolvedMedia {
        let background_url = {
            let id = settings.get_i64("background_image_id");
            let explicit = settings.get("background_image_url");
            let preset = settings.get("background_preset");
            if id > 0 {
                source.attachment_url(id)
            } else if !explicit.is_empty() && sanitize::is_valid_url(explicit) {
                Some(explicit.to_string())
            } else {
                presets::preset_url(preset).map(|u| u.to_string())
            }
        };

        let logo_id = settings.get_i64("logo_image_id");
        let (logo_url, logo_meta) = if logo_id > 0 {
            (
                source.attachment_url(logo_id),
                source.attachment_meta(logo_id),
            )
        } else {
            (None, None)
        };

        let brand_id = settings.get_i64("brand_logo_id");
        let brand_logo_url = if brand_id > 0 {
            source.attachment_url(brand_id)
        } else {
            None
        };

        ResolvedMedia {
            background_url,
            logo_url,
            logo_meta,
            brand_logo_url,
        }
    }
}

/// Read natural dimensions straight from encoded image bytes, for
/// hosts that store uploads on disk without a metadata table.
pub fn probe_dimensions(bytes: &[u8]) -> Option<ImageMeta> {
    let img = image::load_from_memory(bytes).ok()?;
    let (width, height) = img.dimensions();
    Some(ImageMeta { width, height })
}
