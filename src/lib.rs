//! Entryway — settings-driven theming for the login screen of a host
//! web application.
//!
//! The host owns routing, settings storage, and the media library; it
//! hands this crate a settings snapshot (behind [`ThemeSource`]) and
//! gets back a `<style>` block for the page head ([`inject`]) and a
//! rewritten page body that wraps the native login form in a layout
//! shell ([`rewrite`]). Both transforms degrade silently: unstyled or
//! partially styled output is always preferred over a broken page.

pub mod css;
pub mod inject;
pub mod media;
pub mod presets;
pub mod rewrite;
pub mod sanitize;
pub mod settings;
pub mod wordmark;

#[cfg(feature = "rocket")]
pub mod fairing;


pub use css::{compile, compile_with, CssExtension};
pub use media::{probe_dimensions, ImageMeta, ResolvedMedia, ThemeSource};
pub use settings::{
    BackgroundMode, GradientType, LayoutMode, LoginSettings, LogoHeight,
};
