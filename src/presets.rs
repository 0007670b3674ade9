/// Background presets shipped with the crate. Paths are relative to
/// the host's static asset mount; the admin UI offers these when no
/// media attachment is selected.
pub const PRESETS: &[(&str, &str)] = &[
    ("aurora", "/assets/entryway/backgrounds/aurora.jpg"),
    ("dunes", "/assets/entryway/backgrounds/dunes.jpg"),
    ("horizon", "/assets/entryway/backgrounds/horizon.jpg"),
    ("midnight", "/assets/entryway/backgrounds/midnight.jpg"),
    ("paper", "/assets/entryway/backgrounds/paper.jpg"),
    ("slate", "/assets/entryway/backgrounds/slate.jpg"),
];

/// Look up a preset by name; unknown names resolve to none.
pub fn preset_url(name: &str) -> Option<&'static str> {
    PRESETS.iter().find(|(n, _)| *n == name).map(|(_, u)| *u)
}
