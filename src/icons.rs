//! Icon keys to renderable glyphs.
//!
//! Catalog records name their icon with a symbolic key such as
//! `fa-suitcase`. The page has no icon font, so keys resolve to Unicode
//! glyphs. Unknown keys fall back to [`MISSING`] instead of failing the
//! build.

/// Glyph for keys with no mapping.
pub const MISSING: &str = "\u{2715}";

const GLYPHS: &[(&str, &str)] = &[
    ("fa-biking", "\u{1F6B2}"),
    ("fa-briefcase", "\u{1F4BC}"),
    ("fa-building", "\u{1F3E2}"),
    ("fa-chart-line", "\u{1F4C8}"),
    ("fa-code", "\u{2328}"),
    ("fa-credit-card", "\u{1F4B3}"),
    ("fa-cut", "\u{2702}"),
    ("fa-desktop", "\u{1F5A5}"),
    ("fa-fish", "\u{1F41F}"),
    ("fa-gem", "\u{1F48E}"),
    ("fa-glass-cheers", "\u{1F942}"),
    ("fa-lightbulb", "\u{1F4A1}"),
    ("fa-map-marker", "\u{1F4CD}"),
    ("fa-mobile-android-alt", "\u{1F4F1}"),
    ("fa-paint-brush-alt", "\u{1F58C}"),
    ("fa-palette", "\u{1F3A8}"),
    ("fa-paper-plane", "\u{2708}"),
    ("fa-pen-fancy", "\u{2712}"),
    ("fa-rings-wedding", "\u{1F48D}"),
    ("fa-road", "\u{1F6E3}"),
    ("fa-spa", "\u{1F9D6}"),
    ("fa-suitcase", "\u{1F9F3}"),
    ("fa-tv-retro", "\u{1F4FA}"),
    ("fa-users", "\u{1F465}"),
];

/// Glyph for `key`, or `None` when the key is unmapped.
pub fn lookup(key: &str) -> Option<&'static str> {
    GLYPHS
        .binary_search_by(|(k, _)| (*k).cmp(key))
        .ok()
        .map(|i| GLYPHS[i].1)
}

/// Glyph for `key`, falling back to [`MISSING`].
pub fn resolve(key: &str) -> &'static str {
    lookup(key).unwrap_or(MISSING)
}

pub fn is_known(key: &str) -> bool {
    lookup(key).is_some()
}
