//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content directory next to `catalog.toml`; stock defaults are
//! serialised to a TOML table and the user's file is merged on top, so a
//! config only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Portfolio"
//! assets_dir = "public"        # Media directory, relative to the content root
//!
//! [typewriter]
//! initial_delay_ms = 10000     # Bare name before the first phrase
//! type_interval_ms = 80        # Per typed character
//! erase_interval_ms = 40       # Per erased character
//! hold_full_ms = 10000
//! hold_empty_ms = 10000
//!
//! [reveal.panels]
//! threshold = 0.1              # Share of the panel that must be visible
//! bottom_margin = -50.0        # Pixels added to the viewport's bottom edge
//!
//! [reveal.skills]
//! threshold = 0.2
//! bottom_margin = 0.0
//!
//! [reveal.experience]
//! threshold = 0.1
//! bottom_margin = 0.0
//!
//! [accordion]
//! scroll_delay_ms = 100        # Wait before scrolling an opened panel into view
//!
//! [carousel]
//! transition_ms = 500          # Slide fade duration
//!
//! [theme]
//! max_width = "1600px"
//! content_width = "1040px"
//!
//! [theme.gutter]
//! size = "5vw"
//! min = "1.25rem"
//! max = "5rem"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111827"
//! text_muted = "#6b7280"
//! border = "#e5e7eb"
//! primary = "#6366f1"
//! accent = "#f59e0b"
//!
//! [colors.dark]
//! background = "#111827"
//! text = "#f9fafb"
//! text_muted = "#9ca3af"
//! border = "#374151"
//! primary = "#818cf8"
//! accent = "#fcd34d"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::page::PageSettings;
use crate::typewriter::TypewriterTiming;
use crate::visibility::RevealOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document `<title>`.
    pub site_title: String,
    /// Media directory, relative to the content root. Catalog media URLs
    /// resolve against it and it is copied verbatim into the output.
    pub assets_dir: String,
    pub typewriter: TypewriterTiming,
    pub reveal: RevealConfig,
    pub accordion: AccordionConfig,
    pub carousel: CarouselConfig,
    pub colors: ColorConfig,
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Portfolio".to_string(),
            assets_dir: "public".to_string(),
            typewriter: TypewriterTiming::default(),
            reveal: RevealConfig::default(),
            accordion: AccordionConfig::default(),
            carousel: CarouselConfig::default(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, options) in self.reveal.sections() {
            if !(0.0..=1.0).contains(&options.threshold) {
                return Err(ConfigError::Validation(format!(
                    "reveal.{name}.threshold must be between 0 and 1"
                )));
            }
        }
        if self.typewriter.type_interval_ms == 0 || self.typewriter.erase_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "typewriter intervals must be non-zero".into(),
            ));
        }
        if self.carousel.transition_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.transition_ms must be non-zero".into(),
            ));
        }
        if self.assets_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Session tunables for a page driven by this config.
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            panel_reveal: self.reveal.panels,
            skills_reveal: self.reveal.skills,
            experience_reveal: self.reveal.experience,
            scroll_delay: Duration::from_millis(self.accordion.scroll_delay_ms),
            typewriter: self.typewriter,
            observer_supported: true,
        }
    }
}

/// Reveal-on-scroll thresholds per region kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub panels: RevealOptions,
    pub skills: RevealOptions,
    pub experience: RevealOptions,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            panels: RevealOptions::new(0.1, -50.0),
            skills: RevealOptions::new(0.2, 0.0),
            experience: RevealOptions::new(0.1, 0.0),
        }
    }
}

impl RevealConfig {
    fn sections(&self) -> [(&'static str, &RevealOptions); 3] {
        [
            ("panels", &self.panels),
            ("skills", &self.skills),
            ("experience", &self.experience),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccordionConfig {
    /// Delay between opening a panel and scrolling it into view.
    pub scroll_delay_ms: u64,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            scroll_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Slide fade duration. The runtime reports a settle once it elapses.
    pub transition_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { transition_ms: 500 }
    }
}

/// A responsive CSS size expressed as `clamp(min, size, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    /// Preferred/fluid value, typically viewport-relative (e.g. `"5vw"`).
    pub size: String,
    pub min: String,
    pub max: String,
}

impl ClampSize {
    /// Render as a CSS `clamp()` expression.
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

/// Layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Outer wrapper width.
    pub max_width: String,
    /// Width of text blocks inside the wrapper.
    pub content_width: String,
    /// Horizontal padding of the wrapper.
    pub gutter: ClampSize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            max_width: "1600px".to_string(),
            content_width: "1040px".to_string(),
            gutter: ClampSize {
                size: "5vw".to_string(),
                min: "1.25rem".to_string(),
                max: "5rem".to_string(),
            },
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: taglines, periods, credits.
    pub text_muted: String,
    pub border: String,
    /// Headings, filled skill dots, links.
    pub primary: String,
    /// Hover color of links and controls.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
            text_muted: "#6b7280".to_string(),
            border: "#e5e7eb".to_string(),
            primary: "#6366f1".to_string(),
            accent: "#f59e0b".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111827".to_string(),
            text: "#f9fafb".to_string(),
            text_muted: "#9ca3af".to_string(),
            border: "#374151".to_string(),
            primary: "#818cf8".to_string(),
            accent: "#fcd34d".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Document title.
site_title = "Portfolio"

# Media directory, relative to the content root. Catalog URLs such as
# "/images/accor/1.jpg" resolve against it; it is copied into the output.
assets_dir = "public"

# ---------------------------------------------------------------------------
# Headline typewriter
# ---------------------------------------------------------------------------
[typewriter]
# Only the name shows for this long after the page loads.
initial_delay_ms = 10000
# Per character while typing a phrase.
type_interval_ms = 80
# Per character while erasing it.
erase_interval_ms = 40
# Pause with the whole phrase shown.
hold_full_ms = 10000
# Pause with only the name shown, before the next phrase.
hold_empty_ms = 10000

# ---------------------------------------------------------------------------
# Reveal on scroll
# ---------------------------------------------------------------------------
# threshold: share of the region (0.0-1.0) that must be visible.
# bottom_margin: pixels added to the viewport's bottom edge; negative values
# make regions wait until they are further up the screen.
[reveal.panels]
threshold = 0.1
bottom_margin = -50.0

[reveal.skills]
threshold = 0.2
bottom_margin = 0.0

[reveal.experience]
threshold = 0.1
bottom_margin = 0.0

# ---------------------------------------------------------------------------
# Client accordion
# ---------------------------------------------------------------------------
[accordion]
# Wait after opening a panel before scrolling it into view.
scroll_delay_ms = 100

# ---------------------------------------------------------------------------
# Galleries
# ---------------------------------------------------------------------------
[carousel]
# Fade duration between slides.
transition_ms = 500

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[theme]
max_width = "1600px"
content_width = "1040px"

# Horizontal page padding, as CSS clamp(min, size, max).
[theme.gutter]
size = "5vw"
min = "1.25rem"
max = "5rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111827"
text_muted = "#6b7280"    # Taglines, periods, credits
border = "#e5e7eb"
primary = "#6366f1"       # Headings, skill dots, links
accent = "#f59e0b"        # Hover

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111827"
text = "#f9fafb"
text_muted = "#9ca3af"
border = "#374151"
primary = "#818cf8"
accent = "#fcd34d"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-primary: {light_primary};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-primary: {dark_primary};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_primary = colors.light.primary,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_primary = colors.dark.primary,
        dark_accent = colors.dark.accent,
    )
}

/// Generate CSS custom properties from theme and carousel config.
pub fn generate_theme_css(theme: &ThemeConfig, carousel: &CarouselConfig) -> String {
    format!(
        r#":root {{
    --max-width: {max_width};
    --content-width: {content_width};
    --gutter: {gutter};
    --slide-transition: {transition}ms;
}}"#,
        max_width = theme.max_width,
        content_width = theme.content_width,
        gutter = theme.gutter.to_css(),
        transition = carousel.transition_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_page_timings() {
        let config = SiteConfig::default();
        assert_eq!(config.typewriter.initial_delay_ms, 10_000);
        assert_eq!(config.typewriter.type_interval_ms, 80);
        assert_eq!(config.typewriter.erase_interval_ms, 40);
        assert_eq!(config.accordion.scroll_delay_ms, 100);
        assert_eq!(config.carousel.transition_ms, 500);
        assert_eq!(config.reveal.panels.threshold, 0.1);
        assert_eq!(config.reveal.panels.bottom_margin, -50.0);
        assert_eq!(config.reveal.skills.threshold, 0.2);
    }

    #[test]
    fn page_settings_follow_config() {
        let mut config = SiteConfig::default();
        config.accordion.scroll_delay_ms = 250;
        config.reveal.skills.threshold = 0.5;
        let settings = config.page_settings();
        assert_eq!(settings.scroll_delay, Duration::from_millis(250));
        assert_eq!(settings.skills_reveal.threshold, 0.5);
        assert_eq!(settings.panel_reveal, config.reveal.panels);
        assert!(settings.observer_supported);
    }

    #[test]
    fn default_page_settings_agree_with_default_config() {
        assert_eq!(SiteConfig::default().page_settings(), PageSettings::default());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_merges_partial_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
site_title = "Jules Lye"

[reveal.panels]
threshold = 0.25

[colors.dark]
primary = "#a5b4fc"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site_title, "Jules Lye");
        assert_eq!(config.reveal.panels.threshold, 0.25);
        // Sibling key kept from the stock defaults, not the struct default
        assert_eq!(config.reveal.panels.bottom_margin, -50.0);
        assert_eq!(config.colors.dark.primary, "#a5b4fc");
        assert_eq!(config.colors.dark.accent, "#fcd34d");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn integer_values_are_accepted_for_floats() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[reveal.skills]\nthreshold = 1\nbottom_margin = -20\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.reveal.skills.threshold, 1.0);
        assert_eq!(config.reveal.skills.bottom_margin, -20.0);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"scroll_delay_ms = 100"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"scroll_delay_ms = 300"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("scroll_delay_ms").unwrap().as_integer(), Some(300));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("site_titel = \"typo\"").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let overlay: toml::Value = toml::from_str("[typewriter]\nspeed = 3\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_threshold_out_of_range() {
        let mut config = SiteConfig::default();
        config.reveal.experience.threshold = 1.5;
        match config.validate() {
            Err(ConfigError::Validation(msg)) => assert!(msg.contains("reveal.experience")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_threshold_boundaries_ok() {
        let mut config = SiteConfig::default();
        config.reveal.panels.threshold = 0.0;
        config.reveal.skills.threshold = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_intervals() {
        let mut config = SiteConfig::default();
        config.typewriter.erase_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = SiteConfig::default();
        config.carousel.transition_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[typewriter]\ntype_interval_ms = 0\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[typewriter]",
            "[reveal.panels]",
            "[reveal.skills]",
            "[reveal.experience]",
            "[accordion]",
            "[carousel]",
            "[theme]",
            "[theme.gutter]",
            "[colors.light]",
            "[colors.dark]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["typewriter", "reveal", "accordion", "carousel", "colors", "theme"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }

    // =========================================================================
    // CSS generation tests
    // =========================================================================

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.primary = "#123456".to_string();
        colors.dark.primary = "#abcdef".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-primary: #123456"));
        assert!(css.contains("--color-primary: #abcdef"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }

    #[test]
    fn generate_theme_css_includes_layout_variables() {
        let css = generate_theme_css(&ThemeConfig::default(), &CarouselConfig::default());
        assert!(css.contains("--max-width: 1600px"));
        assert!(css.contains("--content-width: 1040px"));
        assert!(css.contains("--gutter: clamp(1.25rem, 5vw, 5rem)"));
        assert!(css.contains("--slide-transition: 500ms"));
    }
}
