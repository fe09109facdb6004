//! HTML site generation.
//!
//! Reads the content directory, renders the single portfolio page and copies
//! the asset directory next to it.
//!
//! ## Generated Page
//!
//! One document, top to bottom:
//!
//! - **Intro**: name with the typewriter headline, tagline, paragraphs and
//!   the jump link to the experience section
//! - **Skills**: cards with ten level dots each, followed by the stat cards
//! - **Work**: one accordion panel per client, each holding a gallery
//! - **Experience**: lead role, a disclosure with earlier roles, education
//!   and the workplace gallery
//! - **Contact**
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html              # The page
//! ├── .folio-stamp.json       # Incremental build stamp
//! └── images/                 # Asset directory, copied verbatim
//!     ├── accor/1.jpg
//!     └── ...
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into the page:
//! - `static/style.css`: Base styles (colors and theme injected from config)
//! - `static/folio.js`: Runtime driving reveal, accordion, galleries and the
//!   typewriter in the browser. It reads its tunables from a JSON island
//!   (`#folio-settings`) rendered from the config.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Catalog
//! prose fields are markdown, rendered with pulldown-cmark.

use crate::accordion::{Accordion, AccordionError, PanelView};
use crate::carousel::GalleryState;
use crate::catalog::{
    self, AlsoWorkedWith, CATALOG_FILE, Catalog, CatalogError, Client, Contact, Education,
    Intro, Role, SkillsSection, Stat, Workplace,
};
use crate::config::{self, CONFIG_FILE, ConfigError, RevealConfig, SiteConfig};
use crate::icons;
use crate::media::{MediaItem, MediaKind};
use crate::preload::{AssetProbe, Preloader};
use crate::stamp::{self, BuildStamp};
use crate::typewriter::{Typewriter, TypewriterTiming};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Accordion(#[from] AccordionError),
    #[error("cannot walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/folio.js");

/// Element id of the JSON settings island read by the runtime.
pub const SETTINGS_ID: &str = "folio-settings";

// ============================================================================
// Content loading
// ============================================================================

/// Everything a build reads from the content directory.
#[derive(Debug)]
pub struct Content {
    pub config: SiteConfig,
    pub catalog: Catalog,
    pub assets_root: PathBuf,
    catalog_source: String,
    config_source: String,
}

impl Content {
    pub fn load(source: &Path) -> Result<Self, GenerateError> {
        let config = config::load_config(source)?;
        let catalog_source =
            fs::read_to_string(source.join(CATALOG_FILE)).map_err(CatalogError::from)?;
        let catalog = Catalog::from_toml_str(&catalog_source)?;
        let config_source = match fs::read_to_string(source.join(CONFIG_FILE)) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let assets_root = source.join(&config.assets_dir);
        Ok(Self {
            config,
            catalog,
            assets_root,
            catalog_source,
            config_source,
        })
    }

    /// Probe every media URL the catalog references. Returns the probe and
    /// the URLs that are missing or unreadable.
    pub fn probe_media(&self) -> (AssetProbe, Vec<String>) {
        let mut preloader = Preloader::new(AssetProbe::new(&self.assets_root));
        preloader.warm_all(&self.catalog.media_urls());
        let missing = preloader.failures().map(String::from).collect();
        (preloader.into_warmer(), missing)
    }

    /// Hash over every input of `index.html`. Probed image dimensions are
    /// part of it since they end up in the markup.
    fn page_hash(&self, probe: &AssetProbe) -> String {
        let dimensions: String = self
            .catalog
            .media_urls()
            .iter()
            .filter_map(|url| probe.dimensions(url).map(|(w, h)| format!("{url}={w}x{h}\n")))
            .collect();
        stamp::hash_parts(&[
            ("catalog", self.catalog_source.as_bytes()),
            ("config", self.config_source.as_bytes()),
            ("style", CSS_STATIC.as_bytes()),
            ("runtime", JS.as_bytes()),
            ("dimensions", dimensions.as_bytes()),
            ("version", env!("CARGO_PKG_VERSION").as_bytes()),
        ])
    }
}

// ============================================================================
// Build
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Rendered,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub page: PageStatus,
    pub assets_copied: usize,
    pub assets_unchanged: usize,
    pub missing_media: Vec<String>,
}

/// Build the site from `source` into `output`.
///
/// With `use_cache`, the page is only re-rendered and assets only re-copied
/// when their inputs changed since the last build.
pub fn build(source: &Path, output: &Path, use_cache: bool) -> Result<BuildReport, GenerateError> {
    let content = Content::load(source)?;
    let (probe, missing_media) = content.probe_media();
    for url in &missing_media {
        log::warn!("media not found or unreadable: {url}");
    }

    fs::create_dir_all(output)?;
    let mut stamp = if use_cache {
        BuildStamp::load(output)
    } else {
        BuildStamp::empty()
    };

    let page_hash = content.page_hash(&probe);
    let page = if stamp.page_is_fresh(&page_hash, output) {
        PageStatus::Unchanged
    } else {
        let markup = render_page(&content.catalog, &content.config, &probe)?;
        fs::write(output.join("index.html"), markup.into_string())?;
        stamp.record_page(page_hash);
        PageStatus::Rendered
    };

    let (assets_copied, assets_unchanged) = copy_assets(&content.assets_root, output, &mut stamp)?;
    stamp.save(output)?;

    Ok(BuildReport {
        output: output.to_path_buf(),
        page,
        assets_copied,
        assets_unchanged,
        missing_media,
    })
}

/// Copy the asset directory into `output`, skipping files the stamp says are
/// already there. Returns `(copied, unchanged)`.
fn copy_assets(
    assets_root: &Path,
    output: &Path,
    stamp: &mut BuildStamp,
) -> Result<(usize, usize), GenerateError> {
    if !assets_root.is_dir() {
        log::warn!("asset directory {} does not exist", assets_root.display());
        stamp.retain_assets(|_| false);
        return Ok((0, 0));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(assets_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(assets_root) {
            let rel = rel.to_string_lossy().replace('\\', "/");
            files.push((rel, entry.into_path()));
        }
    }

    let previous: &BuildStamp = stamp;
    let results: Vec<io::Result<(String, String, bool)>> = files
        .par_iter()
        .map(|(rel, path)| {
            let hash = stamp::hash_file(path)?;
            let dest = output.join(rel);
            if previous.asset_is_fresh(rel, &hash, &dest) {
                return Ok((rel.clone(), hash, false));
            }
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            Ok((rel.clone(), hash, true))
        })
        .collect();

    let mut copied = 0;
    let mut unchanged = 0;
    let mut present = HashSet::new();
    for result in results {
        let (rel, hash, was_copied) = result?;
        if was_copied {
            copied += 1;
        } else {
            unchanged += 1;
        }
        present.insert(rel.clone());
        stamp.record_asset(rel, hash);
    }
    stamp.retain_assets(|path| present.contains(path));
    Ok((copied, unchanged))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

// ============================================================================
// Check
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub clients: usize,
    /// Slides across every client gallery and the workplace gallery.
    pub slides: usize,
    pub media_urls: usize,
    pub missing_media: Vec<String>,
    pub unknown_icons: Vec<String>,
}

/// Load and validate the content directory without writing anything.
pub fn check(source: &Path) -> Result<CheckReport, GenerateError> {
    let content = Content::load(source)?;
    let (_, missing_media) = content.probe_media();
    let catalog = &content.catalog;
    let slides = catalog
        .clients
        .iter()
        .map(|c| c.media_items().len())
        .sum::<usize>()
        + catalog.workplace.media_items().len();

    Ok(CheckReport {
        clients: catalog.clients.len(),
        slides,
        media_urls: catalog.media_urls().len(),
        missing_media,
        unknown_icons: catalog
            .unknown_icons()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

// ============================================================================
// Runtime settings
// ============================================================================

/// Tunables handed to the browser runtime.
#[derive(Debug, Serialize)]
struct RuntimeSettings<'a> {
    name: &'a str,
    phrases: &'a [String],
    typewriter: TypewriterTiming,
    reveal: RevealConfig,
    scroll_delay_ms: u64,
    transition_ms: u64,
    workplace_id: &'a str,
}

/// JSON for the settings island, safe to embed in a `<script>` element.
fn settings_json(catalog: &Catalog, config: &SiteConfig) -> Result<String, GenerateError> {
    let settings = RuntimeSettings {
        name: &catalog.intro.name,
        phrases: &catalog.intro.phrases,
        typewriter: config.typewriter,
        reveal: config.reveal,
        scroll_delay_ms: config.accordion.scroll_delay_ms,
        transition_ms: config.carousel.transition_ms,
        workplace_id: &catalog.workplace.id,
    };
    Ok(serde_json::to_string(&settings)?.replace("</", "<\\/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Block markdown to HTML.
fn render_markdown(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Markdown for a single line of prose, without the wrapping `<p>`.
fn render_inline(source: &str) -> String {
    let block = render_markdown(source);
    let trimmed = block.trim_end();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => block,
    }
}

fn icon(key: &str) -> Markup {
    html! {
        span.icon aria-hidden="true" { (icons::resolve(key)) }
    }
}

/// `panel reveal` plus one class per category, lowercased and hyphenated.
fn panel_classes(client: &Client) -> String {
    let mut classes = String::from("panel reveal");
    for category in &client.categories {
        let slug: String = category
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        if !slug.is_empty() {
            classes.push(' ');
            classes.push_str(&slug);
        }
    }
    classes
}

fn render_gallery(key: &str, label: &str, items: &[MediaItem], probe: &AssetProbe) -> Markup {
    let state = GalleryState::new(items.to_vec());
    html! {
        div.gallery.is-empty[state.is_empty()] data-gallery=(key) data-count=(state.len()) {
            @if !state.is_empty() {
                div.slides {
                    @for item in state.items() {
                        @let active = item.sequence_index == state.active_index();
                        figure.slide.is-active[active].is-loading[!item.is_video()]
                            data-index=(item.sequence_index) {
                            @match item.kind {
                                MediaKind::Image => {
                                    @let dims = probe.dimensions(&item.source_url);
                                    img src=(item.source_url)
                                        alt={ (label) " " (item.sequence_index + 1) }
                                        width=[dims.map(|d| d.0)]
                                        height=[dims.map(|d| d.1)]
                                        loading=(if active { "eager" } else { "lazy" });
                                }
                                MediaKind::Video => {
                                    video src=(item.source_url)
                                        poster=[item.poster_url.as_deref()]
                                        muted playsinline preload="none" {}
                                }
                            }
                        }
                    }
                }
            }
            div.gallery-controls {
                @if state.len() > 1 {
                    button.slide-prev type="button" aria-label="Previous slide" { "‹" }
                }
                span.counter aria-live="polite" { (state.counter_label()) }
                @if state.len() > 1 {
                    button.slide-next type="button" aria-label="Next slide" { "›" }
                }
            }
        }
    }
}

// ============================================================================
// Page Sections
// ============================================================================

fn render_intro(intro: &Intro, headline: &str, workplace_id: &str) -> Markup {
    let jump = html! {
        @if let Some(text) = &intro.experience_link {
            a.jump href={ "#" (workplace_id) } data-jump=(workplace_id) { (text) }
        }
    };
    let last = intro.paragraphs.len().saturating_sub(1);

    html! {
        header.intro {
            h1.headline {
                span.headline-text { (headline) }
                span.cursor aria-hidden="true" { "|" }
            }
            @if !intro.tagline.is_empty() {
                p.tagline { (intro.tagline) }
            }
            @for (i, paragraph) in intro.paragraphs.iter().enumerate() {
                p {
                    (PreEscaped(render_inline(paragraph)))
                    @if i == last && intro.experience_link.is_some() {
                        " " (jump)
                    }
                }
            }
            @if intro.paragraphs.is_empty() && intro.experience_link.is_some() {
                p { (jump) }
            }
        }
    }
}

fn render_skills(skills: &SkillsSection, stats: &[Stat]) -> Markup {
    html! {
        section.skills.reveal id="skills" data-reveal="skills" {
            h2 { (skills.title) }
            @if !skills.subtitle.is_empty() {
                p.subtitle { (skills.subtitle) }
            }
            div.skill-grid {
                @for (i, skill) in skills.items.iter().enumerate() {
                    div.skill-card style={ "transition-delay: " (i * 100) "ms" } {
                        div.skill-head {
                            (icon(&skill.icon))
                            h3 { (skill.name) }
                        }
                        @if let Some(description) = &skill.description {
                            p.skill-description { (description) }
                        }
                        div.level role="img" aria-label={ (skill.level) "%" } {
                            @for filled in skill.dots() {
                                span.dot.filled[filled] {}
                            }
                        }
                    }
                }
            }
            @if !stats.is_empty() {
                div.stats {
                    @for stat in stats {
                        div.stat-card {
                            span.stat-value { (stat.value) }
                            span.stat-label { (stat.label) }
                        }
                    }
                }
            }
        }
    }
}

fn render_panel(client: &Client, index: usize, view: PanelView, probe: &AssetProbe) -> Markup {
    let body_id = format!("{}-body", client.id);
    html! {
        article class=(panel_classes(client)) id=(client.id)
            data-panel=(client.id) data-reveal="panel"
            data-preload=(client.reveal_preload().join(" "))
            style={ "animation-delay: " (index * 100) "ms" } {
            div.panel-header {
                button.panel-toggle type="button"
                    aria-expanded=(if view.open { "true" } else { "false" })
                    aria-controls=(body_id) {
                    (icon(&client.icon))
                    span.panel-title { (client.name) }
                }
                div.panel-nav {
                    @if view.has_prev {
                        button.panel-prev type="button" aria-label="Previous client" { "↑" }
                    }
                    @if view.has_next {
                        button.panel-next type="button" aria-label="Next client" { "↓" }
                    }
                    button.panel-close type="button" aria-label="Close" { "×" }
                }
            }
            div.panel-body id=(body_id) hidden[!view.open] {
                div.panel-text {
                    div.description { (PreEscaped(render_markdown(&client.description))) }
                    @if let (Some(url), Some(label)) = (client.website_url(), client.website.as_deref()) {
                        a.website href=(url) target="_blank" rel="noopener" { (label) }
                    }
                    @if let Some(credit) = &client.credit {
                        p.credit { (credit) }
                    }
                }
                (render_gallery(&client.id, &client.name, &client.media_items(), probe))
            }
        }
    }
}

fn render_also(also: &AlsoWorkedWith) -> Markup {
    html! {
        aside.also-worked-with {
            h3 { (also.heading) }
            p.names { (also.names) }
            @if let Some(closing) = &also.closing {
                p.closing { (PreEscaped(render_inline(closing))) }
            }
        }
    }
}

fn render_work(catalog: &Catalog, accordion: &Accordion, probe: &AssetProbe) -> Markup {
    html! {
        section.work id="work" {
            h2 { (catalog.work.title) }
            @if !catalog.work.subtitle.is_empty() {
                p.subtitle { (catalog.work.subtitle) }
            }
            div.panels {
                @for (i, client) in catalog.clients.iter().enumerate() {
                    @if let Some(view) = accordion.view(&client.id) {
                        (render_panel(client, i, view, probe))
                    }
                }
            }
            @if let Some(also) = &catalog.also_worked_with {
                (render_also(also))
            }
        }
    }
}

fn render_role(role: &Role) -> Markup {
    html! {
        article.role {
            h3 { (role.title) }
            p.role-meta {
                span.organisation { (role.organisation) }
                @if let Some(period) = &role.period {
                    " · " span.period { (period) }
                }
                @if let Some(location) = &role.location {
                    " · " span.location { (location) }
                }
                @if let Some(site) = &role.website {
                    " · " a href=(catalog::external_url(site)) target="_blank" rel="noopener" { (site) }
                }
            }
            @for paragraph in &role.body {
                (PreEscaped(render_markdown(paragraph)))
            }
        }
    }
}

fn render_education(education: &Education) -> Markup {
    html! {
        div.education-entry {
            h4 { (education.title) }
            p.role-meta {
                span.organisation { (education.institution) }
                @if let Some(period) = &education.period {
                    " · " span.period { (period) }
                }
            }
            @if let Some(note) = &education.note {
                p.note { (PreEscaped(render_inline(note))) }
            }
        }
    }
}

fn render_experience(workplace: &Workplace, probe: &AssetProbe) -> Markup {
    let more_id = format!("{}-more", workplace.id);
    let discloses = workplace.has_more() || !workplace.images.is_empty();
    html! {
        section.experience.reveal id=(workplace.id) data-reveal="experience"
            data-preload=(workplace.reveal_preload().join(" ")) {
            h2 { (workplace.title) }
            @if !workplace.subtitle.is_empty() {
                p.subtitle { (workplace.subtitle) }
            }
            @if let Some(role) = workplace.lead_role() {
                (render_role(role))
            }
            @if discloses {
                div.more-experience id=(more_id) hidden {
                    @if !workplace.images.is_empty() {
                        (render_gallery("workplace", &workplace.title, &workplace.media_items(), probe))
                    }
                    @for role in workplace.earlier_roles() {
                        (render_role(role))
                    }
                    @if !workplace.education.is_empty() {
                        div.education {
                            h3 { "Education" }
                            @for entry in &workplace.education {
                                (render_education(entry))
                            }
                        }
                    }
                }
                button.disclosure type="button" aria-expanded="false" aria-controls=(more_id)
                    data-more="View More Experience" data-less="View Less" {
                    "View More Experience"
                }
            }
        }
    }
}

fn render_contact(contact: &Contact) -> Markup {
    html! {
        footer.contact id="contact" {
            h2 { (contact.heading.as_deref().unwrap_or("Contact")) }
            ul.contact-links {
                @if let (Some(phone), Some(href)) = (contact.phone.as_deref(), contact.phone_href()) {
                    li { a href=(href) { (phone) } }
                }
                @if let Some(email) = &contact.email {
                    li { a href={ "mailto:" (email) } { (email) } }
                }
                @if let Some(site) = &contact.website {
                    li { a href=(catalog::external_url(site)) target="_blank" rel="noopener" { (site) } }
                }
                @if let Some(linkedin) = &contact.linkedin {
                    li { a href=(catalog::external_url(linkedin)) target="_blank" rel="noopener" { "LinkedIn" } }
                }
            }
            @if !contact.location.is_empty() {
                address {
                    @for (i, line) in contact.location.iter().enumerate() {
                        @if i > 0 { br; }
                        (line)
                    }
                }
            }
            @if let Some(availability) = &contact.availability {
                p.availability { (availability) }
            }
        }
    }
}

// ============================================================================
// Page Renderer
// ============================================================================

/// Render the whole page.
///
/// The markup is the page's initial state: headline showing only the name,
/// every panel collapsed, every gallery on its first slide and the
/// experience disclosure closed.
pub fn render_page(
    catalog: &Catalog,
    config: &SiteConfig,
    probe: &AssetProbe,
) -> Result<Markup, GenerateError> {
    let accordion = Accordion::new(
        catalog.panel_entries(),
        Duration::from_millis(config.accordion.scroll_delay_ms),
    )?;
    let headline = Typewriter::new(
        catalog.intro.name.clone(),
        catalog.intro.phrases.clone(),
        config.typewriter,
    );
    let settings = settings_json(catalog, config)?;
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme, &config.carousel),
        CSS_STATIC
    );

    let content = html! {
        (render_intro(&catalog.intro, headline.text(), &catalog.workplace.id))
        main {
            @if !catalog.skills.items.is_empty() || !catalog.stats.is_empty() {
                (render_skills(&catalog.skills, &catalog.stats))
            }
            (render_work(catalog, &accordion, probe))
            (render_experience(&catalog.workplace, probe))
        }
        (render_contact(&catalog.contact))
        script type="application/json" id=(SETTINGS_ID) { (PreEscaped(settings)) }
        script { (PreEscaped(JS)) }
    };

    Ok(base_document(&config.site_title, &css, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn empty_probe() -> (TempDir, AssetProbe) {
        let tmp = TempDir::new().unwrap();
        let probe = AssetProbe::new(tmp.path());
        (tmp, probe)
    }

    fn render_minimal() -> String {
        let (_tmp, probe) = empty_probe();
        render_page(&minimal_catalog(), &SiteConfig::default(), &probe)
            .unwrap()
            .into_string()
    }

    /// Everything from the first occurrence of `marker` on.
    fn section_of<'a>(html: &'a str, marker: &str) -> &'a str {
        let start = html.find(marker).unwrap();
        &html[start..]
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn base_document_includes_doctype() {
        let doc = base_document("Test", "body {}", html! { p { "hi" } });
        let html = doc.into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test</title>"));
    }

    #[test]
    fn base_document_does_not_escape_css() {
        let doc = base_document("Test", ".a > .b { color: red }", html! {});
        assert!(doc.into_string().contains(".a > .b"));
    }

    #[test]
    fn inline_markdown_drops_paragraph_wrapper() {
        assert_eq!(render_inline("plain **bold**"), "plain <strong>bold</strong>");
    }

    #[test]
    fn inline_markdown_keeps_multiple_paragraphs() {
        let out = render_inline("one\n\ntwo");
        assert!(out.contains("<p>one</p>"));
        assert!(out.contains("<p>two</p>"));
    }

    #[test]
    fn panel_classes_include_slugged_categories() {
        let catalog = minimal_catalog();
        let alpha = catalog.client("alpha").unwrap();
        assert_eq!(panel_classes(alpha), "panel reveal hospitality web");
    }

    #[test]
    fn gallery_counter_starts_at_first_slide() {
        let (_tmp, probe) = empty_probe();
        let catalog = minimal_catalog();
        let alpha = catalog.client("alpha").unwrap();
        let html = render_gallery("alpha", "Alpha", &alpha.media_items(), &probe).into_string();
        assert!(html.contains("1 / 3"));
        assert_eq!(html.matches("class=\"slide is-active").count(), 1);
        assert!(html.contains("poster=\"/images/alpha/reel.jpg\""));
        assert!(html.contains("muted"));
    }

    #[test]
    fn empty_gallery_shows_zero_counter_without_controls() {
        let (_tmp, probe) = empty_probe();
        let html = render_gallery("gamma", "Gamma", &[], &probe).into_string();
        assert!(html.contains("0 / 0"));
        assert!(html.contains("is-empty"));
        assert!(!html.contains("slide-next"));
        assert!(!html.contains("slide-prev"));
    }

    #[test]
    fn gallery_writes_probed_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("images/alpha/1.jpg");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbImage::new(40, 30).save(&path).unwrap();

        let mut probe = Preloader::new(AssetProbe::new(tmp.path()));
        probe.warm("/images/alpha/1.jpg");
        let probe = probe.into_warmer();

        let catalog = minimal_catalog();
        let alpha = catalog.client("alpha").unwrap();
        let html = render_gallery("alpha", "Alpha", &alpha.media_items(), &probe).into_string();
        assert!(html.contains("width=\"40\""));
        assert!(html.contains("height=\"30\""));
    }

    // =========================================================================
    // Page sections
    // =========================================================================

    #[test]
    fn headline_starts_with_name_only() {
        let html = render_minimal();
        assert!(html.contains("<span class=\"headline-text\">Test Person</span>"));
    }

    #[test]
    fn experience_link_closes_last_paragraph() {
        let html = render_minimal();
        assert!(html.contains("Hello there. <a class=\"jump\" href=\"#experience\""));
        assert!(html.contains("data-jump=\"experience\""));
    }

    #[test]
    fn skill_dots_follow_level() {
        let catalog = minimal_catalog();
        let html = render_skills(&catalog.skills, &catalog.stats).into_string();
        let code = section_of(&html, "Code");
        let code = &code[..code.find("Mystery").unwrap()];
        assert_eq!(code.matches("class=\"dot filled\"").count(), 9);
        assert_eq!(code.matches("class=\"dot\"").count(), 1);
        assert!(html.contains("transition-delay: 100ms"));
        assert!(html.contains("12+"));
    }

    #[test]
    fn unknown_icon_renders_fallback_glyph() {
        let html = render_minimal();
        let gamma = section_of(&html, "id=\"gamma\"");
        assert!(gamma.contains(icons::MISSING));
    }

    #[test]
    fn panels_stagger_and_hide_controls_at_boundaries() {
        let html = render_minimal();
        assert!(html.contains("animation-delay: 0ms"));
        assert!(html.contains("animation-delay: 200ms"));
        // alpha has no prev, gamma has no next
        assert_eq!(html.matches("class=\"panel-prev\"").count(), 2);
        assert_eq!(html.matches("class=\"panel-next\"").count(), 2);
        let alpha = section_of(&html, "id=\"alpha\"");
        let alpha = &alpha[..alpha.find("id=\"beta\"").unwrap()];
        assert!(!alpha.contains("panel-prev"));
        assert!(alpha.contains("panel-next"));
    }

    #[test]
    fn panels_start_collapsed() {
        let html = render_minimal();
        assert_eq!(html.matches("aria-expanded=\"true\"").count(), 0);
        assert!(html.contains("id=\"alpha-body\" hidden"));
    }

    #[test]
    fn panel_renders_client_extras() {
        let html = render_minimal();
        assert!(html.contains("href=\"https://alpha.example\""));
        assert!(html.contains("<strong>Alpha</strong>"));
        assert!(html.contains("Photography: Someone."));
        assert!(html.contains("data-preload=\"/images/alpha/1.jpg /images/alpha/reel.jpg\""));
    }

    #[test]
    fn experience_hides_earlier_roles_behind_disclosure() {
        let html = render_minimal();
        let experience = section_of(&html, "class=\"experience reveal\"");
        let lead = experience.find("Lead Developer").unwrap();
        let more = experience.find("class=\"more-experience\"").unwrap();
        let tutor = experience.find("Tutor").unwrap();
        assert!(lead < more && more < tutor);
        assert!(experience.contains("View More Experience"));
        assert!(experience.contains("data-less=\"View Less\""));
        assert!(experience.contains("data-gallery=\"workplace\""));
        assert!(experience.contains("Diploma"));
    }

    #[test]
    fn contact_omits_absent_fields() {
        let html = render_contact(&Contact::default()).into_string();
        assert!(html.contains("Contact"));
        assert!(!html.contains("mailto:"));
        assert!(!html.contains("tel:"));
        assert!(!html.contains("<address>"));
    }

    #[test]
    fn contact_renders_phone_link() {
        let contact = Contact {
            phone: Some("+61 (0) 400 000 000".into()),
            email: Some("me@example.com".into()),
            location: vec!["Melbourne".into(), "Australia".into()],
            ..Contact::default()
        };
        let html = render_contact(&contact).into_string();
        assert!(html.contains("href=\"tel:+61400000000\""));
        assert!(html.contains("href=\"mailto:me@example.com\""));
        assert!(html.contains("Melbourne<br>Australia"));
    }

    #[test]
    fn settings_island_carries_timings() {
        let html = render_minimal();
        let start = html.find("id=\"folio-settings\">").unwrap();
        let json = &html[start + "id=\"folio-settings\">".len()..];
        let json = &json[..json.find("</script>").unwrap()];
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["scroll_delay_ms"], 100);
        assert_eq!(value["transition_ms"], 500);
        assert_eq!(value["typewriter"]["type_interval_ms"], 80);
        assert_eq!(value["reveal"]["panels"]["bottom_margin"], -50.0);
        assert_eq!(value["workplace_id"], "experience");
        assert_eq!(value["phrases"][1], "bb");
    }

    #[test]
    fn settings_island_cannot_close_script() {
        let mut catalog = minimal_catalog();
        catalog.intro.phrases = vec!["</script><b>".into()];
        let json = settings_json(&catalog, &SiteConfig::default()).unwrap();
        assert!(!json.contains("</script>"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phrases"][0], "</script><b>");
    }

    #[test]
    fn html_escape_in_maud() {
        let mut catalog = minimal_catalog();
        catalog.clients[0].name = "<script>alert('x')</script>".into();
        let (_tmp, probe) = empty_probe();
        let html = render_page(&catalog, &SiteConfig::default(), &probe)
            .unwrap()
            .into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn page_inlines_theme_css() {
        let html = render_minimal();
        assert!(html.contains("--color-bg: #ffffff"));
        assert!(html.contains("--slide-transition: 500ms"));
    }

    // =========================================================================
    // Build and check
    // =========================================================================

    #[test]
    fn build_writes_page_and_assets() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let report = build(content.path(), out.path(), true).unwrap();

        assert_eq!(report.page, PageStatus::Rendered);
        assert!(report.assets_copied > 0);
        assert!(report.missing_media.is_empty());
        let html = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(html.contains("id=\"studio-a\""));
        assert!(out.path().join("images/studio-a/1.png").is_file());
    }

    #[test]
    fn unchanged_rebuild_touches_nothing() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let first = build(content.path(), out.path(), true).unwrap();
        let second = build(content.path(), out.path(), true).unwrap();

        assert_eq!(second.page, PageStatus::Unchanged);
        assert_eq!(second.assets_copied, 0);
        assert_eq!(second.assets_unchanged, first.assets_copied);
    }

    #[test]
    fn no_cache_rebuilds_everything() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let first = build(content.path(), out.path(), true).unwrap();
        let second = build(content.path(), out.path(), false).unwrap();

        assert_eq!(second.page, PageStatus::Rendered);
        assert_eq!(second.assets_copied, first.assets_copied);
    }

    #[test]
    fn catalog_edit_rerenders_page() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        build(content.path(), out.path(), true).unwrap();

        let path = content.path().join(CATALOG_FILE);
        let edited = fs::read_to_string(&path)
            .unwrap()
            .replace("Studio A", "Studio Alpha");
        fs::write(&path, edited).unwrap();

        let report = build(content.path(), out.path(), true).unwrap();
        assert_eq!(report.page, PageStatus::Rendered);
        assert_eq!(report.assets_copied, 0);
        let html = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(html.contains("Studio Alpha"));
    }

    #[test]
    fn deleted_output_page_is_rerendered() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        build(content.path(), out.path(), true).unwrap();
        fs::remove_file(out.path().join("index.html")).unwrap();

        let report = build(content.path(), out.path(), true).unwrap();
        assert_eq!(report.page, PageStatus::Rendered);
    }

    #[test]
    fn build_reports_missing_media() {
        let content = setup_fixtures();
        fs::remove_file(content.path().join("public/images/studio-a/1.png")).unwrap();
        let out = TempDir::new().unwrap();
        let report = build(content.path(), out.path(), true).unwrap();
        assert_eq!(report.missing_media, vec!["/images/studio-a/1.png".to_string()]);
        assert!(out.path().join("index.html").is_file());
    }

    #[test]
    fn build_fails_on_invalid_catalog() {
        let content = setup_fixtures();
        fs::write(content.path().join(CATALOG_FILE), "[intro]\nname = \"x\"\nbogus = 1\n").unwrap();
        let out = TempDir::new().unwrap();
        let err = build(content.path(), out.path(), true).unwrap_err();
        assert!(matches!(err, GenerateError::Catalog(_)));
    }

    #[test]
    fn build_fails_on_missing_catalog() {
        let content = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let err = build(content.path(), out.path(), true).unwrap_err();
        assert!(matches!(err, GenerateError::Catalog(CatalogError::Io(_))));
    }

    #[test]
    fn hidden_asset_files_are_skipped() {
        let content = setup_fixtures();
        fs::write(content.path().join("public/.DS_Store"), b"junk").unwrap();
        let out = TempDir::new().unwrap();
        build(content.path(), out.path(), true).unwrap();
        assert!(!out.path().join(".DS_Store").exists());
    }

    #[test]
    fn check_counts_fixture_content() {
        let content = setup_fixtures();
        let report = check(content.path()).unwrap();
        assert_eq!(report.clients, 2);
        assert!(report.slides >= 3);
        assert!(report.missing_media.is_empty());
        assert!(report.unknown_icons.is_empty());
    }
}
