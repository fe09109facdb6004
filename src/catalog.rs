//! Media catalog: the page's content, loaded from `catalog.toml`.
//!
//! The catalog is the single source of everything the page shows: the
//! intro, skills, client case studies, the workplace record and the contact
//! block. It is read once, validated, and then treated as immutable. A
//! changed catalog replaces the old one wholesale (see
//! [`crate::page::PageSession::replace_catalog`]); nothing edits it in place.
//!
//! ## File layout
//!
//! ```toml
//! [intro]
//! name = "Jules Lye"
//! tagline = "Frontend Developer & Designer"
//! phrases = ["loves code and coffee."]
//! paragraphs = ["Hi, I'm Jules."]
//!
//! [[clients]]
//! id = "accor"
//! name = "Accor"
//! icon = "fa-suitcase"
//! description = "Digital creative for a global hotel brand."
//! website = "accor.com"                       # optional, no scheme
//! images = ["/images/accor/1.jpg"]
//! videos = [{ src = "/images/accor/2.mp4", poster = "/images/accor/2.jpg" }]
//!
//! [workplace]
//! id = "experience"
//! title = "Experience."
//! images = ["/images/studio/bedford.jpg"]
//! ```
//!
//! Ids must be unique across clients and the workplace record, since the
//! page indexes panels and sections by id.

use crate::accordion::PanelEntry;
use crate::media::{MediaItem, VideoRef, unify};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CATALOG_FILE: &str = "catalog.toml";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("duplicate id '{0}' in catalog")]
    DuplicateId(String),
    #[error("{0} has an empty id")]
    EmptyId(String),
    #[error("Catalog validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub intro: Intro,
    #[serde(default)]
    pub skills: SkillsSection,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub work: SectionHeading,
    #[serde(default)]
    pub clients: Vec<Client>,
    pub also_worked_with: Option<AlsoWorkedWith>,
    pub workplace: Workplace,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Intro {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    /// Words of the last paragraph's trailing link to the experience section.
    pub experience_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionHeading {
    pub title: String,
    pub subtitle: String,
}

impl Default for SectionHeading {
    fn default() -> Self {
        Self {
            title: "Selected Work.".to_string(),
            subtitle: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillsSection {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<Skill>,
}

impl Default for SkillsSection {
    fn default() -> Self {
        Self {
            title: "Skills & Expertise".to_string(),
            subtitle: String::new(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skill {
    pub name: String,
    pub icon: String,
    /// 0-100.
    pub level: u8,
    pub description: Option<String>,
}

/// Dots in a skill's level indicator.
pub const LEVEL_DOTS: usize = 10;

impl Skill {
    /// Filled state of each level dot: dot `i` is filled once the level
    /// reaches `(i + 1) * 10`.
    pub fn dots(&self) -> [bool; LEVEL_DOTS] {
        std::array::from_fn(|i| usize::from(self.level) >= (i + 1) * 10)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

/// One client case study.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// Symbolic icon key, resolved by [`crate::icons`].
    pub icon: String,
    /// Inline markdown.
    pub description: String,
    /// Host and path without scheme, e.g. `accor.com`.
    pub website: Option<String>,
    pub credit: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<VideoRef>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Client {
    /// The unified slide sequence: images first, then videos.
    pub fn media_items(&self) -> Vec<MediaItem> {
        unify(&self.images, &self.videos)
    }

    /// URLs warmed when the panel first scrolls into view: the first image
    /// and the first video's poster, when present.
    pub fn reveal_preload(&self) -> Vec<String> {
        self.images
            .first()
            .into_iter()
            .chain(self.videos.first().and_then(|v| v.poster.as_ref()))
            .cloned()
            .collect()
    }

    pub fn website_url(&self) -> Option<String> {
        self.website.as_deref().map(external_url)
    }

    pub fn panel_entry(&self, display_order: usize) -> PanelEntry {
        PanelEntry {
            id: self.id.clone(),
            display_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlsoWorkedWith {
    pub heading: String,
    pub names: String,
    pub closing: Option<String>,
}

/// The experience section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workplace {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// The first role is always shown. The rest sit behind the
    /// "View More Experience" disclosure together with the education.
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub education: Vec<Education>,
}

impl Workplace {
    pub fn media_items(&self) -> Vec<MediaItem> {
        unify(&self.images, &[])
    }

    pub fn reveal_preload(&self) -> Vec<String> {
        self.images.first().cloned().into_iter().collect()
    }

    pub fn lead_role(&self) -> Option<&Role> {
        self.roles.first()
    }

    pub fn earlier_roles(&self) -> &[Role] {
        self.roles.get(1..).unwrap_or_default()
    }

    /// Whether the disclosure has anything to reveal.
    pub fn has_more(&self) -> bool {
        self.roles.len() > 1 || !self.education.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Role {
    pub title: String,
    pub period: Option<String>,
    pub organisation: String,
    pub location: Option<String>,
    /// Scheme-less link shown after the location.
    pub website: Option<String>,
    /// Markdown paragraphs.
    #[serde(default)]
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub title: String,
    pub period: Option<String>,
    pub institution: String,
    /// Inline markdown.
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Contact {
    pub heading: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub location: Vec<String>,
    pub availability: Option<String>,
}

impl Contact {
    /// `tel:` target with spaces, parentheses and the trunk `(0)` removed.
    pub fn phone_href(&self) -> Option<String> {
        self.phone.as_deref().map(|phone| {
            let digits: String = phone
                .replace("(0)", "")
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            format!("tel:{digits}")
        })
    }
}

/// Prefix `https://` unless the link already carries a scheme.
pub fn external_url(link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

impl Catalog {
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load `catalog.toml` from the content directory.
    pub fn load(root: &Path) -> Result<Self, CatalogError> {
        let source = fs::read_to_string(root.join(CATALOG_FILE))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for (i, client) in self.clients.iter().enumerate() {
            if client.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(format!("client #{}", i + 1)));
            }
            if !seen.insert(client.id.as_str()) {
                return Err(CatalogError::DuplicateId(client.id.clone()));
            }
        }
        if self.workplace.id.trim().is_empty() {
            return Err(CatalogError::EmptyId("workplace".into()));
        }
        if !seen.insert(self.workplace.id.as_str()) {
            return Err(CatalogError::DuplicateId(self.workplace.id.clone()));
        }
        if let Some(skill) = self.skills.items.iter().find(|s| s.level > 100) {
            return Err(CatalogError::Validation(format!(
                "skill '{}' level must be 0-100",
                skill.name
            )));
        }
        if self.intro.name.trim().is_empty() {
            return Err(CatalogError::Validation("intro.name must not be empty".into()));
        }
        Ok(())
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Accordion panels in display order.
    pub fn panel_entries(&self) -> Vec<PanelEntry> {
        self.clients
            .iter()
            .enumerate()
            .map(|(i, c)| c.panel_entry(i))
            .collect()
    }

    /// Every local media URL the page references, deduplicated, in page order.
    pub fn media_urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.clients
            .iter()
            .flat_map(|c| {
                c.images.iter().chain(
                    c.videos
                        .iter()
                        .flat_map(|v| std::iter::once(&v.src).chain(v.poster.as_ref())),
                )
            })
            .chain(self.workplace.images.iter())
            .filter(|url| seen.insert(url.as_str()))
            .cloned()
            .collect()
    }

    /// Icon keys with no glyph, for the `check` command.
    pub fn unknown_icons(&self) -> Vec<&str> {
        self.clients
            .iter()
            .map(|c| c.icon.as_str())
            .chain(self.skills.items.iter().map(|s| s.icon.as_str()))
            .filter(|key| !crate::icons::is_known(key))
            .collect()
    }
}

/// Starter `catalog.toml` printed by `gen-catalog`.
pub fn stock_catalog_toml() -> &'static str {
    include_str!("../static/catalog.toml")
}
