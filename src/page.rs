//! One page session: every component wired together.
//!
//! [`PageSession`] owns the whole interactive state of a loaded page and is
//! the only thing a host talks to:
//!
//! - the [`Accordion`] over the catalog's clients,
//! - the single live [`Carousel`] belonging to the open panel (collapsing or
//!   switching panels tears the old gallery down, which halts its videos),
//! - one [`VisibilityDetector`] per panel plus the skills and experience
//!   sections,
//! - the experience [`Disclosure`] and the workplace gallery it mounts,
//! - the [`Typewriter`] headline,
//! - one [`Preloader`] shared by all of them.
//!
//! Host callbacks that arrive for a gallery which is no longer live (a slide
//! settling after its panel collapsed, say) are ignored.

use crate::accordion::{Accordion, AccordionError, Disclosure, PanelView, ScrollRequest, Toggle};
use crate::carousel::{Carousel, SettleOutcome, VideoElement};
use crate::catalog::{Catalog, CatalogError};
use crate::preload::{CacheWarmer, Preloader};
use crate::typewriter::{Frame, Typewriter, TypewriterTiming};
use crate::visibility::{Rect, RevealOptions, VisibilityDetector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Accordion(#[from] AccordionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("page session has been torn down")]
    TornDown,
}

/// Tunables for a session, normally derived from the site config.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    pub panel_reveal: RevealOptions,
    pub skills_reveal: RevealOptions,
    pub experience_reveal: RevealOptions,
    pub scroll_delay: Duration,
    pub typewriter: TypewriterTiming,
    /// `false` when the host cannot observe intersections; every region is
    /// then visible from the start.
    pub observer_supported: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            panel_reveal: RevealOptions::new(0.1, -50.0),
            skills_reveal: RevealOptions::new(0.2, 0.0),
            experience_reveal: RevealOptions::new(0.1, 0.0),
            scroll_delay: Duration::from_millis(100),
            typewriter: TypewriterTiming::default(),
            observer_supported: true,
        }
    }
}

/// A region with its own reveal latch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Region {
    Panel(String),
    Skills,
    Experience,
}

/// Which gallery a host callback is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryKey {
    Panel(String),
    Workplace,
}

/// Everything that came due during [`PageSession::advance`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tick {
    pub scrolls: Vec<ScrollRequest>,
    pub headline: Vec<Frame>,
}

/// Snapshot of what the host should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub headline: String,
    pub panels: Vec<(String, PanelView)>,
    /// "X / N" for the open panel's gallery.
    pub gallery_counter: Option<String>,
    pub experience_open: bool,
    pub workplace_counter: Option<String>,
    pub revealed: Vec<Region>,
}

pub struct PageSession<W, V> {
    catalog: Catalog,
    settings: PageSettings,
    accordion: Accordion,
    gallery: Option<(String, Carousel<V>)>,
    detectors: BTreeMap<Region, VisibilityDetector>,
    experience: Disclosure,
    workplace_gallery: Option<Carousel<V>>,
    typewriter: Typewriter,
    preloader: Preloader<W>,
    live: bool,
}

impl<W: CacheWarmer, V: VideoElement> PageSession<W, V> {
    pub fn new(catalog: Catalog, settings: PageSettings, warmer: W) -> Result<Self, PageError> {
        catalog.validate()?;
        let accordion = Accordion::new(catalog.panel_entries(), settings.scroll_delay)?;
        let detectors = build_detectors(&catalog, &settings);
        let typewriter = new_typewriter(&catalog, &settings);
        Ok(Self {
            catalog,
            settings,
            accordion,
            gallery: None,
            detectors,
            experience: Disclosure::default(),
            workplace_gallery: None,
            typewriter,
            preloader: Preloader::new(warmer),
            live: true,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn accordion(&self) -> &Accordion {
        &self.accordion
    }

    pub fn preloader(&self) -> &Preloader<W> {
        &self.preloader
    }

    pub fn headline(&self) -> &str {
        self.typewriter.text()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    // ------------------------------------------------------------------------
    // Accordion
    // ------------------------------------------------------------------------

    pub fn toggle_panel(&mut self, id: &str) -> Result<Toggle, PageError> {
        if !self.live {
            return Err(PageError::TornDown);
        }
        let toggle = self.accordion.toggle(id)?;
        self.sync_gallery();
        Ok(toggle)
    }

    pub fn next_panel(&mut self) -> Option<Toggle> {
        let toggle = self.accordion.next()?;
        self.sync_gallery();
        Some(toggle)
    }

    pub fn prev_panel(&mut self) -> Option<Toggle> {
        let toggle = self.accordion.prev()?;
        self.sync_gallery();
        Some(toggle)
    }

    /// Keep exactly one live gallery, owned by the open panel.
    fn sync_gallery(&mut self) {
        let open = self.accordion.open_panel_id().map(str::to_string);
        if self.gallery.as_ref().map(|(id, _)| id) == open.as_ref() {
            return;
        }
        if let Some((id, mut old)) = self.gallery.take() {
            log::debug!("tearing down gallery of {id}");
            old.teardown();
        }
        let Some(id) = open else {
            return;
        };
        let Some(client) = self.catalog.client(&id) else {
            return;
        };
        let mut carousel = Carousel::init(client.media_items());
        carousel.mount(&mut self.preloader);
        self.gallery = Some((id, carousel));
    }

    /// The open panel's gallery, if any.
    pub fn gallery(&self) -> Option<&Carousel<V>> {
        self.gallery.as_ref().map(|(_, c)| c)
    }

    pub fn workplace_gallery(&self) -> Option<&Carousel<V>> {
        self.workplace_gallery.as_ref()
    }

    fn carousel_mut(&mut self, key: &GalleryKey) -> Option<&mut Carousel<V>> {
        let found = match key {
            GalleryKey::Panel(id) => self
                .gallery
                .as_mut()
                .filter(|(owner, _)| owner == id)
                .map(|(_, c)| c),
            GalleryKey::Workplace => self.workplace_gallery.as_mut(),
        };
        if found.is_none() {
            log::debug!("callback for {key:?} arrived after its gallery was unmounted");
        }
        found
    }

    // ------------------------------------------------------------------------
    // Gallery callbacks
    // ------------------------------------------------------------------------

    pub fn gallery_next(&mut self, key: &GalleryKey) -> Option<usize> {
        self.carousel_mut(key)?.go_next()
    }

    pub fn gallery_prev(&mut self, key: &GalleryKey) -> Option<usize> {
        self.carousel_mut(key)?.go_prev()
    }

    pub fn slide_settled(&mut self, key: &GalleryKey, index: usize) -> Option<SettleOutcome> {
        let carousel = match key {
            GalleryKey::Panel(id) => self
                .gallery
                .as_mut()
                .filter(|(owner, _)| owner == id)
                .map(|(_, c)| c),
            GalleryKey::Workplace => self.workplace_gallery.as_mut(),
        };
        match carousel {
            Some(carousel) => carousel.on_slide_settled(index, &mut self.preloader),
            None => {
                log::debug!("slide settle for {key:?} ignored: gallery not live");
                None
            }
        }
    }

    pub fn image_loaded(&mut self, key: &GalleryKey, index: usize) -> bool {
        self.carousel_mut(key)
            .is_some_and(|carousel| carousel.mark_loaded(index))
    }

    pub fn mount_video(&mut self, key: &GalleryKey, index: usize, handle: V) -> bool {
        self.carousel_mut(key)
            .is_some_and(|carousel| carousel.mount_video(index, handle))
    }

    // ------------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------------

    /// Feed a geometry sample for `region`. Returns `true` when it reveals.
    pub fn observe_region(&mut self, region: &Region, bounds: &Rect, viewport: &Rect) -> bool {
        match self.detectors.get_mut(region) {
            Some(detector) => detector.observe(bounds, viewport, &mut self.preloader),
            None => false,
        }
    }

    pub fn is_revealed(&self, region: &Region) -> bool {
        self.detectors.get(region).is_some_and(|d| d.is_visible())
    }

    // ------------------------------------------------------------------------
    // Experience section
    // ------------------------------------------------------------------------

    /// Bring the experience section into view without opening anything.
    pub fn jump_to_experience(&self) -> ScrollRequest {
        self.accordion.scroll_to_section(&self.catalog.workplace.id)
    }

    /// Flip "View More Experience". Opening mounts the workplace gallery,
    /// closing tears it down.
    pub fn toggle_experience(&mut self) -> bool {
        if !self.live {
            return false;
        }
        let open = self.experience.toggle();
        if open {
            let mut carousel = Carousel::init(self.catalog.workplace.media_items());
            carousel.mount(&mut self.preloader);
            self.workplace_gallery = Some(carousel);
        } else if let Some(mut carousel) = self.workplace_gallery.take() {
            carousel.teardown();
        }
        open
    }

    pub fn is_experience_open(&self) -> bool {
        self.experience.is_open()
    }

    // ------------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------------

    /// Move the page clock forward.
    pub fn advance(&mut self, elapsed: Duration) -> Tick {
        if !self.live {
            return Tick::default();
        }
        Tick {
            scrolls: self.accordion.advance(elapsed),
            headline: self.typewriter.advance(elapsed),
        }
    }

    pub fn view(&self) -> PageView {
        PageView {
            headline: self.typewriter.text().to_string(),
            panels: self
                .accordion
                .panels()
                .iter()
                .filter_map(|p| Some((p.id.clone(), self.accordion.view(&p.id)?)))
                .collect(),
            gallery_counter: self.gallery().map(Carousel::counter_label),
            experience_open: self.experience.is_open(),
            workplace_counter: self.workplace_gallery().map(Carousel::counter_label),
            revealed: self
                .detectors
                .iter()
                .filter(|(_, d)| d.is_visible())
                .map(|(r, _)| r.clone())
                .collect(),
        }
    }

    /// Swap in a new catalog.
    ///
    /// The open panel stays open if its id survives, reveal latches of
    /// surviving regions are kept, and the headline restarts only when the
    /// intro changed. Galleries are rebuilt from the new media.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> Result<(), PageError> {
        if !self.live {
            return Err(PageError::TornDown);
        }
        catalog.validate()?;
        let mut accordion = Accordion::new(catalog.panel_entries(), self.settings.scroll_delay)?;
        let still_open = self
            .accordion
            .open_panel_id()
            .filter(|id| catalog.client(id).is_some());
        if let Some(id) = still_open {
            accordion.restore_open(id)?;
        }

        let mut detectors = build_detectors(&catalog, &self.settings);
        for (region, detector) in detectors.iter_mut() {
            if self.is_revealed(region) {
                *detector = VisibilityDetector::unsupported(*detector.options());
            }
        }

        let intro_changed = catalog.intro != self.catalog.intro;

        self.accordion.teardown();
        if let Some((_, mut old)) = self.gallery.take() {
            old.teardown();
        }
        self.accordion = accordion;
        self.detectors = detectors;
        self.catalog = catalog;
        if intro_changed {
            self.typewriter.teardown();
            self.typewriter = new_typewriter(&self.catalog, &self.settings);
        }
        self.sync_gallery();

        if let Some(mut old) = self.workplace_gallery.take() {
            old.teardown();
            if self.experience.is_open() {
                let mut carousel = Carousel::init(self.catalog.workplace.media_items());
                carousel.mount(&mut self.preloader);
                self.workplace_gallery = Some(carousel);
            }
        }
        Ok(())
    }

    /// Cancel every timer, unsubscribe every detector and halt all playback.
    pub fn teardown(&mut self) {
        self.accordion.teardown();
        self.typewriter.teardown();
        for detector in self.detectors.values_mut() {
            detector.teardown();
        }
        if let Some((_, mut carousel)) = self.gallery.take() {
            carousel.teardown();
        }
        if let Some(mut carousel) = self.workplace_gallery.take() {
            carousel.teardown();
        }
        self.experience.close();
        self.live = false;
    }
}

fn build_detectors(catalog: &Catalog, settings: &PageSettings) -> BTreeMap<Region, VisibilityDetector> {
    let detector = |options: RevealOptions, preload: Vec<String>| {
        if settings.observer_supported {
            VisibilityDetector::new(options, preload)
        } else {
            VisibilityDetector::unsupported(options)
        }
    };

    let mut detectors: BTreeMap<_, _> = catalog
        .clients
        .iter()
        .map(|c| {
            (
                Region::Panel(c.id.clone()),
                detector(settings.panel_reveal, c.reveal_preload()),
            )
        })
        .collect();
    detectors.insert(Region::Skills, detector(settings.skills_reveal, Vec::new()));
    detectors.insert(
        Region::Experience,
        detector(settings.experience_reveal, catalog.workplace.reveal_preload()),
    );
    detectors
}

fn new_typewriter(catalog: &Catalog, settings: &PageSettings) -> Typewriter {
    Typewriter::new(
        catalog.intro.name.clone(),
        catalog.intro.phrases.clone(),
        settings.typewriter,
    )
}
