//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, a small inline catalog, and host-side fakes for
//! the two seams the core talks through: a [`RecordingWarmer`] standing in
//! for the media cache and [`FakeVideo`] handles standing in for `<video>`
//! elements.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let log = VideoLog::default();
//! let mut carousel = Carousel::init(items);
//! carousel.mount_video(2, log.video(2));
//! carousel.on_slide_settled(2, &mut preloader);
//! assert!(log.is_playing(2));
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

use crate::carousel::{PlaybackError, VideoElement};
use crate::catalog::Catalog;
use crate::preload::{CacheWarmer, WarmError};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Catalogs
// =========================================================================

/// Three clients `alpha`, `beta`, `gamma` in that order.
///
/// - `alpha`: two images and one video with a poster, website, categories
/// - `beta`: one image, credit line
/// - `gamma`: no media at all and no optional fields
pub fn minimal_catalog_toml() -> &'static str {
    r#"
[intro]
name = "Test Person"
tagline = "Maker of things"
phrases = ["a", "bb"]
paragraphs = ["Hello there."]
experience_link = "experience"

[skills]
title = "Skills"
items = [
    { name = "Code", icon = "fa-code", level = 90, description = "Types and tests" },
    { name = "Mystery", icon = "fa-unmapped", level = 35 },
]

[[stats]]
value = "12+"
label = "Years"

[[clients]]
id = "alpha"
name = "Alpha Co"
icon = "fa-suitcase"
description = "Campaigns for **Alpha**."
website = "alpha.example"
images = ["/images/alpha/1.jpg", "/images/alpha/2.jpg"]
videos = [{ src = "/images/alpha/reel.mp4", poster = "/images/alpha/reel.jpg" }]
categories = ["hospitality", "web"]

[[clients]]
id = "beta"
name = "Beta"
icon = "fa-road"
description = "Road safety."
credit = "Photography: Someone."
images = ["/images/beta/1.jpg"]

[[clients]]
id = "gamma"
name = "Gamma"
icon = "fa-nonexistent"
description = "No media."

[workplace]
id = "experience"
title = "Experience."
subtitle = "Years of it."
images = ["/images/studio/desk.jpg", "/images/studio/wall.jpg"]

[[workplace.roles]]
title = "Lead Developer"
period = "2013 - Present"
organisation = "Studio"
location = "Melbourne"
website = "studio.example"
body = ["Built things."]

[[workplace.roles]]
title = "Tutor"
period = "2012 - 2013"
organisation = "School"

[[workplace.education]]
title = "Diploma"
institution = "School"
"#
}

pub fn minimal_catalog() -> Catalog {
    Catalog::from_toml_str(minimal_catalog_toml()).unwrap()
}

// =========================================================================
// Cache warmer fake
// =========================================================================

/// Records every warm request, in call order, including failed ones.
#[derive(Debug, Default)]
pub struct RecordingWarmer {
    calls: Vec<String>,
    failing: HashSet<String>,
}

impl RecordingWarmer {
    /// A warmer that reports `NotFound` for the given URLs.
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            calls: Vec::new(),
            failing: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.clone()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl CacheWarmer for RecordingWarmer {
    fn warm(&mut self, url: &str) -> Result<(), WarmError> {
        self.calls.push(url.to_string());
        if self.failing.contains(url) {
            return Err(WarmError::NotFound(url.to_string()));
        }
        Ok(())
    }
}

// =========================================================================
// Video element fake
// =========================================================================

#[derive(Debug, Default, Clone, Copy)]
struct FakeVideoState {
    playing: bool,
    time: f64,
}

/// Shared, inspectable playback state of every [`FakeVideo`] it hands out.
#[derive(Debug, Default, Clone)]
pub struct VideoLog {
    videos: Rc<RefCell<BTreeMap<usize, FakeVideoState>>>,
}

impl VideoLog {
    /// A video handle for slide `index` that plays when asked.
    pub fn video(&self, index: usize) -> FakeVideo {
        self.handle(index, false)
    }

    /// A video handle whose `play()` is rejected, like an autoplay block.
    pub fn blocked_video(&self, index: usize) -> FakeVideo {
        self.handle(index, true)
    }

    fn handle(&self, index: usize, blocked: bool) -> FakeVideo {
        self.videos.borrow_mut().entry(index).or_default();
        FakeVideo {
            index,
            blocked,
            log: self.clone(),
        }
    }

    pub fn is_playing(&self, index: usize) -> bool {
        self.videos
            .borrow()
            .get(&index)
            .is_some_and(|v| v.playing)
    }

    /// Current playback position in seconds.
    pub fn time(&self, index: usize) -> f64 {
        self.videos.borrow().get(&index).map_or(0.0, |v| v.time)
    }

    /// Move every playing video forward by `seconds`.
    pub fn advance_playing(&self, seconds: f64) {
        for state in self.videos.borrow_mut().values_mut() {
            if state.playing {
                state.time += seconds;
            }
        }
    }

    pub fn playing(&self) -> Vec<usize> {
        self.videos
            .borrow()
            .iter()
            .filter(|(_, v)| v.playing)
            .map(|(i, _)| *i)
            .collect()
    }

    fn update(&self, index: usize, f: impl FnOnce(&mut FakeVideoState)) {
        if let Some(state) = self.videos.borrow_mut().get_mut(&index) {
            f(state);
        }
    }
}

#[derive(Debug)]
pub struct FakeVideo {
    index: usize,
    blocked: bool,
    log: VideoLog,
}

impl VideoElement for FakeVideo {
    fn pause(&mut self) {
        self.log.update(self.index, |v| v.playing = false);
    }

    fn rewind(&mut self) {
        self.log.update(self.index, |v| v.time = 0.0);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.blocked {
            return Err(PlaybackError::Blocked);
        }
        self.log.update(self.index, |v| v.playing = true);
        Ok(())
    }
}
