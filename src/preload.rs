//! Media preloading.
//!
//! Preloading is fire-and-forget: the caller asks for a URL to be made
//! resident and moves on. Nothing downstream depends on the outcome, because
//! the real `<img>`/`<video>` element fetches the resource again on its own
//! and owns its own error state. A failed warm-up is therefore logged and
//! dropped, never returned.
//!
//! The actual caching is delegated to a [`CacheWarmer`]. Warmers are expected
//! to dedup repeated requests themselves, so callers may warm the same URL as
//! often as they like.
//!
//! ## Asset probing
//!
//! At build time the "cache" is the asset directory. [`AssetProbe`] resolves
//! site-absolute media URLs (`/images/accor/1.jpg`) against it, checks the
//! file exists, and reads image headers so the generator can emit
//! `width`/`height` attributes. Batches are probed in parallel with rayon.

use crate::media::MediaItem;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarmError {
    #[error("media not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read image header of {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Something that can make a media URL cache-resident.
pub trait CacheWarmer {
    fn warm(&mut self, url: &str) -> Result<(), WarmError>;

    /// Warm many URLs at once. Results come back in input order.
    fn warm_many(&mut self, urls: &[String]) -> Vec<Result<(), WarmError>> {
        urls.iter().map(|url| self.warm(url)).collect()
    }
}

/// Fire-and-forget front over a [`CacheWarmer`].
///
/// Failures are swallowed and remembered only so the CLI can list media that
/// could not be found.
#[derive(Debug)]
pub struct Preloader<W> {
    warmer: W,
    failed: BTreeSet<String>,
}

impl<W: CacheWarmer> Preloader<W> {
    pub fn new(warmer: W) -> Self {
        Self {
            warmer,
            failed: BTreeSet::new(),
        }
    }

    pub fn warm(&mut self, url: &str) {
        if let Err(e) = self.warmer.warm(url) {
            self.record_failure(url, &e);
        }
    }

    /// Warm a slide: the source itself and, for videos, the poster frame.
    pub fn warm_item(&mut self, item: &MediaItem) {
        self.warm(&item.source_url);
        if let Some(poster) = &item.poster_url {
            self.warm(poster);
        }
    }

    pub fn warm_all(&mut self, urls: &[String]) {
        let results = self.warmer.warm_many(urls);
        for (url, result) in urls.iter().zip(results) {
            if let Err(e) = result {
                self.record_failure(url, &e);
            }
        }
    }

    /// URLs whose warm-up failed at least once, sorted.
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(String::as_str)
    }

    pub fn warmer(&self) -> &W {
        &self.warmer
    }

    pub fn warmer_mut(&mut self) -> &mut W {
        &mut self.warmer
    }

    pub fn into_warmer(self) -> W {
        self.warmer
    }

    fn record_failure(&mut self, url: &str, err: &WarmError) {
        log::debug!("preload of {url} skipped: {err}");
        self.failed.insert(url.to_string());
    }
}

// ============================================================================
// Asset directory probe
// ============================================================================

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Build-time warmer backed by the content's asset directory.
#[derive(Debug)]
pub struct AssetProbe {
    root: PathBuf,
    resident: HashSet<String>,
    dimensions: HashMap<String, (u32, u32)>,
}

impl AssetProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            resident: HashSet::new(),
            dimensions: HashMap::new(),
        }
    }

    /// Pixel dimensions of a probed image, if known.
    pub fn dimensions(&self, url: &str) -> Option<(u32, u32)> {
        self.dimensions.get(url).copied()
    }

    pub fn is_resident(&self, url: &str) -> bool {
        self.resident.contains(url)
    }

    fn absorb(&mut self, url: &str, probed: Option<(u32, u32)>) {
        if let Some(dims) = probed {
            self.dimensions.insert(url.to_string(), dims);
        }
        self.resident.insert(url.to_string());
    }
}

impl CacheWarmer for AssetProbe {
    fn warm(&mut self, url: &str) -> Result<(), WarmError> {
        if self.resident.contains(url) {
            return Ok(());
        }
        let probed = probe(&self.root, url)?;
        self.absorb(url, probed);
        Ok(())
    }

    fn warm_many(&mut self, urls: &[String]) -> Vec<Result<(), WarmError>> {
        let root = self.root.clone();
        let probed: Vec<_> = urls
            .par_iter()
            .map(|url| {
                if self.resident.contains(url) {
                    Ok(None)
                } else {
                    probe(&root, url)
                }
            })
            .collect();

        urls.iter()
            .zip(probed)
            .map(|(url, result)| result.map(|dims| self.absorb(url, dims)))
            .collect()
    }
}

/// Whether a URL points off-site (and so cannot be probed locally).
pub fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

/// Map a site-absolute media URL onto a file below `root`.
///
/// Returns `None` for URLs that would escape the root.
pub fn resolve_asset(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

fn probe(root: &Path, url: &str) -> Result<Option<(u32, u32)>, WarmError> {
    if is_external(url) {
        return Ok(None);
    }
    let path = resolve_asset(root, url).ok_or_else(|| WarmError::NotFound(url.to_string()))?;
    if !path.is_file() {
        return Err(WarmError::NotFound(url.to_string()));
    }
    let is_image = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if !is_image {
        return Ok(None);
    }
    image::image_dimensions(&path)
        .map(Some)
        .map_err(|e| WarmError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
