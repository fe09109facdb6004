//! Scroll-driven progressive reveal.
//!
//! Every panel and section on the page starts hidden and fades in the first
//! time enough of it scrolls into view. A [`VisibilityDetector`] watches one
//! region and latches: once it has fired it stays visible and stops
//! observing, so scrolling the region back out never hides it again.
//!
//! ## Geometry
//!
//! The host reports the region's bounding box and the viewport in the same
//! coordinate space. The viewport's bottom edge is shifted by
//! [`RevealOptions::bottom_margin`] (negative values shrink it, exactly like
//! an `IntersectionObserver` root margin of `0px 0px -50px 0px`), and the
//! region reveals once the visible share of its area reaches
//! [`RevealOptions::threshold`].
//!
//! ## Preload on reveal
//!
//! A panel's detector carries the URLs to warm when it first fires (its
//! first image and, if present, its first video poster), so the gallery
//! opens onto cached media.
//!
//! ## No observer available
//!
//! [`VisibilityDetector::unsupported`] builds a detector that is visible from
//! the start. Content must render correctly without the animation.

use crate::preload::{CacheWarmer, Preloader};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Overlap of two rectangles, or `None` when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// When a region counts as "in view".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealOptions {
    /// Share of the region's area (0.0-1.0) that must be visible.
    pub threshold: f64,
    /// Pixels added to the viewport's bottom edge. Negative shrinks it.
    pub bottom_margin: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 0.0,
        }
    }
}

impl RevealOptions {
    pub fn new(threshold: f64, bottom_margin: f64) -> Self {
        Self {
            threshold,
            bottom_margin,
        }
    }

    /// Visible share of `region` inside the margin-adjusted `viewport`.
    pub fn intersection_ratio(&self, region: &Rect, viewport: &Rect) -> f64 {
        let root = Rect::new(
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height + self.bottom_margin,
        );
        if region.area() == 0.0 {
            return if root.contains_point(region.x, region.y) {
                1.0
            } else {
                0.0
            };
        }
        root.intersection(region)
            .map(|overlap| overlap.area() / region.area())
            .unwrap_or(0.0)
    }

    pub fn is_in_view(&self, region: &Rect, viewport: &Rect) -> bool {
        let ratio = self.intersection_ratio(region, viewport);
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// One-shot visibility latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisibilityState {
    pub has_become_visible: bool,
}

#[derive(Debug, Clone)]
pub struct VisibilityDetector {
    options: RevealOptions,
    state: VisibilityState,
    subscribed: bool,
    preload: Vec<String>,
}

impl VisibilityDetector {
    /// A detector that warms `preload` the first time the region reveals.
    pub fn new(options: RevealOptions, preload: Vec<String>) -> Self {
        Self {
            options,
            state: VisibilityState::default(),
            subscribed: true,
            preload,
        }
    }

    /// A detector for hosts without intersection observation: always visible.
    pub fn unsupported(options: RevealOptions) -> Self {
        Self {
            options,
            state: VisibilityState {
                has_become_visible: true,
            },
            subscribed: false,
            preload: Vec::new(),
        }
    }

    /// Feed one geometry sample. Returns `true` only on the sample that
    /// flips the latch.
    pub fn observe<W: CacheWarmer>(
        &mut self,
        region: &Rect,
        viewport: &Rect,
        preloader: &mut Preloader<W>,
    ) -> bool {
        if !self.subscribed {
            return false;
        }
        if !self.options.is_in_view(region, viewport) {
            return false;
        }
        self.state.has_become_visible = true;
        self.subscribed = false;
        for url in &self.preload {
            preloader.warm(url);
        }
        true
    }

    pub fn is_visible(&self) -> bool {
        self.state.has_become_visible
    }

    /// Whether the detector still listens for geometry samples.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn preload_urls(&self) -> &[String] {
        &self.preload
    }

    /// Stop observing. Later samples are ignored.
    pub fn teardown(&mut self) {
        self.subscribed = false;
    }
}
