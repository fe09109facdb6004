//! Gallery carousel controller.
//!
//! A [`Carousel`] owns one gallery's [`GalleryState`]: the unified slide
//! sequence, the active index and the set of image slides that have finished
//! loading. Navigation is circular in both directions with no terminal
//! state.
//!
//! ## Transitions
//!
//! Navigation happens in two steps, mirroring how a slide widget works:
//!
//! 1. [`Carousel::go_next`] / [`Carousel::go_prev`] request a move and return
//!    the target index. Requests issued while a transition is still in flight
//!    chain from the in-flight target, so two quick "next" presses move two
//!    slides: none are lost and none are doubled.
//! 2. [`Carousel::on_slide_settled`] is called once the visual transition
//!    completes. Only then does the active index change, in one step.
//!
//! The settle callback synchronises video playback: every mounted video is
//! paused and rewound, then the newly active slide plays if it is a video.
//! A rejected play (autoplay policy) is logged and dropped; the slide keeps
//! showing its poster.
//!
//! ## Preloading
//!
//! Whenever the active index changes (and once on mount) the two neighbours
//! `(i + 1) mod N` and `(i - 1 + N) mod N` are warmed, which keeps the
//! working set at three slides regardless of gallery size.
//!
//! ## Video handles
//!
//! The host registers one [`VideoElement`] per video slide in the carousel's
//! [`VideoRegistry`] while the slide is mounted. The registry belongs to the
//! carousel instance and is cleared on teardown, so handles never leak across
//! galleries.

use crate::media::MediaItem;
use crate::preload::{CacheWarmer, Preloader};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("playback blocked by autoplay policy")]
    Blocked,
    #[error("playback failed: {0}")]
    Failed(String),
}

/// Host-side handle to a `<video>` element.
pub trait VideoElement {
    fn pause(&mut self);
    /// Seek back to time zero.
    fn rewind(&mut self);
    fn play(&mut self) -> Result<(), PlaybackError>;
}

/// Slide index → mounted video handle.
#[derive(Debug)]
pub struct VideoRegistry<V> {
    handles: BTreeMap<usize, V>,
}

impl<V> Default for VideoRegistry<V> {
    fn default() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }
}

impl<V: VideoElement> VideoRegistry<V> {
    /// Register a handle, returning any handle it replaced.
    pub fn mount(&mut self, index: usize, handle: V) -> Option<V> {
        self.handles.insert(index, handle)
    }

    pub fn unmount(&mut self, index: usize) -> Option<V> {
        self.handles.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.handles.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        self.handles.get_mut(&index)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Pause and rewind every mounted video.
    pub fn halt_all(&mut self) {
        for video in self.handles.values_mut() {
            video.pause();
            video.rewind();
        }
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    items: Vec<MediaItem>,
    active_index: usize,
    loaded: BTreeSet<usize>,
}

impl GalleryState {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            active_index: 0,
            loaded: BTreeSet::new(),
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&MediaItem> {
        self.items.get(self.active_index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn loaded(&self) -> &BTreeSet<usize> {
        &self.loaded
    }

    pub fn counter(&self) -> (usize, usize) {
        if self.items.is_empty() {
            (0, 0)
        } else {
            (self.active_index + 1, self.items.len())
        }
    }

    pub fn counter_label(&self) -> String {
        let (position, total) = self.counter();
        format!("{position} / {total}")
    }

    fn next_of(&self, index: usize) -> usize {
        (index + 1) % self.items.len()
    }

    fn prev_of(&self, index: usize) -> usize {
        (index + self.items.len() - 1) % self.items.len()
    }
}

/// What happened to playback when a slide settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// The active slide is an image.
    NotVideo,
    Playing,
    /// `play()` was rejected; the slide shows its poster.
    Rejected,
    /// The active slide is a video but no element is mounted for it.
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleOutcome {
    pub active_index: usize,
    pub playback: Playback,
}

#[derive(Debug)]
pub struct Carousel<V> {
    state: GalleryState,
    videos: VideoRegistry<V>,
    in_flight: Option<usize>,
    live: bool,
}

impl<V: VideoElement> Carousel<V> {
    pub fn init(items: Vec<MediaItem>) -> Self {
        Self {
            state: GalleryState::new(items),
            videos: VideoRegistry::default(),
            in_flight: None,
            live: true,
        }
    }

    /// Warm the neighbours of the first slide.
    pub fn mount<W: CacheWarmer>(&mut self, preloader: &mut Preloader<W>) {
        if self.live {
            self.preload_neighbours(preloader);
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Target of the transition currently in flight, if any.
    pub fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    /// One-based position and total, for an "X / N" indicator.
    pub fn counter(&self) -> (usize, usize) {
        self.state.counter()
    }

    pub fn counter_label(&self) -> String {
        self.state.counter_label()
    }

    pub fn go_next(&mut self) -> Option<usize> {
        self.request(|state, from| state.next_of(from))
    }

    pub fn go_prev(&mut self) -> Option<usize> {
        self.request(|state, from| state.prev_of(from))
    }

    fn request(&mut self, step: impl Fn(&GalleryState, usize) -> usize) -> Option<usize> {
        if !self.live || self.state.is_empty() {
            return None;
        }
        let from = self.in_flight.unwrap_or(self.state.active_index);
        let target = step(&self.state, from);
        self.in_flight = Some(target);
        Some(target)
    }

    /// The slide widget finished moving to `new_index`.
    ///
    /// The widget is authoritative: whatever index it reports becomes active
    /// and any in-flight request is considered resolved.
    pub fn on_slide_settled<W: CacheWarmer>(
        &mut self,
        new_index: usize,
        preloader: &mut Preloader<W>,
    ) -> Option<SettleOutcome> {
        if !self.live {
            log::debug!("slide settle at {new_index} after teardown ignored");
            return None;
        }
        if new_index >= self.state.len() {
            log::warn!(
                "slide settle at {new_index} outside gallery of {}",
                self.state.len()
            );
            return None;
        }

        let changed = self.state.active_index != new_index;
        self.state.active_index = new_index;
        self.in_flight = None;

        self.videos.halt_all();
        let playback = if self.state.items[new_index].is_video() {
            match self.videos.get_mut(new_index) {
                Some(video) => match video.play() {
                    Ok(()) => Playback::Playing,
                    Err(e) => {
                        log::debug!("video auto-play at slide {new_index} prevented: {e}");
                        Playback::Rejected
                    }
                },
                None => Playback::Unmounted,
            }
        } else {
            Playback::NotVideo
        };

        if changed {
            self.preload_neighbours(preloader);
        }

        Some(SettleOutcome {
            active_index: new_index,
            playback,
        })
    }

    fn preload_neighbours<W: CacheWarmer>(&self, preloader: &mut Preloader<W>) {
        if self.state.is_empty() {
            return;
        }
        let active = self.state.active_index;
        let next = self.state.next_of(active);
        let prev = self.state.prev_of(active);
        if next != active {
            preloader.warm_item(&self.state.items[next]);
        }
        if prev != next && prev != active {
            preloader.warm_item(&self.state.items[prev]);
        }
    }

    // ------------------------------------------------------------------------
    // Load tracking
    // ------------------------------------------------------------------------

    /// An image slide finished decoding. Returns `false` for unknown indices
    /// and video slides, which never show a placeholder.
    pub fn mark_loaded(&mut self, index: usize) -> bool {
        match self.state.items.get(index) {
            Some(item) if !item.is_video() => {
                self.state.loaded.insert(index);
                true
            }
            _ => false,
        }
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.state.loaded.contains(&index)
    }

    /// Whether slide `index` must still render its loading placeholder.
    pub fn shows_placeholder(&self, index: usize) -> bool {
        self.state
            .items
            .get(index)
            .is_some_and(|item| !item.is_video() && !self.is_loaded(index))
    }

    // ------------------------------------------------------------------------
    // Video handles
    // ------------------------------------------------------------------------

    /// Register the element for video slide `index`.
    ///
    /// Handles for image slides or unknown indices are dropped.
    pub fn mount_video(&mut self, index: usize, handle: V) -> bool {
        if !self.live {
            return false;
        }
        match self.state.items.get(index) {
            Some(item) if item.is_video() => {
                self.videos.mount(index, handle);
                true
            }
            _ => {
                log::debug!("ignoring video handle for non-video slide {index}");
                false
            }
        }
    }

    pub fn unmount_video(&mut self, index: usize) -> Option<V> {
        self.videos.unmount(index)
    }

    pub fn videos(&self) -> &VideoRegistry<V> {
        &self.videos
    }

    /// Pause and rewind every video without unmounting anything.
    pub fn halt(&mut self) {
        self.videos.halt_all();
    }

    /// Halt playback, release every handle and stop accepting callbacks.
    pub fn teardown(&mut self) {
        self.videos.halt_all();
        self.videos.clear();
        self.in_flight = None;
        self.live = false;
    }
}
