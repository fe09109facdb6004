//! Mutually exclusive accordion panels.
//!
//! The client list is an accordion: at most one panel is open at any time.
//! [`Accordion`] is the single writer of [`AccordionState`]; panels only ask
//! whether they are the open one.
//!
//! ## Scroll after expand
//!
//! Opening a panel schedules a scroll notification `scroll_delay` later
//! (100ms by default) so the expand transition has begun before the page
//! moves. The coordinator never scrolls anything itself: the host collects
//! [`ScrollRequest`]s from [`Accordion::advance`] and performs them.
//!
//! A pending scroll is cancelled when another toggle happens before it fires,
//! and a scroll whose panel is no longer open when the timer fires is
//! dropped.
//!
//! ## Neighbour navigation
//!
//! [`Accordion::next`] and [`Accordion::prev`] open the neighbour of the open
//! panel in display order. They do not wrap: the first panel has no previous
//! panel and the last has no next one, and [`PanelView`] reports that so the
//! host can hide the controls rather than offer a dead button.

use crate::timer::{Timeline, TimerId};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccordionError {
    #[error("duplicate panel id: {0}")]
    DuplicatePanel(String),
    #[error("unknown panel id: {0}")]
    UnknownPanel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelEntry {
    pub id: String,
    pub display_order: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccordionState {
    pub open_panel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ScrollTarget {
    Panel(String),
    Section(String),
}

/// Ask the host to bring a region to the top of the viewport, smoothly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub target: ScrollTarget,
}

impl ScrollRequest {
    pub fn panel(id: impl Into<String>) -> Self {
        Self {
            target: ScrollTarget::Panel(id.into()),
        }
    }

    pub fn section(name: impl Into<String>) -> Self {
        Self {
            target: ScrollTarget::Section(name.into()),
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// `id` opened; `replaced` is the panel that was open before, if any.
    Opened { id: String, replaced: Option<String> },
    Collapsed { id: String },
}

/// What the host needs to render one panel header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub open: bool,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PanelView {
    /// Whether a "next" control should be shown right now.
    pub fn shows_next(&self) -> bool {
        self.open && self.has_next
    }

    pub fn shows_prev(&self) -> bool {
        self.open && self.has_prev
    }
}

#[derive(Debug)]
pub struct Accordion {
    panels: Vec<PanelEntry>,
    state: AccordionState,
    scroll_delay: Duration,
    timeline: Timeline<String>,
    pending_scroll: Option<TimerId>,
}

impl Accordion {
    /// Build a coordinator over `panels`, ordered by `display_order`.
    pub fn new(mut panels: Vec<PanelEntry>, scroll_delay: Duration) -> Result<Self, AccordionError> {
        let mut seen = HashSet::new();
        for panel in &panels {
            if !seen.insert(panel.id.as_str()) {
                return Err(AccordionError::DuplicatePanel(panel.id.clone()));
            }
        }
        panels.sort_by_key(|p| p.display_order);
        Ok(Self {
            panels,
            state: AccordionState::default(),
            scroll_delay,
            timeline: Timeline::new(),
            pending_scroll: None,
        })
    }

    /// Panels in the given order, numbered by position.
    pub fn from_ids<I, S>(ids: I, scroll_delay: Duration) -> Result<Self, AccordionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let panels = ids
            .into_iter()
            .enumerate()
            .map(|(display_order, id)| PanelEntry {
                id: id.into(),
                display_order,
            })
            .collect();
        Self::new(panels, scroll_delay)
    }

    pub fn state(&self) -> &AccordionState {
        &self.state
    }

    pub fn open_panel_id(&self) -> Option<&str> {
        self.state.open_panel_id.as_deref()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open_panel_id() == Some(id)
    }

    pub fn panels(&self) -> &[PanelEntry] {
        &self.panels
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.id == id)
    }

    pub fn view(&self, id: &str) -> Option<PanelView> {
        let pos = self.position(id)?;
        Some(PanelView {
            open: self.is_open(id),
            has_next: pos + 1 < self.panels.len(),
            has_prev: pos > 0,
        })
    }

    /// Open `id`, or collapse it if it is already the open panel.
    pub fn toggle(&mut self, id: &str) -> Result<Toggle, AccordionError> {
        if self.position(id).is_none() {
            return Err(AccordionError::UnknownPanel(id.to_string()));
        }
        if let Some(timer) = self.pending_scroll.take() {
            self.timeline.cancel(timer);
        }

        if self.is_open(id) {
            self.state.open_panel_id = None;
            return Ok(Toggle::Collapsed { id: id.to_string() });
        }

        let replaced = self.state.open_panel_id.replace(id.to_string());
        self.pending_scroll = self.timeline.schedule(self.scroll_delay, id.to_string());
        Ok(Toggle::Opened {
            id: id.to_string(),
            replaced,
        })
    }

    /// Mark `id` open without scheduling a scroll, for rebuilding the
    /// coordinator over a replaced catalog.
    pub fn restore_open(&mut self, id: &str) -> Result<(), AccordionError> {
        if self.position(id).is_none() {
            return Err(AccordionError::UnknownPanel(id.to_string()));
        }
        self.state.open_panel_id = Some(id.to_string());
        Ok(())
    }

    /// Open the panel after the open one. No-op without an open panel or at
    /// the end of the list.
    pub fn next(&mut self) -> Option<Toggle> {
        self.step(|pos, len| (pos + 1 < len).then_some(pos + 1))
    }

    /// Open the panel before the open one. No-op without an open panel or at
    /// the start of the list.
    pub fn prev(&mut self) -> Option<Toggle> {
        self.step(|pos, _| pos.checked_sub(1))
    }

    fn step(&mut self, neighbour: impl Fn(usize, usize) -> Option<usize>) -> Option<Toggle> {
        let open = self.open_panel_id()?;
        let pos = self.position(open)?;
        let target = neighbour(pos, self.panels.len())?;
        let id = self.panels[target].id.clone();
        self.toggle(&id).ok()
    }

    /// Scroll a named section into view without touching panel state.
    pub fn scroll_to_section(&self, name: &str) -> ScrollRequest {
        ScrollRequest::section(name)
    }

    /// Advance the clock and collect scroll requests that came due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScrollRequest> {
        let deadline = self.timeline.now() + elapsed;
        let fired = self.timeline.drain_until(deadline);
        if !fired.is_empty() {
            self.pending_scroll = None;
        }
        fired
            .into_iter()
            .filter(|id| {
                let still_open = self.is_open(id);
                if !still_open {
                    log::debug!("dropping scroll to collapsed panel {id}");
                }
                still_open
            })
            .map(ScrollRequest::panel)
            .collect()
    }

    /// Whether a post-expand scroll is still waiting to fire.
    pub fn has_pending_scroll(&self) -> bool {
        self.timeline.pending() > 0
    }

    /// Collapse everything and cancel pending scrolls for good.
    pub fn teardown(&mut self) {
        self.timeline.teardown();
        self.pending_scroll = None;
        self.state.open_panel_id = None;
    }
}

/// A single open/closed section, such as "View More Experience".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Disclosure {
    open: bool,
}

impl Disclosure {
    /// Flip the section and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
