//! Hero headline typewriter.
//!
//! The headline shows a bare name, then repeatedly types a phrase after it,
//! holds, erases it and holds again before moving to the next phrase:
//!
//! ```text
//! Idle ──initial_delay──▶ Typing ──▶ HoldFull ──hold_full──▶ Erasing ──▶ HoldEmpty
//!                           ▲                                                │
//!                           └──────────────hold_empty (next phrase)──────────┘
//! ```
//!
//! Each typed character waits `type_interval` (80ms), each erased one
//! `erase_interval` (40ms). The phrase list wraps forever. The animator runs
//! on its own [`Timeline`] and is not coordinated with anything else on the
//! page; the host advances it and renders [`Typewriter::text`].

use crate::timer::Timeline;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pacing for the animation. All values in milliseconds in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypewriterTiming {
    pub initial_delay_ms: u64,
    pub type_interval_ms: u64,
    pub erase_interval_ms: u64,
    pub hold_full_ms: u64,
    pub hold_empty_ms: u64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            initial_delay_ms: 10_000,
            type_interval_ms: 80,
            erase_interval_ms: 40,
            hold_full_ms: 10_000,
            hold_empty_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Typing,
    HoldFull,
    Erasing,
    HoldEmpty,
    Stopped,
}

/// A headline change at virtual time `at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub at: Duration,
    pub text: String,
}

#[derive(Debug)]
pub struct Typewriter {
    name: String,
    phrases: Vec<String>,
    timing: TypewriterTiming,
    phase: Phase,
    phrase_index: usize,
    cursor: usize,
    text: String,
    timeline: Timeline<()>,
}

impl Typewriter {
    /// Start the animator. Only the name shows until the initial delay passes.
    ///
    /// With no phrases the name stays put and no timer is ever scheduled.
    /// Character intervals below 1ms are raised to 1ms so every cycle moves
    /// the clock forward.
    pub fn new(name: impl Into<String>, phrases: Vec<String>, mut timing: TypewriterTiming) -> Self {
        timing.type_interval_ms = timing.type_interval_ms.max(1);
        timing.erase_interval_ms = timing.erase_interval_ms.max(1);
        let name = name.into();
        let mut timeline = Timeline::new();
        if !phrases.is_empty() {
            timeline.schedule(ms(timing.initial_delay_ms), ());
        }
        Self {
            text: name.clone(),
            name,
            phrases,
            timing,
            phase: Phase::Idle,
            phrase_index: 0,
            cursor: 0,
            timeline,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Characters of the current phrase on screen.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// Advance by `elapsed`, returning every headline change in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Frame> {
        let deadline = self.timeline.now() + elapsed;
        let mut frames = Vec::new();
        while self.timeline.pop_due(deadline).is_some() {
            let before = self.text.clone();
            self.tick();
            if self.text != before {
                frames.push(Frame {
                    at: self.timeline.now(),
                    text: self.text.clone(),
                });
            }
        }
        self.timeline.settle(deadline);
        frames
    }

    /// Run one step of the state machine.
    fn tick(&mut self) {
        let Some(phrase) = self.phrases.get(self.phrase_index) else {
            return;
        };
        let len = phrase.chars().count();
        let t = self.timing;

        match self.phase {
            Phase::Idle | Phase::HoldEmpty => {
                self.phase = Phase::Typing;
                self.cursor = 0;
                self.render();
                self.timeline.schedule(ms(t.type_interval_ms), ());
            }
            Phase::Typing if self.cursor < len => {
                self.cursor += 1;
                self.render();
                self.timeline.schedule(ms(t.type_interval_ms), ());
            }
            Phase::Typing => {
                self.phase = Phase::HoldFull;
                self.timeline.schedule(ms(t.hold_full_ms), ());
            }
            Phase::HoldFull => {
                // Erasing starts by redrawing the full phrase
                self.phase = Phase::Erasing;
                self.cursor = len;
                self.render();
                self.timeline.schedule(ms(t.erase_interval_ms), ());
            }
            Phase::Erasing if self.cursor > 0 => {
                self.cursor -= 1;
                self.render();
                self.timeline.schedule(ms(t.erase_interval_ms), ());
            }
            Phase::Erasing => {
                self.phase = Phase::HoldEmpty;
                self.text = self.name.clone();
                self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                self.timeline.schedule(ms(t.hold_empty_ms), ());
            }
            Phase::Stopped => {}
        }
    }

    fn render(&mut self) {
        let phrase = &self.phrases[self.phrase_index];
        let shown: String = phrase.chars().take(self.cursor).collect();
        self.text = format!("{} {}", self.name, shown);
    }

    /// Cancel every pending step. The headline freezes where it is.
    pub fn teardown(&mut self) {
        self.timeline.teardown();
        self.phase = Phase::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
