//! # Folio
//!
//! A single-page portfolio: a hero with a typewriter headline, a skills grid,
//! an accordion of client case studies each holding an image and video
//! gallery, and an experience section behind a disclosure.
//!
//! The crate has two halves:
//!
//! - A **headless page core** that owns every stateful behaviour of the page
//!   (reveal on scroll, one-open-at-a-time panels, gallery navigation and
//!   playback, the typewriter) without touching a DOM. Hosts feed it
//!   geometry and events and render what it reports.
//! - A **static-site generator** that renders the page's initial state from a
//!   `catalog.toml` and embeds a small browser runtime driving the same
//!   behaviour live.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`timer`] | Cooperative timer queue on a virtual clock; every delay in the core runs on it |
//! | [`media`] | Media items and the unified image-then-video slide sequence |
//! | [`preload`] | Fire-and-forget media preloading and the build-time asset probe |
//! | [`visibility`] | One-shot reveal latch with intersection geometry |
//! | [`carousel`] | Gallery navigation, settle synchronisation, video playback policy |
//! | [`accordion`] | One-open-at-a-time panels, delayed scroll requests, disclosure |
//! | [`typewriter`] | Headline type/hold/erase cycle |
//! | [`icons`] | Icon key to glyph mapping |
//! | [`catalog`] | `catalog.toml` loading and validation |
//! | [`page`] | `PageSession`: the core components wired together for one page |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`generate`] | Renders the page with Maud and copies the asset directory |
//! | [`stamp`] | Content-addressed build stamp for incremental builds |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Virtual Time
//!
//! Nothing in the core sleeps or spawns. Every delay (the panel scroll, the
//! slide transition, the typewriter's pacing) is a timer on a
//! [`timer::Timeline`] that the host advances explicitly. Tests step time
//! deterministically and teardown is a single cancel-all.
//!
//! ## Host Seams as Traits
//!
//! The core never fetches media or drives a `<video>` itself. It asks a
//! [`preload::CacheWarmer`] to make URLs resident and a
//! [`carousel::VideoElement`] to pause, rewind or play. Failures on either
//! seam are logged and absorbed, never surfaced.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system, rather than Handlebars or Tera. Advantages:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions, no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## One Output File
//!
//! The generated site is `index.html` plus the copied asset directory. Styles
//! and the runtime are inlined; the page can be dropped on any file server.

pub mod accordion;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod generate;
pub mod icons;
pub mod media;
pub mod output;
pub mod page;
pub mod preload;
pub mod stamp;
pub mod timer;
pub mod typewriter;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_helpers;
