//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every client is its semantic identity (positional index and name),
//! with icon keys and descriptions shown as indented context lines. Media
//! problems are listed by URL so they can be fixed in the catalog directly.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Clients
//! 001 Accor (25 slides)
//!     Icon: fa-suitcase
//!     Digital creative, production and web pages for global...
//! 002 Ride to Conquer Cancer (4 slides)
//!     Icon: fa-biking
//!
//! Experience
//!     Experience. (2 slides, 2 roles)
//!
//! Media
//!     31 referenced, 1 missing
//!     Missing: /images/accor/accor_18-poster.jpg
//! ```
//!
//! ## Build
//!
//! ```text
//! index.html: rendered
//! Assets: 12 copied, 30 unchanged
//! Site built at dist
//! ```
//!
//! ## Typewriter
//!
//! ```text
//!   0.000s  Jules Lye
//!  10.000s  Jules Lye
//!  10.080s  Jules Lye w
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::generate::{BuildReport, CheckReport, PageStatus};
use crate::typewriter::Frame;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + name + slide count.
///
/// ```text
/// 001 Accor (25 slides)
/// 002 Yarra Valley (1 slide)
/// ```
fn entity_header(index: usize, name: &str, slides: usize) -> String {
    format!("{} {} ({})", format_index(index), name, plural(slides, "slide"))
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Strip inline markdown emphasis markers for a plain preview.
fn strip_markdown(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '_' | '`')).collect()
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(catalog: &Catalog, report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Clients".to_string());
    for (i, client) in catalog.clients.iter().enumerate() {
        lines.push(entity_header(i + 1, &client.name, client.media_items().len()));
        lines.push(format!("{}Icon: {}", indent(1), client.icon));
        let preview = truncate_desc(strip_markdown(&client.description).trim(), 60);
        if !preview.is_empty() {
            lines.push(format!("{}{}", indent(1), preview));
        }
    }

    let workplace = &catalog.workplace;
    lines.push(String::new());
    lines.push("Experience".to_string());
    lines.push(format!(
        "{}{} ({}, {})",
        indent(1),
        workplace.title,
        plural(workplace.images.len(), "slide"),
        plural(workplace.roles.len(), "role")
    ));

    lines.push(String::new());
    lines.push("Media".to_string());
    lines.push(format!(
        "{}{} referenced, {} missing",
        indent(1),
        report.media_urls,
        report.missing_media.len()
    ));
    for url in &report.missing_media {
        lines.push(format!("{}Missing: {}", indent(1), url));
    }

    if !report.unknown_icons.is_empty() {
        lines.push(String::new());
        lines.push("Icons".to_string());
        for key in &report.unknown_icons {
            lines.push(format!("{}Unknown: {}", indent(1), key));
        }
    }

    lines
}

pub fn print_check_output(catalog: &Catalog, report: &CheckReport) {
    for line in format_check_output(catalog, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let status = match report.page {
        PageStatus::Rendered => "rendered",
        PageStatus::Unchanged => "unchanged",
    };
    lines.push(format!("index.html: {}", status));
    lines.push(format!(
        "Assets: {} copied, {} unchanged",
        report.assets_copied, report.assets_unchanged
    ));
    if !report.missing_media.is_empty() {
        lines.push(format!(
            "Missing media ({}):",
            report.missing_media.len()
        ));
        for url in &report.missing_media {
            lines.push(format!("{}{}", indent(1), url));
        }
    }
    lines.push(format!("Site built at {}", report.output.display()));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Typewriter
// ============================================================================

/// One line per headline change, with the time it happens. The first line is
/// the resting headline at time zero.
pub fn format_typewriter_frames(name: &str, frames: &[Frame]) -> Vec<String> {
    std::iter::once(format!("{:>8.3}s  {}", 0.0, name))
        .chain(
            frames
                .iter()
                .map(|f| format!("{:>8.3}s  {}", f.at.as_secs_f64(), f.text)),
        )
        .collect()
}

pub fn print_typewriter_frames(name: &str, frames: &[Frame]) {
    for line in format_typewriter_frames(name, frames) {
        println!("{}", line);
    }
}
