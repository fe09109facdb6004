//! Build stamp for incremental builds.
//!
//! A build renders one HTML file and copies the asset directory. Neither is
//! slow on its own, but asset trees of a portfolio run to hundreds of
//! megabytes of video, so an unchanged rebuild should touch nothing.
//!
//! ## Keys
//!
//! The stamp is content-addressed, like the rest of the build:
//!
//! - **`page`**: SHA-256 over the catalog source, the config source, the
//!   embedded stylesheet and runtime script, and the crate version. Any
//!   change re-renders `index.html`.
//! - **`assets`**: SHA-256 of each asset file's contents, keyed by its path
//!   relative to the asset directory. Content-based rather than mtime-based so
//!   it survives `git checkout`.
//!
//! A page hit also requires `index.html` to still exist; an asset hit requires
//! the copied file to still exist.
//!
//! ## Storage
//!
//! The stamp is a JSON file at `<output_dir>/.folio-stamp.json`. Pass
//! `--no-cache` to `build` to start from an empty stamp.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

const STAMP_FILENAME: &str = ".folio-stamp.json";

/// Bump to invalidate every existing stamp when the key computation changes.
const STAMP_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStamp {
    pub version: u32,
    pub page: Option<String>,
    pub assets: BTreeMap<String, String>,
}

impl BuildStamp {
    /// An empty stamp (first build or `--no-cache`).
    pub fn empty() -> Self {
        Self {
            version: STAMP_VERSION,
            page: None,
            assets: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Missing, corrupt or outdated stamps
    /// load as empty.
    pub fn load(output_dir: &Path) -> Self {
        let content = match std::fs::read_to_string(output_dir.join(STAMP_FILENAME)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(stamp) if stamp.version == STAMP_VERSION => stamp,
            Ok(_) | Err(_) => {
                log::debug!("discarding unusable build stamp");
                Self::empty()
            }
        }
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(STAMP_FILENAME), json)
    }

    /// Whether `index.html` was rendered from exactly these inputs.
    pub fn page_is_fresh(&self, page_hash: &str, output_dir: &Path) -> bool {
        self.page.as_deref() == Some(page_hash) && output_dir.join("index.html").is_file()
    }

    pub fn record_page(&mut self, page_hash: String) {
        self.page = Some(page_hash);
    }

    /// Whether `copied` already holds the asset with this content.
    pub fn asset_is_fresh(&self, rel_path: &str, content_hash: &str, copied: &Path) -> bool {
        self.assets.get(rel_path).map(String::as_str) == Some(content_hash) && copied.is_file()
    }

    pub fn record_asset(&mut self, rel_path: String, content_hash: String) {
        self.assets.insert(rel_path, content_hash);
    }

    /// Drop entries for assets that no longer exist in the source.
    pub fn retain_assets(&mut self, keep: impl Fn(&str) -> bool) {
        self.assets.retain(|path, _| keep(path));
    }
}

/// SHA-256 of a file's contents, as hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// SHA-256 over several labelled inputs. Labels and lengths are hashed too, so
/// moving bytes from one part to the next changes the result.
pub fn hash_parts(parts: &[(&str, &[u8])]) -> String {
    let mut hasher = Sha256::new();
    for (label, bytes) in parts {
        hasher.update(label.as_bytes());
        hasher.update(b"\0");
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    format!("{:x}", hasher.finalize())
}
