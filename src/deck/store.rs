use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwapOption;
use tracing::debug;

use super::{Deck, load_deck};
use crate::config::DeckConfig;

/// Directory state a cached deck was built from
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    dir_modified: Option<SystemTime>,
    files: Vec<(String, Option<SystemTime>, u64)>,
}

impl Fingerprint {
    fn of(dir: &Path) -> Option<Self> {
        let dir_modified = fs::metadata(dir).and_then(|m| m.modified()).ok();

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).ok()?.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".md") {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            files.push((name, meta.modified().ok(), meta.len()));
        }
        files.sort();

        Some(Self {
            dir_modified,
            files,
        })
    }
}

struct CachedDeck {
    fingerprint: Fingerprint,
    deck: Arc<Deck>,
}

/// Read-through access to the deck directory.
///
/// Without caching every [`DeckStore::load`] re-parses the directory. With
/// caching the last deck is reused until the directory fingerprint changes.
pub struct DeckStore {
    directory: PathBuf,
    cache_enabled: bool,
    cached: ArcSwapOption<CachedDeck>,
}

impl DeckStore {
    pub fn new(directory: impl Into<PathBuf>, cache_enabled: bool) -> Self {
        Self {
            directory: directory.into(),
            cache_enabled,
            cached: ArcSwapOption::empty(),
        }
    }

    pub fn from_config(config: &DeckConfig) -> Self {
        Self::new(&config.directory, config.cache_enabled)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn load(&self) -> Arc<Deck> {
        if !self.cache_enabled {
            return Arc::new(load_deck(&self.directory));
        }

        let fingerprint = Fingerprint::of(&self.directory);
        if let (Some(current), Some(cached)) = (&fingerprint, self.cached.load_full()) {
            if cached.fingerprint == *current {
                debug!("Deck cache hit for {}", self.directory.display());
                return Arc::clone(&cached.deck);
            }
        }

        let deck = Arc::new(load_deck(&self.directory));
        match fingerprint {
            Some(fingerprint) => self.cached.store(Some(Arc::new(CachedDeck {
                fingerprint,
                deck: Arc::clone(&deck),
            }))),
            None => self.cached.store(None),
        }
        deck
    }

    /// Drop any memoized deck
    pub fn invalidate(&self) {
        self.cached.store(None);
    }
}
