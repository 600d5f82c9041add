use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::filename::SectionFilename;
use super::parser::parse_section;
use super::{Deck, Section};
use crate::errors::{DeckError, Result};

/// Load every `<int>[-<slug>].md` file under `dir` into a deck.
///
/// Never fails: an unreadable directory yields an empty deck, and files
/// that cannot be named or read are skipped with a warning.
pub fn load_deck(dir: &Path) -> Deck {
    let start = Instant::now();

    let sections = match read_sections(dir) {
        Ok(sections) => sections,
        Err(e) => {
            warn!("Unable to read deck directory {}: {}", dir.display(), e);
            return Deck::empty();
        }
    };

    let deck = Deck::new(sections);
    info!(
        "Loaded deck from {}: {} sections, {} slides in {:?}",
        dir.display(),
        deck.section_count(),
        deck.slide_count(),
        start.elapsed()
    );
    deck
}

fn read_sections(dir: &Path) -> Result<Vec<Section>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        DeckError::file_operation(format!("read_dir {}: {}", dir.display(), e))
    })?;

    let mut sections = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.ends_with(".md") {
            debug!("Ignoring non-markdown file {}", file_name);
            continue;
        }

        let filename = match SectionFilename::parse(&file_name) {
            Ok(filename) => filename,
            Err(e) => {
                warn!("Skipping {}", e.format_simple());
                continue;
            }
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let section = parse_section(&filename, &raw);
        debug!(
            "Parsed section {} ({} slides)",
            section.id,
            section.slides.len()
        );
        sections.push(section);
    }

    Ok(sections)
}
