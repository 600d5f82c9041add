use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{DeckError, Result};

static SECTION_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:-(.*))?$").expect("valid section filename regex"));

/// Parsed `<int>[-<slug>].md` filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFilename {
    /// File stem, used as the section id
    pub id: String,
    pub number: u32,
    /// Part after the first `-`, empty for `3.md`
    pub slug: String,
}

impl SectionFilename {
    /// Parse a file name such as `2-deep-dive.md`
    pub fn parse(file_name: &str) -> Result<Self> {
        let stem = file_name.strip_suffix(".md").ok_or_else(|| {
            DeckError::invalid_filename(format!("{}: not a markdown file", file_name))
        })?;

        let caps = SECTION_FILENAME.captures(stem).ok_or_else(|| {
            DeckError::invalid_filename(format!(
                "{}: must start with a number (e.g. \"1-introduction.md\")",
                file_name
            ))
        })?;

        let number = caps[1].parse::<u32>().map_err(|e| {
            DeckError::invalid_filename(format!("{}: bad section number: {}", file_name, e))
        })?;
        let slug = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        Ok(Self {
            id: stem.to_string(),
            number,
            slug: slug.to_string(),
        })
    }

    /// Fallback title derived from the slug, e.g. `deep dive`
    pub fn slug_title(&self) -> Option<String> {
        let title = self.slug.replace('-', " ");
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }
}
