//! Markdown deck model
//!
//! A deck is derived from a directory of `<int>[-<slug>].md` files:
//! every file is a [`Section`], every level-2 heading inside it starts a
//! [`Slide`]. Nothing is persisted; numbering is recomputed on every load.
//!
//! # Layout
//! - `filename`: section filename parsing
//! - `frontmatter`: YAML frontmatter split/parse
//! - `directives`: `<!-- ... -->` directive vocabulary
//! - `slug`: slug generation and collision handling
//! - `parser`: markdown → section transform
//! - `loader`: directory → deck
//! - `lookup`: id / slug / number resolution
//! - `store`: read-through access with optional memoization

pub mod directives;
pub mod filename;
pub mod frontmatter;
pub mod loader;
pub mod lookup;
pub mod parser;
pub mod slug;
pub mod store;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

pub use directives::StyleOptions;
pub use filename::SectionFilename;
pub use loader::load_deck;
pub use lookup::SlideLookup;
pub use parser::parse_section;
pub use store::DeckStore;

/// One level-2-heading-delimited unit of a section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// `<section id>-<slug>`, or the section id for single-slide sections
    pub id: String,
    /// Heading slug after collision suffixing
    pub slug: String,
    /// Path segments under `/slides/`
    pub slug_parts: Vec<String>,
    pub title: String,
    /// 1-based position in the whole deck
    pub number: usize,
    /// 1-based position inside the section
    pub slide_number: usize,
    pub section_id: String,
    pub section_number: u32,
    pub section_title: String,
    pub content_html: String,
    pub style_options: StyleOptions,
}

impl Slide {
    /// Page path for this slide, e.g. `/slides/1-intro/overview`
    pub fn path(&self) -> String {
        format!("/slides/{}", self.slug_parts.join("/"))
    }

    /// Apply a suffixed id, keeping slug and path segments in step with it
    fn rename(&mut self, id: String) {
        match self.slug_parts.as_mut_slice() {
            [_, last] => {
                let suffix = id.strip_prefix(self.id.as_str()).unwrap_or_default();
                last.push_str(suffix);
                self.slug.push_str(suffix);
            }
            _ => {
                self.slug_parts = vec![id.clone()];
                self.slug = id.clone();
            }
        }
        self.id = id;
    }
}

/// One markdown file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// File stem, e.g. `1-introduction`
    pub id: String,
    pub number: u32,
    /// Filename part after the number (may be empty)
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_duration_seconds: Option<u64>,
    /// Frontmatter keys other than `title`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub slides: Vec<Slide>,
}

/// Slide metadata without the rendered body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSummary {
    pub id: String,
    pub slug_parts: Vec<String>,
    pub title: String,
    pub number: usize,
    pub slide_number: usize,
    pub section_id: String,
    pub section_number: u32,
    pub style_options: StyleOptions,
}

impl From<&Slide> for SlideSummary {
    fn from(slide: &Slide) -> Self {
        Self {
            id: slide.id.clone(),
            slug_parts: slide.slug_parts.clone(),
            title: slide.title.clone(),
            number: slide.number,
            slide_number: slide.slide_number,
            section_id: slide.section_id.clone(),
            section_number: slide.section_number,
            style_options: slide.style_options,
        }
    }
}

/// Section metadata with slide summaries, used by the JSON outline
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOutline {
    pub id: String,
    pub number: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_duration_seconds: Option<u64>,
    pub slides: Vec<SlideSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckOutline {
    pub total_slides: usize,
    pub total_sections: usize,
    pub sections: Vec<SectionOutline>,
}

/// The ordered collection of sections and slides
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Deck {
    sections: Vec<Section>,
}

impl Deck {
    /// Build a deck: sort sections by number (ties by id) and assign
    /// global slide numbers in section-then-document order.
    pub fn new(mut sections: Vec<Section>) -> Self {
        sections.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));

        let mut ids = slug::SlugAllocator::new();
        let mut global = 0;
        for section in &mut sections {
            for (index, slide) in section.slides.iter_mut().enumerate() {
                let id = ids.allocate(&slide.id);
                if id != slide.id {
                    warn!("Duplicate slide id {}, renamed to {}", slide.id, id);
                    slide.rename(id);
                }
                global += 1;
                slide.number = global;
                slide.slide_number = index + 1;
                slide.section_id = section.id.clone();
                slide.section_number = section.number;
                slide.section_title = section.title.clone();
            }
        }

        Self { sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All slides, flattened in deck order
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.sections.iter().flat_map(|s| s.slides.iter())
    }

    pub fn slide_count(&self) -> usize {
        self.sections.iter().map(|s| s.slides.len()).sum()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slide_count() == 0
    }

    pub fn first_slide(&self) -> Option<&Slide> {
        self.slides().next()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Section that owns `slide`
    pub fn section_of(&self, slide: &Slide) -> Option<&Section> {
        self.section(&slide.section_id)
    }

    /// 1-based ordinal of a section in deck order
    pub fn section_position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id).map(|i| i + 1)
    }

    /// Previous and next slide around `id`, wrapping at both ends
    pub fn neighbors(&self, id: &str) -> Option<(&Slide, &Slide)> {
        let slides: Vec<&Slide> = self.slides().collect();
        let index = slides.iter().position(|s| s.id == id)?;
        let len = slides.len();
        let prev = slides[(index + len - 1) % len];
        let next = slides[(index + 1) % len];
        Some((prev, next))
    }

    pub fn summaries(&self) -> Vec<SlideSummary> {
        self.slides().map(SlideSummary::from).collect()
    }

    pub fn outline(&self) -> DeckOutline {
        DeckOutline {
            total_slides: self.slide_count(),
            total_sections: self.section_count(),
            sections: self
                .sections
                .iter()
                .map(|section| SectionOutline {
                    id: section.id.clone(),
                    number: section.number,
                    title: section.title.clone(),
                    section_duration_seconds: section.section_duration_seconds,
                    slides: section.slides.iter().map(SlideSummary::from).collect(),
                })
                .collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::section;
    use super::*;

    #[test]
    fn test_global_numbering_flattens_sections() {
        let deck = Deck::new(vec![
            section(2, "body", &["c", "d", "e"]),
            section(1, "intro", &["a", "b"]),
        ]);

        let numbered: Vec<(usize, usize, &str)> = deck
            .slides()
            .map(|s| (s.number, s.slide_number, s.id.as_str()))
            .collect();
        assert_eq!(
            numbered,
            vec![
                (1, 1, "1-intro-a"),
                (2, 2, "1-intro-b"),
                (3, 1, "2-body-c"),
                (4, 2, "2-body-d"),
                (5, 3, "2-body-e"),
            ]
        );
    }

    #[test]
    fn test_colliding_ids_across_sections_get_suffixed() {
        // `2.md` with `## Demo` and a single-slide `2-demo.md`
        let mut single = section(2, "demo", &["demo"]);
        single.slides[0].id = "2-demo".to_string();
        single.slides[0].slug = "2-demo".to_string();
        single.slides[0].slug_parts = vec!["2-demo".to_string()];
        let mut headed = section(2, "", &["demo"]);
        headed.id = "2".to_string();
        headed.slides[0].id = "2-demo".to_string();
        headed.slides[0].slug_parts = vec!["2".to_string(), "demo".to_string()];

        let deck = Deck::new(vec![single, headed]);
        let ids: Vec<&str> = deck.slides().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2-demo", "2-demo-2"]);

        let renamed = deck.slide("2-demo-2").unwrap();
        assert_eq!(renamed.section_id, "2-demo");
        assert_eq!(renamed.path(), "/slides/2-demo-2");
        assert_eq!(deck.resolve("2-demo").slide().unwrap().section_id, "2");
    }

    #[test]
    fn test_colliding_two_part_id_keeps_path_in_step() {
        let mut clash = section(1, "intro", &["a-b"]);
        clash.id = "1-intro-a".to_string();
        clash.slides[0].id = "1-intro-a-b".to_string();
        clash.slides[0].slug_parts = vec!["1-intro-a".to_string(), "b".to_string()];
        clash.slides[0].slug = "b".to_string();

        let deck = Deck::new(vec![section(1, "intro", &["a-b"]), clash]);
        let second = deck.slides().nth(1).unwrap();
        assert_eq!(second.id, "1-intro-a-b-2");
        assert_eq!(second.slug, "b-2");
        assert_eq!(second.path(), "/slides/1-intro-a/b-2");
        assert_eq!(
            deck.resolve_path(&["1-intro-a", "b-2"]).slide().unwrap().id,
            "1-intro-a-b-2"
        );
    }

    #[test]
    fn test_sections_with_same_number_sort_by_id() {
        let deck = Deck::new(vec![section(1, "zeta", &["a"]), section(1, "alpha", &["a"])]);
        let ids: Vec<&str> = deck.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1-alpha", "1-zeta"]);
    }

    #[test]
    fn test_slides_carry_section_fields() {
        let deck = Deck::new(vec![section(4, "wrap-up", &["thanks"])]);
        let slide = deck.first_slide().unwrap();
        assert_eq!(slide.section_id, "4-wrap-up");
        assert_eq!(slide.section_number, 4);
        assert_eq!(slide.section_title, "wrap-up");
        assert_eq!(deck.section_position("4-wrap-up"), Some(1));
    }

    #[test]
    fn test_neighbors_wrap_around() {
        let deck = Deck::new(vec![section(1, "a", &["x", "y", "z"])]);

        let (prev, next) = deck.neighbors("1-a-x").unwrap();
        assert_eq!(prev.id, "1-a-z");
        assert_eq!(next.id, "1-a-y");

        let (prev, next) = deck.neighbors("1-a-z").unwrap();
        assert_eq!(prev.id, "1-a-y");
        assert_eq!(next.id, "1-a-x");

        assert!(deck.neighbors("missing").is_none());
    }

    #[test]
    fn test_single_slide_is_its_own_neighbor() {
        let deck = Deck::new(vec![section(1, "a", &["only"])]);
        let (prev, next) = deck.neighbors("1-a-only").unwrap();
        assert_eq!(prev.id, "1-a-only");
        assert_eq!(next.id, "1-a-only");
    }

    #[test]
    fn test_outline_serializes_camel_case() {
        let deck = Deck::new(vec![section(1, "a", &["x"])]);
        let json = serde_json::to_value(deck.outline()).unwrap();
        assert_eq!(json["totalSlides"], 1);
        assert_eq!(json["sections"][0]["slides"][0]["slideNumber"], 1);
        assert_eq!(json["sections"][0]["slides"][0]["styleOptions"]["isLead"], false);
    }

    #[test]
    fn test_empty_deck() {
        let deck = Deck::empty();
        assert!(deck.is_empty());
        assert!(deck.first_slide().is_none());
        assert_eq!(deck.slide_count(), 0);
    }
}
