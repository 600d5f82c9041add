//! Slide resolution by id, slug or global number

use super::{Deck, Slide};

/// Outcome of resolving a slide key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideLookup<'a> {
    /// Key names the slide directly
    Found(&'a Slide),
    /// Key is a global number; callers should redirect to the canonical path
    Redirect(&'a Slide),
    NotFound,
}

impl<'a> SlideLookup<'a> {
    pub fn slide(&self) -> Option<&'a Slide> {
        match self {
            SlideLookup::Found(slide) | SlideLookup::Redirect(slide) => Some(slide),
            SlideLookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, SlideLookup::NotFound)
    }
}

impl Deck {
    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides().find(|s| s.id == id)
    }

    /// Slide at 1-based global position `number`
    pub fn slide_by_number(&self, number: usize) -> Option<&Slide> {
        number.checked_sub(1).and_then(|index| self.slides().nth(index))
    }

    /// First slide (deck order) whose id or slug matches ignoring case
    pub fn find_ignore_case(&self, key: &str) -> Option<&Slide> {
        self.slides()
            .find(|s| s.id.eq_ignore_ascii_case(key) || s.slug.eq_ignore_ascii_case(key))
    }

    /// Resolve a single key.
    ///
    /// Order: exact id, then an all-digit key as a global number
    /// (`Redirect`), then case-insensitive id or slug. An out-of-range number
    /// can still match a slide slugged from a numbered heading.
    pub fn resolve(&self, key: &str) -> SlideLookup<'_> {
        let key = key.trim();
        if key.is_empty() {
            return SlideLookup::NotFound;
        }

        if let Some(slide) = self.slide(key) {
            return SlideLookup::Found(slide);
        }

        if key.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(slide) = key.parse::<usize>().ok().and_then(|n| self.slide_by_number(n)) {
                return SlideLookup::Redirect(slide);
            }
        }

        self.find_ignore_case(key)
            .map_or(SlideLookup::NotFound, SlideLookup::Found)
    }

    /// Resolve the path segments under `/slides/`.
    ///
    /// Segments are joined with `-` and resolved as one key. When that
    /// misses on a multi-segment path, the last segment is tried as a slug,
    /// preferring a slide in the section named by the first segment.
    pub fn resolve_path(&self, segments: &[&str]) -> SlideLookup<'_> {
        let segments: Vec<&str> = segments
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let Some(last) = segments.last() else {
            return SlideLookup::NotFound;
        };

        let joined = segments.join("-");
        let lookup = self.resolve(&joined);
        if lookup.is_found() || segments.len() == 1 {
            return lookup;
        }

        let first = segments[0];
        let in_section = self.slides().find(|s| {
            s.section_id.eq_ignore_ascii_case(first) && s.slug.eq_ignore_ascii_case(last)
        });
        if let Some(slide) = in_section {
            return SlideLookup::Found(slide);
        }

        self.slides()
            .find(|s| s.slug.eq_ignore_ascii_case(last))
            .map_or(SlideLookup::NotFound, SlideLookup::Found)
    }
}
