use std::collections::HashSet;

/// Slug used when a heading has no usable characters
pub const FALLBACK_SLUG: &str = "slide";

/// Lowercase, dash-separated slug of `text`.
///
/// Whitespace runs become `-`, anything outside `[a-z0-9_-]` is dropped,
/// repeated dashes collapse and edge dashes are trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out unique slugs within one section.
///
/// The first occurrence keeps the base slug; later duplicates get `-2`,
/// `-3`, ... skipping any candidate already taken.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    used: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Overview"), "overview");
        assert_eq!(slugify("  Why Rust?  "), "why-rust");
        assert_eq!(slugify("Q&A -- Wrap up"), "qa-wrap-up");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_drops_edge_dashes() {
        assert_eq!(slugify("- Bullet -"), "bullet");
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
    }

    #[test]
    fn test_duplicates_get_numeric_suffix() {
        let mut slugs = SlugAllocator::new();
        assert_eq!(slugs.allocate("overview"), "overview");
        assert_eq!(slugs.allocate("overview"), "overview-2");
        assert_eq!(slugs.allocate("overview"), "overview-3");
        assert_eq!(slugs.allocate("summary"), "summary");
    }

    #[test]
    fn test_suffix_skips_taken_candidates() {
        let mut slugs = SlugAllocator::new();
        assert_eq!(slugs.allocate("overview-2"), "overview-2");
        assert_eq!(slugs.allocate("overview"), "overview");
        assert_eq!(slugs.allocate("overview"), "overview-3");
    }
}
