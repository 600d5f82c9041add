//! HTML-comment directives embedded in markdown
//!
//! - `<!-- section-time: N[s|m] -->` anywhere in a section file sets its duration
//! - `<!-- hide-title -->`, `<!-- lead -->`, `<!-- image-columns -->` (and
//!   comma-joined combinations such as `<!-- hide-title, lead -->`) right after
//!   a level-2 heading set that slide's style flags

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SECTION_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*section-time:\s*(\d+)\s*([smSM]?)\s*-->").expect("valid section-time regex")
});

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<!--(.*?)-->\s*$").expect("valid comment regex"));

/// Per-slide rendering flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    pub hide_title: bool,
    pub is_lead: bool,
    pub image_columns: bool,
}

impl StyleOptions {
    /// Interpret an HTML block as a style directive.
    ///
    /// The block must be a single comment whose comma-separated tokens all
    /// belong to the vocabulary; anything else is not a directive.
    pub fn from_directive(html: &str) -> Option<Self> {
        let caps = HTML_COMMENT.captures(html)?;
        let body = caps.get(1)?.as_str();

        let mut options = StyleOptions::default();
        let mut seen = false;
        for token in body.split(',').map(str::trim) {
            match token {
                "hide-title" => options.hide_title = true,
                "lead" => options.is_lead = true,
                "image-columns" => options.image_columns = true,
                _ => return None,
            }
            seen = true;
        }

        seen.then_some(options)
    }

    /// Space separated CSS classes for the slide container
    pub fn css_classes(&self) -> String {
        let mut classes = Vec::new();
        if self.is_lead {
            classes.push("lead");
        }
        if self.image_columns {
            classes.push("image-columns");
        }
        if self.hide_title {
            classes.push("hide-title");
        }
        classes.join(" ")
    }
}

/// Duration from the first `section-time` directive in the raw file text
pub fn parse_section_time(raw: &str) -> Option<u64> {
    let caps = SECTION_TIME.captures(raw)?;
    let value: u64 = caps[1].parse().ok()?;
    let unit = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    if unit.eq_ignore_ascii_case("m") {
        value.checked_mul(60)
    } else {
        Some(value)
    }
}

/// Remove `section-time` directives from an HTML fragment
pub fn strip_section_time(html: &str) -> std::borrow::Cow<'_, str> {
    SECTION_TIME.replace_all(html, "")
}
