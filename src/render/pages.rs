use askama::Template;

use super::diagram::render_diagrams;
use super::timer::{self, TimerDisplay};
use crate::config::StaticConfig;
use crate::deck::{Deck, Slide};
use crate::errors::Result;

/// Values shared by every page
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Shown in the browser title
    pub label: String,
    /// Base URL for client event POSTs, empty when logging is off
    pub api_base: String,
}

impl PageContext {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            label: config.deck.session_label.clone(),
            api_base: config.analytics.endpoint().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "slide.html")]
pub struct SlidePage<'a> {
    pub label: &'a str,
    pub api_base: &'a str,
    pub slide: &'a Slide,
    pub body_html: String,
    pub css_classes: String,
    pub total_slides: usize,
    pub section_position: usize,
    pub section_count: usize,
    pub prev_path: String,
    pub next_path: String,
    pub has_timer: bool,
    pub duration_seconds: u64,
    pub timer: TimerDisplay,
}

#[derive(Template)]
#[template(path = "empty.html")]
pub struct EmptyDeckPage<'a> {
    pub label: &'a str,
    pub api_base: &'a str,
    pub directory: &'a str,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage<'a> {
    pub label: &'a str,
    pub api_base: &'a str,
    pub requested: &'a str,
}

/// Render the page for `slide`
pub fn render_slide(deck: &Deck, slide: &Slide, ctx: &PageContext) -> Result<String> {
    let (prev_path, next_path) = match deck.neighbors(&slide.id) {
        Some((prev, next)) => (prev.path(), next.path()),
        None => (slide.path(), slide.path()),
    };
    let duration = deck
        .section_of(slide)
        .and_then(|s| s.section_duration_seconds);

    let page = SlidePage {
        label: &ctx.label,
        api_base: &ctx.api_base,
        slide,
        body_html: render_diagrams(&slide.content_html),
        css_classes: slide.style_options.css_classes(),
        total_slides: deck.slide_count(),
        section_position: deck.section_position(&slide.section_id).unwrap_or(1),
        section_count: deck.section_count(),
        prev_path,
        next_path,
        has_timer: duration.is_some(),
        duration_seconds: duration.unwrap_or_default(),
        timer: timer::display(duration, 0),
    };

    Ok(page.render()?)
}

pub fn render_empty_deck(directory: &str, ctx: &PageContext) -> Result<String> {
    let page = EmptyDeckPage {
        label: &ctx.label,
        api_base: &ctx.api_base,
        directory,
    };
    Ok(page.render()?)
}

pub fn render_not_found(requested: &str, ctx: &PageContext) -> Result<String> {
    let page = NotFoundPage {
        label: &ctx.label,
        api_base: &ctx.api_base,
        requested,
    };
    Ok(page.render()?)
}
