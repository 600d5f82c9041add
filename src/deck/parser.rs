//! Markdown → section transform
//!
//! The body is tokenized with pulldown-cmark and scanned linearly:
//! the first level-1 heading is lifted out as the section title, every
//! level-2 heading opens a slide, and an HTML comment block sitting right
//! after a level-2 heading is read as that slide's style directive.

use std::borrow::Cow;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use tracing::debug;

use super::directives::{self, StyleOptions};
use super::filename::SectionFilename;
use super::frontmatter;
use super::slug::{SlugAllocator, slugify};
use super::{Section, Slide};

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Parse one section file.
///
/// `raw` is the full file text including frontmatter. Slides get
/// section-local numbers; global numbers are assigned by [`super::Deck::new`].
pub fn parse_section(filename: &SectionFilename, raw: &str) -> Section {
    let source = format!("{}.md", filename.id);
    let (frontmatter, body) = frontmatter::extract(raw, &source);
    let duration = directives::parse_section_time(raw);

    let mut events: Vec<Event<'_>> = Parser::new_ext(body, markdown_options()).collect();
    let heading_title = take_first_heading(&mut events, HeadingLevel::H1);

    let title = frontmatter
        .title
        .or(heading_title)
        .or_else(|| filename.slug_title())
        .unwrap_or_else(|| format!("Section {}", filename.number));
    let title = capitalize_first(&title);

    let mut slides = split_slides(&filename.id, &title, events);
    for (index, slide) in slides.iter_mut().enumerate() {
        slide.number = index + 1;
        slide.slide_number = index + 1;
        slide.section_id = filename.id.clone();
        slide.section_number = filename.number;
        slide.section_title = title.clone();
    }

    Section {
        id: filename.id.clone(),
        number: filename.number,
        slug: filename.slug.clone(),
        title,
        section_duration_seconds: duration,
        metadata: frontmatter.metadata,
        slides,
    }
}

fn is_heading_start(event: &Event<'_>, wanted: HeadingLevel) -> bool {
    matches!(event, Event::Start(Tag::Heading { level, .. }) if *level == wanted)
}

fn is_heading_end(event: &Event<'_>, wanted: HeadingLevel) -> bool {
    matches!(event, Event::End(TagEnd::Heading(level)) if *level == wanted)
}

/// Remove the first heading of `level` and return its text
fn take_first_heading(events: &mut Vec<Event<'_>>, level: HeadingLevel) -> Option<String> {
    let start = events.iter().position(|e| is_heading_start(e, level))?;
    let end = start
        + events[start..]
            .iter()
            .position(|e| is_heading_end(e, level))?;

    let text = heading_text(&events[start + 1..end]);
    events.drain(start..=end);

    (!text.is_empty()).then_some(text)
}

/// Plain text of heading content events
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) | Event::InlineMath(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_slides<'a>(section_id: &str, section_title: &str, events: Vec<Event<'a>>) -> Vec<Slide> {
    let mut preamble: Vec<Event<'a>> = Vec::new();
    let mut chunks: Vec<Vec<Event<'a>>> = Vec::new();

    for event in events {
        if is_heading_start(&event, HeadingLevel::H2) {
            chunks.push(vec![event]);
            continue;
        }
        match chunks.last_mut() {
            Some(chunk) => chunk.push(event),
            None => preamble.push(event),
        }
    }

    if chunks.is_empty() {
        return vec![Slide {
            id: section_id.to_string(),
            slug: section_id.to_string(),
            slug_parts: vec![section_id.to_string()],
            title: section_title.to_string(),
            number: 0,
            slide_number: 0,
            section_id: String::new(),
            section_number: 0,
            section_title: String::new(),
            content_html: render_html(preamble),
            style_options: StyleOptions::default(),
        }];
    }

    if !render_html(preamble).trim().is_empty() {
        debug!(
            "Section {}: content before the first level-2 heading is not part of any slide",
            section_id
        );
    }

    let mut slugs = SlugAllocator::new();
    chunks
        .into_iter()
        .map(|chunk| build_slide(section_id, &mut slugs, chunk))
        .collect()
}

fn build_slide(section_id: &str, slugs: &mut SlugAllocator, mut chunk: Vec<Event<'_>>) -> Slide {
    // chunk[0] is the level-2 heading start
    let heading_end = chunk
        .iter()
        .position(|e| is_heading_end(e, HeadingLevel::H2))
        .unwrap_or(chunk.len().saturating_sub(1));
    let title = heading_text(&chunk[1..heading_end.max(1)]);

    let mut body: Vec<Event<'_>> = chunk.split_off((heading_end + 1).min(chunk.len()));
    let style_options = take_style_directive(&mut body);

    let slug = slugs.allocate(&slugify(&title));

    Slide {
        id: format!("{}-{}", section_id, slug),
        slug_parts: vec![section_id.to_string(), slug.clone()],
        slug,
        title,
        number: 0,
        slide_number: 0,
        section_id: String::new(),
        section_number: 0,
        section_title: String::new(),
        content_html: render_html(body),
        style_options,
    }
}

/// Consume a style directive if it is the first block of `body`
fn take_style_directive(body: &mut Vec<Event<'_>>) -> StyleOptions {
    let Some((html, consumed)) = leading_html_block(body) else {
        return StyleOptions::default();
    };

    match StyleOptions::from_directive(&html) {
        Some(options) => {
            body.drain(..consumed);
            options
        }
        None => StyleOptions::default(),
    }
}

/// Text of the HTML block opening `body` and the number of events it spans
fn leading_html_block(body: &[Event<'_>]) -> Option<(String, usize)> {
    match body.first()? {
        Event::Start(Tag::HtmlBlock) => {
            let mut html = String::new();
            for (index, event) in body.iter().enumerate().skip(1) {
                match event {
                    Event::Html(chunk) => html.push_str(chunk),
                    Event::End(TagEnd::HtmlBlock) => return Some((html, index + 1)),
                    _ => return None,
                }
            }
            None
        }
        Event::Html(chunk) => Some((chunk.to_string(), 1)),
        _ => None,
    }
}

fn render_html(events: Vec<Event<'_>>) -> String {
    let events = events.into_iter().filter_map(|event| match event {
        Event::Html(raw) => without_section_time(raw).map(Event::Html),
        Event::InlineHtml(raw) => without_section_time(raw).map(Event::InlineHtml),
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

fn without_section_time(raw: CowStr<'_>) -> Option<CowStr<'_>> {
    let stripped = match directives::strip_section_time(&raw) {
        Cow::Borrowed(_) => None,
        Cow::Owned(s) => Some(s),
    };

    match stripped {
        None => Some(raw),
        Some(s) if s.trim().is_empty() => None,
        Some(s) => Some(CowStr::from(s)),
    }
}
