//! `outline` and `show` commands

use colored::Colorize;

use crate::deck::{Deck, DeckOutline, DeckStore, Slide, SlideLookup};
use crate::interfaces::cli::CliError;
use crate::render::timer::format_clock;

pub fn outline(store: &DeckStore, json: bool) -> Result<(), CliError> {
    let deck = store.load();
    let outline = deck.outline();

    if json {
        let text = serde_json::to_string_pretty(&outline)
            .map_err(|e| CliError::CommandError(format!("Failed to serialize outline: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    if deck.is_empty() {
        println!(
            "{} No slides found in {}",
            "ℹ".bold().blue(),
            store.directory().display().to_string().yellow()
        );
        return Ok(());
    }

    println!("{}", "Deck outline:".bold().green());
    println!();
    print!("{}", render_outline(&outline));
    println!();
    println!(
        "{} {} slides in {} sections",
        "ℹ".bold().blue(),
        outline.total_slides.to_string().green(),
        outline.total_sections.to_string().green()
    );
    Ok(())
}

/// Plain-text outline, one line per section and per slide
pub fn render_outline(outline: &DeckOutline) -> String {
    let mut out = String::new();
    for section in &outline.sections {
        let duration = section
            .section_duration_seconds
            .map(|s| format!(" [{}]", format_clock(s)))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}. {}{} ({})\n",
            section.number, section.title, duration, section.id
        ));
        for slide in &section.slides {
            out.push_str(&format!(
                "  {:>3}  {}  {}\n",
                slide.number, slide.id, slide.title
            ));
        }
    }
    out
}

pub fn show_slide(store: &DeckStore, key: &str) -> Result<(), CliError> {
    let deck = store.load();

    let slide = match lookup(&deck, key) {
        SlideLookup::Found(slide) => slide,
        SlideLookup::Redirect(slide) => {
            println!(
                "{} {} redirects to {}",
                "→".bold().blue(),
                key.cyan(),
                slide.path().cyan()
            );
            slide
        }
        SlideLookup::NotFound => {
            return Err(CliError::CommandError(format!("Slide not found: {}", key)));
        }
    };

    print!("{}", describe_slide(&deck, slide));
    Ok(())
}

/// Resolve `key` the way `/slides/...` does: `1-intro/agenda`, an id or a number
pub fn lookup<'a>(deck: &'a Deck, key: &str) -> SlideLookup<'a> {
    let key = key.trim().trim_start_matches("/slides/");
    let segments: Vec<&str> = key.split('/').collect();
    deck.resolve_path(&segments)
}

/// Header block plus the rendered HTML
pub fn describe_slide(deck: &Deck, slide: &Slide) -> String {
    let flags = slide.style_options.css_classes();
    let section_position = deck.section_position(&slide.section_id).unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("Title:   {}\n", slide.title));
    out.push_str(&format!("Id:      {}\n", slide.id));
    out.push_str(&format!("Path:    {}\n", slide.path()));
    out.push_str(&format!(
        "Number:  {} of {} ({} in section)\n",
        slide.number,
        deck.slide_count(),
        slide.slide_number
    ));
    out.push_str(&format!(
        "Section: {} of {} ({})\n",
        section_position,
        deck.section_count(),
        slide.section_title
    ));
    if !flags.is_empty() {
        out.push_str(&format!("Flags:   {}\n", flags));
    }
    out.push('\n');
    out.push_str(&slide.content_html);
    if !slide.content_html.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::test_support::section;

    #[test]
    fn test_render_outline_lists_every_slide() {
        let mut first = section(1, "intro", &["welcome", "agenda"]);
        first.section_duration_seconds = Some(300);
        let deck = Deck::new(vec![first, section(2, "core", &["ideas"])]);

        let text = render_outline(&deck.outline());
        assert!(text.contains("[05:00]"));
        assert!(text.contains("1-intro-welcome"));
        assert!(text.contains("1-intro-agenda"));
        assert!(text.contains("2-core-ideas"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_lookup_accepts_page_paths() {
        let deck = Deck::new(vec![
            section(1, "intro", &["welcome", "agenda"]),
            section(2, "core", &["ideas"]),
        ]);

        assert_eq!(lookup(&deck, "1-intro/agenda").slide().unwrap().id, "1-intro-agenda");
        assert_eq!(lookup(&deck, "/slides/2-core/ideas").slide().unwrap().id, "2-core-ideas");
        assert_eq!(lookup(&deck, "1-intro-welcome").slide().unwrap().number, 1);
        assert!(matches!(lookup(&deck, "3"), SlideLookup::Redirect(s) if s.id == "2-core-ideas"));
        assert_eq!(lookup(&deck, "9-none/x"), SlideLookup::NotFound);
    }

    #[test]
    fn test_describe_slide() {
        let deck = Deck::new(vec![section(1, "intro", &["welcome", "agenda"])]);
        let slide = deck.slides().nth(1).unwrap();
        let text = describe_slide(&deck, slide);
        assert!(text.contains("Number:  2 of 2 (2 in section)"));
        assert!(text.contains("Section: 1 of 1"));
        assert!(!text.contains("Flags:"));
    }
}
