//! Mermaid code block detection in rendered slide HTML
//!
//! Fenced ```` ```mermaid ```` blocks come out of the markdown renderer as
//! `<pre><code class="language-mermaid">`. They are swapped for
//! `<div class="mermaid">` containers that the page script renders.

use std::sync::LazyLock;

use regex::Regex;

static MERMAID_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<pre[^>]*>\s*<code[^>]*class="[^"]*language-mermaid[^"]*"[^>]*>(.*?)</code>\s*</pre>"#,
    )
    .expect("valid mermaid block regex")
});

/// A piece of slide HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Markup passed through untouched
    Html(String),
    /// Decoded diagram source
    Diagram(String),
}

/// Split `html` into markup and diagram segments, in document order
pub fn split_segments(html: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in MERMAID_BLOCK.captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Html(html[last..whole.start()].to_string()));
        }
        let source = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        segments.push(Segment::Diagram(decode_entities(source.trim())));
        last = whole.end();
    }

    if last < html.len() {
        segments.push(Segment::Html(html[last..].to_string()));
    }

    segments
}

/// Rewrite diagram code blocks as mermaid containers
pub fn render_diagrams(html: &str) -> String {
    if !html.contains("language-mermaid") {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    for segment in split_segments(html) {
        match segment {
            Segment::Html(markup) => out.push_str(&markup),
            Segment::Diagram(source) => {
                out.push_str("<div class=\"diagram\"><div class=\"mermaid\">");
                out.push_str(&encode_entities(&source));
                out.push_str("</div></div>");
            }
        }
    }
    out
}

pub fn decode_entities(text: &str) -> String {
    text.replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn encode_entities(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
