//! YAML frontmatter handling
//!
//! A section file may open with a `---` fenced YAML mapping. Only `title`
//! has a meaning for the deck; other keys are carried as metadata.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::errors::{DeckError, Result};

/// Parsed frontmatter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Split a leading `---` block off `raw`.
///
/// Returns the YAML text (without fences) and the remaining body. Files
/// without a closed frontmatter block return `(None, raw)`.
pub fn split(raw: &str) -> (Option<&str>, &str) {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(rest) = text
        .strip_prefix("---\r\n")
        .or_else(|| text.strip_prefix("---\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Parse frontmatter YAML into title and metadata
pub fn parse(yaml: &str) -> Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err(DeckError::parse("frontmatter must be a YAML mapping"));
    };

    let mut frontmatter = Frontmatter::default();
    for (key, value) in mapping {
        let Some(key) = key.as_str().map(str::to_string) else {
            debug!("Ignoring non-string frontmatter key: {:?}", key);
            continue;
        };

        if key == "title" {
            frontmatter.title = scalar_to_string(&value);
            continue;
        }

        match serde_json::to_value(&value) {
            Ok(json) => {
                frontmatter.metadata.insert(key, json);
            }
            Err(e) => debug!("Ignoring frontmatter key {}: {}", key, e),
        }
    }

    Ok(frontmatter)
}

/// Split and parse in one step; malformed YAML is logged and treated as absent.
pub fn extract<'a>(raw: &'a str, source: &str) -> (Frontmatter, &'a str) {
    match split(raw) {
        (Some(yaml), body) => match parse(yaml) {
            Ok(frontmatter) => (frontmatter, body),
            Err(e) => {
                warn!("Invalid frontmatter in {}: {}", source, e);
                (Frontmatter::default(), body)
            }
        },
        (None, body) => (Frontmatter::default(), body),
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    let text = match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_without_frontmatter() {
        let raw = "# Title\n\nBody";
        assert_eq!(split(raw), (None, raw));
    }

    #[test]
    fn test_split_with_frontmatter() {
        let raw = "---\ntitle: Hello\n---\n# Heading\n";
        let (yaml, body) = split(raw);
        assert_eq!(yaml, Some("title: Hello\n"));
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn test_split_crlf() {
        let raw = "---\r\ntitle: Hello\r\n---\r\nBody";
        let (yaml, body) = split(raw);
        assert_eq!(yaml, Some("title: Hello\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let raw = "---\ntitle: Hello\n# Heading";
        assert_eq!(split(raw), (None, raw));
    }

    #[test]
    fn test_parse_title_and_metadata() {
        let fm = parse("title: Getting Started\nspeaker: Ada\nlevel: 2\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Getting Started"));
        assert_eq!(fm.metadata["speaker"], serde_json::json!("Ada"));
        assert_eq!(fm.metadata["level"], serde_json::json!(2));
    }

    #[test]
    fn test_numeric_title_becomes_string() {
        let fm = parse("title: 2024\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("2024"));
    }

    #[test]
    fn test_non_mapping_is_error() {
        assert!(parse("- a\n- b\n").is_err());
    }

    #[test]
    fn test_extract_tolerates_bad_yaml() {
        let raw = "---\ntitle: [unclosed\n---\nBody";
        let (fm, body) = extract(raw, "1-x.md");
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Body");
    }
}
