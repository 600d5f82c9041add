//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for slidedeck using clap's derive macros.

use clap::{Parser, Subcommand};
use serde_json::Value;

/// slidedeck - serve a markdown slide deck
#[derive(Parser, Debug)]
#[command(name = "slidedeck")]
#[command(version)]
#[command(about = "Serve a slide deck from a directory of markdown files", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Print sections and slides
    Outline {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a slide key the way the page router does and print it
    Show {
        /// Slide id, slug or global number
        key: String,
    },

    /// POST one event to the configured log endpoint
    ///
    /// Usage: send-event slide_navigation --field fromSlide=1-intro --field toSlide=1-agenda
    SendEvent {
        /// Event type, e.g. slide_navigation
        event_type: String,

        /// Extra field as key=value; values that parse as JSON keep their type
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Parse `key=value`
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_string_and_json() {
        assert_eq!(
            parse_field("toSlide=1-intro").unwrap(),
            ("toSlide".to_string(), Value::String("1-intro".to_string()))
        );
        assert_eq!(
            parse_field("count=3").unwrap(),
            ("count".to_string(), Value::from(3))
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), Value::String("a=b".to_string()))
        );
    }

    #[test]
    fn test_parse_field_rejects_malformed() {
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["slidedeck", "outline", "-c", "deck.toml", "--json"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("deck.toml"));
        assert!(matches!(cli.command, Some(Commands::Outline { json: true })));
    }

    #[test]
    fn test_send_event_fields() {
        let cli = Cli::try_parse_from([
            "slidedeck",
            "send-event",
            "user_interaction",
            "--field",
            "slideId=1-intro",
            "-f",
            "action=click",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::SendEvent { event_type, fields }) => {
                assert_eq!(event_type, "user_interaction");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].0, "action");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["slidedeck"]).unwrap();
        assert!(cli.command.is_none());
    }
}
