//! CLI interface module
//!
//! Offline deck inspection and test-event delivery.

pub mod commands;

use crate::cli::{Commands, ConfigCommands};
use crate::config::get_config;
use crate::deck::DeckStore;
use commands::{config_generate, outline, send_event, show_slide};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    DeckError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::DeckError(msg) => format!("Deck error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    #[cfg(feature = "cli")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::DeckError(msg) => format!("{} {}", "Deck error:".red().bold(), msg.white()),
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::DeckError> for CliError {
    fn from(err: crate::errors::DeckError) -> Self {
        match err {
            crate::errors::DeckError::Parse(msg) | crate::errors::DeckError::InvalidFilename(msg) => {
                CliError::ParseError(msg)
            }
            other => CliError::DeckError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    let config = get_config();

    match cmd {
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                config_generate(output_path, force).await
            }
        },

        Commands::SendEvent { event_type, fields } => {
            send_event(&config.analytics, event_type, fields).await
        }

        Commands::Outline { json } => {
            let store = DeckStore::from_config(&config.deck);
            outline(&store, json)
        }

        Commands::Show { key } => {
            let store = DeckStore::from_config(&config.deck);
            show_slide(&store, &key)
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve runs in server mode, not through the CLI dispatcher".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeckError;

    #[test]
    fn test_deck_error_conversion() {
        assert!(matches!(
            CliError::from(DeckError::parse("bad yaml")),
            CliError::ParseError(msg) if msg == "bad yaml"
        ));
        assert!(matches!(
            CliError::from(DeckError::not_found("x")),
            CliError::DeckError(_)
        ));
    }

    #[test]
    fn test_format_simple() {
        assert_eq!(
            CliError::CommandError("nope".into()).format_simple(),
            "Command error: nope"
        );
    }
}
