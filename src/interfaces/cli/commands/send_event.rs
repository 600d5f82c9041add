//! `send-event` command

use colored::Colorize;
use serde_json::{Map, Value};

use crate::analytics::LogClient;
use crate::config::AnalyticsConfig;
use crate::interfaces::cli::CliError;

pub async fn send_event(
    config: &AnalyticsConfig,
    event_type: String,
    fields: Vec<(String, Value)>,
) -> Result<(), CliError> {
    let client = LogClient::from_config(config);
    let Some(endpoint) = client.endpoint().map(str::to_string) else {
        return Err(CliError::CommandError(
            "analytics.api_base is empty, event logging is disabled".to_string(),
        ));
    };

    let fields: Map<String, Value> = fields.into_iter().collect();
    let event = client.event(&event_type, fields);

    println!(
        "{} {} {}",
        "Sending".yellow(),
        event_type.cyan(),
        format!("to {}", endpoint).dimmed()
    );

    let report = tokio::task::spawn_blocking(move || client.send(&event))
        .await
        .map_err(|e| CliError::CommandError(format!("Send task failed: {}", e)))??;

    if report.is_success() {
        println!(
            "  {} {} {}",
            "✓".green().bold(),
            report.status.to_string().green(),
            report.body
        );
        Ok(())
    } else {
        println!(
            "  {} {} {}",
            "✗".red().bold(),
            report.status.to_string().red(),
            report.body
        );
        Err(CliError::CommandError(format!(
            "Endpoint answered HTTP {}",
            report.status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_without_api_base() {
        let config = AnalyticsConfig {
            api_base: String::new(),
            ..Default::default()
        };
        let err = send_event(&config, "slide_navigation".into(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::CommandError(msg) if msg.contains("disabled")));
    }
}
