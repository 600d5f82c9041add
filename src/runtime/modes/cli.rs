//! CLI mode
//!
//! Delegates to the command dispatcher.

use crate::cli::Commands;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime;

pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    lifetime::startup::cli_pre_startup().await;
    crate::interfaces::cli::run_cli_command(cmd).await
}
