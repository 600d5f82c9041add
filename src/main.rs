use clap::Parser;
use std::process::ExitCode;

use slidedeck::cli::Cli;
use slidedeck::config::{get_config, init_config};
use slidedeck::runtime::modes::{self, Mode};
use slidedeck::system::{RunMode, init_logging, install_panic_hook};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    match modes::detect_mode(cli.command.as_ref()) {
        #[cfg(feature = "server")]
        Mode::Server => {
            install_panic_hook(RunMode::Server);

            let config = get_config();
            // guard 必须存活到进程退出，否则日志缓冲会丢失
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {:#}", e);
                    return ExitCode::FAILURE;
                }
            };

            if let Err(e) = modes::run_server().await {
                tracing::error!("Server error: {:#}", e);
                eprintln!("Server error: {:#}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        #[cfg(feature = "cli")]
        Mode::Cli => {
            install_panic_hook(RunMode::Cli);

            let Some(command) = cli.command else {
                return ExitCode::FAILURE;
            };
            match modes::run_cli(command).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    ExitCode::FAILURE
                }
            }
        }
        Mode::Unknown => {
            eprintln!("No run mode enabled; build with the `server` or `cli` feature");
            ExitCode::FAILURE
        }
    }
}
