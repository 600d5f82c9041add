//! Logging system initialization
//!
//! Installs the global tracing subscriber from [`LoggingConfig`]: stdout,
//! a plain append file, or a daily rolling file, in text or JSON format.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

const DEFAULT_LOG_FILE: &str = "slidedeck.log";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    File(PathBuf),
    Rolling { dir: PathBuf, prefix: String },
}

impl LogTarget {
    pub fn from_config(config: &LoggingConfig) -> Self {
        let Some(log_file) = config.file.as_deref().filter(|f| !f.trim().is_empty()) else {
            return LogTarget::Stdout;
        };

        if !config.enable_rotation {
            return LogTarget::File(PathBuf::from(log_file));
        }

        let path = Path::new(log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE);

        LogTarget::Rolling {
            dir: dir.to_path_buf(),
            prefix: file_name.trim_end_matches(".log").to_string(),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, LogTarget::Stdout)
    }

    fn writer(&self, max_backups: u32) -> anyhow::Result<Box<dyn std::io::Write + Send + Sync>> {
        Ok(match self {
            LogTarget::Stdout => Box::new(std::io::stdout()),
            LogTarget::File(path) => Box::new(
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?,
            ),
            LogTarget::Rolling { dir, prefix } => Box::new(
                rolling::Builder::new()
                    .rotation(rolling::Rotation::DAILY)
                    .filename_prefix(prefix)
                    .filename_suffix("log")
                    .max_log_files(max_backups.max(1) as usize)
                    .build(dir)
                    .with_context(|| {
                        format!("Failed to create rolling log appender in {}", dir.display())
                    })?,
            ),
        })
    }
}

/// Initialize logging.
///
/// The returned guard must live until shutdown so buffered lines are
/// flushed. Call once; a second subscriber is rejected.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let target = LogTarget::from_config(config);
    let writer = target.writer(config.max_backups)?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .context("Failed to build log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(target.is_terminal());

    let installed = if config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
