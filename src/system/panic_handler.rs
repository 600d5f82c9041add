//! Panic handler
//!
//! - Server mode: colored reason, location and backtrace on stderr
//! - CLI mode: one-line message
//!
//! Both append a crash report to `crash.log`.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

pub const CRASH_LOG: &str = "crash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

/// Install the process-wide panic hook for `mode`
pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let backtrace = format!("{:?}", std::backtrace::Backtrace::force_capture());
        let report = crash_report(&message, &location, &backtrace);

        if let Err(e) = append_crash_log(&report) {
            eprintln!("Failed to write {}: {}", CRASH_LOG, e);
        }

        match mode {
            RunMode::Server => display_server_panic(&message, &location, &backtrace),
            RunMode::Cli => display_simple_panic(&message),
        }
    }));
}

/// Text block appended to the crash log
pub fn crash_report(message: &str, location: &str, backtrace: &str) -> String {
    let thread = std::thread::current();
    format!(
        "==========================================\n\
         Crash Report - {}\n\
         slidedeck {} (thread {})\n\
         ==========================================\n\
         Message: {}\n\
         Location: {}\n\
         \nBacktrace:\n{}\n\
         ==========================================\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        env!("CARGO_PKG_VERSION"),
        thread.name().unwrap_or("unnamed"),
        message,
        location,
        backtrace,
    )
}

fn display_server_panic(message: &str, location: &str, backtrace: &str) {
    use colored::Colorize;

    let rule = "═══════════════════════════════════════════════════".red().bold();
    eprintln!();
    eprintln!("{}", rule);
    eprintln!("{}", "PANIC".red().bold());
    eprintln!("{}", rule);
    eprintln!("{} {}", "Reason:".yellow().bold(), message.white());
    eprintln!("{} {}", "Location:".yellow().bold(), location.white());
    eprintln!();
    eprintln!("{}", "Backtrace:".yellow().bold());
    eprintln!("{}", backtrace.dimmed());
    eprintln!("{}", format!("Details saved to {}", CRASH_LOG).cyan());
    eprintln!("{}", rule);
    eprintln!();
}

fn display_simple_panic(message: &str) {
    eprintln!();
    eprintln!("slidedeck crashed: {}", message);
    eprintln!("Details saved to {}", CRASH_LOG);
    eprintln!();
}

fn append_crash_log(report: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG)?;
    file.write_all(report.as_bytes())?;
    writeln!(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_report_contents() {
        let report = crash_report("boom", "src/main.rs:1:1", "<frames>");
        assert!(report.contains("Message: boom"));
        assert!(report.contains("Location: src/main.rs:1:1"));
        assert!(report.contains("<frames>"));
        assert!(report.contains(env!("CARGO_PKG_VERSION")));
    }
}
