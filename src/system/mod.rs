//! System-level modules
//!
//! - `logging`: tracing subscriber setup
//! - `panic_handler`: crash reporting per run mode

pub mod logging;
pub mod panic_handler;

pub use logging::init_logging;
pub use panic_handler::{RunMode, install_panic_hook};
