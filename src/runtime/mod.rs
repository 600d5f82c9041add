//! Application lifecycle and execution modes
//!
//! - `lifetime`: server startup context and graceful shutdown
//! - `modes`: server and CLI entry points

pub mod lifetime;
pub mod modes;
