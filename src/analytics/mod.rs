//! Best-effort event log side-channel
//!
//! - `event`: the JSON envelope and its validation
//! - `client`: fire-and-forget sender (ureq)
//! - `sink`: pluggable storage with per-stream sequence tokens
//! - `recorder`: daily-stream bookkeeping behind `POST /log`

pub mod client;
pub mod event;
pub mod recorder;
pub mod sink;

pub use client::{DeliveryReport, LogClient, generate_session_id};
pub use event::LogEvent;
pub use recorder::EventRecorder;
pub use sink::{FileLogSink, LogSink, MemoryLogSink, SinkError, StreamDescription, create_sink};
