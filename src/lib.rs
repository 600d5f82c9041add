//! slidedeck - serve a slide deck from a directory of markdown files
//!
//! Each `<number>[-<slug>].md` file is a section; every `##` heading starts a
//! slide. Pages are rendered on the server, and a `/log` endpoint stores the
//! navigation and interaction events the pages send back.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `deck`: markdown parsing, numbering, lookup and the deck store
//! - `render`: askama pages, diagram containers, section timer
//! - `analytics`: event envelope, sending client, sinks and recorder
//! - `api`: HTTP services and middleware
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and panic handling

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod deck;
pub mod errors;
pub mod interfaces;
pub mod render;
pub mod runtime;
pub mod system;
