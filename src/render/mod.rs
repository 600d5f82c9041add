//! HTML page rendering
//!
//! - `diagram`: mermaid code block → client-rendered container
//! - `timer`: section countdown display
//! - `pages`: askama templates for slide, empty deck and 404 pages

pub mod diagram;
pub mod pages;
pub mod timer;

pub use pages::{PageContext, render_empty_deck, render_not_found, render_slide};
