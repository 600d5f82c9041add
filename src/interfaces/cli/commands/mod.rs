pub mod config_gen;
pub mod deck_view;
pub mod send_event;

pub use config_gen::config_generate;
pub use deck_view::{outline, show_slide};
pub use send_event::send_event;
