pub mod assets;
pub mod deck_api;
pub mod log;
pub mod slides;

pub use assets::{AssetService, asset_routes};
pub use deck_api::{DeckApiService, deck_api_routes};
pub use log::{LogService, cors_headers, log_routes};
pub use slides::{SlideService, slide_routes};

use actix_web::web;
use std::sync::Arc;

use crate::deck::{Deck, DeckStore};
use crate::errors::DeckError;

/// Load the deck on the blocking pool
pub(crate) async fn load_deck(store: &web::Data<Arc<DeckStore>>) -> Result<Arc<Deck>, DeckError> {
    let store = Arc::clone(store.get_ref());
    web::block(move || store.load())
        .await
        .map_err(|e| DeckError::file_operation(format!("deck load task failed: {}", e)))
}
