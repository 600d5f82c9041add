//! HTTP layer
//!
//! - `services`: slide pages, `/log`, `/api/deck`, embedded assets
//! - `middleware`: request id span and timing

pub mod middleware;
pub mod services;

use actix_web::web;

use services::{asset_routes, deck_api_routes, log_routes, slide_routes};

/// Register every route; the catch-all slide scope goes last
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(log_routes())
        .service(deck_api_routes())
        .service(asset_routes())
        .service(slide_routes());
}
