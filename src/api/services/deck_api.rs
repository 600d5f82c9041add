use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::sync::Arc;

use super::load_deck;
use crate::deck::{DeckStore, Slide, SlideLookup, SlideSummary};
use crate::errors::DeckError;

/// Response of `GET /api/deck/slides/{key}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideResponse {
    /// True when `key` was a global number rather than an id or slug
    pub redirected: bool,
    pub path: String,
    pub slide: Slide,
    pub previous: SlideSummary,
    pub next: SlideSummary,
}

pub struct DeckApiService;

impl DeckApiService {
    /// `GET /api/deck`: sections and slides without bodies
    pub async fn outline(store: web::Data<Arc<DeckStore>>) -> Result<HttpResponse, DeckError> {
        let deck = load_deck(&store).await?;
        Ok(HttpResponse::Ok().json(deck.outline()))
    }

    /// `GET /api/deck/slides/{key}`: one slide, resolved like the page router
    pub async fn slide(
        key: web::Path<String>,
        store: web::Data<Arc<DeckStore>>,
    ) -> Result<HttpResponse, DeckError> {
        let key = key.into_inner();
        let deck = load_deck(&store).await?;

        let (slide, redirected) = match deck.resolve(&key) {
            SlideLookup::Found(slide) => (slide, false),
            SlideLookup::Redirect(slide) => (slide, true),
            SlideLookup::NotFound => {
                return Ok(HttpResponse::NotFound().json(serde_json::json!({
                    "error": "Slide not found",
                    "key": key,
                })));
            }
        };

        let (previous, next) = deck
            .neighbors(&slide.id)
            .ok_or_else(|| DeckError::not_found(format!("slide {} vanished", slide.id)))?;

        Ok(HttpResponse::Ok().json(SlideResponse {
            redirected,
            path: slide.path(),
            slide: slide.clone(),
            previous: SlideSummary::from(previous),
            next: SlideSummary::from(next),
        }))
    }
}

pub fn deck_api_routes() -> actix_web::Scope {
    web::scope("/api/deck")
        .route("", web::get().to(DeckApiService::outline))
        .route("/slides/{key}", web::get().to(DeckApiService::slide))
}
