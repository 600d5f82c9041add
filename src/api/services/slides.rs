use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::{debug, trace};

use super::load_deck;
use crate::deck::{DeckStore, SlideLookup};
use crate::errors::DeckError;
use crate::render::{PageContext, render_empty_deck, render_not_found, render_slide};

pub struct SlideService;

impl SlideService {
    /// `/` → first slide, or the empty-deck page
    pub async fn handle_index(
        store: web::Data<Arc<DeckStore>>,
        pages: web::Data<PageContext>,
    ) -> Result<HttpResponse, DeckError> {
        let deck = load_deck(&store).await?;

        match deck.first_slide() {
            Some(slide) => {
                trace!("Index redirecting to {}", slide.id);
                Ok(Self::redirect(&slide.path()))
            }
            None => {
                let directory = store.directory().display().to_string();
                let body = render_empty_deck(&directory, &pages)?;
                Ok(Self::html(StatusCode::OK, body))
            }
        }
    }

    /// `/slides/{tail:.*}`
    pub async fn handle_slide(
        req: HttpRequest,
        store: web::Data<Arc<DeckStore>>,
        pages: web::Data<PageContext>,
    ) -> Result<HttpResponse, DeckError> {
        let tail = req.match_info().query("tail").to_string();
        let segments: Vec<&str> = tail.split('/').collect();
        let deck = load_deck(&store).await?;

        match deck.resolve_path(&segments) {
            SlideLookup::Found(slide) => {
                let body = render_slide(&deck, slide, &pages)?;
                Ok(Self::html(StatusCode::OK, body))
            }
            SlideLookup::Redirect(slide) => {
                debug!("Slide number {} redirects to {}", tail, slide.id);
                Ok(Self::redirect(&slide.path()))
            }
            SlideLookup::NotFound => {
                debug!("Slide not found: {}", tail);
                Self::not_found_page(&tail, &pages)
            }
        }
    }

    pub async fn handle_not_found(
        req: HttpRequest,
        pages: web::Data<PageContext>,
    ) -> Result<HttpResponse, DeckError> {
        Self::not_found_page(req.path(), &pages)
    }

    pub async fn handle_favicon() -> HttpResponse {
        HttpResponse::NoContent().finish()
    }

    fn not_found_page(requested: &str, pages: &PageContext) -> Result<HttpResponse, DeckError> {
        let body = render_not_found(requested, pages)?;
        Ok(Self::html(StatusCode::NOT_FOUND, body))
    }

    fn redirect(location: &str) -> HttpResponse {
        HttpResponse::TemporaryRedirect()
            .insert_header((header::LOCATION, location))
            .finish()
    }

    fn html(status: StatusCode, body: String) -> HttpResponse {
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body)
    }
}

/// Page routes; registered last since the empty scope matches every path
pub fn slide_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(SlideService::handle_index))
        .route("/", web::head().to(SlideService::handle_index))
        .route("/favicon.ico", web::get().to(SlideService::handle_favicon))
        .route("/slides/{tail:.*}", web::get().to(SlideService::handle_slide))
        .route("/slides/{tail:.*}", web::head().to(SlideService::handle_slide))
        .default_service(web::to(SlideService::handle_not_found))
}
