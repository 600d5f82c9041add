//! `/log` event endpoint
//!
//! Every response carries the fixed CORS header set so the deck page can
//! post from any origin.

use actix_web::dev::HttpServiceFactory;
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpResponse, web};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, trace, warn};

use crate::analytics::EventRecorder;
use crate::analytics::event::validate;

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

pub fn cors_headers() -> DefaultHeaders {
    CORS_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, &pair| headers.add(pair))
}

pub struct LogService;

impl LogService {
    pub async fn handle_preflight() -> HttpResponse {
        trace!("CORS preflight for /log");
        HttpResponse::Ok().json(json!({ "message": "CORS enabled" }))
    }

    pub async fn handle_log(
        body: web::Bytes,
        recorder: web::Data<Arc<EventRecorder>>,
    ) -> HttpResponse {
        let event: Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!("Rejected log event with invalid JSON: {}", e);
                return HttpResponse::BadRequest()
                    .json(json!({ "error": "Invalid JSON in request body" }));
            }
        };

        if let Err(e) = validate(&event) {
            warn!("Rejected log event: {}", e.message());
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Missing required fields in log event" }));
        }

        match recorder.record(event).await {
            Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
            Err(e) => {
                error!("Failed to log event: {}", e);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Failed to log event",
                    "message": e.message(),
                }))
            }
        }
    }
}

pub fn log_routes() -> impl HttpServiceFactory {
    web::scope("/log")
        .wrap(cors_headers())
        .route("", web::post().to(LogService::handle_log))
        .route("", web::method(actix_web::http::Method::OPTIONS).to(LogService::handle_preflight))
}
