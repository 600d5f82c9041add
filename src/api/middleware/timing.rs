//! HTTP timing middleware
//!
//! Logs status and latency of every request at debug level, and warns on
//! requests slower than [`SLOW_REQUEST`]. Runs inside the request span set
//! up by `RequestIdMiddleware` when that one wraps outside it.

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const SLOW_REQUEST: Duration = Duration::from_secs(1);

pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

#[derive(Clone, Default)]
pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService {
            service: Rc::new(service),
        }))
    }
}

pub struct TimingService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();

        Box::pin(async move {
            let result = srv.call(req).await;
            let elapsed = start.elapsed();

            match result {
                Ok(mut response) => {
                    let status = response.status().as_u16();
                    if elapsed >= SLOW_REQUEST {
                        warn!("Slow request: {} {} -> {} in {:?}", method, path, status, elapsed);
                    } else {
                        debug!("{} {} -> {} in {:?}", method, path, status, elapsed);
                    }

                    let millis = format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0);
                    if let Ok(value) = HeaderValue::from_str(&millis) {
                        response
                            .headers_mut()
                            .insert(HeaderName::from_static(RESPONSE_TIME_HEADER), value);
                    }
                    Ok(response)
                }
                Err(e) => {
                    warn!("{} {} failed after {:?}: {}", method, path, elapsed, e);
                    Err(e)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_rt::test]
    async fn test_adds_response_time_header() {
        let app = test::init_service(
            App::new()
                .wrap(TimingMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let value = resp.headers().get(RESPONSE_TIME_HEADER).unwrap().to_str().unwrap();
        assert!(value.ends_with("ms"));
    }
}
