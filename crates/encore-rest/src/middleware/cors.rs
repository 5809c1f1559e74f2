//! CORS limited to real preflight requests.
//!
//! `tower_http`'s [`Cors`] answers every `OPTIONS` request on its own. A plain
//! `OPTIONS` without `Access-Control-Request-Method` is not a preflight and
//! must reach the plugin API, which rejects it with 405.

use axum::http::{header, HeaderValue, Method, Request, Response};
use encore_config::ServerConfig;
use futures::future::Either;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tower_http::cors::{AllowOrigin, Any, Cors, CorsLayer, ResponseFuture};

/// Builds the CORS layer from server configuration, `None` when disabled.
#[must_use]
pub fn cors_layer(config: &ServerConfig) -> Option<PreflightCorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };
    Some(PreflightCorsLayer { cors })
}

#[derive(Debug, Clone)]
pub struct PreflightCorsLayer {
    cors: CorsLayer,
}

impl<S: Clone> Layer<S> for PreflightCorsLayer {
    type Service = PreflightCors<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PreflightCors {
            cors: self.cors.layer(inner.clone()),
            inner,
        }
    }
}

/// Routes preflights through [`Cors`] and every other `OPTIONS` around it.
#[derive(Debug, Clone)]
pub struct PreflightCors<S> {
    cors: Cors<S>,
    inner: S,
}

fn bypasses_cors<B>(request: &Request<B>) -> bool {
    request.method() == Method::OPTIONS
        && !request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for PreflightCors<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Default,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Either<ResponseFuture<S::Future>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.cors.poll_ready(cx) {
            Poll::Ready(Ok(())) => self.inner.poll_ready(cx),
            pending_or_err => pending_or_err,
        }
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        if bypasses_cors(&request) {
            Either::Right(self.inner.call(request))
        } else {
            Either::Left(self.cors.call(request))
        }
    }
}
