//! Middleware layer.
//!
//! Cross-cutting concerns wrapped around [`Router::handle`]. Currently one:
//! [`trace`], a per-request span with method, path, status and latency.

use std::time::Instant;

use bytes::Bytes;
use tracing::{Instrument, info, info_span};

use crate::response::Response;
use crate::router::Router;

/// Runs `req` through `router` inside a `request` span and logs the outcome.
pub async fn trace(router: &Router, req: http::Request<Bytes>) -> Response {
    let span = info_span!("request", method = %req.method(), path = %req.uri().path());
    async move {
        let started = Instant::now();
        let res = router.handle(req).await;
        info!(
            status = res.status_code(),
            latency_us = started.elapsed().as_micros() as u64,
            "request completed"
        );
        res
    }
    .instrument(span)
    .await
}
