//! Upstream forwarding
//!
//! Every journey request that clears company authorization is replayed
//! against the journey web application and its answer is relayed as-is.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap},
    response::Response,
};
use tracing::debug;

use crate::constants::MAX_FORWARDED_BODY_BYTES;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Connection-scoped headers that must not be relayed.
const HOP_BY_HOP: [header::HeaderName; 9] = [
    header::CONNECTION,
    header::HOST,
    header::HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Forward a request to the upstream journey application
pub async fn forward(State(state): State<AppState>, request: Request) -> AppResult<Response> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", state.config().backend.upstream_url, path_and_query);

    let body = to_bytes(body, MAX_FORWARDED_BODY_BYTES)
        .await
        .map_err(|_| AppError::PayloadTooLarge)?;

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);

    debug!(method = %parts.method, url = %url, "Forwarding upstream");

    let upstream = state
        .http()
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
