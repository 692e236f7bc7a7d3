//! Company authorization middleware
//!
//! Sits in front of every journey route. When the evaluator decides the user
//! still has to authorize for the company in the URL, the request is
//! answered with a redirect to the identity provider instead of being passed
//! on.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use efs_rules::prelude::{match_company_path, RequestInput};
use tracing::{debug, info};

use crate::state::AppState;

/// Company authorization middleware
pub async fn company_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let input = Arc::new(RequestInput::from_parts(&parts));

    if !state.evaluator().requires_redirect(input.clone()).await {
        return next.run(Request::from_parts(parts, body)).await;
    }

    // A redirect decision implies the path matched.
    let Some(company) = match_company_path(&input.path) else {
        debug!(path = %input.path, "Redirect decision without company path");
        return next.run(Request::from_parts(parts, body)).await;
    };

    let return_uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());

    match state
        .redirects()
        .authorise_url(company.company_number, return_uri)
    {
        Ok(location) => {
            info!(
                path = %input.path,
                company_number = %company.company_number,
                "Redirecting for company authorization"
            );
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Err(e) => e.into_response(),
    }
}
