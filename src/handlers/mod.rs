//! HTTP Request Handlers
//!
//! Health probes are served by the gateway itself. Everything else is a
//! journey route: it passes the company authorization filter and is then
//! forwarded upstream.

pub mod health;
pub mod proxy;

use axum::{middleware, routing::any, Router};

use crate::{
    constants::HEALTH_BASE_PATH,
    middleware::{company_auth_middleware, logging_middleware},
    state::AppState,
};

/// Create the gateway router
pub fn routes(state: AppState) -> Router {
    let journey = Router::new()
        .route("/", any(proxy::forward))
        .route("/{*path}", any(proxy::forward))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            company_auth_middleware,
        ));

    Router::new()
        .nest(HEALTH_BASE_PATH, health::routes())
        .merge(journey)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{company_page_path, signed_in, Scenario, COMPANY_NUMBER};
    use axum::{
        body::Body,
        extract::Request,
        http::{header, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_authorized_request_is_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let path = company_page_path(COMPANY_NUMBER);
        let mock = server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_body("upload page")
            .expect(1)
            .create_async()
            .await;

        let scenario = Scenario {
            sign_in: Some(signed_in("director@example.com", "/company/12345678")),
            ..Scenario::default()
        };
        let app = routes(scenario.state(&server.url()));

        let response = app
            .oneshot(Request::builder().uri(path.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_redirected_request_never_reaches_upstream() {
        let mut server = mockito::Server::new_async().await;
        let path = company_page_path(COMPANY_NUMBER);
        let mock = server
            .mock("GET", path.as_str())
            .expect(0)
            .create_async()
            .await;

        let app = routes(Scenario::default().state(&server.url()));
        let response = app
            .oneshot(Request::builder().uri(path.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(response.headers().contains_key(header::LOCATION));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_health_bypasses_company_auth() {
        let app = routes(Scenario::default().state("http://127.0.0.1:1"));
        let response = app
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
