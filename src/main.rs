//! EFS Gateway - Application Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use efs_rules::prelude::{Collaborators, CompanyAuthEvaluator};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use efs_gateway::{
    config::{create_http_client, create_redis_pool, CONFIG},
    handlers,
    services::{BackendService, SessionService},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EFS gateway...");

    // Session store
    tracing::info!("Creating Redis pool for {}", CONFIG.session.redis_url);
    let redis = create_redis_pool(&CONFIG.session.redis_url)?;

    // Backend client
    let http = create_http_client(&CONFIG.backend)?;
    let backend = Arc::new(BackendService::new(http.clone(), &CONFIG.backend.api_url)?);
    let sessions = Arc::new(SessionService::new(redis.clone(), &CONFIG.session));

    let evaluator = CompanyAuthEvaluator::new(Collaborators {
        submissions: backend.clone(),
        forms: backend.clone(),
        sessions,
        allow_list: backend.clone(),
        categories: backend,
    })
    .with_allow_list_categories(CONFIG.allow_list.categories.iter().copied());

    tracing::info!(
        categories = ?evaluator.allow_list_categories(),
        "Allow-list eligible categories"
    );

    // Create application state
    let state = AppState::new(evaluator, http, redis, CONFIG.clone());

    // Build the router
    let app = handlers::routes(state).layer(TraceLayer::new_for_http());

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("Forwarding journey requests to {}", CONFIG.backend.upstream_url);

    axum::serve(listener, app).await?;

    Ok(())
}
