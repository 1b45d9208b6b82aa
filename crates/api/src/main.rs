use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookvisit_api::config::ServerConfig;
use bookvisit_api::router::build_app_router;
use bookvisit_api::session_store::{start_sweeper, SWEEP_INTERVAL};
use bookvisit_api::state::AppState;
use bookvisit_upstream::{ContactRegistryClient, PrisonApiClient, VisitSchedulerClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookvisit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Upstream clients ---
    let bookings = PrisonApiClient::new(config.upstream.prison_api())
        .expect("Failed to build prison API client");
    let contacts = ContactRegistryClient::new(config.upstream.contact_registry())
        .expect("Failed to build contact registry client");
    let scheduler = VisitSchedulerClient::new(config.upstream.visit_scheduler())
        .expect("Failed to build visit scheduler client");
    tracing::info!(
        prison_api = %config.upstream.prison_api_url,
        contact_registry = %config.upstream.contact_registry_url,
        visit_scheduler = %config.upstream.visit_scheduler_url,
        "Upstream clients configured"
    );

    // --- App state ---
    let state = AppState::new(
        config.clone(),
        Arc::new(bookings),
        Arc::new(contacts),
        Arc::new(scheduler),
    );

    // --- Session expiry ---
    let sweeper_handle = start_sweeper(Arc::clone(&state.sessions), SWEEP_INTERVAL);

    // --- Router ---
    let app = build_app_router(state.clone(), &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    sweeper_handle.abort();
    let open_sessions = state.sessions.len().await;
    tracing::info!(open_sessions, "Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
