use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use barberbook::config::AppConfig;
use barberbook::db;
use barberbook::handlers;
use barberbook::services::registry::{spawn_reconciler, ClientRegistry};
use barberbook::services::session::Session;
use barberbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let (changes_tx, _) = broadcast::channel(256);
    let registry = ClientRegistry::load(&config.registry_path);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        changes_tx,
        registry: Mutex::new(registry),
        session: Mutex::new(Session::default()),
    });

    spawn_reconciler(state.clone());

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/availability", get(handlers::availability::get_availability))
        .route(
            "/api/bookings",
            post(handlers::bookings::create_booking).get(handlers::admin::get_bookings),
        )
        .route("/api/bookings/:id", delete(handlers::bookings::cancel_booking))
        .route("/api/my-bookings", get(handlers::bookings::my_bookings))
        .route(
            "/api/admin/bookings/:id/complete",
            post(handlers::admin::complete_booking),
        )
        .route(
            "/api/admin/bookings/:id",
            delete(handlers::admin::delete_booking),
        )
        .route("/api/admin/block", post(handlers::admin::block_period))
        .route("/api/session/:principal", post(handlers::session::sign_in))
        .route(
            "/api/session",
            get(handlers::session::current_session).delete(handlers::session::sign_out),
        )
        .route("/api/events", get(handlers::events::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
