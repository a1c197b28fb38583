use axum::{routing::get, Router};
use configuration::Settings;
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// `db` is `None` when no database is configured; the service then runs in
/// degraded mode — the calculator still works, analytics are unavailable.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<DbRepository>,
}

/// Builds the application router. Separated from `run_server` so tests can
/// drive the routes in-process.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/", get(handlers::root))
        .route("/fibonacci/:n", get(handlers::get_fibonacci))
        .route("/health", get(handlers::health))
        .route("/stats/popular", get(handlers::get_popular_numbers))
        .route("/stats/users/:user_id", get(handlers::get_user_stats))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, settings: Settings) -> anyhow::Result<()> {
    let db = match database::connect(&settings.database).await? {
        Some(pool) => {
            database::run_migrations(&pool).await?;
            Some(DbRepository::new(pool))
        }
        None => {
            tracing::warn!("no database configured; analytics run in degraded mode");
            None
        }
    };

    let app_state = Arc::new(AppState { db });
    let app = app(app_state);

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
