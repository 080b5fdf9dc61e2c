use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;
mod types;

use database::manager::DatabaseManager;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing::info!("Starting cookbook API in {:?} mode", config.environment);

    // An unreachable store at startup is fatal
    if let Err(e) = DatabaseManager::init().await {
        tracing::error!("failed to reach database at startup: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.storage.uploads_dir).await {
        tracing::error!(
            "failed to create uploads directory {}: {}",
            config.storage.uploads_dir,
            e
        );
        std::process::exit(1);
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("cookbook API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Feature routes
        .merge(user_routes())
        .merge(login_routes())
        .merge(recipe_routes())
        .merge(image_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router {
    use handlers::users;

    let protected = Router::new()
        .route("/users/admin", post(users::register_admin_post))
        .route_layer(from_fn(middleware::auth_middleware));

    Router::new()
        .route("/users", post(users::register_user_post))
        .merge(protected)
}

fn login_routes() -> Router {
    use handlers::login;

    Router::new().route("/login", post(login::login_post))
}

fn recipe_routes() -> Router {
    use handlers::recipes;

    // Reads are public; every mutation goes through the auth middleware and,
    // in the handlers, the ownership guard
    let public = Router::new()
        .route("/recipes", get(recipes::get_all))
        .route("/recipes/:id", get(recipes::get_by_id));

    let protected = Router::new()
        .route("/recipes", post(recipes::create))
        .route("/recipes/:id", put(recipes::edit).delete(recipes::remove))
        .route("/recipes/:id/image", put(recipes::put_image))
        .route_layer(from_fn(middleware::auth_middleware));

    public.merge(protected)
}

fn image_routes() -> Router {
    use handlers::images;

    Router::new().route("/images/:filename", get(images::get_image))
}

/// Bare liveness root kept for external checkers
async fn root() {}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
