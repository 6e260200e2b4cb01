use std::net::SocketAddr;
use std::path::PathBuf;

use axum::middleware;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use chirpy_api::admin;
use chirpy_api::routes;
use chirpy_api::state::AppStateInner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("CHIRPY_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let platform = std::env::var("CHIRPY_PLATFORM").unwrap_or_else(|_| "dev".into());
    let db_path = std::env::var("CHIRPY_DB_PATH").unwrap_or_else(|_| "chirpy.db".into());
    let static_root = std::env::var("CHIRPY_STATIC_ROOT").unwrap_or_else(|_| ".".into());
    let host = std::env::var("CHIRPY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CHIRPY_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Init database
    let db = chirpy_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state = AppStateInner::new(db, jwt_secret, platform);

    // Static files under /app, prefix-stripped, every hit counted
    let fileserver = Router::new()
        .fallback_service(ServeDir::new(&static_root))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin::track_fileserver_hits,
        ));

    let app = routes::router(state)
        .nest_service("/app", fileserver)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Chirpy serving on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
