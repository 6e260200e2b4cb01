use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "OK",
    )
}

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.fileserver_hits.load(Ordering::Relaxed);

    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {hits} times!</p>\n  </body>\n</html>"
    ))
}

/// Wipe all user data and zero the hit counter. Only honored when the
/// deployment platform is "dev".
pub async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    if state.platform != "dev" {
        return Err(ApiError::Forbidden(
            "This endpoint is only available in development mode".into(),
        ));
    }

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.reset())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::Error::new(e))
        })?
        .map_err(|e| ApiError::Internal(e.context("failed to reset user data")))?;

    state.fileserver_hits.store(0, Ordering::Relaxed);

    Ok("Users and Metrics are reset successfully!")
}

/// Count every request that reaches the static fileserver.
pub async fn track_fileserver_hits(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    state.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}
