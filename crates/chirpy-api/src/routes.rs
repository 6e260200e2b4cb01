use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::{admin, chirps, users};

/// All JSON API and admin routes. The static fileserver under `/app` is
/// mounted by the binary, where the serve root is configured.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/admin/healthz", get(admin::healthz))
        .route("/admin/metrics", get(admin::metrics))
        .route("/admin/reset", post(admin::reset))
        .route("/api/users", post(users::create_user))
        .route("/api/login", post(users::login))
        .route(
            "/api/chirps",
            get(chirps::get_chirps).post(chirps::create_chirp),
        )
        .route("/api/chirps/{id}", get(chirps::get_chirp_by_id))
        .route("/api/validate_chirp", post(chirps::validate_chirp))
        .with_state(state)
}
