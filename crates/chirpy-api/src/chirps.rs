use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use chirpy_auth::token;
use chirpy_types::api::{
    ChirpResponse, CreateChirpRequest, ValidateChirpRequest, ValidateChirpResponse,
};

use crate::convert;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::sanitize;
use crate::state::AppState;

const MAX_CHIRP_LEN: usize = 140;

pub async fn create_chirp(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let jwt = bearer_token(&headers)?;
    let user_id = token::validate_jwt(jwt, &state.jwt_secret)?;

    if req.body.chars().count() > MAX_CHIRP_LEN {
        return Err(ApiError::Validation(
            "Chirp body exceeds 140 characters".into(),
        ));
    }

    let cleaned = sanitize::clean(&req.body);

    // Run the blocking insert off the async runtime
    let chirp_id = Uuid::new_v4();
    let db = state.clone();
    let cid = chirp_id.to_string();
    let uid = user_id.to_string();
    let row = tokio::task::spawn_blocking(move || db.db.create_chirp(&cid, &uid, &cleaned))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::Error::new(e))
        })?
        .map_err(|e| ApiError::Internal(e.context("failed to create chirp")))?;

    Ok((StatusCode::CREATED, Json(convert::chirp_response(row))))
}

pub async fn get_chirps(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.get_all_chirps())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::Error::new(e))
        })?
        .map_err(ApiError::Internal)?;

    let chirps: Vec<ChirpResponse> = rows.into_iter().map(convert::chirp_response).collect();

    Ok(Json(chirps))
}

pub async fn get_chirp_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_chirp(&id.to_string()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::Error::new(e))
        })?
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Chirp not found".into()))?;

    Ok(Json(convert::chirp_response(row)))
}

/// Standalone validation endpoint, kept from the pre-persistence API
/// surface: checks length and returns the masked body without storing
/// anything.
pub async fn validate_chirp(
    ApiJson(req): ApiJson<ValidateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.body.chars().count() > MAX_CHIRP_LEN {
        return Err(ApiError::Validation(
            "Chirp body exceeds 140 characters".into(),
        ));
    }

    Ok(Json(ValidateChirpResponse {
        valid: true,
        cleaned_body: sanitize::clean(&req.body),
    }))
}

/// Extract the JWT from an `Authorization: Bearer …` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".into()))
}
