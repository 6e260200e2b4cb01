use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Duration;
use uuid::Uuid;

use chirpy_auth::{password, token};
use chirpy_types::api::{CreateUserRequest, LoginRequest, LoginResponse};

use crate::convert;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Ceiling on client-requested session lifetimes.
const MAX_TOKEN_TTL_SECS: i64 = 3600;

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "username, email, and password are required".into(),
        ));
    }

    let hashed = password::hash_password(&req.password)?;

    let user_id = Uuid::new_v4();
    let row = state
        .db
        .create_user(&user_id.to_string(), &req.username, &req.email, &hashed)
        .map_err(|e| ApiError::Internal(e.context("failed to create user")))?;

    Ok((StatusCode::CREATED, Json(convert::user_response(row))))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "email and password are required".into(),
        ));
    }

    let row = state
        .db
        .get_user_by_email(&req.email)
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::Unauthorized("invalid email or password".into()))?;

    password::verify_password(&req.password, &row.password)?;

    let ttl = clamp_token_ttl(req.expires_in_seconds);
    let user_id = convert::parse_db_uuid(&row.id);
    let jwt = token::make_jwt(user_id, &state.jwt_secret, Duration::seconds(ttl))?;

    Ok(Json(LoginResponse {
        id: user_id,
        email: row.email,
        created_at: convert::parse_db_timestamp(&row.created_at),
        updated_at: convert::parse_db_timestamp(&row.updated_at),
        token: jwt,
        refresh_token: None,
    }))
}

/// Clamp the requested lifetime: a missing, non-positive, or
/// above-ceiling value falls back to the ceiling.
fn clamp_token_ttl(requested: Option<i64>) -> i64 {
    let requested = requested.unwrap_or(0);
    if requested <= 0 || requested > MAX_TOKEN_TTL_SECS {
        MAX_TOKEN_TTL_SECS
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_ceiling() {
        assert_eq!(clamp_token_ttl(None), 3600);
        assert_eq!(clamp_token_ttl(Some(0)), 3600);
        assert_eq!(clamp_token_ttl(Some(-5)), 3600);
    }

    #[test]
    fn ttl_above_ceiling_is_clamped() {
        assert_eq!(clamp_token_ttl(Some(3601)), 3600);
        assert_eq!(clamp_token_ttl(Some(999_999)), 3600);
    }

    #[test]
    fn ttl_within_range_is_kept() {
        assert_eq!(clamp_token_ttl(Some(1)), 1);
        assert_eq!(clamp_token_ttl(Some(1800)), 1800);
        assert_eq!(clamp_token_ttl(Some(3600)), 3600);
    }
}
