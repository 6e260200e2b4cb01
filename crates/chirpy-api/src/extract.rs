use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `axum::Json` with every rejection collapsed into a 400 with the
/// standard error body. The stock extractor answers 422 when the body
/// parses but doesn't match the schema; this API treats both the same.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|_| ApiError::Validation("Invalid request body".into()))?;

        Ok(Self(value))
    }
}
