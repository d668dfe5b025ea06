use axum::Json;
use axum::extract::{FromRequest, Request};
use phonebook_core::AppError;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON extractor that routes parse failures through the error translator.
///
/// A body that fails to deserialize becomes `AppError::Malformed` carrying
/// the underlying parse error text, so even rejected requests get the
/// uniform error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(AppError::Malformed(rejection.body_text()))),
        }
    }
}
