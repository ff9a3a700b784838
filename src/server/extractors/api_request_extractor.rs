use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::server::error::Error;

/// json body that rejects with our `{"error": ..}` shape instead of axum's plain text
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("rejected json body: {}", rejection.body_text());
            Error::BadRequest(rejection.body_text())
        })?;
        Ok(Self(value))
    }
}

/// query string counterpart of `ApiJson`
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("rejected query string: {}", rejection.body_text());
                Error::BadRequest(rejection.body_text())
            })?;
        Ok(Self(value))
    }
}
