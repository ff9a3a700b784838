use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, Error>;

/// errors that make it to the http edge, the routing core itself never produces these
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal server error: {0}")]
    InternalServerErrorWithContext(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InternalServerErrorWithContext(_) | Error::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // don't leak anyhow chains to the client
        let message = match &self {
            Error::Anyhow(e) => {
                error!("unhandled error: {:?}", e);
                "internal server error".to_string()
            }
            Error::InternalServerErrorWithContext(ctx) => {
                error!("internal error: {}", ctx);
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
