use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")] Validation(#[from] ValidationError),
    #[error("page not found")] NotFound,
    #[error("internal error")] Inconsistent,
    #[error("service unavailable")] Unavailable,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Inconsistent(msg) => {
                error!("inconsistent store content: {msg}");
                ApiError::Inconsistent
            }
            // only a corrupted counter can produce this
            StoreError::InvalidCode(e) => {
                error!("cannot mint code: {e}");
                ApiError::Inconsistent
            }
            StoreError::Unavailable(msg) => {
                error!("store unavailable: {msg}");
                ApiError::Unavailable
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Inconsistent => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrorBody { error: self.to_string() })
    }
}
