use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Post not found")]
    pub error: String,
    #[schema(example = "NOT_FOUND")]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Implemented by every service error so controllers map them the same way.
pub trait ApiError: std::fmt::Display {
    fn status_code(&self) -> StatusCode;

    fn code(&self) -> &'static str;

    /// Message shown to the caller. Internal failures hide their details.
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

pub fn error_response<E: ApiError>(err: E) -> Response {
    let status = err.status_code();

    if status.is_server_error() {
        error!("Internal server error: {}", err);
    } else {
        info!("Request rejected: {} ({})", err, status);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.public_message(),
            code: err.code().to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum SampleError {
        #[error("Widget not found")]
        NotFound,
        #[error("Database error: connection reset")]
        Database,
    }

    impl ApiError for SampleError {
        fn status_code(&self) -> StatusCode {
            match self {
                Self::NotFound => StatusCode::NOT_FOUND,
                Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn code(&self) -> &'static str {
            match self {
                Self::NotFound => "NOT_FOUND",
                Self::Database => "INTERNAL_ERROR",
            }
        }
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        assert_eq!(SampleError::NotFound.public_message(), "Widget not found");
        let response = error_response(SampleError::NotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_errors_hide_details() {
        assert_eq!(
            SampleError::Database.public_message(),
            "Internal server error"
        );
        let response = error_response(SampleError::Database);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
