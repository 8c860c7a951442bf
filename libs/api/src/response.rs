use std::{collections::HashMap, sync::OnceLock};

use axum::{
    extract::multipart::MultipartError, http::StatusCode,
    response::IntoResponse,
};
use entity::prelude::*;
use repository::RepositoryError;
use tracing::error;

use crate::ApiError;

static ERROR_CODES: OnceLock<HashMap<String, String>> = OnceLock::new();

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::AuthError(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::ClientError(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status_code, message).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!("{:?}", e);
            // detail is shown for client errors only
            let detail = is_client_error(error_code).then(|| e.to_string());
            api_error(error_code, detail)
        })
    }
}

impl<T> IntoApiResponse<T> for Result<T, RepositoryError> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!("{:?}", e);
            api_error(error_code, Some(e.backend_message()))
        })
    }
}

impl<T> IntoApiResponse<T> for Result<T, FormError> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| api_error(error_code, Some(e.to_string())))
    }
}

impl<T> IntoApiResponse<T> for Result<T, MultipartError> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!("{:?}", e);
            let detail = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                FormError::UploadTooLarge.to_string()
            } else {
                e.body_text()
            };
            api_error(error_code, Some(detail))
        })
    }
}

/// Builds the error for `error_code`, with `detail` appended to the code's
/// message.
pub(crate) fn api_error(error_code: &str, detail: Option<String>) -> ApiError {
    let message = match detail {
        Some(detail) => format!("{}: {}", error_message(error_code), detail),
        None => error_message(error_code),
    };

    match error_code.split('-').next() {
        Some("401") => ApiError::AuthError(message),
        Some("404") => ApiError::NotFound(message),
        _ if is_client_error(error_code) => ApiError::ClientError(message),
        _ => ApiError::ServerError(message),
    }
}

fn is_client_error(error_code: &str) -> bool {
    error_code.as_bytes().first() == Some(&b'4')
}

fn error_message(error_code: &str) -> String {
    ERROR_CODES
        .get_or_init(|| {
            serde_json::from_str(include_str!("error-code.json"))
                .unwrap_or_default()
        })
        .get(error_code)
        .cloned()
        .unwrap_or_else(|| "Unexpected error".to_string())
}

#[cfg(test)]
mod test {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_error_codes_parse() {
        // Arrange
        let text = include_str!("error-code.json");

        // Act
        let codes: HashMap<String, String> = serde_json::from_str(text).unwrap();

        // Assert
        assert_eq!(codes["500-004"], "Error creating prompt");
    }

    #[test]
    fn test_repository_error_keeps_backend_message() {
        // Arrange
        let result: Result<(), RepositoryError> = Err(RepositoryError::Rejected {
            message: "duplicate key value".to_string(),
        });

        // Act
        let error = IntoApiResponse::into_response(result, "500-004").unwrap_err();

        // Assert
        let ApiError::ServerError(message) = error else {
            panic!("expected a server error");
        };
        assert_eq!(message, "Error creating prompt: duplicate key value");
    }

    #[test]
    fn test_server_error_hides_detail() {
        // Arrange
        let result: anyhow::Result<()> = Err(anyhow!("connection reset"));

        // Act
        let error = IntoApiResponse::into_response(result, "500-003").unwrap_err();

        // Assert
        let ApiError::ServerError(message) = error else {
            panic!("expected a server error");
        };
        assert_eq!(message, "Failed to fetch prompts");
    }

    #[test]
    fn test_status_by_code() {
        // Arrange
        let cases = [
            ("400-003", StatusCode::BAD_REQUEST),
            ("401-001", StatusCode::UNAUTHORIZED),
            ("404-001", StatusCode::NOT_FOUND),
            ("500-001", StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (code, status) in cases {
            // Act
            let response = api_error(code, None).into_response();

            // Assert
            assert_eq!(response.status(), status, "{}", code);
        }
    }

    #[test]
    fn test_form_error_message() {
        // Arrange
        let result: Result<(), FormError> = Err(FormError::MissingRequiredField);

        // Act
        let error = IntoApiResponse::into_response(result, "400-003").unwrap_err();

        // Assert
        let ApiError::ClientError(message) = error else {
            panic!("expected a client error");
        };
        assert_eq!(message, "Invalid prompt: Please fill in all required fields");
    }
}
