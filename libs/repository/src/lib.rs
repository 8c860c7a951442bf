use std::sync::Arc;

use auth::AuthBackend;
use image::{ImageRepository, ImageStore};
use prompt::{PromptRepository, PromptStore};
use supabase::{StatusCode, SupabaseError};

pub mod auth;
pub mod image;
pub mod prompt;
mod response;
pub mod session;

pub use supabase::auth::OAuthRequest;

/// Backends the application talks to. Built once at startup and handed to
/// whoever needs it.
#[derive(Clone, Debug)]
pub struct Repository {
    pub auth: Arc<dyn AuthBackend>,
    pub prompt: Arc<dyn PromptStore>,
    pub image: Arc<dyn ImageStore>,
}

impl Repository {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        prompt: Arc<dyn PromptStore>,
        image: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            auth,
            prompt,
            image,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("in supabase: {}: {}", message, source)]
    InSupabase {
        message: String,
        source: SupabaseError,
    },

    #[error("in serde_json: {}: {}", message, source)]
    InSerdeJson {
        message: String,
        source: serde_json::Error,
    },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("rejected: {message}")]
    Rejected { message: String },
}

impl RepositoryError {
    /// What the backend said, suitable for showing to the user.
    pub fn backend_message(&self) -> String {
        match self {
            RepositoryError::InSupabase { source, .. } => source.message(),
            RepositoryError::InSerdeJson { source, .. } => source.to_string(),
            RepositoryError::Unauthorized { message }
            | RepositoryError::Rejected { message } => message.clone(),
        }
    }

    /// True when the credentials used for the call are no longer usable.
    /// Throttling and other client errors leave the session alone.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            RepositoryError::InSupabase { source, .. } => {
                source.status_code().is_some_and(|status| {
                    matches!(
                        status,
                        StatusCode::BAD_REQUEST
                            | StatusCode::UNAUTHORIZED
                            | StatusCode::FORBIDDEN
                    )
                })
            }
            RepositoryError::Unauthorized { .. } => true,
            _ => false,
        }
    }
}

pub type Response<T> = Result<T, RepositoryError>;

pub fn init_repository(
    client: &supabase::Client,
    table: &str,
    bucket: &str,
) -> Repository {
    Repository::new(
        Arc::new(client.auth()),
        Arc::new(PromptRepository::new(client.from(table))),
        Arc::new(ImageRepository::new(client.storage(bucket))),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    fn failed(status_code: StatusCode) -> RepositoryError {
        RepositoryError::InSupabase {
            message: "in refresh session".to_string(),
            source: SupabaseError::FailedStatusCode {
                status_code,
                message: "rejected".to_string(),
            },
        }
    }

    #[test]
    fn test_is_auth_failure() {
        // Arrange
        let cases = [
            (StatusCode::BAD_REQUEST, true),
            (StatusCode::UNAUTHORIZED, true),
            (StatusCode::FORBIDDEN, true),
            (StatusCode::NOT_FOUND, false),
            (StatusCode::TOO_MANY_REQUESTS, false),
            (StatusCode::BAD_GATEWAY, false),
        ];

        for (status, expected) in cases {
            // Act
            let auth_failure = failed(status).is_auth_failure();

            // Assert
            assert_eq!(auth_failure, expected, "{}", status);
        }
    }

    #[test]
    fn test_unauthorized_is_auth_failure() {
        let error = RepositoryError::Unauthorized {
            message: "invalid JWT".to_string(),
        };

        assert!(error.is_auth_failure());
    }
}
