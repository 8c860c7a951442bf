//! Thin typed client for the hosted Supabase APIs the app touches: GoTrue
//! auth, PostgREST tables and Storage buckets.

use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method, RequestBuilder,
};
use serde_json::Value;

pub mod auth;
mod response;
pub mod storage;
pub mod table;

pub use reqwest::StatusCode;

use auth::Auth;
use response::IntoResponse;
use storage::Bucket;
use table::Table;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("{message}: {source}")]
    ReqwestError {
        message: String,
        source: reqwest::Error,
    },

    #[error("{message}: {source}")]
    SerdeJsonError {
        message: String,
        source: serde_json::Error,
    },

    #[error("{message}: {source}")]
    InvalidHeader {
        message: String,
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("{message}: {source}")]
    UrlParseError {
        message: String,
        source: url::ParseError,
    },

    #[error("status code: {status_code}, message: {message}")]
    FailedStatusCode {
        status_code: StatusCode,
        message: String,
    },

    #[error("{message}")]
    Option { message: String },
}

impl SupabaseError {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            SupabaseError::FailedStatusCode { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }

    /// The platform's own message when it rejected the call, otherwise the
    /// full error text.
    pub fn message(&self) -> String {
        match self {
            SupabaseError::FailedStatusCode { message, .. } => message.clone(),
            e => e.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Result<Self, SupabaseError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let anon_key = anon_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&anon_key)
                .into_response("failed to build apikey header")?,
        );
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let http = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .into_response("failed to build http client")?;

        Ok(Self {
            base_url,
            anon_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> Auth {
        Auth::new(self.clone())
    }

    pub fn from(&self, table: &str) -> Table {
        Table::new(self.clone(), table)
    }

    pub fn storage(&self, bucket: &str) -> Bucket {
        Bucket::new(self.clone(), bucket)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Requests run as the signed-in user when a token is given, otherwise
    /// as the anonymous role.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        message: &str,
    ) -> Result<String, SupabaseError> {
        let response = request.send().await.into_response(message)?;

        let status = response.status();
        let text = response.text().await.into_response(message)?;

        if !status.is_success() {
            return Err(SupabaseError::FailedStatusCode {
                status_code: status,
                message: backend_message(status, &text),
            });
        }

        Ok(text)
    }
}

/// GoTrue answers with `msg` or `error_description`, PostgREST and Storage
/// with `message`.
fn backend_message(status: StatusCode, text: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    if text.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }

    text.to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_backend_message() {
        assert_eq!(
            backend_message(
                StatusCode::BAD_REQUEST,
                r#"{"code":"PGRST204","message":"Could not find the 'foo' column"}"#
            ),
            "Could not find the 'foo' column"
        );
        assert_eq!(
            backend_message(
                StatusCode::BAD_REQUEST,
                r#"{"code":400,"error_code":"bad_code_verifier","msg":"invalid flow state"}"#
            ),
            "invalid flow state"
        );
        assert_eq!(
            backend_message(
                StatusCode::BAD_REQUEST,
                r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#
            ),
            "Invalid Refresh Token"
        );
        assert_eq!(backend_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
        assert_eq!(
            backend_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = Client::new("https://abc.supabase.co/", "anon").unwrap();

        assert_eq!(
            client.url("rest/v1/prompts"),
            "https://abc.supabase.co/rest/v1/prompts"
        );
    }
}
