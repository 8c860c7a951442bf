use supabase::SupabaseError;

use crate::{RepositoryError, Response};

pub(crate) trait IntoResponse<T> {
    fn into_response(self, message: &str) -> Response<T>;
}

impl<T> IntoResponse<T> for Result<T, SupabaseError> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| RepositoryError::InSupabase {
            message: message.to_string(),
            source: e,
        })
    }
}

impl<T> IntoResponse<T> for Result<T, serde_json::Error> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| RepositoryError::InSerdeJson {
            message: message.to_string(),
            source: e,
        })
    }
}
