use crate::SupabaseError;

type Response<T> = Result<T, SupabaseError>;

pub(crate) trait IntoResponse<T> {
    fn into_response(self, message: &str) -> Response<T>;
}

impl<T> IntoResponse<T> for Result<T, reqwest::Error> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| SupabaseError::ReqwestError {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Result<T, serde_json::Error> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| SupabaseError::SerdeJsonError {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Result<T, reqwest::header::InvalidHeaderValue> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| SupabaseError::InvalidHeader {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Result<T, url::ParseError> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| SupabaseError::UrlParseError {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Option<T> {
    fn into_response(self, message: &str) -> Response<T> {
        self.ok_or_else(|| SupabaseError::Option {
            message: message.to_string(),
        })
    }
}
