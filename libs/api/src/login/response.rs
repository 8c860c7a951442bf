use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub product: String,
    pub provider: String,
    pub sign_in_path: String,
    pub error_message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthCodeErrorResponse {
    pub title: String,
    pub error_message: Option<String>,
    pub login_path: String,
}
