use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadImageResponse {
    /// Object path inside the bucket
    pub path: String,
    pub image_url: String,
}
