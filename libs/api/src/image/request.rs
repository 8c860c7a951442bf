use utoipa::ToSchema;

/// Multipart body of an image upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadImageForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
