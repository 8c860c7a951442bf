use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use chrono::Utc;
use entity::prelude::*;
use tracing::info;

pub mod request;
pub mod response;

use crate::{
    response::{ApiResponse, IntoApiResponse},
    ApiState,
};

use self::{request::UploadImageForm, response::UploadImageResponse};

const FILE_FIELD: &str = "file";

/// Upload an image for an Art prompt
#[utoipa::path(
    post,
    path = "/images",
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored; the object's path and public URL", body = UploadImageResponse),
        (status = 400, description = "No file, not an image, or larger than 5MB"),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "The session or storage backend failed")
    )
)]
pub async fn post_image(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    mut multipart: Multipart,
) -> ApiResponse<(StatusCode, Json<UploadImageResponse>)> {
    let (file, body) = read_file(&mut multipart).await?;

    let mut form = PromptForm::create();
    form.set_category(Category::Art).into_response("400-004")?;
    form.begin_upload(&file).into_response("400-004")?;

    let stored = store(&state, &session, &file, body).await;
    let settled = match &stored {
        Ok((_, image_url)) => form.finish_upload(image_url.as_str()),
        Err(_) => form.fail_upload(),
    };
    settled.into_response("500-007")?;
    let (path, image_url) = stored?;

    info!(task = "upload image", path = %path, size = file.size);

    Ok((
        StatusCode::CREATED,
        Json(UploadImageResponse { path, image_url }),
    ))
}

/// Stores the file under a fresh path and returns the path and public URL.
async fn store(
    state: &ApiState,
    session: &Session,
    file: &ImageFile,
    body: Bytes,
) -> ApiResponse<(String, String)> {
    // the session may have ended while the file was on its way
    if let Err(e) = state.repo.auth.get_user(&session.access_token).await {
        let code = if e.is_auth_failure() {
            "401-001"
        } else {
            "500-007"
        };
        return Err(e).into_response(code);
    }

    let path = file.storage_path(Utc::now());
    state
        .repo
        .image
        .upload(&session.access_token, &path, body, &file.content_type)
        .await
        .into_response("500-007")?;
    let image_url = state.repo.image.public_url(&path);

    Ok((path, image_url))
}

/// The first `file` field and its body.
async fn read_file(multipart: &mut Multipart) -> ApiResponse<(ImageFile, Bytes)> {
    while let Some(field) =
        multipart.next_field().await.into_response("400-004")?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field.bytes().await.into_response("400-004")?;

        let file = ImageFile {
            name,
            content_type,
            size: body.len(),
        };
        return Ok((file, body));
    }

    Err(FormError::NoFile).into_response("400-004")
}
