use anyhow::anyhow;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use entity::prelude::*;
use tracing::info;

pub mod request;
pub mod response;

use crate::{
    response::{ApiResponse, IntoApiResponse},
    ApiState,
};

use self::{
    request::{DeletePromptParam, PromptRequest},
    response::PromptsResponse,
};

/// Create a prompt
#[utoipa::path(
    post,
    path = "/prompts",
    request_body = PromptRequest,
    responses(
        (status = 201, description = "Created; the user's prompts", body = PromptsResponse),
        (status = 400, description = "Missing title or content, or an unknown category or provider"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn post_prompt(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    Json(body): Json<PromptRequest>,
) -> ApiResponse<(StatusCode, Json<PromptsResponse>)> {
    let mut form = PromptForm::create();
    body.fill(&mut form)?;
    let data = form.begin_submit().into_response("400-003")?;

    let result = state
        .repo
        .prompt
        .insert(&session.access_token, &session.user.id, data)
        .await;
    settle(&mut form, result.is_ok())?;
    let prompt = result.into_response("500-004")?;

    info!(task = "create prompt", id = %prompt.id, user_id = %session.user.id);

    let prompts = fetch_prompts(&state, &session).await?;
    Ok((StatusCode::CREATED, Json(PromptsResponse::from(prompts))))
}

/// Update a prompt
#[utoipa::path(
    put,
    path = "/prompts/{id}",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Updated; the user's prompts", body = PromptsResponse),
        (status = 400, description = "Missing title or content, or an unknown category or provider"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No such prompt for this user")
    ),
    params(
        ("id" = String, Path, description = "prompt id"),
    )
)]
pub async fn put_prompt(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(body): Json<PromptRequest>,
) -> ApiResponse<Json<PromptsResponse>> {
    let prompts = fetch_prompts(&state, &session).await?;
    let existing = owned(&prompts, &id, &session)?;

    let mut form = PromptForm::edit(existing);
    body.fill(&mut form)?;
    let data = form.begin_submit().into_response("400-003")?;

    let result = state
        .repo
        .prompt
        .update(&session.access_token, &id, data)
        .await;
    settle(&mut form, result.is_ok())?;
    result.into_response("500-005")?;

    info!(task = "update prompt", id = %id, user_id = %session.user.id);

    let prompts = fetch_prompts(&state, &session).await?;
    Ok(Json(PromptsResponse::from(prompts)))
}

/// Delete a prompt
#[utoipa::path(
    delete,
    path = "/prompts/{id}",
    responses(
        (status = 200, description = "Deleted; the user's prompts", body = PromptsResponse),
        (status = 400, description = "Deletion was not confirmed"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No such prompt for this user")
    ),
    params(
        ("id" = String, Path, description = "prompt id"),
        DeletePromptParam
    )
)]
pub async fn delete_prompt(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Query(params): Query<DeletePromptParam>,
) -> ApiResponse<Json<PromptsResponse>> {
    if !params.confirm {
        return Err(anyhow!("pass confirm=true to delete {}", id))
            .into_response("400-005");
    }

    let prompts = fetch_prompts(&state, &session).await?;
    owned(&prompts, &id, &session)?;

    state
        .repo
        .prompt
        .delete(&session.access_token, &id)
        .await
        .into_response("500-006")?;

    info!(task = "delete prompt", id = %id, user_id = %session.user.id);

    let prompts = fetch_prompts(&state, &session).await?;
    Ok(Json(PromptsResponse::from(prompts)))
}

/// Every prompt of the session's user, newest first.
pub(crate) async fn fetch_prompts(
    state: &ApiState,
    session: &Session,
) -> ApiResponse<Vec<PromptEntity>> {
    state
        .repo
        .prompt
        .find_by_user(&session.access_token, &session.user.id)
        .await
        .into_response("500-003")
}

fn owned<'a>(
    prompts: &'a [PromptEntity],
    id: &str,
    session: &Session,
) -> ApiResponse<&'a PromptEntity> {
    prompts
        .iter()
        .find(|prompt| prompt.id == id)
        .ok_or_else(|| anyhow!("{} has no prompt {}", session.user.id, id))
        .into_response("404-001")
}

fn settle(form: &mut PromptForm, stored: bool) -> ApiResponse<()> {
    if stored {
        form.submit_succeeded()
    } else {
        form.submit_failed()
    }
    .into_response("400-003")
}
