use axum::{
    extract::{Query, State},
    Extension, Json,
};
use entity::prelude::*;

pub mod request;
pub mod response;

use crate::{
    prompt::{fetch_prompts, response::PromptResp},
    response::{ApiResponse, IntoApiResponse},
    ApiState,
};

use self::{
    request::GetDashboardParam,
    response::{GetDashboardResponse, UserResp},
};

/// List the signed-in user's prompts
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Visible prompts, newest first", body = GetDashboardResponse),
        (status = 303, description = "Redirect to /login without a session"),
        (status = 400, description = "Unknown category")
    ),
    params(
        GetDashboardParam
    )
)]
pub async fn get_dashboard(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    Query(params): Query<GetDashboardParam>,
) -> ApiResponse<Json<GetDashboardResponse>> {
    let filter = params.filter().into_response("400-001")?;

    let prompts = fetch_prompts(&state, &session).await?;
    let visible: Vec<PromptResp> = filter
        .apply(&prompts)
        .into_iter()
        .cloned()
        .map(PromptResp::from)
        .collect();

    Ok(Json(GetDashboardResponse {
        user: UserResp::from(session.user),
        categories: CategoryFilter::options()
            .iter()
            .map(ToString::to_string)
            .collect(),
        selected_category: filter.category.to_string(),
        search_query: filter.query,
        total: prompts.len(),
        is_empty: visible.is_empty(),
        prompts: visible,
    }))
}
