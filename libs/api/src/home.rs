use axum::{extract::State, response::Redirect};
use axum_extra::extract::CookieJar;

use crate::{cookie::resolve_session, response::ApiResponse, ApiState};

/// Send the visitor to the dashboard or the login page
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 303, description = "Redirect to /dashboard when signed in, /login otherwise")
    )
)]
pub async fn get_home(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> ApiResponse<(CookieJar, Redirect)> {
    let (jar, session) = resolve_session(&state, jar).await?;

    let to = if session.is_some() { "/dashboard" } else { "/login" };

    Ok((jar, Redirect::to(to)))
}
