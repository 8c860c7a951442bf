use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{cookie::resolve_session, response::api_error, ApiState};

/// Lets the request through with its session in the extensions, or
/// answers 401.
pub async fn require_session(
    State(state): State<ApiState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    gate(state, jar, req, next, |jar| {
        (jar, api_error("401-001", None)).into_response()
    })
    .await
}

/// Same as [`require_session`], but sends the browser to the login page.
pub async fn require_session_or_login(
    State(state): State<ApiState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    gate(state, jar, req, next, |jar| {
        (jar, Redirect::to("/login")).into_response()
    })
    .await
}

async fn gate(
    state: ApiState,
    jar: CookieJar,
    mut req: Request,
    next: Next,
    anonymous: impl FnOnce(CookieJar) -> Response,
) -> Response {
    let (jar, session) = match resolve_session(&state, jar).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    let Some(session) = session else {
        return anonymous(jar);
    };

    req.extensions_mut().insert(session);
    (jar, next.run(req).await).into_response()
}
