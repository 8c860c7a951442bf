use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};
use url::form_urlencoded;

pub mod request;
pub mod response;

use crate::{
    cookie::session_client,
    response::{ApiResponse, IntoApiResponse},
    ApiState,
};

use self::{
    request::{CallbackParam, ErrorMessageParam},
    response::{AuthCodeErrorResponse, LoginResponse},
};

const PROVIDER: &str = "google";

/// Login page data
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page data", body = LoginResponse)
    ),
    params(
        ErrorMessageParam
    )
)]
pub async fn get_login(
    Query(params): Query<ErrorMessageParam>,
) -> Json<LoginResponse> {
    Json(LoginResponse {
        product: "Prompt Manager".to_string(),
        provider: PROVIDER.to_string(),
        sign_in_path: "/auth/sign-in".to_string(),
        error_message: params.error_message,
    })
}

/// Start signing in with Google
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    responses(
        (status = 303, description = "Redirect to the provider's consent screen")
    )
)]
pub async fn post_sign_in(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> ApiResponse<(CookieJar, Redirect)> {
    let redirect_to = format!("{}/auth/callback", state.config.server.site_url);

    let mut client = session_client(&state, jar);
    let url = client
        .sign_in_with_oauth(PROVIDER, &redirect_to, true)
        .into_response("500-002")?;

    info!(task = "start sign in", provider = PROVIDER);

    Ok((client.into_cookies().into_jar(), Redirect::to(&url)))
}

/// Finish signing in
#[utoipa::path(
    get,
    path = "/auth/callback",
    responses(
        (status = 303, description = "Redirect to `next`, or to an error page when the code cannot be exchanged")
    ),
    params(
        CallbackParam
    )
)]
pub async fn get_callback(
    State(state): State<ApiState>,
    jar: CookieJar,
    Query(params): Query<CallbackParam>,
) -> (CookieJar, Redirect) {
    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        return (
            jar,
            Redirect::to("/login?error_message=Missing+authorization+code"),
        );
    };

    let mut client = session_client(&state, jar);
    let result = client.exchange_code_for_session(&code).await;
    let jar = client.into_cookies().into_jar();

    if let Err(e) = result {
        warn!(task = "exchange code", error = %e);
        let message: String =
            form_urlencoded::byte_serialize(e.backend_message().as_bytes())
                .collect();
        return (
            jar,
            Redirect::to(&format!(
                "/auth/auth-code-error?error_message={}",
                message
            )),
        );
    }

    (jar, Redirect::to(local_path(params.next.as_deref())))
}

/// Sign-in error page data
#[utoipa::path(
    get,
    path = "/auth/auth-code-error",
    responses(
        (status = 200, description = "Why signing in failed", body = AuthCodeErrorResponse)
    ),
    params(
        ErrorMessageParam
    )
)]
pub async fn get_auth_code_error(
    Query(params): Query<ErrorMessageParam>,
) -> Json<AuthCodeErrorResponse> {
    Json(AuthCodeErrorResponse {
        title: "Authentication error".to_string(),
        error_message: params.error_message,
        login_path: "/login".to_string(),
    })
}

/// Sign out
#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses(
        (status = 303, description = "Redirect to /login")
    )
)]
pub async fn post_sign_out(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let mut client = session_client(&state, jar);
    if let Err(e) = client.sign_out().await {
        // the cookie is already gone
        warn!(task = "sign out", error = %e);
    }

    (client.into_cookies().into_jar(), Redirect::to("/login"))
}

/// `next` when it is a path on this site, `/` otherwise.
fn local_path(next: Option<&str>) -> &str {
    match next {
        Some(next) if is_local_path(next) => next,
        _ => "/",
    }
}

// Browsers read `/\` like `//` and drop tabs and newlines before resolving.
// A Location header only holds printable ASCII.
fn is_local_path(next: &str) -> bool {
    let bytes = next.as_bytes();
    bytes.first() == Some(&b'/')
        && !matches!(bytes.get(1), Some(b'/') | Some(b'\\'))
        && bytes.iter().all(|b| (b' '..=b'~').contains(b))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_local_path() {
        // Arrange
        let cases = [
            (None, "/"),
            (Some("/dashboard"), "/dashboard"),
            (Some("/dashboard?category=Art"), "/dashboard?category=Art"),
            (Some("//evil.example.com"), "/"),
            (Some("https://evil.example.com"), "/"),
            (Some(""), "/"),
            (Some("/"), "/"),
            (Some("/\\evil.example.com"), "/"),
            (Some("/\t/evil.example.com"), "/"),
            (Some("/\nfoo"), "/"),
            (Some("/dashboard\r\nSet-Cookie: a=b"), "/"),
            (Some("/caf\u{e9}"), "/"),
        ];

        for (next, expected) in cases {
            // Act
            let path = local_path(next);

            // Assert
            assert_eq!(path, expected, "{:?}", next);
        }
    }
}
