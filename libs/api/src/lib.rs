use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use entity::form::MAX_IMAGE_BYTES;
use repository::Repository;
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;

mod auth;
pub mod config;
mod cookie;
pub mod dashboard;
pub mod healthz;
pub mod home;
pub mod image;
pub mod login;
pub mod not_found;
pub mod prompt;
mod response;

pub enum ApiError {
    AuthError(String),
    ClientError(String),
    NotFound(String),
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    repo: Repository,
    config: Config,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home::get_home,
        login::get_login,
        login::post_sign_in,
        login::get_callback,
        login::get_auth_code_error,
        login::post_sign_out,
        dashboard::get_dashboard,
        prompt::post_prompt,
        prompt::put_prompt,
        prompt::delete_prompt,
        image::post_image,
    ),
    components(schemas(
        login::response::LoginResponse,
        login::response::AuthCodeErrorResponse,
        dashboard::response::GetDashboardResponse,
        dashboard::response::UserResp,
        prompt::request::PromptRequest,
        prompt::response::PromptResp,
        prompt::response::PromptsResponse,
        image::request::UploadImageForm,
        image::response::UploadImageResponse,
    )),
    tags(
        (name = "promptbox", description = "Prompt management API")
    )
)]
struct ApiDoc;

pub fn serve(repository: Repository, config: Config) -> anyhow::Result<Router> {
    info!(task = "start api serving");

    let origin = config
        .server
        .allowed_origin
        .parse::<HeaderValue>()
        .context("failed to parse allowed_origin")?;

    let state = ApiState {
        repo: repository,
        config,
    };

    // sign in and out
    let auth_router = Router::new()
        .route("/", get(home::get_home))
        .route("/login", get(login::get_login))
        .route("/auth/sign-in", post(login::post_sign_in))
        .route("/auth/callback", get(login::get_callback))
        .route("/auth/auth-code-error", get(login::get_auth_code_error))
        .route("/auth/sign-out", post(login::post_sign_out))
        .with_state(state.clone());

    // pages send anonymous visitors to the login page
    let page_router = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session_or_login,
        ))
        .with_state(state.clone());

    // prompts
    let prompt_router = Router::new()
        .route("/prompts", post(prompt::post_prompt))
        .route(
            "/prompts/:id",
            put(prompt::put_prompt).delete(prompt::delete_prompt),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ))
        .with_state(state.clone());

    // images, with room for an oversized file to reach validation
    let image_router = Router::new()
        .route("/images", post(image::post_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES * 2))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let router = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .route("/healthz", get(healthz::get_health))
        .merge(auth_router)
        .merge(page_router)
        .merge(prompt_router)
        .merge(image_router)
        .layer(cors)
        .fallback(not_found::get_404);

    Ok(router)
}
