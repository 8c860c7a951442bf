use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ErrorMessageParam {
    pub error_message: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParam {
    /// Authorization code issued by the provider
    pub code: Option<String>,
    /// Local path to land on after signing in
    pub next: Option<String>,
}
