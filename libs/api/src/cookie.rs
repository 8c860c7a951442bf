use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use entity::prelude::*;
use repository::session::{CookieAdapter, CookieOptions, SessionClient};

use crate::{
    response::{ApiResponse, IntoApiResponse},
    ApiState,
};

/// Lets a [`SessionClient`] read and write the request's cookie jar.
pub(crate) struct JarAdapter(CookieJar);

impl JarAdapter {
    pub(crate) fn into_jar(self) -> CookieJar {
        self.0
    }
}

impl CookieAdapter for JarAdapter {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|cookie| cookie.value().to_string())
    }

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) {
        let mut cookie = Cookie::build((name.to_string(), value.to_string()))
            .path(options.path.clone())
            .http_only(options.http_only)
            .secure(options.secure)
            .same_site(SameSite::Lax);
        if let Some(max_age) = options.max_age {
            cookie = cookie.max_age(time::Duration::seconds(max_age));
        }

        let jar = std::mem::take(&mut self.0);
        self.0 = jar.add(cookie);
    }

    fn remove(&mut self, name: &str, options: &CookieOptions) {
        let cookie = Cookie::build(name.to_string()).path(options.path.clone());

        let jar = std::mem::take(&mut self.0);
        self.0 = jar.remove(cookie);
    }
}

pub(crate) fn session_client(
    state: &ApiState,
    jar: CookieJar,
) -> SessionClient<JarAdapter> {
    SessionClient::new(
        state.repo.auth.clone(),
        JarAdapter(jar),
        state.config.session.clone(),
    )
}

/// The verified session, if any, along with the jar carrying any refreshed
/// or cleared session cookie.
pub(crate) async fn resolve_session(
    state: &ApiState,
    jar: CookieJar,
) -> ApiResponse<(CookieJar, Option<Session>)> {
    let mut client = session_client(state, jar);
    let session = client.current_session().await.into_response("500-001")?;

    Ok((client.into_cookies().into_jar(), session))
}
