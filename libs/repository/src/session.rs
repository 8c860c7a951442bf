//! Cookie-backed session handling.
//!
//! The session is kept in a single cookie holding the JSON-encoded session,
//! base64url encoded. Cookies are only touched through a [`CookieAdapter`],
//! so the same client works over a request's cookie jar or an in-memory map.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use entity::prelude::*;
use sha2::{Digest, Sha256};
use supabase::auth::OAuthRequest;
use tracing::{info, warn};

use crate::{
    auth::AuthBackend, response::IntoResponse, RepositoryError, Response,
};

const CODE_VERIFIER_SUFFIX: &str = "-code-verifier";
const CODE_VERIFIER_MAX_AGE_SECS: i64 = 10 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
}

/// Get, set and remove cookies by name.
pub trait CookieAdapter {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions);

    fn remove(&mut self, name: &str, options: &CookieOptions);
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: i64,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sb-auth-token".to_string(),
            max_age_secs: 60 * 60 * 24 * 7,
            secure: false,
        }
    }
}

pub struct SessionClient<C> {
    auth: Arc<dyn AuthBackend>,
    cookies: C,
    config: SessionConfig,
}

impl<C: CookieAdapter> SessionClient<C> {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        cookies: C,
        config: SessionConfig,
    ) -> Self {
        Self {
            auth,
            cookies,
            config,
        }
    }

    /// Hands back the cookies, including every change made through this
    /// client.
    pub fn into_cookies(self) -> C {
        self.cookies
    }

    /// The session stored in the cookie, without asking the backend.
    pub fn stored_session(&self) -> Option<Session> {
        let value = self.cookies.get(&self.config.cookie_name)?;
        decode_session(&value)
    }

    /// The signed-in session, verified with the backend. An expired or
    /// rejected access token is refreshed once; when that fails too the
    /// cookie is dropped and there is no session.
    pub async fn current_session(&mut self) -> Response<Option<Session>> {
        let Some(session) = self.stored_session() else {
            if self.cookies.get(&self.config.cookie_name).is_some() {
                warn!(task = "read session", error = "undecodable cookie");
                self.clear();
            }
            return Ok(None);
        };

        if !session.is_expired(Utc::now()) {
            match self.auth.get_user(&session.access_token).await {
                Ok(user) => return Ok(Some(Session { user, ..session })),
                Err(e) if !e.is_auth_failure() => return Err(e),
                Err(_) => {}
            }
        }

        self.refresh(&session.refresh_token).await
    }

    pub async fn get_user(&mut self) -> Response<Option<UserEntity>> {
        Ok(self.current_session().await?.map(|session| session.user))
    }

    /// Starts an OAuth sign-in and returns the URL to send the browser to.
    /// The PKCE verifier is kept in a short-lived cookie until the callback.
    pub fn sign_in_with_oauth(
        &mut self,
        provider: &str,
        redirect_to: &str,
        consent: bool,
    ) -> Response<String> {
        let verifier = new_code_verifier();
        let mut query_params = Vec::new();
        if consent {
            query_params.push(("prompt".to_string(), "consent".to_string()));
        }

        let url = self.auth.authorize_url(&OAuthRequest {
            provider: provider.to_string(),
            redirect_to: redirect_to.to_string(),
            code_challenge: code_challenge(&verifier),
            query_params,
        })?;

        let options = CookieOptions {
            max_age: Some(CODE_VERIFIER_MAX_AGE_SECS),
            ..self.cookie_options()
        };
        self.cookies
            .set(&self.verifier_cookie_name(), &verifier, &options);

        Ok(url)
    }

    pub async fn exchange_code_for_session(
        &mut self,
        auth_code: &str,
    ) -> Response<Session> {
        let verifier_cookie = self.verifier_cookie_name();
        let Some(verifier) = self.cookies.get(&verifier_cookie) else {
            return Err(RepositoryError::Unauthorized {
                message: "Code verifier not found, please sign in again"
                    .to_string(),
            });
        };

        let session = self
            .auth
            .exchange_code_for_session(auth_code, &verifier)
            .await?;

        self.cookies
            .remove(&verifier_cookie, &self.cookie_options());
        self.persist(&session)?;
        info!(task = "sign in", user_id = %session.user.id);

        Ok(session)
    }

    /// Drops the local session, then revokes it at the backend. The cookie is
    /// gone even when revoking fails.
    pub async fn sign_out(&mut self) -> Response<()> {
        let session = self.stored_session();
        self.clear();

        if let Some(session) = session {
            self.auth.sign_out(&session.access_token).await?;
            info!(task = "sign out", user_id = %session.user.id);
        }

        Ok(())
    }

    async fn refresh(
        &mut self,
        refresh_token: &str,
    ) -> Response<Option<Session>> {
        match self.auth.refresh_session(refresh_token).await {
            Ok(session) => {
                self.persist(&session)?;
                info!(task = "refresh session", user_id = %session.user.id);
                Ok(Some(session))
            }
            Err(e) if e.is_auth_failure() => {
                warn!(task = "refresh session", error = %e);
                self.clear();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn persist(&mut self, session: &Session) -> Response<()> {
        let value = encode_session(session)?;
        self.cookies
            .set(&self.config.cookie_name, &value, &self.cookie_options());
        Ok(())
    }

    fn clear(&mut self) {
        self.cookies
            .remove(&self.config.cookie_name, &self.cookie_options());
    }

    fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            path: "/".to_string(),
            max_age: Some(self.config.max_age_secs),
            http_only: true,
            secure: self.config.secure,
        }
    }

    fn verifier_cookie_name(&self) -> String {
        format!("{}{}", self.config.cookie_name, CODE_VERIFIER_SUFFIX)
    }
}

pub fn encode_session(session: &Session) -> Response<String> {
    let json =
        serde_json::to_vec(session).into_response("in encode session")?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_session(value: &str) -> Option<Session> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}

/// S256 challenge for a PKCE verifier.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn new_code_verifier() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; 32]>())
}
