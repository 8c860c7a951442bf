use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use entity::prelude::*;
use parking_lot::Mutex;
use repository::{auth::AuthBackend, OAuthRequest, RepositoryError, Response};
use supabase::{StatusCode, SupabaseError};

/// A valid, unexpired session for `user_id`.
pub fn session_for(user_id: &str) -> Session {
    Session {
        access_token: format!("access-{}", user_id),
        refresh_token: format!("refresh-{}", user_id),
        expires_at: Utc::now().timestamp() + 3600,
        user: UserEntity {
            id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
        },
    }
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, UserEntity>,
    codes: HashMap<String, Session>,
    refreshes: HashMap<String, Session>,
    exchanges: Vec<(String, String)>,
    signed_out: Vec<String>,
    user_lookups: usize,
    fail_user_after: Option<(usize, StatusCode)>,
    fail_refresh: Option<StatusCode>,
}

/// Auth backend that knows a fixed set of tokens and codes.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    state: Mutex<State>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the session's access token.
    pub fn with_session(self, session: &Session) -> Self {
        self.state
            .lock()
            .users
            .insert(session.access_token.clone(), session.user.clone());
        self
    }

    /// Exchanging `code` yields `session` once.
    pub fn with_code(self, code: &str, session: Session) -> Self {
        let this = self.with_session(&session);
        this.state.lock().codes.insert(code.to_string(), session);
        this
    }

    /// Refreshing with `refresh_token` yields `session`.
    pub fn with_refresh(self, refresh_token: &str, session: Session) -> Self {
        let this = self.with_session(&session);
        this.state
            .lock()
            .refreshes
            .insert(refresh_token.to_string(), session);
        this
    }

    /// Every refresh is answered with `status`.
    pub fn fail_refresh(self, status: StatusCode) -> Self {
        self.state.lock().fail_refresh = Some(status);
        self
    }

    /// User lookups past the first `calls` are answered with `status`.
    pub fn fail_get_user_after(self, calls: usize, status: StatusCode) -> Self {
        self.state.lock().fail_user_after = Some((calls, status));
        self
    }

    pub fn revoke(&self, access_token: &str) {
        self.state.lock().users.remove(access_token);
    }

    /// `(code, verifier)` pairs seen by the exchange.
    pub fn exchanges(&self) -> Vec<(String, String)> {
        self.state.lock().exchanges.clone()
    }

    pub fn signed_out(&self) -> Vec<String> {
        self.state.lock().signed_out.clone()
    }
}

#[async_trait]
impl AuthBackend for MemoryAuth {
    fn authorize_url(&self, request: &OAuthRequest) -> Response<String> {
        let mut url = format!(
            "https://auth.test/authorize?provider={}&redirect_to={}&code_challenge={}",
            request.provider, request.redirect_to, request.code_challenge
        );
        for (key, value) in &request.query_params {
            url.push_str(&format!("&{}={}", key, value));
        }
        Ok(url)
    }

    async fn get_user(&self, access_token: &str) -> Response<UserEntity> {
        let mut state = self.state.lock();
        state.user_lookups += 1;
        if let Some((calls, status)) = state.fail_user_after {
            if state.user_lookups > calls {
                return Err(failed("in get user", status));
            }
        }

        state
            .users
            .get(access_token)
            .cloned()
            .ok_or_else(|| RepositoryError::Unauthorized {
                message: "invalid JWT".to_string(),
            })
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Response<Session> {
        let mut state = self.state.lock();
        state
            .exchanges
            .push((auth_code.to_string(), code_verifier.to_string()));
        state
            .codes
            .remove(auth_code)
            .ok_or_else(|| RepositoryError::Unauthorized {
                message: "invalid flow state, no valid flow state found"
                    .to_string(),
            })
    }

    async fn refresh_session(&self, refresh_token: &str) -> Response<Session> {
        let state = self.state.lock();
        if let Some(status) = state.fail_refresh {
            return Err(failed("in refresh session", status));
        }

        state
            .refreshes
            .get(refresh_token)
            .cloned()
            .ok_or_else(|| RepositoryError::Unauthorized {
                message: "Invalid Refresh Token".to_string(),
            })
    }

    async fn sign_out(&self, access_token: &str) -> Response<()> {
        let mut state = self.state.lock();
        state.users.remove(access_token);
        state.signed_out.push(access_token.to_string());
        Ok(())
    }
}

fn failed(message: &str, status_code: StatusCode) -> RepositoryError {
    RepositoryError::InSupabase {
        message: message.to_string(),
        source: SupabaseError::FailedStatusCode {
            status_code,
            message: status_code
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        },
    }
}
