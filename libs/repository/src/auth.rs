use std::fmt::Debug;

use async_trait::async_trait;
use entity::prelude::*;
use supabase::auth::{Auth, OAuthRequest};

use crate::{response::IntoResponse, Response};

#[async_trait]
pub trait AuthBackend: Send + Sync + Debug {
    fn authorize_url(&self, request: &OAuthRequest) -> Response<String>;

    async fn get_user(&self, access_token: &str) -> Response<UserEntity>;

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Response<Session>;

    async fn refresh_session(&self, refresh_token: &str) -> Response<Session>;

    async fn sign_out(&self, access_token: &str) -> Response<()>;
}

#[async_trait]
impl AuthBackend for Auth {
    fn authorize_url(&self, request: &OAuthRequest) -> Response<String> {
        Auth::authorize_url(self, request).into_response("in authorize url")
    }

    async fn get_user(&self, access_token: &str) -> Response<UserEntity> {
        Auth::get_user(self, access_token)
            .await
            .into_response("in get user")
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Response<Session> {
        Auth::exchange_code_for_session(self, auth_code, code_verifier)
            .await
            .into_response("in exchange code for session")
    }

    async fn refresh_session(&self, refresh_token: &str) -> Response<Session> {
        Auth::refresh_session(self, refresh_token)
            .await
            .into_response("in refresh session")
    }

    async fn sign_out(&self, access_token: &str) -> Response<()> {
        Auth::sign_out(self, access_token)
            .await
            .into_response("in sign out")
    }
}
