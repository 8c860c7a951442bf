use chrono::Utc;
use entity::prelude::*;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::{response::IntoResponse, Client, SupabaseError};

/// Parameters of an OAuth sign-in using PKCE.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthRequest {
    pub provider: String,
    pub redirect_to: String,
    pub code_challenge: String,
    /// Extra parameters forwarded to the identity provider.
    pub query_params: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

impl From<UserResponse> for UserEntity {
    fn from(value: UserResponse) -> Self {
        UserEntity {
            id: value.id,
            email: value.email.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserResponse,
}

impl From<TokenResponse> for Session {
    fn from(value: TokenResponse) -> Self {
        let expires_at = value.expires_at.unwrap_or_else(|| {
            Utc::now().timestamp() + value.expires_in.unwrap_or(3600)
        });

        Session {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            expires_at,
            user: value.user.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Auth {
    client: Client,
}

impl Auth {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// The URL the browser is sent to in order to start the OAuth flow.
    pub fn authorize_url(
        &self,
        request: &OAuthRequest,
    ) -> Result<String, SupabaseError> {
        let mut url = Url::parse(&self.client.url("auth/v1/authorize"))
            .into_response("failed to parse authorize url")?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("provider", &request.provider)
                .append_pair("redirect_to", &request.redirect_to)
                .append_pair("code_challenge", &request.code_challenge)
                .append_pair("code_challenge_method", "s256");
            for (key, value) in &request.query_params {
                query.append_pair(key, value);
            }
        }

        Ok(url.to_string())
    }

    pub async fn get_user(
        &self,
        access_token: &str,
    ) -> Result<UserEntity, SupabaseError> {
        let request =
            self.client
                .request(Method::GET, "auth/v1/user", Some(access_token));
        let text = self.client.send(request, "failed to get user").await?;

        let user = serde_json::from_str::<UserResponse>(&text)
            .into_response("failed to parse user")?;

        Ok(user.into())
    }

    pub async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, SupabaseError> {
        self.token(
            "pkce",
            json!({
                "auth_code": auth_code,
                "code_verifier": code_verifier,
            }),
        )
        .await
    }

    pub async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Session, SupabaseError> {
        self.token("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let request = self
            .client
            .request(Method::POST, "auth/v1/logout", Some(access_token))
            .query(&[("scope", "global")]);
        self.client.send(request, "failed to sign out").await?;

        Ok(())
    }

    async fn token(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Session, SupabaseError> {
        let request = self
            .client
            .request(Method::POST, "auth/v1/token", None)
            .query(&[("grant_type", grant_type)])
            .json(&body);
        let text = self.client.send(request, "failed to grant token").await?;

        let token = serde_json::from_str::<TokenResponse>(&text)
            .into_response("failed to parse token")?;

        Ok(token.into())
    }
}
