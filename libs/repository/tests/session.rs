use std::sync::Arc;

use repository::session::{
    code_challenge, decode_session, encode_session, CookieAdapter,
    SessionClient, SessionConfig,
};
use supabase::StatusCode;
use test_utils::{session_for, MemoryAuth, MemoryCookies};

const COOKIE: &str = "sb-auth-token";
const VERIFIER_COOKIE: &str = "sb-auth-token-code-verifier";

fn client(
    auth: Arc<MemoryAuth>,
    cookies: MemoryCookies,
) -> SessionClient<MemoryCookies> {
    SessionClient::new(auth, cookies, SessionConfig::default())
}

#[tokio::test]
async fn test_no_cookie_means_no_session() {
    let mut client = client(Arc::new(MemoryAuth::new()), MemoryCookies::new());

    let user = client.get_user().await.unwrap();

    assert!(user.is_none());
}

#[tokio::test]
async fn test_valid_cookie_yields_user() {
    // Arrange
    let session = session_for("u-1");
    let auth = Arc::new(MemoryAuth::new().with_session(&session));
    let cookies =
        MemoryCookies::new().with(COOKIE, &encode_session(&session).unwrap());

    // Act
    let user = client(auth, cookies).get_user().await.unwrap();

    // Assert
    assert_eq!(user.unwrap().id, "u-1");
}

#[tokio::test]
async fn test_garbage_cookie_is_dropped() {
    let mut client = client(
        Arc::new(MemoryAuth::new()),
        MemoryCookies::new().with(COOKIE, "garbage"),
    );

    let session = client.current_session().await.unwrap();

    assert!(session.is_none());
    assert!(client.into_cookies().get(COOKIE).is_none());
}

#[tokio::test]
async fn test_expired_session_is_refreshed() {
    // Arrange
    let mut stale = session_for("u-1");
    stale.expires_at = 0;
    let mut fresh = session_for("u-1");
    fresh.access_token = "access-u-1-v2".to_string();
    let auth = Arc::new(
        MemoryAuth::new().with_refresh(&stale.refresh_token, fresh.clone()),
    );
    let cookies =
        MemoryCookies::new().with(COOKIE, &encode_session(&stale).unwrap());
    let mut client = client(auth, cookies);

    // Act
    let session = client.current_session().await.unwrap().unwrap();

    // Assert
    assert_eq!(session.access_token, "access-u-1-v2");
    let stored = client.into_cookies().get(COOKIE).unwrap();
    assert_eq!(decode_session(&stored).unwrap(), fresh);
}

#[tokio::test]
async fn test_revoked_session_without_refresh_signs_out() {
    // Arrange
    let session = session_for("u-1");
    let auth = Arc::new(MemoryAuth::new().with_session(&session));
    auth.revoke(&session.access_token);
    let cookies =
        MemoryCookies::new().with(COOKIE, &encode_session(&session).unwrap());
    let mut client = client(auth, cookies);

    // Act
    let current = client.current_session().await.unwrap();

    // Assert
    assert!(current.is_none());
    assert!(client.into_cookies().get(COOKIE).is_none());
}

#[tokio::test]
async fn test_throttled_refresh_keeps_cookie() {
    // Arrange
    let mut stale = session_for("u-1");
    stale.expires_at = 0;
    let auth = Arc::new(
        MemoryAuth::new().fail_refresh(StatusCode::TOO_MANY_REQUESTS),
    );
    let cookies =
        MemoryCookies::new().with(COOKIE, &encode_session(&stale).unwrap());
    let mut client = client(auth, cookies);

    // Act
    let result = client.current_session().await;

    // Assert
    let error = result.unwrap_err();
    assert!(!error.is_auth_failure());
    let stored = client.into_cookies().get(COOKIE).unwrap();
    assert_eq!(decode_session(&stored).unwrap(), stale);
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    // Arrange
    let mut stale = session_for("u-1");
    stale.expires_at = 0;
    let auth =
        Arc::new(MemoryAuth::new().fail_refresh(StatusCode::BAD_REQUEST));
    let cookies =
        MemoryCookies::new().with(COOKIE, &encode_session(&stale).unwrap());
    let mut client = client(auth, cookies);

    // Act
    let session = client.current_session().await.unwrap();

    // Assert
    assert!(session.is_none());
    assert!(client.into_cookies().get(COOKIE).is_none());
}

#[tokio::test]
async fn test_sign_in_stores_verifier_and_requests_consent() {
    let mut client = client(Arc::new(MemoryAuth::new()), MemoryCookies::new());

    let url = client
        .sign_in_with_oauth("google", "http://localhost:8000/auth/callback", true)
        .unwrap();

    let cookies = client.into_cookies();
    let verifier = cookies.get(VERIFIER_COOKIE).unwrap();
    assert!(url.contains("provider=google"));
    assert!(url.contains("prompt=consent"));
    assert!(url.contains(&format!("code_challenge={}", code_challenge(&verifier))));
    assert_eq!(cookies.options(VERIFIER_COOKIE).unwrap().max_age, Some(600));
}

#[tokio::test]
async fn test_exchange_code_persists_session() {
    // Arrange
    let session = session_for("u-1");
    let auth = Arc::new(MemoryAuth::new().with_code("code-1", session.clone()));
    let mut client = client(auth.clone(), MemoryCookies::new());
    client
        .sign_in_with_oauth("google", "http://localhost/auth/callback", true)
        .unwrap();

    // Act
    let exchanged = client.exchange_code_for_session("code-1").await.unwrap();

    // Assert
    assert_eq!(exchanged, session);
    let cookies = client.into_cookies();
    assert_eq!(cookies.names(), vec![COOKIE.to_string()]);
    assert_eq!(decode_session(&cookies.get(COOKIE).unwrap()).unwrap(), session);
    assert_eq!(auth.exchanges().len(), 1);
    assert_eq!(auth.exchanges()[0].0, "code-1");
}

#[tokio::test]
async fn test_exchange_invalid_code_fails_with_message() {
    let auth = Arc::new(MemoryAuth::new());
    let mut client = client(
        auth,
        MemoryCookies::new().with(VERIFIER_COOKIE, "verifier"),
    );

    let err = client.exchange_code_for_session("expired").await.unwrap_err();

    assert_eq!(
        err.backend_message(),
        "invalid flow state, no valid flow state found"
    );
    assert!(client.into_cookies().get(COOKIE).is_none());
}

#[tokio::test]
async fn test_exchange_without_verifier_fails() {
    let mut client = client(Arc::new(MemoryAuth::new()), MemoryCookies::new());

    let result = client.exchange_code_for_session("code-1").await;

    assert!(result.unwrap_err().is_auth_failure());
}

#[tokio::test]
async fn test_sign_out_clears_cookie_and_revokes() {
    let session = session_for("u-1");
    let auth = Arc::new(MemoryAuth::new().with_session(&session));
    let cookies =
        MemoryCookies::new().with(COOKIE, &encode_session(&session).unwrap());
    let mut client = client(auth.clone(), cookies);

    client.sign_out().await.unwrap();

    assert!(client.into_cookies().get(COOKIE).is_none());
    assert_eq!(auth.signed_out(), vec![session.access_token]);
}
