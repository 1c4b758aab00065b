use schedmail_auth::{AuthError, ClientCredentials, TokenProvider};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn provider_for(server: &MockServer) -> TokenProvider {
    let mut creds = ClientCredentials::new("tenant-1", "client-1", "secret-1");
    creds.authority_url = server.uri();
    TokenProvider::new(creds)
}

fn token_body(token: &str, expires_in: i64) -> serde_json::Value {
    serde_json::json!({
        "token_type": "Bearer",
        "expires_in": expires_in,
        "access_token": token,
    })
}

#[tokio::test]
async fn test_token_is_fetched_once_and_cached() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .and(body_string_contains("client_secret=secret-1"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fgraph.microsoft.com%2F.default",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1", 3599)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert_eq!(provider.access_token().await.unwrap(), "tok-1");
    assert_eq!(provider.access_token().await.unwrap(), "tok-1");
    assert_eq!(provider.access_token().await.unwrap(), "tok-1");
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_fetch() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-shared", 3599)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let (a, b) = tokio::join!(provider.access_token(), provider.access_token());
    assert_eq!(a.unwrap(), "tok-shared");
    assert_eq!(b.unwrap(), "tok-shared");
}

#[tokio::test]
async fn test_expired_token_is_refetched() {
    init_tracing();
    let server = MockServer::start().await;

    // 60s lifetime is inside the refresh margin, so every call refetches
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("short-lived", 60)))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider.access_token().await.unwrap();
    provider.access_token().await.unwrap();
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("first", 3599)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("second", 3599)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert_eq!(provider.access_token().await.unwrap(), "first");
    provider.invalidate().await;
    assert_eq!(provider.access_token().await.unwrap(), "second");
}

#[tokio::test]
async fn test_non_success_status_is_authentication_failure() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.access_token().await.unwrap_err();
    match err {
        AuthError::AuthenticationFailed { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"error":"invalid_client"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("recovered", 3599)))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert!(provider.access_token().await.is_err());
    assert_eq!(provider.access_token().await.unwrap(), "recovered");
}

#[tokio::test]
async fn test_missing_access_token_is_invalid_response() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.access_token().await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidResponse(_)));
}
