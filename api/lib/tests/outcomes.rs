//! End-to-end outcome classification against a mock server.
//!
//! Each test drives a real HTTP exchange through `ApiClient` and checks that
//! the result lands in exactly the expected variant.

use api::form::map_to_field_errors;
use api::{
    ApiClient, ApiError, ApiResult, NetworkErrorKind, NoContent, RequestDescriptor,
    ServerErrorKind, FORM_ERROR_KEY,
};
use std::time::Duration;

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, PartialEq, serde::Deserialize)]
struct Account {
    id: u64,
    email: String,
}

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap()
}

async fn respond(status: u16, body: &str) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    Mock::given(path("/accounts"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    (server, client)
}

#[tokio::test]
async fn success_decodes_declared_shape() {
    let (_server, client) = respond(200, r#"{"id":1,"email":"a@example.com"}"#).await;

    let account: Account = client
        .request(&RequestDescriptor::get("/accounts").build())
        .await
        .unwrap();

    assert_eq!(
        account,
        Account {
            id: 1,
            email: "a@example.com".to_string()
        }
    );
}

#[tokio::test]
async fn validation_error_maps_to_known_fields() {
    let (_server, client) = respond(422, r#"{"errors":{"email":["is invalid"]}}"#).await;

    let result: ApiResult<Account> = client
        .request(&RequestDescriptor::post("/accounts").build())
        .await;

    let error = match result {
        Err(ApiError::Validation(error)) => error,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(error.field("email"), Some(&["is invalid".to_string()][..]));

    let fields = map_to_field_errors(&error, ["email", "password"]);
    assert_eq!(fields.get("email"), Some("is invalid"));
    assert_eq!(fields.len(), 1);
}

#[tokio::test]
async fn validation_error_for_unknown_field_is_not_dropped() {
    let (_server, client) =
        respond(422, r#"{"errors":{"server_error":["try a different plan"]}}"#).await;

    let result: ApiResult<Account> = client
        .request(&RequestDescriptor::post("/accounts").build())
        .await;

    let fields = result.unwrap_err().field_errors(["email"]).unwrap();
    assert_eq!(fields.get(FORM_ERROR_KEY), Some("try a different plan"));
    assert_eq!(fields.get("server_error"), None);
}

#[tokio::test]
async fn validation_top_level_message_is_surfaced() {
    let (_server, client) =
        respond(422, r#"{"message":"Account limit reached","errors":{"email":[]}}"#).await;

    let error = client
        .request::<Account>(&RequestDescriptor::post("/accounts").build())
        .await
        .unwrap_err();

    let fields = error.field_errors(["email"]).unwrap();
    assert_eq!(fields.get("email"), None);
    assert_eq!(fields.form_error(), Some("Account limit reached"));
}

#[tokio::test]
async fn malformed_validation_body_is_server_error() {
    let (_server, client) = respond(422, "Unprocessable").await;

    let error = client
        .request::<Account>(&RequestDescriptor::post("/accounts").build())
        .await
        .unwrap_err();

    match error {
        ApiError::Server(e) => {
            assert_eq!(e.status_code(), 422);
            assert!(matches!(e.kind(), ServerErrorKind::MalformedValidation { .. }));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_its_own_variant() {
    let (_server, client) = respond(401, "").await;

    let error = client
        .request::<Account>(&RequestDescriptor::get("/accounts").build())
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Unauthorized(_)));
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn forbidden_is_a_server_error() {
    let (_server, client) = respond(403, "nope").await;

    let error = client
        .request::<Account>(&RequestDescriptor::get("/accounts").build())
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(403));
    assert!(matches!(error, ApiError::Server(_)));
}

#[tokio::test]
async fn unparsable_success_body_is_server_error() {
    let (_server, client) = respond(200, "definitely not json").await;

    let error = client
        .request::<Account>(&RequestDescriptor::get("/accounts").build())
        .await
        .unwrap_err();

    match error {
        ApiError::Server(e) => {
            assert_eq!(e.status_code(), 200);
            assert!(e.is_decode_failure());
            assert_eq!(e.body(), Some("definitely not json"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_success_body_is_no_content() {
    let (_server, client) = respond(204, "").await;

    let outcome: NoContent = client
        .request(&RequestDescriptor::delete("/accounts").build())
        .await
        .unwrap();
    assert_eq!(outcome, NoContent);

    let optional: Option<Account> = client
        .request(&RequestDescriptor::delete("/accounts").build())
        .await
        .unwrap();
    assert_eq!(optional, None);

    let error = client
        .request::<Account>(&RequestDescriptor::delete("/accounts").build())
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::Server(_)));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ApiClient::new(Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()).unwrap();
    let error = client
        .request::<Account>(&RequestDescriptor::get("/accounts").build())
        .await
        .unwrap_err();

    match error {
        ApiError::Network(ref e) => assert_eq!(e.kind(), NetworkErrorKind::Connect),
        ref other => panic!("expected network error, got {other:?}"),
    }
    assert_eq!(error.status(), None);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn slow_response_is_network_timeout() {
    let server = MockServer::start().await;
    Mock::given(path("/accounts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"id":1,"email":"a@example.com"}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::builder(Url::parse(&server.uri()).unwrap())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let error = client
        .request::<Account>(&RequestDescriptor::get("/accounts").build())
        .await
        .unwrap_err();

    match error {
        ApiError::Network(ref e) => assert_eq!(e.kind(), NetworkErrorKind::Timeout),
        ref other => panic!("expected network timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn colon_in_path_segment_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts:lookup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"id":4,"email":"d@example.com"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(Url::parse(&format!("{}/api", server.uri())).unwrap()).unwrap();
    let account: Account = client
        .request(&RequestDescriptor::post("/accounts:lookup").build())
        .await
        .unwrap();
    assert_eq!(account.id, 4);
}

#[tokio::test]
async fn escaping_path_never_leaves_the_base() {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::new(base).unwrap();

    for escaping in ["http://other.example/accounts", "../accounts"] {
        let error = client
            .request::<Account>(&RequestDescriptor::get(escaping).build())
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Network(ref e) if e.kind() == NetworkErrorKind::InvalidRequest));
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn repeated_calls_issue_independent_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let descriptor = RequestDescriptor::get("/accounts").build();

    let first = client.request::<Account>(&descriptor).await.unwrap_err();
    let second = client.request::<Account>(&descriptor).await.unwrap_err();

    assert_eq!(first.status(), Some(500));
    assert_eq!(second.status(), Some(500));
    // `expect(2)` is verified when the server drops: no hidden retries.
}

#[tokio::test]
async fn concurrent_requests_share_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"id":9,"email":"c@example.com"}"#),
        )
        .expect(8)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .request::<Account>(&RequestDescriptor::get("/accounts").build())
                    .await
            })
        })
        .collect();

    for handle in handles {
        let account = handle.await.unwrap().unwrap();
        assert_eq!(account.id, 9);
    }
}
