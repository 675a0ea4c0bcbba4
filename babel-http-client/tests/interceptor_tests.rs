//! Integration tests for the interceptor pipeline

use async_trait::async_trait;
use babel_http_client::*;
use babel_session::CredentialStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, store: &CredentialStore) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::new(config)
        .unwrap()
        .with_interceptor(CsrfInterceptor::new(store.clone()))
}

#[tokio::test]
async fn test_stored_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate-text"))
        .and(header("x-csrf-token", "abc"))
        .and(header("x-client-type", "web"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    store.set_token("abc").await.unwrap();

    let response = client_for(&server, &store)
        .post("/translate-text")
        .json(&serde_json::json!({"text": "hola"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_no_token_sends_request_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fetch-languages"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    client_for(&server, &store)
        .get("/fetch-languages")
        .send()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("x-csrf-token"));
    assert!(!requests[0].headers.contains_key("x-client-type"));
}

#[tokio::test]
async fn test_token_is_captured_from_error_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/delete-account"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-Csrf-Token", "rotated")
                .set_body_string("Forbidden"),
        )
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    store.set_token("old").await.unwrap();

    let response = client_for(&server, &store)
        .delete("/delete-account")
        .send()
        .await
        .unwrap();

    // Caller still sees the original status and body
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.text().unwrap(), "Forbidden");
    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("rotated"));
}

/// Serves one connection: the head of a 500 carrying `X-CSRF-TOKEN: rotated`
/// and a `Content-Length` of 100, then 6 body bytes before hanging up.
async fn truncated_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\n\
                  X-CSRF-TOKEN: rotated\r\n\
                  Content-Length: 100\r\n\
                  \r\n\
                  partia",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_token_is_captured_when_body_is_cut_short() {
    let base = truncated_body_server().await;

    let store = CredentialStore::in_memory();
    store.set_token("old").await.unwrap();
    let client = HttpClient::new(HttpClientConfig::builder().base_url(base).build())
        .unwrap()
        .with_interceptor(CsrfInterceptor::new(store.clone()));

    let result = client.get("/reissue").send().await;

    assert!(result.is_err());
    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("rotated"));
}

#[tokio::test]
async fn test_missing_response_header_keeps_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    store.set_token("steady").await.unwrap();
    let client = client_for(&server, &store);

    client.get("/fetch-history").send().await.unwrap();
    client.get("/fetch-history").send().await.unwrap();

    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("steady"));
    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("steady"));
}

#[tokio::test]
async fn test_raw_requests_are_intercepted_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reissue"))
        .and(header("x-csrf-token", "abc"))
        .respond_with(ResponseTemplate::new(201).insert_header("x-csrf-token", "def"))
        .expect(1)
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    store.set_token("abc").await.unwrap();
    let client = client_for(&server, &store);

    let url = Url::parse(&format!("{}/reissue", server.uri())).unwrap();
    let response = client
        .execute_request(reqwest::Request::new(Method::GET, url))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("def"));
}

#[tokio::test]
async fn test_next_request_uses_captured_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-csrf"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-csrf-token", "fresh"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("x-csrf-token", "fresh"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    let client = client_for(&server, &store);

    client.get("/get-csrf").send().await.unwrap();
    let response = client.post("/login").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn test_cookies_are_sent_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(201).insert_header("set-cookie", "access_token_cookie=xyz; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reissue"))
        .and(header("cookie", "access_token_cookie=xyz"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = CredentialStore::in_memory();
    let client = client_for(&server, &store);

    client.post("/login").send().await.unwrap();
    let response = client.get("/reissue").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn test_timeout_middleware() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let client = HttpClient::new(config)
        .unwrap()
        .with_middleware(TimeoutMiddleware::new(Duration::from_millis(50)));

    let err = client.get("/reissue").send().await.unwrap_err();
    assert!(err.is_timeout());
}

struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Interceptor for Recorder {
    async fn intercept_request(&self, request: reqwest::Request) -> Result<reqwest::Request> {
        self.log.lock().unwrap().push(format!("req:{}", self.name));
        Ok(request)
    }

    async fn intercept_headers(&self, _status: StatusCode, _headers: &HeaderMap) -> Result<()> {
        self.log.lock().unwrap().push(format!("head:{}", self.name));
        Ok(())
    }

    async fn intercept_response(&self, response: Response) -> Result<Response> {
        self.log.lock().unwrap().push(format!("resp:{}", self.name));
        Ok(response)
    }
}

#[tokio::test]
async fn test_interceptor_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let client = HttpClient::new(config)
        .unwrap()
        .with_interceptor(Recorder { name: "outer", log: log.clone() })
        .with_interceptor(Recorder { name: "inner", log: log.clone() });

    client.get("/").send().await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "req:outer",
            "req:inner",
            "head:inner",
            "head:outer",
            "resp:inner",
            "resp:outer"
        ]
    );
}
