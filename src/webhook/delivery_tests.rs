//! Tests for `HttpDelivery` and `DeliveryConfig`.

use super::{
    CONTENT_TYPE_JSON, DeliveryConfig, DeliveryError, HttpClient, HttpDelivery, HttpError,
    HttpRequest, HttpResponse, USER_AGENT,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock HTTP client returning one canned result and capturing requests.
#[derive(Debug)]
struct MockClient {
    response: Mutex<Option<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(response: Result<HttpResponse, HttpError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn status(code: u16, body: &str) -> Self {
        Self::new(Ok(HttpResponse::new(
            http::StatusCode::from_u16(code).unwrap(),
            http::HeaderMap::new(),
            body.as_bytes().to_vec(),
        )))
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured(&self) -> HttpRequest {
        self.requests.lock().unwrap()[0].clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.response
            .lock()
            .unwrap()
            .take()
            .expect("MockClient called more than once")
    }
}

/// Log sink for asserting on emitted records.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

fn target() -> url::Url {
    url::Url::parse("https://hooks.example.com/alerts").unwrap()
}

mod delivery_config {
    use super::*;

    #[test]
    fn credentials_require_both_parts() {
        assert_eq!(DeliveryConfig::new("{}").basic_auth(), None);
        assert_eq!(
            DeliveryConfig::new("{}").with_basic_auth("user", "").basic_auth(),
            None
        );
        assert_eq!(
            DeliveryConfig::new("{}").with_basic_auth("", "pass").basic_auth(),
            None
        );
        assert_eq!(
            DeliveryConfig::new("{}")
                .with_basic_auth("user", "pass")
                .basic_auth(),
            Some(("user", "pass"))
        );
    }

    #[test]
    fn debug_redacts_password() {
        let config = DeliveryConfig::new("{}").with_basic_auth("user", "hunter2");
        let debug = format!("{config:?}");

        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }
}

mod send {
    use super::*;

    #[tokio::test]
    async fn success_returns_response_body() {
        let client = Arc::new(MockClient::status(200, "ok"));
        let delivery = HttpDelivery::new(client.clone());

        let body = delivery
            .send(&target(), DeliveryConfig::new(r#"{"a":1}"#))
            .await
            .unwrap();

        assert_eq!(body, b"ok");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn request_carries_fixed_headers_and_verbatim_body() {
        let client = Arc::new(MockClient::status(204, ""));
        let delivery = HttpDelivery::new(client.clone());

        delivery
            .send(&target(), DeliveryConfig::new(r#"{"a":1}"#))
            .await
            .unwrap();

        let request = client.captured();
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.url, target());
        assert_eq!(request.headers[http::header::CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(request.headers[http::header::USER_AGENT], USER_AGENT);
        assert_eq!(request.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[tokio::test]
    async fn empty_body_sends_no_body() {
        let client = Arc::new(MockClient::status(200, ""));
        let delivery = HttpDelivery::new(client.clone());

        delivery.send(&target(), DeliveryConfig::new("")).await.unwrap();

        assert!(client.captured().body.is_none());
    }

    #[tokio::test]
    async fn basic_auth_header_when_both_credentials_set() {
        let client = Arc::new(MockClient::status(200, ""));
        let delivery = HttpDelivery::new(client.clone());

        delivery
            .send(
                &target(),
                DeliveryConfig::new("{}").with_basic_auth("Aladdin", "open sesame"),
            )
            .await
            .unwrap();

        let request = client.captured();
        let auth = &request.headers[http::header::AUTHORIZATION];
        assert_eq!(auth, "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
        assert!(auth.is_sensitive());
    }

    #[tokio::test]
    async fn no_auth_header_when_password_empty() {
        let client = Arc::new(MockClient::status(200, ""));
        let delivery = HttpDelivery::new(client.clone());

        delivery
            .send(&target(), DeliveryConfig::new("{}").with_basic_auth("user", ""))
            .await
            .unwrap();

        assert!(!client.captured().headers.contains_key(http::header::AUTHORIZATION));
    }

    #[tokio::test]
    async fn non_2xx_returns_status_error_without_body() {
        let client = Arc::new(MockClient::status(500, "internal details here"));
        let delivery = HttpDelivery::new(client.clone());

        let error = delivery
            .send(&target(), DeliveryConfig::new("{}"))
            .await
            .unwrap_err();

        assert!(matches!(error, DeliveryError::Status { status } if status.as_u16() == 500));
        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(!message.contains("internal details here"));
    }

    #[tokio::test]
    async fn non_2xx_body_is_logged_at_warn() {
        let (logs, _guard) = capture_logs();
        let delivery = HttpDelivery::new(MockClient::status(503, "upstream overloaded"));

        let _ = delivery.send(&target(), DeliveryConfig::new("{}")).await;

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("HTTP request failed"));
        assert!(output.contains("upstream overloaded"));
        assert!(output.contains("https://hooks.example.com/alerts"));
    }

    #[tokio::test]
    async fn success_is_logged_at_debug() {
        let (logs, _guard) = capture_logs();
        let delivery = HttpDelivery::new(MockClient::status(200, "fine"));

        delivery.send(&target(), DeliveryConfig::new("{}")).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("DEBUG"));
        assert!(output.contains("Sending HTTP request succeeded"));
        assert!(!output.contains("WARN"));
    }

    #[tokio::test]
    async fn redirect_status_is_a_failure() {
        let delivery = HttpDelivery::new(MockClient::status(302, ""));

        let error = delivery
            .send(&target(), DeliveryConfig::new("{}"))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(http::StatusCode::FOUND));
    }

    #[tokio::test]
    async fn transport_error_is_returned_unchanged_without_retry() {
        let client = Arc::new(MockClient::new(Err(HttpError::Timeout)));
        let delivery = HttpDelivery::new(client.clone());

        let error = delivery
            .send(&target(), DeliveryConfig::new("{}"))
            .await
            .unwrap_err();

        assert!(matches!(error, DeliveryError::Http(HttpError::Timeout)));
        assert_eq!(client.calls(), 1);
    }
}
