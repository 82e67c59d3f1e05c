//! Tests for HTTP request/response types.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};
use std::sync::Arc;

fn url() -> url::Url {
    url::Url::parse("https://hooks.example.com/alerts").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn post_creates_bodiless_post() {
        let req = HttpRequest::post(url());

        assert_eq!(req.method, http::Method::POST);
        assert_eq!(req.url, url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn with_body_sets_body() {
        let req = HttpRequest::post(url()).with_body(b"{}".to_vec());

        assert_eq!(req.body, Some(b"{}".to_vec()));
    }

    #[test]
    fn with_header_replaces_previous_value() {
        let req = HttpRequest::post(url())
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::CONTENT_TYPE).iter().count(), 1);
        assert_eq!(req.headers[http::header::CONTENT_TYPE], "application/json");
    }
}

mod http_response {
    use super::*;

    #[test]
    fn success_covers_whole_2xx_range() {
        for code in [200, 201, 202, 204, 299] {
            let status = http::StatusCode::from_u16(code).unwrap();
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(resp.is_success(), "{code}");
        }
    }

    #[test]
    fn non_2xx_is_not_success() {
        for code in [100, 301, 400, 404, 429, 500, 503] {
            let status = http::StatusCode::from_u16(code).unwrap();
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(!resp.is_success(), "{code}");
        }
    }

    #[test]
    fn body_lossy_replaces_invalid_utf8() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![b'o', b'k', 0xff],
        );

        assert_eq!(resp.body_lossy(), "ok\u{fffd}");
    }
}

mod http_client_trait {
    use super::*;

    struct FixedClient;

    impl HttpClient for FixedClient {
        async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse::new(
                http::StatusCode::ACCEPTED,
                http::HeaderMap::new(),
                req.body.unwrap_or_default(),
            ))
        }
    }

    #[tokio::test]
    async fn arc_delegates_to_inner_client() {
        let client = Arc::new(FixedClient);

        let resp = client
            .request(HttpRequest::post(url()).with_body(b"echo".to_vec()))
            .await
            .unwrap();

        assert_eq!(resp.status, http::StatusCode::ACCEPTED);
        assert_eq!(resp.body, b"echo");
    }
}
