//! Tests for `ReqwestClient`, `ClientConfig`, and the HTTP value types.
//!
//! Requests against real endpoints are not made here; the trait wiring is
//! covered through the mock transport in the sender tests.

use super::*;
use std::time::Duration;

mod client_config {
    use super::*;

    #[test]
    fn new_uses_default_timeout_and_transport() {
        let config = ClientConfig::new();

        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(matches!(config.transport, Transport::Default));
    }

    #[test]
    fn builder_overrides_fields() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(3))
            .with_client(reqwest::Client::new());

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(matches!(config.transport, Transport::Custom(_)));
    }
}

mod reqwest_client {
    use super::*;

    #[test]
    fn new_uses_default_timeout() {
        assert_eq!(ReqwestClient::new().timeout(), DEFAULT_TIMEOUT);
        assert_eq!(ReqwestClient::default().timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn custom_transport_keeps_configured_timeout() {
        let custom = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();
        let client = ReqwestClient::from_config(
            ClientConfig::new()
                .with_client(custom)
                .with_timeout(Duration::from_millis(250)),
        );

        assert_eq!(client.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_network_failure() {
        let client = ReqwestClient::from_config(
            ClientConfig::new().with_timeout(Duration::from_secs(5)),
        );
        let url = url::Url::parse("http://invalid.invalid.invalid/").unwrap();

        let result = client
            .request(HttpRequest::post_json(url, b"{}".to_vec()))
            .await;

        // Behind a proxy the failure may arrive as an HTTP error response instead
        match result {
            Err(HttpError::Dns(_) | HttpError::Connection(_) | HttpError::Timeout) => {}
            Ok(resp) if !resp.is_ok() => {}
            other => panic!("Expected a transport error or proxy error response, got {other:?}"),
        }
    }
}

mod http_types {
    use super::*;

    #[test]
    fn post_json_sets_method_and_content_type() {
        let url = url::Url::parse("https://example.com/hook").unwrap();
        let req = HttpRequest::post_json(url.clone(), b"{}".to_vec());

        assert_eq!(req.method, ::http::Method::POST);
        assert_eq!(req.url, url);
        assert_eq!(req.body, b"{}".to_vec());
        assert_eq!(
            req.headers.get(::http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn with_header_appends_values() {
        let url = url::Url::parse("https://example.com/").unwrap();
        let req = HttpRequest::post_json(url, Vec::new())
            .with_header(
                ::http::header::ACCEPT,
                ::http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                ::http::header::ACCEPT,
                ::http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(::http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn only_200_is_ok() {
        assert!(HttpResponse::new(::http::StatusCode::OK, Vec::new()).is_ok());
        assert!(!HttpResponse::new(::http::StatusCode::CREATED, Vec::new()).is_ok());
        assert!(!HttpResponse::new(::http::StatusCode::NO_CONTENT, Vec::new()).is_ok());
    }

    #[test]
    fn body_lossy_replaces_invalid_utf8() {
        let resp = HttpResponse::new(::http::StatusCode::OK, vec![b'h', 0xC3, b'i']);
        assert_eq!(resp.body_lossy(), "h\u{FFFD}i");
    }
}
