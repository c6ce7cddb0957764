//! Tests for `WebhookClient`.

use super::{
    ErrorCategory, ErrorCode, HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy,
    WebhookClient,
};
use crate::message::{Attachment, Field, Message};
use crate::time::InstantSleeper;
use crate::validator::UrlError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const URL: &str = "https://hooks.example.com/services/T0/B0/XXXX";

/// Mock HTTP client that returns a scripted sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: std::sync::Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: std::sync::Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            requests: std::sync::Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn status(status: u16, body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(
            http::StatusCode::from_u16(status).unwrap(),
            body.as_bytes().to_vec(),
        ))
    }

    fn ok() -> Self {
        Self::new(vec![Self::status(200, "ok")])
    }

    fn repeating(status: u16, body: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Self::status(status, body)).collect())
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

fn client(mock: &Arc<MockClient>) -> WebhookClient<Arc<MockClient>, InstantSleeper> {
    WebhookClient::new(Arc::clone(mock), URL)
        .unwrap()
        .with_sleeper(InstantSleeper)
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new()
        .with_max_retries(max_retries)
        .with_base_interval(Duration::from_millis(10))
        .without_backoff()
}

mod construction {
    use super::*;

    #[test]
    fn new_validates_url() {
        let mock = Arc::new(MockClient::ok());

        assert!(WebhookClient::new(Arc::clone(&mock), URL).is_ok());
        assert_eq!(
            WebhookClient::new(Arc::clone(&mock), "").unwrap_err(),
            UrlError::Empty
        );
        assert!(matches!(
            WebhookClient::new(mock, "ftp://example.com").unwrap_err(),
            UrlError::UnsupportedScheme(_)
        ));
    }

    #[test]
    fn url_is_exposed() {
        let mock = Arc::new(MockClient::ok());
        assert_eq!(client(&mock).url().as_str(), URL);
    }
}

mod send_once {
    use super::*;

    #[tokio::test]
    async fn posts_json_to_configured_url() {
        let mock = Arc::new(MockClient::ok());
        let msg = Message {
            text: "Test".to_string(),
            username: "test-bot".to_string(),
            ..Message::default()
        };

        client(&mock).send(&msg).await.unwrap();

        let requests = mock.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].url.as_str(), URL);
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, serde_json::json!({"text": "Test", "username": "test-bot"}));
    }

    #[tokio::test]
    async fn encodes_attachments() {
        let mock = Arc::new(MockClient::ok());
        let mut msg = Message::text("Test");
        msg.add_attachment(Attachment {
            title: "Build".to_string(),
            fields: vec![Field::short("Branch", "main")],
            ..Attachment::default()
        });

        client(&mock).send(&msg).await.unwrap();

        let body: serde_json::Value =
            serde_json::from_slice(&mock.captured_requests()[0].body).unwrap();
        assert_eq!(body["attachments"][0]["fields"][0]["value"], "main");
    }

    #[tokio::test]
    async fn send_raw_posts_body_verbatim() {
        let mock = Arc::new(MockClient::ok());
        let raw = br#"{"text":"Test","username":"bot"}"#;

        client(&mock).send_raw(raw.to_vec()).await.unwrap();

        assert_eq!(mock.captured_requests()[0].body, raw.to_vec());
    }

    #[tokio::test]
    async fn non_ok_statuses_become_api_errors() {
        for status in [400_u16, 401, 403, 404, 429, 500, 502, 503] {
            let mock = Arc::new(MockClient::new(vec![MockClient::status(status, "error")]));

            let err = client(&mock).send(&Message::text("x")).await.unwrap_err();

            assert_eq!(err.category(), ErrorCategory::Api, "status {status}");
            assert_eq!(err.status_code().map(|s| s.as_u16()), Some(status));
            assert_eq!(err.response_body(), Some("error"));
            assert_eq!(err.target(), Some(URL));
        }
    }

    #[tokio::test]
    async fn other_success_statuses_are_still_errors() {
        let mock = Arc::new(MockClient::new(vec![MockClient::status(204, "")]));

        let err = client(&mock).send(&Message::text("x")).await.unwrap_err();

        assert!(err.is_api());
        assert_eq!(err.code(), ErrorCode::ApiServerError);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_code() {
        let mock = Arc::new(MockClient::new(vec![MockClient::status(401, "invalid_token")]));

        let err = client(&mock).send(&Message::text("x")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ApiUnauthorized);
        assert_eq!(err.response_body(), Some("invalid_token"));
    }

    #[tokio::test]
    async fn transport_failures_become_network_errors() {
        let mock = Arc::new(MockClient::new(vec![
            Err(HttpError::Timeout),
            Err(HttpError::Dns("no such host".into())),
            Err(HttpError::Connection("connection refused".into())),
        ]));
        let client = client(&mock);

        let timeout = client.send(&Message::text("x")).await.unwrap_err();
        let dns = client.send(&Message::text("x")).await.unwrap_err();
        let refused = client.send(&Message::text("x")).await.unwrap_err();

        assert_eq!(timeout.code(), ErrorCode::NetworkTimeout);
        assert_eq!(dns.code(), ErrorCode::NetworkDns);
        assert_eq!(refused.code(), ErrorCode::NetworkConnection);
        assert!(refused.is_network());
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_read_lossily() {
        let mock = Arc::new(MockClient::new(vec![Ok(HttpResponse::new(
            http::StatusCode::BAD_REQUEST,
            vec![b'o', 0xFF, b'k'],
        ))]));

        let err = client(&mock).send(&Message::text("x")).await.unwrap_err();

        assert_eq!(err.response_body(), Some("o\u{FFFD}k"));
    }
}

mod send_with_retry {
    use super::*;

    #[tokio::test]
    async fn server_error_then_ok_sends_twice() {
        let mock = Arc::new(MockClient::new(vec![
            MockClient::status(500, "server error"),
            MockClient::status(200, "ok"),
        ]));

        client(&mock)
            .send_with_retry(&Message::text("x"), &fast_retry(3))
            .await
            .unwrap();

        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn bad_request_is_sent_once() {
        let mock = Arc::new(MockClient::repeating(400, "bad request", 4));

        let err = client(&mock)
            .send_with_retry(&Message::text("x"), &fast_retry(3))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(http::StatusCode::BAD_REQUEST));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn rate_limit_exhausts_retries() {
        let mock = Arc::new(MockClient::repeating(429, "rate_limited", 4));

        let err = client(&mock)
            .send_with_retry(&Message::text("x"), &fast_retry(3))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ApiRateLimit);
        assert_eq!(mock.calls(), 4);
    }

    #[tokio::test]
    async fn same_payload_is_sent_each_attempt() {
        let mock = Arc::new(MockClient::new(vec![
            Err(HttpError::Timeout),
            MockClient::status(200, "ok"),
        ]));

        client(&mock)
            .send_with_retry(&Message::text("same"), &fast_retry(1))
            .await
            .unwrap();

        let requests = mock.captured_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[tokio::test]
    async fn no_retry_policy_sends_once() {
        let mock = Arc::new(MockClient::repeating(503, "", 2));

        let result = client(&mock)
            .send_with_retry(&Message::text("x"), &RetryPolicy::no_retry())
            .await;

        assert!(result.is_err());
        assert_eq!(mock.calls(), 1);
    }
}

mod cancellable {
    use super::*;

    #[tokio::test]
    async fn send_until_with_pending_cancel_succeeds() {
        let mock = Arc::new(MockClient::ok());

        client(&mock)
            .send_until(&Message::text("x"), std::future::pending())
            .await
            .unwrap();

        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn send_until_with_fired_cancel_skips_request() {
        let mock = Arc::new(MockClient::ok());

        let err = client(&mock)
            .send_until(&Message::text("x"), std::future::ready(()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NetworkCancelled);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_backoff_wait_stops_retrying() {
        let mock = Arc::new(MockClient::repeating(503, "busy", 4));
        let webhook = WebhookClient::new(Arc::clone(&mock), URL).unwrap();
        let policy = fast_retry(3).with_base_interval(Duration::from_secs(30));

        let err = webhook
            .send_with_retry_until(
                &Message::text("x"),
                &policy,
                tokio::time::sleep(Duration::from_secs(1)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NetworkCancelled);
        assert_eq!(mock.calls(), 1);
    }
}

#[test]
fn client_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookClient>();
}
