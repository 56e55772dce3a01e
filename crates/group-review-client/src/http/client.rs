use async_trait::async_trait;
use group_review_models::{GroupId, MediaId, ReviewId, ReviewPayload};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ClientError, RequestFailure};
use crate::http::api;
use crate::traits::ReviewApi;

/// [`ReviewApi`] over HTTP, authorizing every request with a bearer token.
#[derive(Clone)]
pub struct HttpReviewClient {
    client: Arc<Client>,
    base_url: String,
    token: Option<String>,
}

impl HttpReviewClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("groupreview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let token = token.filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::warn!("No session token available; requests will be sent without authorization");
        }

        Ok(Self {
            client: Arc::new(client),
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, ClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl ReviewApi for HttpReviewClient {
    async fn create_review(
        &self,
        group_id: GroupId,
        media_id: MediaId,
        payload: &ReviewPayload,
    ) -> Result<(), RequestFailure> {
        api::create_review(
            &self.client,
            &self.base_url,
            self.token.as_deref(),
            group_id,
            media_id,
            payload,
        )
        .await
    }

    async fn update_review(
        &self,
        group_id: GroupId,
        review_id: ReviewId,
        payload: &ReviewPayload,
    ) -> Result<(), RequestFailure> {
        api::update_review(
            &self.client,
            &self.base_url,
            self.token.as_deref(),
            group_id,
            review_id,
            payload,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload(text: &str, rating: i64) -> ReviewPayload {
        ReviewPayload {
            text: text.to_string(),
            rating,
        }
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> HttpReviewClient {
        HttpReviewClient::new(&server.uri(), token.map(str::to_string), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = HttpReviewClient::new("http://localhost:8000/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpReviewClient::new("not a url", None, Duration::from_secs(1)),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpReviewClient::new("ftp://example.com", None, Duration::from_secs(1)),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_review_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/groups/3/media/17/review"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_json(json!({"text": "Great film", "rating": 8})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-token"));
        let result = client.create_review(3, 17, &payload("Great film", 8)).await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_update_review_uses_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/groups/3/reviews/update/99"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_json(json!({"text": "Better on rewatch", "rating": 9})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-token"));
        let result = client.update_review(3, 99, &payload("Better on rewatch", 9)).await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_failure_carries_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/groups/1/media/2/review"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "duplicate review"})))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t"));
        let result = client.create_review(1, 2, &payload("again", 5)).await;
        assert_eq!(
            result,
            Err(RequestFailure::Http {
                status: 400,
                detail: Some("duplicate review".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_failure_without_detail() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/groups/1/reviews/update/5"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t"));
        let result = client.update_review(1, 5, &payload("text", 5)).await;
        assert_eq!(result, Err(RequestFailure::Http { status: 500, detail: None }));
    }

    #[tokio::test]
    async fn test_missing_token_sends_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let result = client.create_review(1, 2, &payload("text", 5)).await;
        assert_eq!(result.unwrap_err().detail(), Some("Not authenticated"));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        let client = HttpReviewClient::new("http://127.0.0.1:1", Some("t".to_string()), Duration::from_secs(2)).unwrap();
        let result = client.create_review(1, 2, &payload("text", 5)).await;
        assert!(matches!(result, Err(RequestFailure::Transport { .. })));
    }
}
