use group_review_models::{GroupId, MediaId, ReviewId, ReviewPayload};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use crate::error::RequestFailure;

pub fn create_review_url(base_url: &str, group_id: GroupId, media_id: MediaId) -> String {
    format!("{}/groups/{}/media/{}/review", base_url, group_id, media_id)
}

pub fn update_review_url(base_url: &str, group_id: GroupId, review_id: ReviewId) -> String {
    format!("{}/groups/{}/reviews/update/{}", base_url, group_id, review_id)
}

/// Pull the server's `detail` string out of an error body.
///
/// Anything other than a JSON object with a string `detail` yields `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("detail")
        .and_then(|d| d.as_str())
        .map(str::to_string)
        .filter(|d| !d.is_empty())
}

/// Create a review for a media item within a group
pub async fn create_review(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    group_id: GroupId,
    media_id: MediaId,
    payload: &ReviewPayload,
) -> Result<(), RequestFailure> {
    let url = create_review_url(base_url, group_id, media_id);
    debug!(group_id, media_id, rating = payload.rating, "Sending create review request");

    let request = with_auth(client.post(&url), token).json(payload);
    send(request, "create review").await
}

/// Update an existing review
pub async fn update_review(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    group_id: GroupId,
    review_id: ReviewId,
    payload: &ReviewPayload,
) -> Result<(), RequestFailure> {
    let url = update_review_url(base_url, group_id, review_id);
    debug!(group_id, review_id, rating = payload.rating, "Sending update review request");

    let request = with_auth(client.put(&url), token).json(payload);
    send(request, "update review").await
}

fn with_auth(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn send(request: RequestBuilder, operation: &str) -> Result<(), RequestFailure> {
    let response = request
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            warn!("Failed to {}: {}", operation, e);
            RequestFailure::from(e)
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);
    warn!(status = status.as_u16(), detail = ?detail, "Failed to {}", operation);

    Err(RequestFailure::Http {
        status: status.as_u16(),
        detail,
    })
}
