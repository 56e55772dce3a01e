use async_trait::async_trait;
use group_review_models::{GroupId, MediaId, ReviewId, ReviewPayload};

use crate::error::RequestFailure;

/// Authenticated access to the group review endpoints.
///
/// Implementations carry their own credentials; callers never see the token.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// `POST /groups/{group_id}/media/{media_id}/review`
    async fn create_review(
        &self,
        group_id: GroupId,
        media_id: MediaId,
        payload: &ReviewPayload,
    ) -> Result<(), RequestFailure>;

    /// `PUT /groups/{group_id}/reviews/update/{review_id}`
    async fn update_review(
        &self,
        group_id: GroupId,
        review_id: ReviewId,
        payload: &ReviewPayload,
    ) -> Result<(), RequestFailure>;
}
