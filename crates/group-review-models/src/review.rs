use serde::{Deserialize, Serialize};

use crate::ids::{ReviewId, UserId};

/// A review already stored on the server, supplied by whoever opens the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExistingReview {
    pub id: ReviewId,
    pub text: String,
    pub rating: i64,
    #[serde(rename = "user_id")]
    pub author_user_id: UserId,
}

impl ExistingReview {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_user_id == user_id
    }
}

/// JSON body shared by the create and update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewPayload {
    pub text: String,
    pub rating: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_review_uses_user_id_on_the_wire() {
        let review: ExistingReview = serde_json::from_str(
            r#"{"id": 4, "text": "Great pacing", "rating": 8, "user_id": 12}"#,
        )
        .unwrap();
        assert_eq!(review.author_user_id, 12);
        assert!(review.is_authored_by(12));
        assert!(!review.is_authored_by(13));

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["user_id"], 12);
    }

    #[test]
    fn test_payload_shape() {
        let payload = ReviewPayload {
            text: "Loved it".to_string(),
            rating: 9,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Loved it", "rating": 9}));
    }
}
