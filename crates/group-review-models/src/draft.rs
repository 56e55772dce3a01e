use serde::{Deserialize, Serialize};

use crate::rating::rating_in_range;
use crate::review::{ExistingReview, ReviewPayload};

/// Locally edited review text and rating, before submission.
///
/// Any rating is accepted while editing; bounds are checked by
/// [`ReviewDraft::is_submittable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub text: String,
    pub rating: i64,
}

impl ReviewDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from a stored review.
    pub fn from_existing(review: &ExistingReview) -> Self {
        Self {
            text: review.text.clone(),
            rating: review.rating,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn is_submittable(&self) -> bool {
        self.has_text() && rating_in_range(self.rating)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.rating = 0;
    }

    /// Body to send; text is sent as typed, not trimmed.
    pub fn to_payload(&self) -> ReviewPayload {
        ReviewPayload {
            text: self.text.clone(),
            rating: self.rating,
        }
    }
}
