use serde::{Deserialize, Serialize};

pub type GroupId = u64;
pub type MediaId = u64;
pub type ReviewId = u64;
pub type UserId = u64;

/// The (group, media) pair a review is written against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReviewTarget {
    pub group_id: GroupId,
    pub media_id: MediaId,
}

impl ReviewTarget {
    pub fn new(group_id: GroupId, media_id: MediaId) -> Self {
        Self { group_id, media_id }
    }
}
