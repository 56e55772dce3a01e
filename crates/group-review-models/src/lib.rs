pub mod draft;
pub mod ids;
pub mod rating;
pub mod review;
pub mod session;

pub use draft::ReviewDraft;
pub use ids::{GroupId, MediaId, ReviewId, ReviewTarget, UserId};
pub use rating::{parse_rating_input, rating_in_range, RATING_MAX, RATING_MIN};
pub use review::{ExistingReview, ReviewPayload};
pub use session::SessionIdentity;
