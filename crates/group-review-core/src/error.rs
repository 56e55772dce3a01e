use group_review_client::RequestFailure;
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter a valid review and a rating between 0 and 10";
pub const PERMISSION_MESSAGE: &str = "You are not authorized to update this review";
pub const REQUEST_FAILED_PREFIX: &str = "Failed to submit review";
pub const UNKNOWN_ERROR: &str = "unknown error";
pub const RETRY_LATER_MESSAGE: &str = "Failed to submit review, please try again later";

/// Why a submit attempt did not go through. `Display` is the text shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,
    #[error("{}", PERMISSION_MESSAGE)]
    Permission,
    #[error("{}", request_message(.0))]
    Request(RequestFailure),
}

impl SubmitError {
    /// Whether fixing the input or retrying can make the next attempt succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SubmitError::Permission)
    }
}

fn request_message(failure: &RequestFailure) -> String {
    match failure {
        RequestFailure::Http { detail, .. } => format!(
            "{}: {}",
            REQUEST_FAILED_PREFIX,
            detail.as_deref().unwrap_or(UNKNOWN_ERROR)
        ),
        RequestFailure::Transport { .. } => RETRY_LATER_MESSAGE.to_string(),
    }
}
