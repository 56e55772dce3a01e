use group_review_models::{ReviewId, RATING_MAX, RATING_MIN};

pub const ADD_LABEL: &str = "Add review";
pub const UPDATE_LABEL: &str = "Update review";
pub const CANCEL_LABEL: &str = "Cancel";
pub const TEXT_PLACEHOLDER: &str = "Write your review";
pub const RATING_LABEL: &str = "Rating";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { review_id: ReviewId },
}

/// What the form shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    Visible(FormSnapshot),
    /// The current user may not edit the review; nothing is shown.
    Hidden,
}

impl FormView {
    pub fn is_hidden(&self) -> bool {
        matches!(self, FormView::Hidden)
    }

    pub fn snapshot(&self) -> Option<&FormSnapshot> {
        match self {
            FormView::Visible(snapshot) => Some(snapshot),
            FormView::Hidden => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub mode: FormMode,
    pub text: String,
    pub text_placeholder: &'static str,
    pub rating: i64,
    pub rating_label: &'static str,
    pub rating_min: i64,
    pub rating_max: i64,
    pub error: Option<String>,
    pub submit_label: &'static str,
    pub cancel_label: &'static str,
    /// False while a request is in flight.
    pub submit_enabled: bool,
}

impl FormSnapshot {
    pub(crate) fn new(mode: FormMode, text: String, rating: i64, error: Option<String>, submit_enabled: bool) -> Self {
        let submit_label = match mode {
            FormMode::Create => ADD_LABEL,
            FormMode::Edit { .. } => UPDATE_LABEL,
        };
        Self {
            mode,
            text,
            text_placeholder: TEXT_PLACEHOLDER,
            rating,
            rating_label: RATING_LABEL,
            rating_min: RATING_MIN,
            rating_max: RATING_MAX,
            error,
            submit_label,
            cancel_label: CANCEL_LABEL,
            submit_enabled,
        }
    }
}
