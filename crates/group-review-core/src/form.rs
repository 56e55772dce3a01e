use group_review_client::{RequestFailure, ReviewApi};
use group_review_models::{
    parse_rating_input, ExistingReview, GroupId, MediaId, ReviewDraft, ReviewId, ReviewPayload, ReviewTarget,
    UserId,
};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

use crate::error::SubmitError;
use crate::view::{FormMode, FormSnapshot, FormView};

type Callback = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
    Rejected(SubmitError),
    /// A request is already in flight; nothing was sent.
    Busy,
    /// The response did not belong to the request in flight; nothing changed.
    Stale,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Created | SubmitOutcome::Updated)
    }
}

/// The request a submit resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewRequest {
    Create {
        group_id: GroupId,
        media_id: MediaId,
        payload: ReviewPayload,
    },
    Update {
        group_id: GroupId,
        review_id: ReviewId,
        payload: ReviewPayload,
    },
}

/// Result of the first half of a submit.
pub enum Dispatch {
    /// Send it, then hand the response to [`ReviewForm::complete_submit`].
    Send(PendingSubmission),
    /// Settled without a request.
    Finished(SubmitOutcome),
}

/// Marks one request as in flight. The form only holds a weak handle, so
/// the request stops counting as in flight once every strong handle is gone.
#[derive(Debug)]
struct InFlight;

/// A validated request that has not been sent yet.
///
/// Holds its own handle to the API so the form can keep rendering while it runs.
/// Dropping it without sending frees the form for another submit.
pub struct PendingSubmission {
    api: Arc<dyn ReviewApi>,
    request: ReviewRequest,
    ticket: Arc<InFlight>,
}

impl PendingSubmission {
    pub fn request(&self) -> &ReviewRequest {
        &self.request
    }

    pub async fn send(self) -> SubmissionResponse {
        let result = match &self.request {
            ReviewRequest::Create {
                group_id,
                media_id,
                payload,
            } => self.api.create_review(*group_id, *media_id, payload).await,
            ReviewRequest::Update {
                group_id,
                review_id,
                payload,
            } => self.api.update_review(*group_id, *review_id, payload).await,
        };
        SubmissionResponse {
            request: self.request,
            result,
            ticket: self.ticket,
        }
    }
}

/// What the server said about a sent request. Only [`PendingSubmission::send`] makes these.
#[derive(Debug)]
pub struct SubmissionResponse {
    request: ReviewRequest,
    result: Result<(), RequestFailure>,
    ticket: Arc<InFlight>,
}

impl SubmissionResponse {
    pub fn request(&self) -> &ReviewRequest {
        &self.request
    }

    pub fn result(&self) -> &Result<(), RequestFailure> {
        &self.result
    }
}

/// Create-or-edit form for one user's review of a media item in a group.
///
/// The form owns its draft. The existing review (when editing) is a copy of
/// what the parent supplied and is never modified here. Every failure ends up
/// as a single message readable through [`ReviewForm::render`].
pub struct ReviewForm {
    api: Arc<dyn ReviewApi>,
    target: ReviewTarget,
    existing_review: Option<ExistingReview>,
    current_user_id: UserId,
    draft: ReviewDraft,
    error: Option<String>,
    submitted: bool,
    in_flight: Option<Weak<InFlight>>,
    on_submitted: Callback,
    on_cancel: Callback,
}

impl ReviewForm {
    pub fn new(api: Arc<dyn ReviewApi>, target: ReviewTarget, current_user_id: UserId) -> Self {
        Self {
            api,
            target,
            existing_review: None,
            current_user_id,
            draft: ReviewDraft::new(),
            error: None,
            submitted: false,
            in_flight: None,
            on_submitted: Box::new(|| {}),
            on_cancel: Box::new(|| {}),
        }
    }

    /// Edit `review` instead of creating a new one; seeds the draft from it.
    pub fn with_existing_review(mut self, review: ExistingReview) -> Self {
        self.set_existing_review(review);
        self
    }

    pub fn with_on_submitted(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_submitted = Box::new(callback);
        self
    }

    pub fn with_on_cancel(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_cancel = Box::new(callback);
        self
    }

    /// Replace the review being edited and reseed the draft from it.
    pub fn set_existing_review(&mut self, review: ExistingReview) {
        self.draft = ReviewDraft::from_existing(&review);
        self.existing_review = Some(review);
    }

    pub fn target(&self) -> ReviewTarget {
        self.target
    }

    pub fn existing_review(&self) -> Option<&ExistingReview> {
        self.existing_review.as_ref()
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn phase(&self) -> FormPhase {
        if self.is_submitting() {
            FormPhase::Submitting
        } else if self.submitted {
            FormPhase::Submitted
        } else {
            FormPhase::Idle
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
            .as_ref()
            .map_or(false, |ticket| ticket.strong_count() > 0)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mode(&self) -> FormMode {
        match &self.existing_review {
            Some(review) => FormMode::Edit { review_id: review.id },
            None => FormMode::Create,
        }
    }

    /// Creating is always allowed; editing only by the review's author.
    pub fn can_edit(&self) -> bool {
        self.existing_review
            .as_ref()
            .map_or(true, |review| review.is_authored_by(self.current_user_id))
    }

    pub fn render(&self) -> FormView {
        if !self.can_edit() {
            return FormView::Hidden;
        }
        FormView::Visible(FormSnapshot::new(
            self.mode(),
            self.draft.text.clone(),
            self.draft.rating,
            self.error.clone(),
            !self.is_submitting(),
        ))
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Any integer is accepted here; bounds are checked on submit.
    pub fn set_rating(&mut self, rating: i64) {
        self.draft.rating = rating;
    }

    /// Set the rating from number-field text, rounding to the nearest integer.
    ///
    /// Unparseable input leaves the rating unchanged and returns `false`.
    pub fn set_rating_input(&mut self, input: &str) -> bool {
        match parse_rating_input(input) {
            Some(rating) => {
                self.draft.rating = rating;
                true
            }
            None => false,
        }
    }

    /// Validate the draft and work out which request to send.
    pub fn begin_submit(&mut self) -> Dispatch {
        if self.is_submitting() {
            warn!("Submit ignored, a review request is already in flight");
            return Dispatch::Finished(SubmitOutcome::Busy);
        }

        self.error = None;
        self.submitted = false;

        if !self.draft.is_submittable() {
            debug!(rating = self.draft.rating, "Review draft failed validation");
            return Dispatch::Finished(self.reject(SubmitError::Validation));
        }

        let payload = self.draft.to_payload();
        let request = match &self.existing_review {
            Some(review) => {
                if !review.is_authored_by(self.current_user_id) {
                    warn!(
                        review_id = review.id,
                        author = review.author_user_id,
                        user = self.current_user_id,
                        "Refusing to update a review written by another user"
                    );
                    return Dispatch::Finished(self.reject(SubmitError::Permission));
                }
                ReviewRequest::Update {
                    group_id: self.target.group_id,
                    review_id: review.id,
                    payload,
                }
            }
            None => ReviewRequest::Create {
                group_id: self.target.group_id,
                media_id: self.target.media_id,
                payload,
            },
        };

        let ticket = Arc::new(InFlight);
        self.in_flight = Some(Arc::downgrade(&ticket));
        Dispatch::Send(PendingSubmission {
            api: Arc::clone(&self.api),
            request,
            ticket,
        })
    }

    /// Apply the outcome of a request started by [`ReviewForm::begin_submit`].
    ///
    /// A response for any request other than the one in flight is ignored.
    pub fn complete_submit(&mut self, response: SubmissionResponse) -> SubmitOutcome {
        let current = self.in_flight.as_ref().and_then(Weak::upgrade);
        if !current.map_or(false, |ticket| Arc::ptr_eq(&ticket, &response.ticket)) {
            warn!("Ignoring a response for a review request this form is not waiting on");
            return SubmitOutcome::Stale;
        }
        self.in_flight = None;

        let SubmissionResponse { request, result, .. } = response;
        match result {
            Ok(()) => {
                self.submitted = true;
                (self.on_submitted)();
                match request {
                    ReviewRequest::Create { group_id, media_id, .. } => {
                        info!(group_id, media_id, "Review added");
                        self.draft.clear();
                        SubmitOutcome::Created
                    }
                    ReviewRequest::Update { group_id, review_id, .. } => {
                        info!(group_id, review_id, "Review updated");
                        SubmitOutcome::Updated
                    }
                }
            }
            Err(failure) => {
                error!(status = failure.status(), "Failed to submit review: {}", failure);
                self.reject(SubmitError::Request(failure))
            }
        }
    }

    /// Validate, send and apply in one step.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Dispatch::Send(pending) => pending,
            Dispatch::Finished(outcome) => return outcome,
        };

        let response = pending.send().await;
        self.complete_submit(response)
    }

    /// Abandon the form. Never touches the network.
    pub fn cancel(&mut self) {
        debug!("Review form cancelled");
        (self.on_cancel)();
    }

    fn reject(&mut self, error: SubmitError) -> SubmitOutcome {
        self.error = Some(error.to_string());
        SubmitOutcome::Rejected(error)
    }
}
