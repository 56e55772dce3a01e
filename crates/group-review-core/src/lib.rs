pub mod error;
pub mod form;
pub mod view;

pub use error::SubmitError;
pub use form::{Dispatch, FormPhase, PendingSubmission, ReviewForm, ReviewRequest, SubmissionResponse, SubmitOutcome};
pub use view::{FormMode, FormSnapshot, FormView};
