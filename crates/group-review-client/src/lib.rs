pub mod error;
pub mod http;
pub mod traits;

pub use error::{ClientError, RequestFailure};
pub use http::HttpReviewClient;
pub use traits::ReviewApi;
