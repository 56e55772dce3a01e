pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{ApiConfig, Config, LoggingConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
