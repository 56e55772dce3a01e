pub mod config;
pub mod prompts;
pub mod review;
pub mod session;
