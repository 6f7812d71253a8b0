//! DocQA Core Library
//!
//! This crate provides the foundational utilities shared by every DocQA crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Layered configuration
//! - Request classifiers (`Intent`, `ResponseMode`)

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{Intent, ResponseMode};
