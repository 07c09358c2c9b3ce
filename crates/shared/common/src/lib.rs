//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with a single storage-error boundary
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
#[cfg(feature = "database")]
pub use error::DbResultExt;
pub use error::{AppError, AppResult};
