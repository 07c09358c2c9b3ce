//! Unified error handling for the storage layer and its callers.
//!
//! Repositories only ever produce [`AppError::Database`]; services add the
//! not-found and validation kinds on top.

use domain::DomainError;
use thiserror::Error;
use uuid::Uuid;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("Preset {0} not found")]
    PresetNotFound(Uuid),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    /// Storage failure, with the operation that hit it.
    #[cfg(feature = "database")]
    #[error("{context}: {source}")]
    Database {
        context: String,
        source: sea_orm::DbErr,
    },

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code for logs and exit reporting
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UserNotFound(_) => "USER_NOT_FOUND",
            AppError::PresetNotFound(_) => "PRESET_NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Replace the operation context of a storage failure.
    ///
    /// Used when a generic capability failed on behalf of a more specific
    /// operation. Other kinds pass through unchanged.
    #[cfg(feature = "database")]
    pub fn recontext(self, context: impl Into<String>) -> Self {
        match self {
            AppError::Database { source, .. } => AppError::Database {
                context: context.into(),
                source,
            },
            other => other,
        }
    }

    /// Whether this is the classified storage failure
    pub fn is_database(&self) -> bool {
        #[cfg(feature = "database")]
        {
            matches!(self, AppError::Database { .. })
        }
        #[cfg(not(feature = "database"))]
        {
            false
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Storage Error Boundary
// =============================================================================

/// Extension trait that turns a raw storage result into [`AppError::Database`],
/// attaching the failing operation as context.
#[cfg(feature = "database")]
pub trait DbResultExt<T> {
    fn context(self, context: impl Into<String>) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

#[cfg(feature = "database")]
impl<T> DbResultExt<T> for Result<T, sea_orm::DbErr> {
    fn context(self, context: impl Into<String>) -> AppResult<T> {
        self.map_err(|source| AppError::Database {
            context: context.into(),
            source,
        })
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| AppError::Database {
            context: f(),
            source,
        })
    }
}

/// Convenience constructors
impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
