// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the primer stream toolkit.
//!
//! Every failure that travels through a stream is a [`PrimerError`] carried by
//! [`StreamItem::Error`](crate::StreamItem::Error). Errors are cloneable so a single
//! failure can be replayed to every subscriber of a shared source.
//!
//! # Examples
//!
//! ```
//! use primer_core::{PrimerError, Result};
//!
//! fn open_feed() -> Result<()> {
//!     Err(PrimerError::connection_error("feed offline"))
//! }
//!
//! assert!(open_feed().is_err());
//! ```

/// Root error type for all primer operations
#[derive(Debug, thiserror::Error)]
pub enum PrimerError {
    /// Stream processing encountered an error
    ///
    /// General error for stream operations that don't fit another category.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Starting the underlying connection of a connectable source failed
    #[error("Connection error: {context}")]
    ConnectionError {
        /// Description of the failed start operation
        context: String,
    },

    /// User-provided callback or action panicked
    ///
    /// Panics raised by one-shot actions are caught and converted to this variant
    /// so they can be delivered to subscribers through the error channel.
    #[error("User callback panicked: {context}")]
    CallbackPanic {
        /// Panic payload rendered as text
        context: String,
    },

    /// Work was dropped before producing a result
    #[error("Cancelled: {context}")]
    Cancelled {
        /// What was cancelled
        context: String,
    },

    /// Custom error from user code
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PrimerError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a connection error with the given context
    pub fn connection_error(context: impl Into<String>) -> Self {
        Self::ConnectionError {
            context: context.into(),
        }
    }

    /// Create a cancellation error with the given context
    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::Cancelled {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Converts any error, keeping a `PrimerError` as is instead of nesting it.
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(error);
        match boxed.downcast::<PrimerError>() {
            Ok(primer) => *primer,
            Err(other) => Self::UserError(other),
        }
    }

    /// Build a `CallbackPanic` from a payload returned by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let context = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        };

        Self::CallbackPanic { context }
    }

    /// Check if this error was raised by user code rather than by the toolkit.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::UserError(_) | Self::CallbackPanic { .. })
    }
}

/// Specialized Result type for primer operations
pub type Result<T> = std::result::Result<T, PrimerError>;

/// Extension trait for converting errors into `PrimerError`
///
/// Implemented for all `std::error::Error + Send + Sync + 'static` types.
pub trait IntoPrimerError {
    /// Convert this error into a `PrimerError`
    fn into_primer_error(self) -> PrimerError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoPrimerError for E {
    fn into_primer_error(self) -> PrimerError {
        PrimerError::user_error(self)
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(PrimerError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrimerError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let context = context.into();
            match e.into() {
                PrimerError::UserError(inner) => PrimerError::StreamProcessingError {
                    context: format!("{context}: {inner}"),
                },
                other => other,
            }
        })
    }
}

impl Clone for PrimerError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            Self::ConnectionError { context } => Self::ConnectionError {
                context: context.clone(),
            },
            Self::CallbackPanic { context } => Self::CallbackPanic {
                context: context.clone(),
            },
            Self::Cancelled { context } => Self::Cancelled {
                context: context.clone(),
            },
            // The boxed source can't be cloned, keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {}", e),
            },
        }
    }
}
