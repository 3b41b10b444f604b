// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::PrimerError;

/// Errors specific to subject operations (lifecycle and broadcasting).
///
/// Distinct from stream processing errors; convert to [`PrimerError`] when the
/// failure has to travel through a stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject has been closed and cannot accept new items or subscribers.
    #[error("Subject is closed")]
    Closed,
}

impl From<SubjectError> for PrimerError {
    fn from(err: SubjectError) -> Self {
        PrimerError::stream_error(err.to_string())
    }
}
