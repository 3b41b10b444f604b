// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background task spawning with cooperative cancellation.

use crate::CancellationToken;

/// Task handle with automatic cancellation on drop.
///
/// The spawned future receives a [`CancellationToken`] it should race against its
/// work. When the `Task` is dropped or cancelled the token fires and the task is
/// expected to exit at its next await point.
///
/// Tasks are created through [`SchedulerExt::spawn_task`](crate::SchedulerExt::spawn_task).
///
/// # Example
///
/// ```rust
/// use primer_core::{SchedulerExt, TokioScheduler};
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = TokioScheduler::new().spawn_task(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// // Dropping the handle signals the task to stop
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct Task {
    cancel: CancellationToken,
}

impl Task {
    /// Wrap the token of a future that was handed to an executor.
    ///
    /// The returned handle cancels `cancel` on drop.
    pub fn from_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Signal the task to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
