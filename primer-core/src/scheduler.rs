// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scheduler abstraction used to decouple work from the calling thread.

use crate::{CancellationToken, Task};
use std::future::Future;
use std::pin::Pin;

/// Unit of work submitted to a [`Scheduler`].
pub type ScheduledWork = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Submits work for asynchronous execution.
///
/// Implementations must not run `work` synchronously on the calling thread to
/// completion before returning if that would block; handing it to an executor is
/// the expected behavior.
pub trait Scheduler: Send + Sync {
    /// Submit `work` for execution.
    fn schedule(&self, work: ScheduledWork);
}

/// Convenience methods available on every scheduler, including `dyn Scheduler`.
pub trait SchedulerExt: Scheduler {
    /// Spawn a cancellable task.
    ///
    /// `f` receives the token that is cancelled when the returned [`Task`] is
    /// cancelled or dropped.
    fn spawn_task<F, Fut>(&self, f: F) -> Task
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        self.schedule(Box::pin(f(cancel.clone())));
        Task::from_token(cancel)
    }
}

impl<S: Scheduler + ?Sized> SchedulerExt for S {}

/// Scheduler backed by a tokio runtime.
///
/// `TokioScheduler::new()` spawns on whichever runtime is current when work is
/// submitted; [`with_handle`](Self::with_handle) pins it to a specific runtime.
#[cfg(feature = "runtime-tokio")]
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    handle: Option<tokio::runtime::Handle>,
}

#[cfg(feature = "runtime-tokio")]
impl TokioScheduler {
    /// Scheduler that spawns on the current runtime.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Scheduler that always spawns on `handle`.
    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

#[cfg(feature = "runtime-tokio")]
impl Scheduler for TokioScheduler {
    fn schedule(&self, work: ScheduledWork) {
        match &self.handle {
            Some(handle) => {
                handle.spawn(work);
            }
            None => {
                tokio::spawn(work);
            }
        }
    }
}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn schedule(&self, work: ScheduledWork) {
        (**self).schedule(work);
    }
}
