// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazy shared computation.
//!
//! [`start_primed`] wraps a one-shot action so it runs at most once, on a scheduler,
//! when the first subscriber arrives. Every subscriber, whether it came first,
//! concurrently or long after completion, observes the outcome of that single run:
//! one value followed by completion, or one error.
//!
//! The outcome handle exists before the action is scheduled, so subscribers that
//! attach while the run is in flight cannot miss its result. Panics inside the
//! action are caught and delivered as [`PrimerError::CallbackPanic`].
//!
//! ## Example
//!
//! ```
//! use primer_core::{PrimerError, StreamItem, TokioScheduler};
//! use primer_stream::start_primed;
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let answer = start_primed(
//!     || Ok::<_, PrimerError>(42),
//!     Arc::new(TokioScheduler::new()),
//! );
//!
//! let first: Vec<_> = answer.subscribe().collect().await;
//! let second: Vec<_> = answer.subscribe().collect().await;
//!
//! assert_eq!(first, vec![StreamItem::Value(42)]);
//! assert_eq!(second, first);
//! # }
//! ```

use futures::channel::oneshot;
use futures::future::{BoxFuture, Shared};
use futures::{stream, FutureExt};
use parking_lot::Mutex;
use primer_core::{
    ExecutionGate, GateState, ItemStream, PrimerError, Scheduler, StreamItem, StreamSource,
};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type Outcome<T> = Shared<BoxFuture<'static, StreamItem<T>>>;

struct PendingRun<T> {
    work: BoxFuture<'static, StreamItem<T>>,
    sender: oneshot::Sender<StreamItem<T>>,
}

struct SharedComputationCell<T> {
    // Idle -> Entering -> Open, never reset.
    gate: ExecutionGate,
    pending: Mutex<Option<PendingRun<T>>>,
    outcome: Outcome<T>,
    scheduler: Arc<dyn Scheduler>,
}

/// A one-shot computation shared by all of its subscribers.
///
/// See the [module documentation](self) for details.
pub struct PrimedStart<T> {
    cell: Arc<SharedComputationCell<T>>,
}

impl<T> PrimedStart<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_work(work: BoxFuture<'static, StreamItem<T>>, scheduler: Arc<dyn Scheduler>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let outcome = receiver
            .map(|result| {
                result.unwrap_or_else(|_| {
                    StreamItem::Error(PrimerError::cancelled(
                        "primed action was dropped before completing",
                    ))
                })
            })
            .boxed()
            .shared();

        Self {
            cell: Arc::new(SharedComputationCell {
                gate: ExecutionGate::new(),
                pending: Mutex::new(Some(PendingRun { work, sender })),
                outcome,
                scheduler,
            }),
        }
    }

    /// Subscribe to the shared outcome, starting the action on first use.
    pub fn subscribe(&self) -> ItemStream<T> {
        let outcome = self.cell.outcome.clone();

        if self.cell.gate.try_enter() {
            let pending = self.cell.pending.lock().take();
            if let Some(PendingRun { work, sender }) = pending {
                debug!("scheduling primed action");
                self.cell.scheduler.schedule(Box::pin(async move {
                    let item = work.await;
                    if sender.send(item).is_err() {
                        debug!("primed action finished without subscribers");
                    }
                }));
            }
            self.cell
                .gate
                .try_transition(GateState::Entering, GateState::Open);
        }

        Box::pin(stream::once(outcome))
    }

    /// Returns `true` once the first subscription has triggered the action.
    pub fn is_started(&self) -> bool {
        self.cell.gate.state() != GateState::Idle
    }
}

impl<T> Clone for PrimedStart<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> StreamSource<T> for PrimedStart<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscribe(&self) -> ItemStream<T> {
        PrimedStart::subscribe(self)
    }
}

/// Runs `action` at most once, on `scheduler`, when the first subscriber arrives.
///
/// Returning `Err` or panicking delivers an error to every subscriber.
pub fn start_primed<T, E, F>(action: F, scheduler: Arc<dyn Scheduler>) -> PrimedStart<T>
where
    T: Clone + Send + Sync + 'static,
    E: std::error::Error + Send + Sync + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    let work = async move {
        match std::panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(value)) => StreamItem::Value(value),
            Ok(Err(err)) => StreamItem::Error(PrimerError::from_error(err)),
            Err(payload) => StreamItem::Error(PrimerError::from_panic(payload)),
        }
    };

    PrimedStart::from_work(work.boxed(), scheduler)
}

/// Async form of [`start_primed`]: the future returned by `action` is awaited once.
pub fn start_primed_async<T, E, F, Fut>(action: F, scheduler: Arc<dyn Scheduler>) -> PrimedStart<T>
where
    T: Clone + Send + Sync + 'static,
    E: std::error::Error + Send + Sync + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let work = AssertUnwindSafe(async move { action().await })
        .catch_unwind()
        .map(|outcome| match outcome {
            Ok(Ok(value)) => StreamItem::Value(value),
            Ok(Err(err)) => StreamItem::Error(PrimerError::from_error(err)),
            Err(payload) => StreamItem::Error(PrimerError::from_panic(payload)),
        });

    PrimedStart::from_work(work.boxed(), scheduler)
}
