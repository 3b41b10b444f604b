// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Primer
//!
//! Warm, lazily-connected reactive streams.
//!
//! ## Overview
//!
//! Primer builds on the Rust async ecosystem (futures, tokio) and adds a few
//! lifecycle-aware operators on top of a small push-based core:
//!
//! - **Connection priming**: [`prime`] connects a [`Connectable`] exactly once, when the
//!   first subscriber arrives, and hands the caller a [`Disconnect`] handle. After a
//!   disconnect the next subscriber reconnects.
//! - **Latest-value join**: [`combine_latest_either`] pairs the latest value of each
//!   channel of an [`Either`] stream.
//! - **Shared one-shot computation**: [`start_primed`] runs an action at most once and
//!   replays its outcome to every subscriber.
//! - **Type bridging**: [`CoercionRegistry`] views type-erased handles as typed
//!   sources and sinks, converting element types on the way.
//!
//! Errors travel in-band as [`StreamItem::Error`] and terminate the stream.
//!
//! ## Quick Start
//!
//! ```rust
//! use primer_rx::prelude::*;
//! use primer_rx::{Publish, TokioScheduler};
//! use futures::{stream, StreamExt};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cold = primer_rx::source_fn(|| {
//!     stream::iter(vec![StreamItem::Value("warm")]).boxed()
//! });
//! let published = Publish::new(cold, Arc::new(TokioScheduler::new()));
//!
//! let primed = published.prime(|_disconnect| {});
//! let values: Vec<_> = primed.subscribe().collect().await;
//!
//! assert_eq!(values, vec![StreamItem::Value("warm")]);
//! # }
//! ```

pub use primer_core::{
    empty_stream, error_stream, source_fn, CancellationToken, Connectable, Either,
    ExecutionGate, GateState, ItemStream, Observer, PrimerError, Publish, Result, Scheduler,
    SchedulerExt, StreamItem, StreamSource, Subject, SubjectError, Subscription, Task,
};
#[cfg(feature = "runtime-tokio")]
pub use primer_core::TokioScheduler;

pub use primer_stream::{
    combine_latest_either, prime, start_primed, start_primed_async, CoercionRegistry,
    CombineLatestEither, Disconnect, Handle, JoinState, PrimedStart, Primer,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use primer_stream::prelude::*;
}
