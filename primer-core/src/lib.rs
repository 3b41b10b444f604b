// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the primer stream toolkit.
//!
//! This crate defines the base push-based stream abstraction the operators in
//! `primer-stream` build on:
//!
//! - [`StreamItem`] / [`PrimerError`]: values and errors travelling through streams
//! - [`StreamSource`], [`Observer`], [`Connectable`]: subscription factories, sinks and
//!   multicast sources with explicit connect
//! - [`Subject`], [`Publish`]: hot broadcasters
//! - [`Subscription`], [`CancellationToken`], [`Task`]: idempotent disposal
//! - [`Scheduler`]: submission of work to an executor
//! - [`ExecutionGate`]: the single-execution state machine shared by the lifecycle operators
//! - [`Either`]: two-channel tagged union

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod cancellation_token;
pub mod either;
pub mod execution_gate;
pub mod primer_error;
pub mod publish;
pub mod scheduler;
pub mod source;
pub mod stream_item;
pub mod subject;
pub mod subject_error;
pub mod subscription;
pub mod task;

pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::either::Either;
pub use self::execution_gate::{ExecutionGate, GateState};
pub use self::primer_error::{IntoPrimerError, PrimerError, Result, ResultExt};
pub use self::publish::Publish;
#[cfg(feature = "runtime-tokio")]
pub use self::scheduler::TokioScheduler;
pub use self::scheduler::{ScheduledWork, Scheduler, SchedulerExt};
pub use self::source::{
    empty_stream, error_stream, source_fn, Connectable, FnSource, ItemStream, Observer,
    StreamSource,
};
pub use self::stream_item::StreamItem;
pub use self::subject::Subject;
pub use self::subject_error::SubjectError;
pub use self::subscription::Subscription;
pub use self::task::Task;
