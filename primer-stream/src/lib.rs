// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream operators built on `primer-core`.
//!
//! | Operator | Purpose |
//! |----------|---------|
//! | [`combine_latest_either`](CombineLatestEitherExt::combine_latest_either) | Latest-value join over a two-channel stream |
//! | [`prime`](PrimeExt::prime) | Connect a [`Connectable`](primer_core::Connectable) once, on first subscription, and hand out a disconnect handle |
//! | [`start_primed`] / [`start_primed_async`] | Run an action at most once and share its outcome |
//! | [`CoercionRegistry`] | View type-erased handles as typed sources and sinks |
//! | [`take_until_cancelled`](TakeUntilCancelledExt::take_until_cancelled) | End a stream when a token fires |
//!
//! Errors travel in-band as [`StreamItem::Error`](primer_core::StreamItem::Error)
//! and terminate the stream they occur on.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod coerce;
pub mod combine_latest_either;
pub mod prelude;
pub mod prime;
pub mod start_primed;
pub mod take_until_cancelled;

pub use self::coerce::{CoercionRegistry, Handle};
pub use self::combine_latest_either::{
    combine_latest_either, CombineLatestEither, CombineLatestEitherExt, JoinState,
};
pub use self::prime::{prime, Disconnect, PrimeExt, Primer};
pub use self::start_primed::{start_primed, start_primed_async, PrimedStart};
pub use self::take_until_cancelled::TakeUntilCancelledExt;
