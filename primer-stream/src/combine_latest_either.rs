// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Latest-value join over a stream that multiplexes two channels.
//!
//! The source carries [`Either<L, R>`] events. The operator keeps the most recent
//! value seen on each channel and, once both channels have been populated at least
//! once, emits `selector(latest_left, latest_right)` for every subsequent event on
//! either channel. This is "combine latest", not "zip": a burst on one channel
//! produces one emission per event, each paired with the other channel's latest.
//!
//! ## Example
//!
//! ```
//! use primer_core::{Either, StreamItem};
//! use primer_stream::CombineLatestEitherExt;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let events = stream::iter(vec![
//!     StreamItem::Value(Either::Left(1)),
//!     StreamItem::Value(Either::Left(2)),
//!     StreamItem::Value(Either::Right("a")),
//!     StreamItem::Value(Either::Left(3)),
//! ]);
//!
//! let joined: Vec<_> = events
//!     .combine_latest_either(|n: &i32, s: &&str| format!("{s}{n}"))
//!     .collect()
//!     .await;
//!
//! assert_eq!(
//!     joined,
//!     vec![
//!         StreamItem::Value("a2".to_string()),
//!         StreamItem::Value("a3".to_string()),
//!     ]
//! );
//! # }
//! ```

use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use primer_core::{Either, StreamItem};

/// Latest value seen on each channel.
///
/// Every event produces a new state through [`update`](Self::update); a populated
/// channel never goes back to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinState<L, R> {
    left: Option<L>,
    right: Option<R>,
}

impl<L, R> JoinState<L, R> {
    /// State with both channels empty.
    pub const fn new() -> Self {
        Self {
            left: None,
            right: None,
        }
    }

    /// Returns the state after `event`, replacing only the tagged channel.
    #[must_use]
    pub fn update(self, event: Either<L, R>) -> Self {
        match event {
            Either::Left(left) => Self {
                left: Some(left),
                right: self.right,
            },
            Either::Right(right) => Self {
                left: self.left,
                right: Some(right),
            },
        }
    }

    pub fn left(&self) -> Option<&L> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&R> {
        self.right.as_ref()
    }

    /// Returns `true` once both channels have been populated.
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Both latest values, if both channels have been populated.
    pub fn latest(&self) -> Option<(&L, &R)> {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }
}

impl<L, R> Default for JoinState<L, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream returned by [`combine_latest_either`](CombineLatestEitherExt::combine_latest_either).
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct CombineLatestEither<S, L, R, F, R2> {
    #[pin]
    source: S,
    // None once the source has completed or failed.
    state: Option<JoinState<L, R>>,
    selector: F,
    _output: PhantomData<fn() -> R2>,
}

impl<S, L, R, F, R2> CombineLatestEither<S, L, R, F, R2> {
    fn new(source: S, selector: F) -> Self {
        Self {
            source,
            state: Some(JoinState::new()),
            selector,
            _output: PhantomData,
        }
    }
}

impl<S, L, R, F, R2> Stream for CombineLatestEither<S, L, R, F, R2>
where
    S: Stream<Item = StreamItem<Either<L, R>>>,
    F: Fn(&L, &R) -> R2,
{
    type Item = StreamItem<R2>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if this.state.is_none() {
                return Poll::Ready(None);
            }

            match ready!(this.source.as_mut().poll_next(cx)) {
                Some(StreamItem::Value(event)) => {
                    let next = this.state.take().unwrap_or_default().update(event);
                    let combined = next.latest().map(|(left, right)| (this.selector)(left, right));
                    *this.state = Some(next);

                    if let Some(value) = combined {
                        return Poll::Ready(Some(StreamItem::Value(value)));
                    }
                }
                Some(StreamItem::Error(err)) => {
                    *this.state = None;
                    return Poll::Ready(Some(StreamItem::Error(err)));
                }
                None => {
                    *this.state = None;
                    return Poll::Ready(None);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_none() {
            return (0, Some(0));
        }
        (0, self.source.size_hint().1)
    }
}

/// Extension trait providing the latest-value join for two-channel streams.
pub trait CombineLatestEitherExt<L, R>: Stream<Item = StreamItem<Either<L, R>>> + Sized {
    /// Joins the latest left and right values with `selector`.
    ///
    /// Emits nothing until both channels have been seen, then one result per event.
    /// Errors are forwarded and end the stream; completion ends it as well.
    fn combine_latest_either<R2, F>(self, selector: F) -> CombineLatestEither<Self, L, R, F, R2>
    where
        F: Fn(&L, &R) -> R2;
}

impl<S, L, R> CombineLatestEitherExt<L, R> for S
where
    S: Stream<Item = StreamItem<Either<L, R>>> + Sized,
{
    fn combine_latest_either<R2, F>(self, selector: F) -> CombineLatestEither<Self, L, R, F, R2>
    where
        F: Fn(&L, &R) -> R2,
    {
        CombineLatestEither::new(self, selector)
    }
}

/// Free-function form of [`CombineLatestEitherExt::combine_latest_either`].
pub fn combine_latest_either<S, L, R, F, R2>(
    source: S,
    selector: F,
) -> CombineLatestEither<S, L, R, F, R2>
where
    S: Stream<Item = StreamItem<Either<L, R>>>,
    F: Fn(&L, &R) -> R2,
{
    CombineLatestEither::new(source, selector)
}
