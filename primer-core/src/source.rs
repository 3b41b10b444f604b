// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The base stream abstraction: subscription factories, push-side observers and
//! connectable (multicast) sources.

use crate::{PrimerError, Result, StreamItem, Subscription};
use futures::{stream, Stream};
use std::pin::Pin;
use std::sync::Arc;

/// Boxed stream handed to every subscriber.
///
/// Dropping it disposes the subscription.
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

/// A subscription factory: each call to `subscribe` yields an independent stream.
pub trait StreamSource<T>: Send + Sync {
    /// Subscribe and receive a fresh stream of items.
    ///
    /// Failures are reported through the stream's error channel, never by panicking.
    fn subscribe(&self) -> ItemStream<T>;
}

/// Push-side sink receiving values, an error or completion.
pub trait Observer<T>: Send + Sync {
    /// Deliver a value.
    fn on_next(&self, value: T);

    /// Deliver a terminal error.
    fn on_error(&self, error: PrimerError);

    /// Signal completion.
    fn on_completed(&self);
}

/// A multicast source whose production starts only when `connect` is called.
///
/// All current subscribers share the single running connection. Disposing the
/// returned [`Subscription`] stops it.
pub trait Connectable<T>: StreamSource<T> {
    /// Start the underlying production.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be started.
    fn connect(&self) -> Result<Subscription>;
}

impl<T, S> StreamSource<T> for Arc<S>
where
    S: StreamSource<T> + ?Sized,
{
    fn subscribe(&self) -> ItemStream<T> {
        (**self).subscribe()
    }
}

impl<T, O> Observer<T> for Arc<O>
where
    O: Observer<T> + ?Sized,
{
    fn on_next(&self, value: T) {
        (**self).on_next(value);
    }

    fn on_error(&self, error: PrimerError) {
        (**self).on_error(error);
    }

    fn on_completed(&self) {
        (**self).on_completed();
    }
}

/// [`StreamSource`] built from a closure producing a cold stream per subscription.
pub struct FnSource<F> {
    factory: F,
}

impl<T, F> StreamSource<T> for FnSource<F>
where
    F: Fn() -> ItemStream<T> + Send + Sync,
{
    fn subscribe(&self) -> ItemStream<T> {
        (self.factory)()
    }
}

/// Wraps `factory` into a [`StreamSource`].
///
/// # Example
///
/// ```
/// use primer_core::{source_fn, StreamItem, StreamSource};
/// use futures::{stream, StreamExt};
///
/// # #[tokio::main]
/// # async fn main() {
/// let numbers = source_fn(|| stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]).boxed());
///
/// let first: Vec<_> = numbers.subscribe().collect().await;
/// let second: Vec<_> = numbers.subscribe().collect().await;
/// assert_eq!(first, second);
/// # }
/// ```
pub fn source_fn<T, F>(factory: F) -> FnSource<F>
where
    F: Fn() -> ItemStream<T> + Send + Sync,
{
    FnSource { factory }
}

/// Stream that fails immediately with `error`.
pub fn error_stream<T: Send + 'static>(error: PrimerError) -> ItemStream<T> {
    Box::pin(stream::once(async move { StreamItem::Error(error) }))
}

/// Stream that completes immediately.
pub fn empty_stream<T: Send + 'static>() -> ItemStream<T> {
    Box::pin(stream::empty())
}
