// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`Subject`] broadcasts each [`StreamItem<T>`] to all active subscribers.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers only receive items sent after subscribing.
//! - **Unbounded**: Uses unbounded channels internally (no backpressure).
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//! - **Error/close**: Errors are propagated to all subscribers and terminate the subject.
//!
//! ## Example
//!
//! ```
//! use primer_core::{StreamItem, Subject};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = Subject::<i32>::new();
//! let mut stream = subject.try_subscribe().unwrap();
//!
//! subject.next(1).unwrap();
//! subject.next(2).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{
    empty_stream, ItemStream, Observer, PrimerError, StreamItem, StreamSource, SubjectError,
};
use futures_channel::mpsc::{self, UnboundedSender};
use parking_lot::Mutex;
use std::sync::Arc;

struct SubjectState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<StreamItem<T>>>,
}

/// A hot, unbounded subject that broadcasts items to all current subscribers.
///
/// See the [module documentation](self) for details.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates an open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe and receive every item sent from now on.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn try_subscribe(&self) -> Result<ItemStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(Box::pin(rx))
    }

    /// Send an item to all active subscribers.
    ///
    /// Subscribers whose stream has been dropped are pruned on the way.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        state
            .senders
            .retain(|tx| tx.unbounded_send(item.clone()).is_ok());
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Send an error to all subscribers and terminate the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject was already closed.
    pub fn error(&self, err: PrimerError) -> Result<(), SubjectError> {
        let result = self.send(StreamItem::Error(err));
        self.close();
        result
    }

    /// Closes the subject, completing all subscriber streams.
    ///
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of registered subscribers.
    ///
    /// Dropped subscribers are removed lazily, on the next `send()`.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }

    /// Returns `true` if both handles share the same state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> StreamSource<T> for Subject<T> {
    /// A closed subject yields an already completed stream.
    fn subscribe(&self) -> ItemStream<T> {
        self.try_subscribe().unwrap_or_else(|_| empty_stream())
    }
}

impl<T: Clone + Send + 'static> Observer<T> for Subject<T> {
    fn on_next(&self, value: T) {
        if self.next(value).is_err() {
            debug!("subject closed, value dropped");
        }
    }

    fn on_error(&self, error: PrimerError) {
        if self.error(error).is_err() {
            debug!("subject closed, error dropped");
        }
    }

    fn on_completed(&self) {
        self.close();
    }
}
