// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Connectable multicast over a cold source.
//!
//! [`Publish`] turns any [`StreamSource`] into a [`Connectable`]: subscribers attach
//! to an internal [`Subject`], and every `connect()` opens one fresh subscription
//! to the cold source whose items are broadcast to them. Disposing the connection
//! stops the forwarding task without completing subscribers, so they keep waiting
//! for the next connection. When the source itself completes or fails, current
//! subscribers observe the termination and the publisher rearms with a fresh
//! subject for later subscribers.
//!
//! ## Example
//!
//! ```
//! use primer_core::{source_fn, Connectable, Publish, StreamItem, StreamSource, TokioScheduler};
//! use futures::{stream, StreamExt};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cold = source_fn(|| stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]).boxed());
//! let published = Publish::new(cold, Arc::new(TokioScheduler::new()));
//!
//! let mut subscriber = published.subscribe();
//! let _connection = published.connect().unwrap();
//!
//! assert_eq!(subscriber.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(subscriber.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(subscriber.next().await, None);
//! # }
//! ```

use crate::{
    Connectable, ItemStream, Result, Scheduler, SchedulerExt, StreamItem, StreamSource, Subject,
    Subscription,
};
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Multicast wrapper with explicit connect/disconnect over a cold source.
///
/// See the [module documentation](self) for details.
pub struct Publish<T> {
    source: Arc<dyn StreamSource<T>>,
    subject: Arc<Mutex<Subject<T>>>,
    scheduler: Arc<dyn Scheduler>,
}

impl<T: Clone + Send + 'static> Publish<T> {
    /// Creates a disconnected publisher; forwarding tasks run on `scheduler`.
    pub fn new<S>(source: S, scheduler: Arc<dyn Scheduler>) -> Self
    where
        S: StreamSource<T> + 'static,
    {
        Self {
            source: Arc::new(source),
            subject: Arc::new(Mutex::new(Subject::new())),
            scheduler,
        }
    }

    /// Number of subscribers attached to the current subject.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subject.lock().subscriber_count()
    }
}

impl<T: Clone + Send + 'static> StreamSource<T> for Publish<T> {
    fn subscribe(&self) -> ItemStream<T> {
        self.subject.lock().subscribe()
    }
}

impl<T: Clone + Send + 'static> Connectable<T> for Publish<T> {
    fn connect(&self) -> Result<Subscription> {
        let subject = self.subject.lock().clone();
        let slot = Arc::clone(&self.subject);
        let upstream = self.source.subscribe();

        let task = self.scheduler.spawn_task(move |cancel| async move {
            let mut upstream = upstream.take_until(cancel.cancelled());
            let mut failure = None;

            while let Some(item) = upstream.next().await {
                match item {
                    StreamItem::Value(value) => {
                        if subject.next(value).is_err() {
                            return;
                        }
                    }
                    StreamItem::Error(err) => {
                        failure = Some(err);
                        break;
                    }
                }
            }

            if cancel.is_cancelled() {
                debug!("publish connection disposed");
                return;
            }

            // Rearm before terminating so late subscribers attach to the next cycle.
            {
                let mut current = slot.lock();
                if current.ptr_eq(&subject) {
                    *current = Subject::new();
                }
            }

            match failure {
                Some(err) => {
                    warn!("publish source failed: {}", err);
                    if subject.error(err).is_err() {
                        debug!("publish subject already closed, error dropped");
                    }
                }
                None => subject.close(),
            }
        });

        Ok(Subscription::new(move || drop(task)))
    }
}
