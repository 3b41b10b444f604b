// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the primer workspace.
//!
//! Development and testing only, not for production code.
//!
//! - `test_channel` / `test_channel_with_errors`: imperative senders feeding a stream
//! - `helpers`: timeout-guarded assertions on streams
//! - `animal`: a small type hierarchy (`Dog` upcasts into `Animal`) for coercion tests
//! - `counting_connectable`: a [`Connectable`](primer_core::Connectable) that counts
//!   connects and stops

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod animal;
pub mod counting_connectable;
pub mod helpers;

use futures::{Stream, StreamExt};
use primer_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use animal::{Animal, Dog};
pub use counting_connectable::CountingConnectable;
pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value,
};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// # Example
///
/// ```rust
/// use primer_test_utils::test_channel;
/// use primer_core::StreamItem;
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send(42).unwrap();
///
/// assert_eq!(stream.next().await, Some(StreamItem::Value(42)));
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
