// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::TakeUntil;
use futures::{Stream, StreamExt};
use primer_core::{CancellationToken, Cancelled};

/// Ends a stream as soon as a [`CancellationToken`] fires.
///
/// Items already yielded are unaffected; nothing is delivered after cancellation.
/// Cancellation is a normal end of stream, not an error.
///
/// # Example
///
/// ```
/// use primer_core::CancellationToken;
/// use primer_stream::TakeUntilCancelledExt;
/// use futures::{stream, StreamExt};
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let mut numbers = stream::iter(1..).take_until_cancelled(&token);
///
/// assert_eq!(numbers.next().await, Some(1));
/// token.cancel();
/// assert_eq!(numbers.next().await, None);
/// # }
/// ```
pub trait TakeUntilCancelledExt: Stream + Sized {
    /// Stop yielding once `token` is cancelled.
    fn take_until_cancelled(self, token: &CancellationToken) -> TakeUntil<Self, Cancelled> {
        self.take_until(token.cancelled())
    }
}

impl<S: Stream> TakeUntilCancelledExt for S {}
