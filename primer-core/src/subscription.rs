// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Idempotent disposal handle.

use crate::CancellationToken;
use parking_lot::Mutex;
use std::fmt;

type Teardown = Box<dyn FnOnce() + Send + 'static>;

/// Owner of a releasable resource: a connection, a forwarding task, a registration.
///
/// `dispose()` cancels the associated [`CancellationToken`] and runs the teardown
/// exactly once, no matter how many times or from how many threads it is called.
/// Dropping the subscription disposes it.
///
/// # Example
///
/// ```
/// use primer_core::Subscription;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let stops = Arc::new(AtomicUsize::new(0));
/// let subscription = Subscription::new({
///     let stops = stops.clone();
///     move || {
///         stops.fetch_add(1, Ordering::SeqCst);
///     }
/// });
///
/// subscription.dispose();
/// subscription.dispose();
/// assert_eq!(stops.load(Ordering::SeqCst), 1);
/// ```
pub struct Subscription {
    token: CancellationToken,
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    /// Creates a subscription that runs `teardown` on first disposal.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            token: CancellationToken::new(),
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// Creates a subscription whose disposal only cancels `token`.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            teardown: Mutex::new(None),
        }
    }

    /// Creates a subscription that owns nothing.
    pub fn empty() -> Self {
        Self::from_token(CancellationToken::new())
    }

    /// Releases the resource. Subsequent calls are no-ops.
    pub fn dispose(&self) {
        if !self.token.cancel() {
            return;
        }

        // Take the closure before running it so the lock is not held by user code.
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Returns `true` once `dispose()` has been called.
    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token cancelled when this subscription is disposed.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
