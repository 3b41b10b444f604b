// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Warm connection lifecycle for connectable sources.
//!
//! [`Primer`] wraps a [`Connectable`] so that the first subscriber starts the
//! underlying connection, while stopping it is left to an external owner: every
//! successful connect hands a [`Disconnect`] callback to `on_connected`.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --first subscribe--> Entering --connect ok--> Open --disconnect--> Idle
//!                               \--connect failed--> Idle
//! ```
//!
//! - Every subscriber is attached to the source before the connection decision,
//!   so no subscriber misses items once connected.
//! - Exactly one connect happens per cycle, however many subscribers race.
//! - Dropping a subscriber never disconnects; only [`Disconnect::disconnect`] does.
//! - Disconnecting twice, or with a callback from an earlier cycle, is a no-op.
//! - A failed or panicking connect is reported to the subscriber that triggered it
//!   and leaves the primer `Idle`, so the next subscriber retries.
//!
//! ## Example
//!
//! ```
//! use primer_core::{source_fn, Publish, StreamItem, TokioScheduler};
//! use primer_stream::{prime, Disconnect};
//! use futures::{stream, StreamExt};
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ticks = source_fn(|| stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]).boxed());
//! let published = Arc::new(Publish::new(ticks, Arc::new(TokioScheduler::new())));
//!
//! let handle: Arc<Mutex<Option<Disconnect>>> = Arc::default();
//! let primed = prime(published, {
//!     let handle = handle.clone();
//!     move |disconnect| *handle.lock() = Some(disconnect)
//! });
//!
//! let mut first = primed.subscribe();
//! assert_eq!(first.next().await, Some(StreamItem::Value(1)));
//!
//! if let Some(disconnect) = handle.lock().take() {
//!     disconnect.disconnect();
//! }
//! assert!(!primed.is_connected());
//! # }
//! ```

use parking_lot::Mutex;
use primer_core::{
    error_stream, Connectable, ExecutionGate, GateState, ItemStream, PrimerError, Result,
    StreamSource, Subscription,
};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type OnConnected = Arc<dyn Fn(Disconnect) + Send + Sync + 'static>;

#[derive(Default)]
struct ConnectionSlot {
    cycle: u64,
    connection: Option<Subscription>,
}

/// Connection state shared by a primer and the disconnect callbacks it hands out.
#[derive(Default)]
struct ConnectionLifecycle {
    gate: ExecutionGate,
    slot: Mutex<ConnectionSlot>,
}

impl ConnectionLifecycle {
    /// Runs `connect` if no connection is live, returning the callback for the new cycle.
    fn connect_if_idle<F>(self: &Arc<Self>, connect: F) -> Result<Option<Disconnect>>
    where
        F: FnOnce() -> Result<Subscription>,
    {
        if self.gate.state() != GateState::Idle {
            return Ok(None);
        }

        let mut slot = self.slot.lock();
        if !self.gate.try_enter() {
            return Ok(None);
        }

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(connect))
            .unwrap_or_else(|payload| Err(PrimerError::from_panic(payload)));

        match outcome {
            Ok(connection) => {
                slot.cycle += 1;
                slot.connection = Some(connection);
                self.gate.try_transition(GateState::Entering, GateState::Open);
                debug!("primer connected, cycle {}", slot.cycle);

                Ok(Some(Disconnect {
                    lifecycle: Arc::clone(self),
                    cycle: slot.cycle,
                }))
            }
            Err(err) => {
                self.gate.try_transition(GateState::Entering, GateState::Idle);
                warn!("primer connect failed: {}", err);
                Err(err)
            }
        }
    }

    fn disconnect(&self, cycle: u64) {
        let mut slot = self.slot.lock();
        if slot.cycle != cycle {
            debug!("ignoring disconnect from stale cycle {} (current {})", cycle, slot.cycle);
            return;
        }
        if !self.gate.try_transition(GateState::Open, GateState::Idle) {
            debug!("ignoring disconnect, cycle {} already idle", cycle);
            return;
        }

        // Disposed under the lock: the next cycle cannot connect before this one stopped.
        if let Some(connection) = slot.connection.take() {
            connection.dispose();
        }
        debug!("primer disconnected, cycle {}", cycle);
    }
}

/// Stops the connection of one priming cycle.
///
/// Cheap to clone and safe to call from any thread, any number of times.
#[derive(Clone)]
pub struct Disconnect {
    lifecycle: Arc<ConnectionLifecycle>,
    cycle: u64,
}

impl Disconnect {
    /// Stops the underlying connection if this callback's cycle is still live.
    pub fn disconnect(&self) {
        self.lifecycle.disconnect(self.cycle);
    }

    /// Cycle number this callback belongs to, starting at 1.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

impl fmt::Debug for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disconnect")
            .field("cycle", &self.cycle)
            .finish()
    }
}

/// A connectable source that connects on first subscription.
///
/// See the [module documentation](self) for the lifecycle.
pub struct Primer<T> {
    source: Arc<dyn Connectable<T>>,
    lifecycle: Arc<ConnectionLifecycle>,
    on_connected: OnConnected,
}

impl<T: Send + 'static> Primer<T> {
    /// Wraps `source`; `on_connected` receives the disconnect callback of every cycle.
    pub fn new<C, F>(source: Arc<C>, on_connected: F) -> Self
    where
        C: Connectable<T> + 'static,
        F: Fn(Disconnect) + Send + Sync + 'static,
    {
        Self {
            source,
            lifecycle: Arc::default(),
            on_connected: Arc::new(on_connected),
        }
    }

    /// Subscribe, connecting the source if this is the first subscription of a cycle.
    ///
    /// A connect failure is delivered as the only item of the returned stream.
    pub fn subscribe(&self) -> ItemStream<T> {
        let events = self.source.subscribe();

        match self.lifecycle.connect_if_idle(|| self.source.connect()) {
            Ok(Some(disconnect)) => {
                (self.on_connected)(disconnect);
                events
            }
            Ok(None) => events,
            Err(err) => error_stream(err),
        }
    }

    /// Returns `true` while a connection is live.
    pub fn is_connected(&self) -> bool {
        self.lifecycle.gate.is_open()
    }

    /// Number of successful connects so far.
    pub fn cycle(&self) -> u64 {
        self.lifecycle.slot.lock().cycle
    }
}

impl<T> Clone for Primer<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            lifecycle: Arc::clone(&self.lifecycle),
            on_connected: Arc::clone(&self.on_connected),
        }
    }
}

impl<T: Send + 'static> StreamSource<T> for Primer<T> {
    fn subscribe(&self) -> ItemStream<T> {
        Primer::subscribe(self)
    }
}

/// Wraps `source` into a [`Primer`].
pub fn prime<T, C, F>(source: Arc<C>, on_connected: F) -> Primer<T>
where
    T: Send + 'static,
    C: Connectable<T> + 'static,
    F: Fn(Disconnect) + Send + Sync + 'static,
{
    Primer::new(source, on_connected)
}

/// Extension trait priming any connectable source.
pub trait PrimeExt<T>: Connectable<T> + Sized + 'static {
    /// Shares `self` behind a [`Primer`].
    fn prime<F>(self, on_connected: F) -> Primer<T>
    where
        F: Fn(Disconnect) + Send + Sync + 'static;
}

impl<T, C> PrimeExt<T> for C
where
    T: Send + 'static,
    C: Connectable<T> + 'static,
{
    fn prime<F>(self, on_connected: F) -> Primer<T>
    where
        F: Fn(Disconnect) + Send + Sync + 'static,
    {
        Primer::new(Arc::new(self), on_connected)
    }
}
