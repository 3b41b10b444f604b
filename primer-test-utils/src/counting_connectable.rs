// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use primer_core::{
    Connectable, ItemStream, PrimerError, Result, StreamSource, Subject, Subscription,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Counters {
    connects: AtomicUsize,
    stops: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

/// Connectable fixture that records every start and stop of its connection.
///
/// Values pushed with [`emit`](Self::emit) reach subscribers regardless of the
/// connection state, which lets tests focus on lifecycle bookkeeping.
pub struct CountingConnectable<T> {
    subject: Subject<T>,
    counters: Arc<Counters>,
    failures_left: AtomicUsize,
    panics_left: AtomicUsize,
    connect_delay: Option<Duration>,
}

impl<T: Clone + Send + 'static> CountingConnectable<T> {
    pub fn new() -> Self {
        Self {
            subject: Subject::new(),
            counters: Arc::new(Counters::default()),
            failures_left: AtomicUsize::new(0),
            panics_left: AtomicUsize::new(0),
            connect_delay: None,
        }
    }

    /// Blocks inside `connect` for `delay`, widening race windows.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Makes the next `count` connects fail.
    pub fn fail_next_connects(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` connects panic.
    pub fn panic_next_connects(&self, count: usize) {
        self.panics_left.store(count, Ordering::SeqCst);
    }

    pub fn emit(&self, value: T) {
        let _ = self.subject.next(value);
    }

    pub fn fail(&self, err: PrimerError) {
        let _ = self.subject.error(err);
    }

    pub fn connect_count(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.counters.stops.load(Ordering::SeqCst)
    }

    pub fn active_connections(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }

    pub fn max_active_connections(&self) -> usize {
        self.counters.max_active.load(Ordering::SeqCst)
    }
}

impl<T: Clone + Send + 'static> Default for CountingConnectable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> StreamSource<T> for CountingConnectable<T> {
    fn subscribe(&self) -> ItemStream<T> {
        self.subject.subscribe()
    }
}

impl<T: Clone + Send + 'static> Connectable<T> for CountingConnectable<T> {
    fn connect(&self) -> Result<Subscription> {
        if let Some(delay) = self.connect_delay {
            std::thread::sleep(delay);
        }

        let panicking = self
            .panics_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if panicking {
            panic!("connect exploded");
        }

        let refused = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if refused {
            return Err(PrimerError::connection_error("connection refused"));
        }

        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);

        let counters = Arc::clone(&self.counters);
        Ok(Subscription::new(move || {
            counters.stops.fetch_add(1, Ordering::SeqCst);
            counters.active.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}
