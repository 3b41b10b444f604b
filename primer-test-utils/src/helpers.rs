// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use primer_core::StreamItem;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits up to `timeout_ms` for the next item and returns it.
///
/// # Panics
///
/// Panics if the stream ends or nothing arrives in time.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an item but the stream ended"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for an item"),
    }
}

/// Extracts the value of an item.
///
/// # Panics
///
/// Panics if there is no item or the item is an error.
pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(err)) => panic!("Expected a value, got error: {err}"),
        None => panic!("Expected a value, got nothing"),
    }
}

/// Asserts that the stream stays silent for `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    tokio::select! {
        item = stream.next() => {
            panic!("Unexpected emission, expected no output: {item:?}");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Asserts that the stream completes within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(item)) => panic!("Expected the stream to end, got {item:?}"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for the stream to end"),
    }
}
