// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use parking_lot::Mutex;
use primer_core::{source_fn, PrimerError, Publish, StreamItem, TokioScheduler};
use primer_stream::{prime, Disconnect, PrimeExt, Primer};
use primer_test_utils::{
    assert_no_element_emitted, assert_stream_ended, unwrap_stream, CountingConnectable,
};
use std::sync::Arc;

/// Primes `source`, collecting every disconnect callback handed out.
fn primed_with_handles(
    source: &Arc<CountingConnectable<i32>>,
) -> (Primer<i32>, Arc<Mutex<Vec<Disconnect>>>) {
    let handles: Arc<Mutex<Vec<Disconnect>>> = Arc::default();
    let primed = prime(Arc::clone(source), {
        let handles = Arc::clone(&handles);
        move |disconnect| handles.lock().push(disconnect)
    });
    (primed, handles)
}

#[tokio::test]
async fn test_prime_does_not_connect_before_first_subscription() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());

    // Act
    let (primed, handles) = primed_with_handles(&source);

    // Assert
    assert_eq!(source.connect_count(), 0);
    assert!(!primed.is_connected());
    assert!(handles.lock().is_empty());
}

#[tokio::test]
async fn test_prime_connects_once_for_sequential_subscribers() -> anyhow::Result<()> {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    let (primed, handles) = primed_with_handles(&source);

    // Act
    let mut first = primed.subscribe();
    let mut second = primed.subscribe();
    source.emit(5);

    // Assert
    assert_eq!(source.connect_count(), 1);
    assert_eq!(handles.lock().len(), 1);
    assert_eq!(handles.lock()[0].cycle(), 1);
    assert!(primed.is_connected());
    assert_eq!(unwrap_stream(&mut first, 500).await.unwrap(), 5);
    assert_eq!(unwrap_stream(&mut second, 500).await.unwrap(), 5);

    Ok(())
}

#[tokio::test]
async fn test_prime_reconnects_after_disconnect() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    let (primed, handles) = primed_with_handles(&source);
    let _first = primed.subscribe();

    // Act
    handles.lock()[0].disconnect();

    // Assert
    assert_eq!(source.stop_count(), 1);
    assert!(!primed.is_connected());

    let _second = primed.subscribe();
    assert_eq!(source.connect_count(), 2);
    assert_eq!(primed.cycle(), 2);
    assert_eq!(handles.lock().len(), 2);
    assert_eq!(handles.lock()[1].cycle(), 2);
}

#[tokio::test]
async fn test_prime_disconnect_twice_stops_once() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    let (primed, handles) = primed_with_handles(&source);
    let _subscriber = primed.subscribe();
    let disconnect = handles.lock()[0].clone();

    // Act
    disconnect.disconnect();
    disconnect.disconnect();

    // Assert
    assert_eq!(source.stop_count(), 1);
    assert_eq!(source.active_connections(), 0);
}

#[tokio::test]
async fn test_prime_stale_disconnect_leaves_new_cycle_running() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    let (primed, handles) = primed_with_handles(&source);
    let _first = primed.subscribe();
    let stale = handles.lock()[0].clone();
    stale.disconnect();
    let _second = primed.subscribe();

    // Act
    stale.disconnect();

    // Assert
    assert!(primed.is_connected());
    assert_eq!(source.stop_count(), 1);
    assert_eq!(source.active_connections(), 1);
}

#[tokio::test]
async fn test_prime_dropping_subscribers_keeps_connection() -> anyhow::Result<()> {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    let (primed, _handles) = primed_with_handles(&source);
    let first = primed.subscribe();

    // Act
    drop(first);
    let mut late = primed.subscribe();
    source.emit(9);

    // Assert
    assert_eq!(source.stop_count(), 0);
    assert_eq!(source.connect_count(), 1);
    assert_eq!(unwrap_stream(&mut late, 500).await.unwrap(), 9);

    Ok(())
}

#[tokio::test]
async fn test_prime_connect_failure_is_reported_and_retried() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    source.fail_next_connects(1);
    let (primed, handles) = primed_with_handles(&source);

    // Act
    let mut failed = primed.subscribe();

    // Assert
    assert!(matches!(
        unwrap_stream(&mut failed, 500).await,
        StreamItem::Error(PrimerError::ConnectionError { .. })
    ));
    assert_stream_ended(&mut failed, 500).await;
    assert!(!primed.is_connected());
    assert!(handles.lock().is_empty());

    let mut retried = primed.subscribe();
    assert!(primed.is_connected());
    assert_eq!(source.connect_count(), 1);
    assert_eq!(handles.lock().len(), 1);
    assert_no_element_emitted(&mut retried, 100).await;
}

#[tokio::test]
async fn test_prime_connect_panic_is_reported_and_retried() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    source.panic_next_connects(1);
    let (primed, handles) = primed_with_handles(&source);

    // Act
    let mut failed = primed.subscribe();

    // Assert
    assert!(matches!(
        unwrap_stream(&mut failed, 500).await,
        StreamItem::Error(PrimerError::CallbackPanic { ref context })
            if context == "connect exploded"
    ));
    assert_stream_ended(&mut failed, 500).await;
    assert!(!primed.is_connected());
    assert!(handles.lock().is_empty());

    let _retried = primed.subscribe();
    assert!(primed.is_connected());
    assert_eq!(source.connect_count(), 1);
    assert_eq!(handles.lock().len(), 1);
}

#[tokio::test]
async fn test_prime_subscriber_receives_items_from_the_first_one() {
    // Arrange
    let cold = source_fn(|| stream::iter(vec![1, 2, 3]).map(StreamItem::Value).boxed());
    let published = Publish::new(cold, Arc::new(TokioScheduler::new()));
    let primed = published.prime(|_disconnect| {});

    // Act
    let values: Vec<_> = primed.subscribe().collect().await;

    // Assert
    assert_eq!(
        values,
        vec![
            StreamItem::Value(1),
            StreamItem::Value(2),
            StreamItem::Value(3)
        ]
    );
}

#[tokio::test]
async fn test_prime_disconnect_from_callback_is_safe() {
    // Arrange
    let source = Arc::new(CountingConnectable::<i32>::new());
    let primed = prime(Arc::clone(&source), |disconnect: Disconnect| disconnect.disconnect());

    // Act
    let _subscriber = primed.subscribe();

    // Assert
    assert_eq!(source.connect_count(), 1);
    assert_eq!(source.stop_count(), 1);
    assert!(!primed.is_connected());
}
