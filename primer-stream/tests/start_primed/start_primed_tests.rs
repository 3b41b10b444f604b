// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use primer_core::{PrimerError, ScheduledWork, Scheduler, StreamItem, TokioScheduler};
use primer_stream::{start_primed, start_primed_async};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn tokio_scheduler() -> Arc<dyn Scheduler> {
    Arc::new(TokioScheduler::new())
}

/// Scheduler that discards work without running it.
struct DroppingScheduler;

impl Scheduler for DroppingScheduler {
    fn schedule(&self, work: ScheduledWork) {
        drop(work);
    }
}

#[tokio::test]
async fn test_start_primed_is_lazy() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));

    // Act
    let primed = start_primed(
        {
            let runs = Arc::clone(&runs);
            move || {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok::<_, PrimerError>(1)
            }
        },
        tokio_scheduler(),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Assert
    assert!(!primed.is_started());
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_start_primed_concurrent_subscribers_share_one_run() -> anyhow::Result<()> {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let primed = start_primed(
        {
            let runs = Arc::clone(&runs);
            move || {
                runs.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                Ok::<_, PrimerError>(42)
            }
        },
        tokio_scheduler(),
    );

    // Act
    let subscribers: Vec<_> = (0..10)
        .map(|_| {
            let primed = primed.clone();
            tokio::spawn(async move { primed.subscribe().collect::<Vec<_>>().await })
        })
        .collect();
    let mut outcomes = Vec::new();
    for subscriber in subscribers {
        outcomes.push(subscriber.await?);
    }

    // Assert
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(primed.is_started());
    for outcome in outcomes {
        assert_eq!(outcome, vec![StreamItem::Value(42)]);
    }

    Ok(())
}

#[tokio::test]
async fn test_start_primed_late_subscriber_replays_outcome() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let primed = start_primed(
        {
            let runs = Arc::clone(&runs);
            move || {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok::<_, PrimerError>("warm".to_string())
            }
        },
        tokio_scheduler(),
    );
    let first: Vec<_> = primed.subscribe().collect().await;

    // Act
    let late: Vec<_> = primed.subscribe().collect().await;

    // Assert
    assert_eq!(first, vec![StreamItem::Value("warm".to_string())]);
    assert_eq!(late, first);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_start_primed_error_reaches_every_subscriber() {
    // Arrange
    let primed = start_primed(
        || Err::<i32, _>(PrimerError::stream_error("warm-up failed")),
        tokio_scheduler(),
    );

    // Act
    let first: Vec<_> = primed.subscribe().collect().await;
    let second: Vec<_> = primed.subscribe().collect().await;

    // Assert
    for outcome in [first, second] {
        assert_eq!(outcome.len(), 1);
        assert!(matches!(
            &outcome[0],
            StreamItem::Error(PrimerError::StreamProcessingError { context })
                if context == "warm-up failed"
        ));
    }
}

#[tokio::test]
async fn test_start_primed_panic_is_reported_as_error() {
    // Arrange
    let primed = start_primed(
        || -> Result<i32, PrimerError> { panic!("warm-up exploded") },
        tokio_scheduler(),
    );

    // Act
    let outcome: Vec<_> = primed.subscribe().collect().await;

    // Assert
    assert!(matches!(
        &outcome[..],
        [StreamItem::Error(PrimerError::CallbackPanic { context })]
            if context.contains("warm-up exploded")
    ));
}

#[tokio::test]
async fn test_start_primed_unit_action_completes() {
    // Arrange
    let primed = start_primed(|| Ok::<(), PrimerError>(()), tokio_scheduler());

    // Act
    let outcome: Vec<_> = primed.subscribe().collect().await;

    // Assert
    assert_eq!(outcome, vec![StreamItem::Value(())]);
}

#[tokio::test]
async fn test_start_primed_dropped_work_reports_cancellation() {
    // Arrange
    let primed = start_primed(|| Ok::<_, PrimerError>(1), Arc::new(DroppingScheduler));

    // Act
    let outcome: Vec<_> = primed.subscribe().collect().await;

    // Assert
    assert!(matches!(
        &outcome[..],
        [StreamItem::Error(PrimerError::Cancelled { .. })]
    ));
}

#[tokio::test]
async fn test_start_primed_async_runs_once() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let primed = start_primed_async(
        {
            let runs = Arc::clone(&runs);
            move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok::<_, PrimerError>(vec![1, 2, 3])
            }
        },
        tokio_scheduler(),
    );

    // Act
    let mut first = primed.subscribe();
    let mut second = primed.subscribe();

    // Assert
    assert_eq!(first.next().await, Some(StreamItem::Value(vec![1, 2, 3])));
    assert_eq!(second.next().await, Some(StreamItem::Value(vec![1, 2, 3])));
    assert_eq!(first.next().await, None);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_start_primed_dropped_subscriber_does_not_affect_others() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let primed = start_primed_async(
        {
            let runs = Arc::clone(&runs);
            move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, PrimerError>(7)
            }
        },
        tokio_scheduler(),
    );
    let dropped = primed.subscribe();
    let mut kept = primed.subscribe();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Act
    drop(dropped);

    // Assert
    assert_eq!(kept.next().await, Some(StreamItem::Value(7)));
    assert_eq!(kept.next().await, None);

    let late: Vec<_> = primed.subscribe().collect().await;
    assert_eq!(late, vec![StreamItem::Value(7)]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
