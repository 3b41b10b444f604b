// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use primer_core::{Either, PrimerError, StreamItem};
use primer_stream::{combine_latest_either, CombineLatestEitherExt};
use primer_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, test_channel_with_errors,
    unwrap_stream, unwrap_value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn concat(n: &i32, s: &&'static str) -> String {
    format!("{s}{n}")
}

#[tokio::test]
async fn test_combine_latest_either_waits_for_both_channels() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Either<i32, &'static str>>();
    let mut joined = stream.combine_latest_either(concat);

    // Act
    tx.send(Either::Left(1))?;
    tx.send(Either::Left(2))?;

    // Assert
    assert_no_element_emitted(&mut joined, 100).await;

    tx.send(Either::Right("a"))?;
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), "a2");

    tx.send(Either::Left(3))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut joined, 500).await)), "a3");

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_either_emits_once_per_event_in_a_burst() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Either<i32, &'static str>>();
    let mut joined = stream.combine_latest_either(concat);

    tx.send(Either::Left(7))?;
    tx.send(Either::Right("a"))?;
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), "a7");

    // Act
    tx.send(Either::Right("b"))?;
    tx.send(Either::Right("c"))?;
    tx.send(Either::Left(8))?;

    // Assert
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), "b7");
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), "c7");
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), "c8");

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_either_completes_without_output_when_one_channel_is_silent(
) -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Either<i32, &'static str>>();
    let mut joined = stream.combine_latest_either(concat);

    // Act
    tx.send(Either::Left(1))?;
    tx.send(Either::Left(2))?;
    drop(tx);

    // Assert
    assert_stream_ended(&mut joined, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_either_forwards_error_and_ends() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<Either<i32, &'static str>>();
    let mut joined = stream.combine_latest_either(concat);

    tx.send(StreamItem::Value(Either::Left(1)))?;
    tx.send(StreamItem::Value(Either::Right("a")))?;
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), "a1");

    // Act
    tx.send(StreamItem::Error(PrimerError::stream_error("source failed")))?;
    tx.send(StreamItem::Value(Either::Left(2)))?;

    // Assert
    assert!(matches!(
        unwrap_stream(&mut joined, 500).await,
        StreamItem::Error(PrimerError::StreamProcessingError { .. })
    ));
    assert_stream_ended(&mut joined, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_either_error_before_both_channels_is_forwarded() -> anyhow::Result<()>
{
    // Arrange
    let (tx, stream) = test_channel_with_errors::<Either<i32, &'static str>>();
    let mut joined = stream.combine_latest_either(concat);

    // Act
    tx.send(StreamItem::Value(Either::Left(1)))?;
    tx.send(StreamItem::Error(PrimerError::stream_error("early failure")))?;

    // Assert
    assert!(unwrap_stream(&mut joined, 500).await.is_error());
    assert_stream_ended(&mut joined, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_either_free_function_skips_selector_until_complete(
) -> anyhow::Result<()> {
    // Arrange
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, stream) = test_channel::<Either<u32, u32>>();
    let mut joined = combine_latest_either(stream, {
        let calls = Arc::clone(&calls);
        move |left: &u32, right: &u32| {
            calls.fetch_add(1, Ordering::SeqCst);
            left * right
        }
    });

    // Act
    tx.send(Either::Right(10))?;
    tx.send(Either::Right(20))?;
    assert_no_element_emitted(&mut joined, 100).await;
    tx.send(Either::Left(3))?;

    // Assert
    assert_eq!(unwrap_stream(&mut joined, 500).await.unwrap(), 60);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    Ok(())
}
