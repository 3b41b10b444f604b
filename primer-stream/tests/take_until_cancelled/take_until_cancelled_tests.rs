// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use primer_core::CancellationToken;
use primer_stream::TakeUntilCancelledExt;
use primer_test_utils::{assert_stream_ended, test_channel, unwrap_stream};
use std::time::Duration;

#[tokio::test]
async fn test_take_until_cancelled_stops_delivery_after_cancel() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let (tx, stream) = test_channel::<i32>();
    let mut stream = stream.take_until_cancelled(&token);

    tx.send(1)?;
    assert_eq!(unwrap_stream(&mut stream, 500).await.unwrap(), 1);

    // Act
    token.cancel();
    tx.send(2)?;

    // Assert
    assert_stream_ended(&mut stream, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_take_until_cancelled_already_cancelled_token_ends_immediately() -> anyhow::Result<()>
{
    // Arrange
    let token = CancellationToken::new();
    token.cancel();
    let (tx, stream) = test_channel::<i32>();

    // Act
    tx.send(1)?;
    let mut stream = stream.take_until_cancelled(&token);

    // Assert
    assert_stream_ended(&mut stream, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_take_until_cancelled_wakes_pending_consumer() {
    // Arrange
    let token = CancellationToken::new();
    let (_tx, stream) = test_channel::<i32>();
    let mut stream = stream.take_until_cancelled(&token);

    // Act
    tokio::spawn({
        let token = token.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        }
    });

    // Assert
    assert_stream_ended(&mut stream, 1000).await;
}
