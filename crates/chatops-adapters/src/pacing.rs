//! Pacing between consecutive chunks of one notification.
//!
//! Chat backends throttle bursts, so chunks of a long message are spaced out.
//! The wait goes through `Pacer` so tests can observe it without sleeping.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends a delivery task between two sends.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, interval: Duration);
}

/// Production pacer backed by `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, interval: Duration) {
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }
}
