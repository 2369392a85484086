//! Periodic eviction of idle coach conversations.

use std::sync::Arc;
use std::time::Duration;

use ironquest_coach::ConversationRegistry;
use tokio_util::sync::CancellationToken;

/// Shortest pause between sweeps.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// How often to sweep for a given idle timeout.
pub fn sweep_interval(idle_timeout: Duration) -> Duration {
    (idle_timeout / 2).max(MIN_SWEEP_INTERVAL)
}

/// Drop conversations idle for `idle_timeout` until `cancel` fires.
pub async fn run(
    registry: Arc<ConversationRegistry>,
    idle_timeout: Duration,
    cancel: CancellationToken,
) {
    let every = sweep_interval(idle_timeout);
    tracing::info!(
        idle_secs = idle_timeout.as_secs(),
        interval_secs = every.as_secs(),
        "Coach sweep started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Coach sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = registry.prune_idle(idle_timeout).await;
                if evicted > 0 {
                    tracing::debug!(evicted, "Evicted idle coach conversations");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_half_the_timeout_with_a_floor() {
        assert_eq!(sweep_interval(Duration::from_secs(3600)), Duration::from_secs(1800));
        assert_eq!(sweep_interval(Duration::from_secs(10)), MIN_SWEEP_INTERVAL);
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let registry = Arc::new(ConversationRegistry::new());
        registry.snapshot(1).await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(Arc::clone(&registry), Duration::ZERO, cancel.clone()));

        // The first tick fires immediately and sweeps the idle slot.
        tokio::time::timeout(Duration::from_secs(5), async {
            while registry.slot_count().await > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
