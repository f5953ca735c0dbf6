use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token-bucket pacing for outgoing provider requests.
///
/// Clones share one bucket, so every request issued through a provider draws
/// from the same budget regardless of which batch spawned it.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Arc<DirectRateLimiter>,
    per_second: NonZeroU32,
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("per_second", &self.per_second)
            .finish_non_exhaustive()
    }
}

impl RequestPacer {
    /// Allow `per_second` requests per second with an equal burst. Zero is
    /// treated as one.
    pub fn new(per_second: u32) -> Self {
        let per_second = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        Self::with_burst(per_second, per_second)
    }

    pub fn with_burst(per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        let quota = Quota::per_second(per_second).allow_burst(burst);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            per_second,
        }
    }

    pub fn per_second(&self) -> u32 {
        self.per_second.get()
    }

    /// Wait until one request of budget is available, then consume it.
    pub async fn ready(&self) {
        self.limiter.until_ready().await;
    }

    /// Consume one request of budget if available right now.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_exhausted_then_rejected() {
        let pacer = RequestPacer::new(2);

        assert!(pacer.try_acquire());
        assert!(pacer.try_acquire());
        assert!(!pacer.try_acquire());
    }

    #[test]
    fn clones_share_one_budget() {
        let pacer = RequestPacer::new(1);
        let other = pacer.clone();

        assert!(pacer.try_acquire());
        assert!(!other.try_acquire());
    }

    #[test]
    fn zero_rate_is_clamped_to_one() {
        assert_eq!(RequestPacer::new(0).per_second(), 1);
    }

    #[tokio::test]
    async fn ready_returns_immediately_with_budget() {
        let pacer = RequestPacer::new(5);
        pacer.ready().await;
        assert!(pacer.try_acquire());
    }
}
