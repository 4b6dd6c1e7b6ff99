use std::num::NonZeroU32;
use std::time::Duration;

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};

use crate::error::{AppError, AppResult};

/// Request budget for an upstream API: `max_requests` per `window`
///
/// A full burst is available up front; slots then refill one every
/// `window / max_requests`. Owned by the provider that makes the calls.
pub struct RequestBudget<C: Clock = DefaultClock> {
    limiter: RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<C::Instant>>,
    max_requests: u32,
    window: Duration,
}

impl RequestBudget {
    pub fn new(max_requests: u32, window: Duration) -> AppResult<Self> {
        Self::with_clock(max_requests, window, DefaultClock::default())
    }
}

impl<C: Clock> RequestBudget<C> {
    pub fn with_clock(max_requests: u32, window: Duration, clock: C) -> AppResult<Self> {
        let burst = NonZeroU32::new(max_requests).ok_or_else(|| {
            AppError::InvalidInput("remote rate limit must be at least 1".to_string())
        })?;
        let quota = Quota::with_period(window / max_requests)
            .ok_or_else(|| {
                AppError::InvalidInput("remote rate window must be non-zero".to_string())
            })?
            .allow_burst(burst);

        Ok(Self {
            limiter: RateLimiter::direct_with_clock(quota, clock),
            max_requests,
            window,
        })
    }

    /// Claims one request slot, or fails if the budget is spent
    pub fn try_acquire(&self) -> AppResult<()> {
        self.limiter.check().map_err(|_| {
            tracing::warn!(
                limit = self.max_requests,
                window_secs = self.window.as_secs(),
                "Remote request budget exhausted"
            );
            AppError::ExternalApi("Remote catalog rate limit reached".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::clock::FakeRelativeClock;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_allows_full_burst_then_refuses() {
        let clock = FakeRelativeClock::default();
        let budget = RequestBudget::with_clock(3, Duration::from_secs(9), clock).unwrap();

        assert_ok!(budget.try_acquire());
        assert_ok!(budget.try_acquire());
        assert_ok!(budget.try_acquire());
        assert_err!(budget.try_acquire());
    }

    #[test]
    fn test_slots_refill_over_the_window() {
        let clock = FakeRelativeClock::default();
        let budget = RequestBudget::with_clock(2, Duration::from_secs(10), clock.clone()).unwrap();

        assert_ok!(budget.try_acquire());
        assert_ok!(budget.try_acquire());
        assert_err!(budget.try_acquire());

        // One slot per window / max
        clock.advance(Duration::from_secs(5));
        assert_ok!(budget.try_acquire());
        assert_err!(budget.try_acquire());

        clock.advance(Duration::from_secs(10));
        assert_ok!(budget.try_acquire());
        assert_ok!(budget.try_acquire());
        assert_err!(budget.try_acquire());
    }

    #[test]
    fn test_exhausted_budget_is_external_api_error() {
        let budget =
            RequestBudget::with_clock(1, Duration::from_secs(1), FakeRelativeClock::default())
                .unwrap();
        assert_ok!(budget.try_acquire());

        let err = budget.try_acquire().unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[test]
    fn test_zero_limit_or_window_is_rejected() {
        assert!(matches!(
            RequestBudget::new(0, Duration::from_secs(10)),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            RequestBudget::new(40, Duration::ZERO),
            Err(AppError::InvalidInput(_))
        ));
    }
}
