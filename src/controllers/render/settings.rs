use std::time::Duration;

pub const DEFAULT_FRAME_QUEUE_DEPTH: usize = 64;

/// What the controller does when a session fails mid-render.
///
/// Retries reopen the same descriptor; a new render always starts from a
/// fresh budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: Self = Self {
        max_retries: 0,
        backoff: Duration::ZERO,
    };

    #[must_use]
    pub fn bounded(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before retry number `attempt` (1-based), or `None` once the
    /// budget is spent.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }

        Some(self.backoff.saturating_mul(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub retry: RetryPolicy,
    /// Closes a session that goes this long without an event. `None` waits
    /// forever.
    pub idle_timeout: Option<Duration>,
    /// Decoded frames buffered between the worker and the controller.
    pub frame_queue_depth: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            idle_timeout: None,
            frame_queue_depth: DEFAULT_FRAME_QUEUE_DEPTH,
        }
    }
}
