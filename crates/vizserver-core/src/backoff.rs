use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

pub const MIN_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_INTERVAL: Duration = Duration::from_secs(30);
pub const GROWTH_FACTOR: f64 = 1.4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackoffError {
    #[error("timed out after {elapsed:?} waiting for asynchronous event (limit {timeout:?})")]
    TimeoutExceeded { elapsed: Duration, timeout: Duration },
}

/// Source of "now" and of blocking sleeps for [`BackoffTimer`].
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock. `sleep` returns immediately, advances virtual time and
/// records the requested duration.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Moves virtual time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

/// Geometric backoff between polls of an asynchronous server operation.
///
/// The interval starts at [`MIN_INTERVAL`] and grows by [`GROWTH_FACTOR`]
/// after every wait. Each sleep is clamped to [`MAX_INTERVAL`] and, when a
/// timeout is set, to the time remaining before the deadline. The remaining
/// time clamp never goes below [`MIN_INTERVAL`], so the final sleep may end
/// up to one minimum interval past the deadline; the following call then
/// reports [`BackoffError::TimeoutExceeded`].
#[derive(Debug)]
pub struct BackoffTimer<C: Clock = SystemClock> {
    clock: C,
    start: Instant,
    timeout: Option<Duration>,
    current_interval: f64,
}

impl BackoffTimer<SystemClock> {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::with_clock(timeout, SystemClock)
    }
}

impl<C: Clock> BackoffTimer<C> {
    pub fn with_clock(timeout: Option<Duration>, clock: C) -> Self {
        let start = clock.now();
        Self {
            clock,
            start,
            timeout,
            current_interval: MIN_INTERVAL.as_secs_f64(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start)
    }

    /// Unclamped interval, in seconds, that the next wait starts from.
    pub fn current_interval_secs(&self) -> f64 {
        self.current_interval
    }

    /// Sleeps for the next backoff interval and returns how long it slept.
    pub fn wait_once(&mut self) -> Result<Duration, BackoffError> {
        let ceiling = self.ceiling()?;
        let sleep = if self.current_interval >= ceiling.as_secs_f64() {
            ceiling
        } else {
            Duration::from_secs_f64(self.current_interval)
        };
        debug!(
            sleep_ms = sleep.as_millis() as u64,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "backoff wait"
        );
        self.clock.sleep(sleep);
        self.current_interval *= GROWTH_FACTOR;
        Ok(sleep)
    }

    fn ceiling(&self) -> Result<Duration, BackoffError> {
        let Some(timeout) = self.timeout else {
            return Ok(MAX_INTERVAL);
        };
        let elapsed = self.elapsed();
        if elapsed >= timeout {
            return Err(BackoffError::TimeoutExceeded { elapsed, timeout });
        }
        let remaining = timeout - elapsed;
        Ok(remaining.min(MAX_INTERVAL).max(MIN_INTERVAL))
    }
}
