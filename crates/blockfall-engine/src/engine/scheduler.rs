use std::time::Duration;

/// Timer driving gravity ticks.
///
/// The game arms the scheduler when play starts or resumes, re-arms it when
/// the gravity interval changes, and disarms it on pause, reset and game over.
/// The host calls [`Game::tick`](super::Game::tick) whenever the armed
/// interval elapses.
pub trait GravityScheduler {
    /// Schedules the next tick `interval` from now, replacing any pending one.
    fn arm(&mut self, interval: Duration);

    /// Cancels any pending tick.
    fn disarm(&mut self);
}

/// Deterministic gravity timer advanced by the host's clock.
///
/// Elapsed time is accumulated with [`Self::advance`]; each full period that
/// has passed yields one due tick. Re-arming starts a fresh wait with the new
/// period and drops any partial progress towards the old one.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GravityScheduler as _, TickTimer};
///
/// let mut timer = TickTimer::new();
/// timer.arm(Duration::from_secs(1));
/// timer.advance(Duration::from_millis(2500));
///
/// assert!(timer.take_due_tick());
/// assert!(timer.take_due_tick());
/// assert!(!timer.take_due_tick());
/// assert_eq!(timer.until_next_tick(), Some(Duration::from_millis(500)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickTimer {
    period: Option<Duration>,
    elapsed: Duration,
}

impl TickTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            period: None,
            elapsed: Duration::ZERO,
        }
    }

    /// The armed period, or `None` while disarmed.
    #[must_use]
    pub const fn period(&self) -> Option<Duration> {
        self.period
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.period.is_some()
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn until_next_tick(&self) -> Option<Duration> {
        self.period
            .map(|period| period.saturating_sub(self.elapsed))
    }

    /// Accumulates elapsed time. Ignored while disarmed.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.period.is_some() {
            self.elapsed = self.elapsed.saturating_add(elapsed);
        }
    }

    /// Consumes one due tick, if a full period has elapsed.
    pub fn take_due_tick(&mut self) -> bool {
        match self.period {
            Some(period) if self.elapsed >= period => {
                self.elapsed -= period;
                true
            }
            _ => false,
        }
    }
}

impl GravityScheduler for TickTimer {
    fn arm(&mut self, interval: Duration) {
        self.period = Some(interval);
        self.elapsed = Duration::ZERO;
    }

    fn disarm(&mut self) {
        self.period = None;
        self.elapsed = Duration::ZERO;
    }
}
