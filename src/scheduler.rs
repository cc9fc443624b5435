use std::time::{Duration, Instant};

/// One scheduled periodic timer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Timer {
    interval: Duration,
    next_due: Instant,
}

/// Owns at most one periodic tick source.
///
/// Time is passed in by the caller, which keeps the scheduler deterministic
/// under test and lets the main loop sleep exactly until the next tick.
#[derive(Debug, Default)]
pub struct TickScheduler {
    timer: Option<Timer>,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any existing timer, then schedules a new one firing every
    /// `interval` starting one interval after `now`.
    pub fn schedule(&mut self, interval: Duration, now: Instant) {
        self.cancel();
        self.timer = Some(Timer {
            interval,
            next_due: now + interval,
        });
    }

    /// Stops ticking. Does nothing when no timer is active.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Interval of the active timer.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.timer.map(|timer| timer.interval)
    }

    /// Time left until the next tick, zero when one is already due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.timer
            .map(|timer| timer.next_due.saturating_duration_since(now))
    }

    /// Consumes one due tick, returning true when the callback should run.
    ///
    /// Ticks missed by more than a full interval are dropped rather than
    /// replayed in a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };

        if now < timer.next_due {
            return false;
        }

        timer.next_due += timer.interval;
        if timer.next_due <= now {
            timer.next_due = now + timer.interval;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::TickScheduler;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn fires_once_per_interval() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(INTERVAL, start);

        assert!(!scheduler.poll(start + Duration::from_millis(99)));
        assert!(scheduler.poll(start + INTERVAL));
        assert!(!scheduler.poll(start + INTERVAL));
        assert!(scheduler.poll(start + INTERVAL * 2));
    }

    #[test]
    fn rescheduling_replaces_the_existing_timer() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(INTERVAL, start);
        scheduler.schedule(Duration::from_millis(40), start);

        assert_eq!(scheduler.interval(), Some(Duration::from_millis(40)));

        // Only one tick source: a 40ms timer fires twice in 80ms, never more.
        let fired = (1..=80)
            .filter(|ms| scheduler.poll(start + Duration::from_millis(*ms)))
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn cancelled_scheduler_never_fires() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(INTERVAL, start);
        scheduler.cancel();

        assert!(!scheduler.is_active());
        assert!(!scheduler.poll(start + INTERVAL * 5));
        assert_eq!(scheduler.time_until_due(start), None);
    }

    #[test]
    fn long_stalls_do_not_burst() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(INTERVAL, start);

        let late = start + INTERVAL * 10;
        assert!(scheduler.poll(late));
        assert!(!scheduler.poll(late));
        assert_eq!(scheduler.time_until_due(late), Some(INTERVAL));
    }
}
