use std::time::{Duration, Instant};

/// Recurring, cooperative timer.
/// It never fires on its own: the owner polls it and performs the work of a tick when it is due.
#[derive(Debug, Clone)]
pub struct Timer {
    interval: Duration,
    /// Moment of the next tick, `None` while disarmed
    next_tick: Option<Instant>,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Timer {
            interval,
            next_tick: None,
        }
    }

    /// Arms the timer, the first tick is due one interval from now. Restarts an armed timer.
    pub fn start(&mut self) {
        self.next_tick = Some(Instant::now() + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consumes a due tick and schedules the next one.
    /// Ticks missed because of a late poll are not made up for.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(tick) if now >= tick => {
                self.next_tick = Some(Instant::max(tick + self.interval, now));
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, `None` while disarmed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|tick| tick.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_toggle_the_state() {
        let mut timer = Timer::new(Duration::from_millis(100));
        assert!(!timer.is_active());
        timer.stop();
        assert!(!timer.is_active());
        timer.start();
        assert!(timer.is_active());
        timer.start();
        assert!(timer.is_active());
        timer.stop();
        assert!(!timer.is_active());
    }

    #[test]
    fn fires_once_per_due_tick() {
        let mut timer = Timer::new(Duration::from_millis(100));
        timer.start();
        let now = Instant::now();
        assert!(!timer.fire(now));
        let later = now + Duration::from_millis(150);
        assert!(timer.fire(later));
        assert!(!timer.fire(later));
        assert!(timer.fire(later + Duration::from_millis(100)));
    }

    #[test]
    fn disarmed_timer_never_fires() {
        let mut timer = Timer::new(Duration::from_millis(10));
        assert!(!timer.fire(Instant::now() + Duration::from_secs(1)));
        assert_eq!(timer.remaining(Instant::now()), None);
    }

    #[test]
    fn remaining_time_is_bounded_by_the_interval() {
        let mut timer = Timer::new(Duration::from_millis(100));
        timer.start();
        let remaining = timer.remaining(Instant::now()).unwrap();
        assert!(remaining <= Duration::from_millis(100));
    }
}
