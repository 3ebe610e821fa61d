use std::time::{Duration, Instant};

/// Holds the latest scheduled value until `delay` has passed without a
/// newer one replacing it.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the timer from `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Takes the pending value once its deadline has been reached.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn fires_only_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("cvs", start);

        assert_eq!(debouncer.fire_if_due(start + Duration::from_millis(499)), None);
        assert_eq!(debouncer.fire_if_due(start + DELAY), Some("cvs"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.fire_if_due(start + DELAY * 2), None);
    }

    #[test]
    fn reschedule_restarts_timer_and_keeps_latest() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("c", start);
        debouncer.schedule("cv", start + Duration::from_millis(300));

        assert_eq!(debouncer.fire_if_due(start + DELAY), None);
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(800))
        );
        assert_eq!(
            debouncer.fire_if_due(start + Duration::from_millis(800)),
            Some("cv")
        );
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(1, start);
        debouncer.cancel();

        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.fire_if_due(start + DELAY), None);
    }
}
