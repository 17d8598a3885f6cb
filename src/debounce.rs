//! Search-input debouncing.
//!
//! Typed search terms are held back until the input has been quiet for the
//! configured period, so the view-model is not re-derived on every
//! keystroke. Timing only; the settled result is identical to applying the
//! final term directly. The frame loop polls [`Debouncer::poll_at`] once
//! per frame with its own clock, which keeps the type testable.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record a new input state; restarts the quiet period.
    pub fn input(&mut self, term: &str, now: Instant) {
        self.pending = Some((term.to_string(), now));
    }

    /// The settled term, once the quiet period has elapsed since the last
    /// input. Returns None while still waiting (or when nothing is pending).
    pub fn poll_at(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, last)) if now.duration_since(*last) >= self.quiet => {
                self.pending.take().map(|(term, _)| term)
            }
            _ => None,
        }
    }

    /// Bypass the quiet period and take the pending term immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(term, _)| term)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_is_held_until_the_quiet_period_elapses() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let t0 = Instant::now();

        debouncer.input("a", t0);
        assert_eq!(debouncer.poll_at(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            debouncer.poll_at(t0 + Duration::from_millis(300)),
            Some("a".to_string())
        );
        // Taken exactly once.
        assert_eq!(debouncer.poll_at(t0 + Duration::from_millis(400)), None);
    }

    #[test]
    fn further_keystrokes_restart_the_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let t0 = Instant::now();

        debouncer.input("a", t0);
        debouncer.input("ap", t0 + Duration::from_millis(200));
        // 300ms after the first keystroke, but only 100ms after the second.
        assert_eq!(debouncer.poll_at(t0 + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.poll_at(t0 + Duration::from_millis(500)),
            Some("ap".to_string())
        );
    }

    #[test]
    fn flush_takes_the_pending_term_immediately() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.input("ape", Instant::now());
        assert_eq!(debouncer.flush(), Some("ape".to_string()));
        assert!(!debouncer.is_pending());
    }
}
