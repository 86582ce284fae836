//! Debounce-by-rejection gate for interaction events.

use std::time::Duration;

/// Default window for placement clicks.
pub const PLACEMENT_DEBOUNCE: Duration = Duration::from_millis(200);
/// Default window for area corner clicks.
pub const AREA_DEBOUNCE: Duration = Duration::from_millis(300);

/// Drops an event arriving within `window` of the last admitted one.
///
/// Timestamps are caller-supplied offsets from any fixed origin, so the
/// debouncer can be driven by a real clock, touch events, or synthetic test
/// events alike. Rejected events are dropped entirely; nothing is queued.
///
/// # Examples
///
/// ```
/// //! Debounce-by-rejection gate for interaction events.
///
/// use std::time::Duration;
/// use windlytics::interaction::debounce::ClickDebouncer;
///
/// let mut gate = ClickDebouncer::new(Duration::from_millis(300));
/// assert!(gate.admit(Duration::from_millis(1_000)));
/// assert!(!gate.admit(Duration::from_millis(1_100)));
/// assert!(gate.admit(Duration::from_millis(1_300)));
/// ```
#[derive(Debug, Clone)]
pub struct ClickDebouncer {
    /// Minimum spacing between admitted events.
    window: Duration,
    /// Timestamp of the last admitted event, `None` before the first.
    last_event: Option<Duration>,
}

impl ClickDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admits the event at `now` iff at least `window` has elapsed since the
    /// last admitted event.
    ///
    /// A timestamp earlier than the last admitted one is rejected.
    pub fn admit(&mut self, now: Duration) -> bool {
        let admitted = match self.last_event {
            None => true,
            Some(last) => now.checked_sub(last).is_some_and(|gap| gap >= self.window),
        };
        if admitted {
            self.last_event = Some(now);
        }
        admitted
    }

    /// Forgets the last admitted event.
    pub fn reset(&mut self) {
        self.last_event = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_event_is_always_admitted() {
        let mut gate = ClickDebouncer::new(AREA_DEBOUNCE);
        assert!(gate.admit(ms(0)));
    }

    #[test]
    fn rejects_inside_window_and_admits_at_boundary() {
        let mut gate = ClickDebouncer::new(PLACEMENT_DEBOUNCE);
        assert!(gate.admit(ms(500)));
        assert!(!gate.admit(ms(699)));
        assert!(gate.admit(ms(700)));
    }

    #[test]
    fn rejected_event_does_not_extend_window() {
        let mut gate = ClickDebouncer::new(ms(300));
        assert!(gate.admit(ms(0)));
        assert!(!gate.admit(ms(250)));
        // Measured from the admitted event at 0, not the rejected one at 250.
        assert!(gate.admit(ms(300)));
    }

    #[test]
    fn out_of_order_timestamp_is_rejected() {
        let mut gate = ClickDebouncer::new(ms(300));
        assert!(gate.admit(ms(1_000)));
        assert!(!gate.admit(ms(10)));
    }

    #[test]
    fn reset_readmits_immediately() {
        let mut gate = ClickDebouncer::new(ms(300));
        assert!(gate.admit(ms(100)));
        gate.reset();
        assert!(gate.admit(ms(101)));
    }
}
