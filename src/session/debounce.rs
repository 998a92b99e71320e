use std::time::{Duration, Instant};

/// Coalesces rapid edits: only a value left untouched for `delay` is released.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record an edit, restarting the delay.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the settled value, if the delay has passed since the last edit.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, at)) if now.saturating_duration_since(at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));
        debouncer.push("te", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(999)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(1000)), Some("te"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(3000)), None);
    }

    #[test]
    fn test_each_edit_resets_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));
        debouncer.push("a", start);
        debouncer.push("ab", start + Duration::from_millis(600));
        debouncer.push("abc", start + Duration::from_millis(1200));
        assert_eq!(debouncer.poll(start + Duration::from_millis(1800)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(2200)),
            Some("abc")
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.push(1, start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }
}
