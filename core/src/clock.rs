// Time source for mark, document and version timestamps.

use std::cell::Cell;
use std::sync::atomic::{AtomicI64, Ordering};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub trait Clock {
    fn now_millis(&self) -> Timestamp;
}

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// Wall clock that never returns the same millisecond twice within a process,
/// so timestamps can be used as a sort key.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Timestamp {
        let wall = chrono::Utc::now().timestamp_millis();
        let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
        loop {
            let next = if wall > last { wall } else { last + 1 };
            match LAST_TIMESTAMP.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

/// A clock that only moves when told to. Used by tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Timestamp {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_strictly_increasing() {
        let clock = SystemClock;
        let mut previous = clock.now_millis();
        for _ in 0..1000 {
            let next = clock.now_millis();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_millis(), 100);
        clock.advance(50);
        assert_eq!(clock.now_millis(), 150);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }
}
