use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of "now" for all clock decisions. Services read it exactly
/// once per operation; callers never supply elapsed or remaining time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The host clock is assumed monotonic within a
/// process; the clock arithmetic clamps backwards steps to zero
/// elapsed rather than crediting time.
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-cranked time source for deterministic tests.
pub struct ManualTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualTimeSource {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("time source mutex poisoned") = now;
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("time source mutex poisoned");
        *now += delta;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("time source mutex poisoned")
    }
}
