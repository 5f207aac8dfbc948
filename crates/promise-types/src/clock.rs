use chrono::{DateTime, Utc};

/// Abstracts "now" so tests can drive the implicit-timeout rule deterministically
/// (see the Reference Model's time-driven timeout transition) without sleeping
/// on wall-clock time. Production code uses `SystemClock`; tests use `FixedClock`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always returns the same instant, and can be advanced between
/// assertions. Used by model tests that need to cross a promise's `timeout`
/// without a real sleep (see scenario S5 in the harness's test suite).
#[derive(Clone, Debug)]
pub struct FixedClock {
    now: std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::Mutex::new(now)),
        }
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.now.lock().expect("FixedClock mutex poisoned");
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("FixedClock mutex poisoned")
    }
}
