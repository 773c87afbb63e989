//! Wall clock port

use chrono::{DateTime, Local};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The system's local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::sync::Arc<parking_lot::Mutex<DateTime<Local>>>,
}

#[cfg(any(test, feature = "test-util"))]
impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: std::sync::Arc::new(parking_lot::Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
