use chrono::{DateTime, Utc};

/// Wall-clock source for `last_seen` bookkeeping. Injected so tests can
/// pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests: starts at a known instant and only
/// moves when a test advances it.
#[cfg(test)]
pub(crate) struct TestClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl TestClock {
    pub fn advance(&self, seconds: i64) {
        let mut now = self.0.lock().unwrap();
        *now += chrono::Duration::seconds(seconds);
    }
}

#[cfg(test)]
impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[cfg(test)]
pub(crate) fn fixed_clock() -> std::sync::Arc<TestClock> {
    use chrono::TimeZone;
    std::sync::Arc::new(TestClock(std::sync::Mutex::new(
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
    )))
}
