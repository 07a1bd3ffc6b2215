use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time split the way the trace header prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub secs: u64,
    pub micros: u32,
}

impl Timestamp {
    pub fn new(secs: u64, micros: u32) -> Self {
        Self { secs, micros }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // a clock set before 1970 reads as the epoch
        let since = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp::new(since.as_secs(), since.subsec_micros())
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_are_zero_padded() {
        assert_eq!(Timestamp::new(1700000000, 42).to_string(), "1700000000.000042");
        assert_eq!(Timestamp::new(3, 999_999).to_string(), "3.999999");
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        let now = SystemClock.now();
        assert!(now.secs > 0);
        assert!(now.micros < 1_000_000);
    }
}
