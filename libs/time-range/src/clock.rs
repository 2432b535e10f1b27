use jiff::{Timestamp, Zoned, tz::TimeZone};

/// Source of the evaluation instant for range resolution.
pub trait Clock {
    fn now(&self) -> Zoned;
}

/// Reads the wall clock in a fixed time zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    pub time_zone: TimeZone,
}

impl SystemClock {
    pub fn new(time_zone: TimeZone) -> Self {
        Self { time_zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            time_zone: TimeZone::system(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Timestamp::now().to_zoned(self.time_zone.clone())
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub Zoned);

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.0.clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Zoned {
        (**self).now()
    }
}
