use chrono::{Local, NaiveDateTime};

use super::traits::Clock;

/// Wall clock in the browser's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
