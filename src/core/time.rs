//! Clock-time parsing and worked-hours arithmetic.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;
const SECONDS_PER_HOUR: u32 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ClockTime {
    pub fn seconds_since_midnight(&self) -> u32 {
        self.hour * SECONDS_PER_HOUR + self.minute * 60 + self.second
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

/// Parses `HH:MM` or `HH:MM:SS`. Returns `None` for anything else.
pub fn parse_clock_time(s: &str) -> Option<ClockTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let mut fields = [0u32; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    NaiveTime::from_hms_opt(fields[0], fields[1], fields[2]).map(ClockTime::from)
}

/// Hours between two clock times, rounded half-up to 2 decimals.
///
/// A clock-out earlier than the clock-in is an overnight shift ending the
/// next day. The rounding is done on whole seconds so that e.g. 09:02 to
/// 18:05 is exactly 9.05.
pub fn compute_hours(clock_in: Option<&str>, clock_out: Option<&str>) -> Option<f64> {
    let start = parse_clock_time(clock_in?)?.seconds_since_midnight();
    let mut end = parse_clock_time(clock_out?)?.seconds_since_midnight();
    if end < start {
        end += SECONDS_PER_DAY;
    }

    let elapsed = u64::from(end - start);
    let hundredths = (elapsed * 100 + u64::from(SECONDS_PER_HOUR / 2)) / u64::from(SECONDS_PER_HOUR);
    Some(hundredths as f64 / 100.0)
}
