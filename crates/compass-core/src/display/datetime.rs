//! Date and time display utilities.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// A wrapper around `Timestamp` that formats it in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// A signed day offset from today, rendered as "today", "tomorrow",
/// "in 3 days", "yesterday" or "4 days ago".
///
/// ```rust
/// use compass_core::display::RelativeDays;
///
/// assert_eq!(RelativeDays(0).to_string(), "today");
/// assert_eq!(RelativeDays(3).to_string(), "in 3 days");
/// assert_eq!(RelativeDays(-4).to_string(), "4 days ago");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeDays(pub i64);

impl fmt::Display for RelativeDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "today"),
            1 => write!(f, "tomorrow"),
            -1 => write!(f, "yesterday"),
            days if days > 0 => write!(f, "in {days} days"),
            days => write!(f, "{} days ago", -days),
        }
    }
}
