use chrono::{Datelike, Duration, NaiveDate};

const LONG_DATE: &str = "%B %d, %Y";

/// Inclusive Monday to Sunday reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The last full week that ended before the current one started. On a
    /// Monday this is the week that ended yesterday.
    pub fn previous_week(today: NaiveDate) -> Self {
        let days_back = i64::from(today.weekday().num_days_from_monday()) + 7;
        let start = today - Duration::days(days_back);
        Self { start, end: start + Duration::days(6) }
    }

    /// Start date formatted like `March 03, 2025`.
    pub fn start_label(&self) -> String {
        self.start.format(LONG_DATE).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end.format(LONG_DATE).to_string()
    }
}
