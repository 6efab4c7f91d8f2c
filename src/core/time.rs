use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format of month labels and budget months.
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one date; used by tests and replayed scripts.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Formats a date as a `YYYY-MM` month label.
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// Month label for the clock's current date.
pub fn current_month(clock: &dyn Clock) -> String {
    month_label(clock.today())
}

/// How trailing report buckets step back from the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStepping {
    /// Subtract `30 * offset` days. Months of 28, 29 or 31 days make labels drift, so a label
    /// can repeat or be skipped near month boundaries.
    #[default]
    ThirtyDay,
    /// Subtract whole calendar months; labels are always consecutive.
    Calendar,
}

impl TrendStepping {
    /// Label of the bucket `offset` steps before `today`, or `None` when that bucket lies
    /// before the earliest representable date.
    pub fn bucket_label(self, today: NaiveDate, offset: u32) -> Option<String> {
        let date = match self {
            TrendStepping::ThirtyDay => {
                today.checked_sub_signed(Duration::days(30 * i64::from(offset)))?
            }
            TrendStepping::Calendar => {
                let first = today.with_day(1).unwrap_or(today);
                first.checked_sub_months(Months::new(offset))?
            }
        };
        Some(month_label(date))
    }
}
