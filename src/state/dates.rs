// Calendar dates are stored as day counts since 1970-01-01
use chrono::{Duration, NaiveDate};

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

pub fn date_to_epoch_day(date: NaiveDate) -> i64 {
    date.signed_duration_since(epoch()).num_days()
}

/// Returns None when the day count falls outside chrono's representable range
pub fn epoch_day_to_date(days: i64) -> Option<NaiveDate> {
    let offset = Duration::try_days(days)?;
    epoch().checked_add_signed(offset)
}

pub fn optional_date_to_epoch_day(date: Option<NaiveDate>) -> Option<i64> {
    date.map(date_to_epoch_day)
}
