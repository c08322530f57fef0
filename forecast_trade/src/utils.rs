//! Utility functions for the forecast_trade crate

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Whether markets trade on `date` (weekends are the only closures modelled)
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The calendar day after `date`, `None` past the end of chrono's range
pub fn next_calendar_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

/// First trading day strictly after `date`
pub fn next_trading_day(date: NaiveDate) -> Option<NaiveDate> {
    let mut next = next_calendar_day(date)?;
    while !is_trading_day(next) {
        next = next_calendar_day(next)?;
    }
    Some(next)
}

/// Create the next `horizon` trading dates after `last_date`.
///
/// Stops early if the calendar runs out.
pub fn future_trading_days(last_date: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;

    while dates.len() < horizon {
        let Some(next) = next_trading_day(current) else {
            break;
        };
        dates.push(next);
        current = next;
    }

    dates
}

/// Round a price to two decimal places
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
