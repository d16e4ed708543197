//! Rendering of provider timestamps.
//!
//! Timestamps are epoch seconds (UTC). Display strings use a fixed en-US style
//! and the timezone of whoever renders them, not the reported location's. Each
//! operation has an `_in` variant taking an explicit timezone.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use std::fmt::Display;

use crate::error::{CoreError, CoreResult};

/// Medium date, short 12-hour time: `Oct 19, 2026, 3:05 PM`.
const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";
/// Short 12-hour time: `3:05 PM`.
const TIME_FORMAT: &str = "%-I:%M %p";
/// Long month and day: `October 19`.
const MONTH_DAY_FORMAT: &str = "%B %-d";

pub fn to_utc(epoch_seconds: i64) -> CoreResult<DateTime<Utc>> {
    DateTime::from_timestamp(epoch_seconds, 0).ok_or_else(|| {
        CoreError::invalid_argument(format!("timestamp {epoch_seconds} is out of range"))
    })
}

pub fn to_zoned<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> CoreResult<DateTime<Tz>> {
    Ok(to_utc(epoch_seconds)?.with_timezone(tz))
}

pub fn display_date_time_in<Tz>(epoch_seconds: i64, tz: &Tz) -> CoreResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(to_zoned(epoch_seconds, tz)?.format(DATE_TIME_FORMAT).to_string())
}

pub fn display_time_in<Tz>(epoch_seconds: i64, tz: &Tz) -> CoreResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(to_zoned(epoch_seconds, tz)?.format(TIME_FORMAT).to_string())
}

pub fn month_day_in<Tz>(epoch_seconds: i64, tz: &Tz) -> CoreResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(to_zoned(epoch_seconds, tz)?.format(MONTH_DAY_FORMAT).to_string())
}

/// English weekday name, e.g. `Monday`.
pub fn weekday_name_in<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> CoreResult<&'static str> {
    const WEEKDAYS: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    let date = to_zoned(epoch_seconds, tz)?;
    Ok(WEEKDAYS[date.weekday().num_days_from_sunday() as usize])
}

/// Day of month (1..=31). Only meaningful as a bucketing key.
pub fn calendar_day_in<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> CoreResult<u32> {
    Ok(to_zoned(epoch_seconds, tz)?.day())
}

pub fn to_local_display_date_time(epoch_seconds: i64) -> CoreResult<String> {
    display_date_time_in(epoch_seconds, &Local)
}

pub fn to_local_display_time(epoch_seconds: i64) -> CoreResult<String> {
    display_time_in(epoch_seconds, &Local)
}

pub fn calendar_day(epoch_seconds: i64) -> CoreResult<u32> {
    calendar_day_in(epoch_seconds, &Local)
}
