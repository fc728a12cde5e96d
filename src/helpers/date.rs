//! Standard date formats exchanged between services:
//! `yyyy-MM-dd` for dates and `yyyy-MM-ddTHH:mm:ss.SSSZ` for date-times.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Fault, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Time appended to a bare date when a date-time is expected.
pub const DEFAULT_TIME_SUFFIX: &str = "T06:00:00.000Z";

const BAD_REQUEST: u16 = 400;

/// Date part of either format; anything after `T` is ignored.
pub fn to_local_date(date: &str) -> Result<NaiveDate> {
    let date_part = match date.find('T') {
        Some(idx) => &date[..idx],
        None => date,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| Fault::general(BAD_REQUEST, format!("invalid date '{}': {}", date, e)))
}

/// Date-time in the standard format. A bare date gets [`DEFAULT_TIME_SUFFIX`].
pub fn to_local_date_time(date: &str) -> Result<NaiveDateTime> {
    let date_time = match date.contains('T') {
        true => date.to_owned(),
        false => format!("{}{}", date, DEFAULT_TIME_SUFFIX),
    };
    NaiveDateTime::parse_from_str(&date_time, DATE_TIME_FORMAT)
        .map_err(|e| Fault::general(BAD_REQUEST, format!("invalid date-time '{}': {}", date, e)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format(DATE_TIME_FORMAT).to_string()
}
