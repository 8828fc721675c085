use std::ops::Range;

use chrono::NaiveDateTime;

use crate::commons::errors::ServiceError;

/// Wire format for every date exchanged over the API, e.g. `01-02-2024 10:00`.
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

pub fn parse_date(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT)
}

pub fn format_date(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses a stay, which must end strictly after it starts.
pub fn parse_stay(start: &str, end: &str) -> Result<Range<NaiveDateTime>, ServiceError> {
    let window = parse_window(start, end)?;
    if window.start >= window.end {
        return Err(ServiceError::InvalidDateRange);
    }
    Ok(window)
}

/// Parses a search window. `start == end` is accepted.
pub fn parse_window(start: &str, end: &str) -> Result<Range<NaiveDateTime>, ServiceError> {
    let start = parse_date(start).map_err(|_| ServiceError::InvalidDateRange)?;
    let end = parse_date(end).map_err(|_| ServiceError::InvalidDateRange)?;
    if start > end {
        return Err(ServiceError::InvalidDateRange);
    }
    Ok(start..end)
}
