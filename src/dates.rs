//! Date helpers for the `YYYY-MM-DD` text dates stored in the measurement table
use chrono::{Days, NaiveDate, NaiveTime};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the trailing window used for the temperature observation query
pub const TRAILING_WINDOW_DAYS: u64 = 365;

#[derive(Debug, thiserror::Error)]
pub enum DateError {
    #[error("expected exactly YYYY-MM-DD")]
    Layout,
    #[error(transparent)]
    Calendar(#[from] chrono::ParseError),
}

/// Parse a `YYYY-MM-DD` date.
///
/// The layout is checked byte by byte before chrono sees the input: chrono
/// alone would accept padding and signed or five-digit years, which do not
/// sort with the stored text dates.
///
/// # Examples
///
/// ```
/// use climate_api_service::dates::parse_iso_date;
///
/// assert!(parse_iso_date("2017-08-23").is_ok());
/// assert!(parse_iso_date("2017-13-40").is_err());
/// assert!(parse_iso_date("yesterday").is_err());
/// assert!(parse_iso_date("+10000-01-01").is_err());
/// ```
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DateError> {
    if !has_iso_layout(value) {
        return Err(DateError::Layout);
    }
    Ok(NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)?)
}

fn has_iso_layout(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// First day of the window ending at `recent`: a plain 365-day subtraction,
/// so a window spanning Feb 29 covers one day less than a calendar year.
///
/// ```
/// use chrono::NaiveDate;
/// use climate_api_service::dates::trailing_year_start;
///
/// let recent = NaiveDate::from_ymd_opt(2017, 8, 23).unwrap();
/// assert_eq!(trailing_year_start(recent), NaiveDate::from_ymd_opt(2016, 8, 23).unwrap());
/// ```
pub fn trailing_year_start(recent: NaiveDate) -> NaiveDate {
    recent
        .checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// Midnight timestamp echoed back in aggregate responses, e.g. `2017-08-01 00:00:00`
pub fn echo_timestamp(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).to_string()
}
