use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Month,
};

/// Calendar date layout used by the dataset and the API: `YYYY-MM-DD`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("expected a date in YYYY-MM-DD form, got '{0}'")]
    Malformed(String),
    #[error("'{0}' is not a valid calendar date: {1}")]
    Invalid(String, time::error::Parse),
    #[error("date out of range: {0}")]
    OutOfRange(#[from] time::error::ComponentRange),
    #[error("failed to format date: {0}")]
    Format(#[from] time::error::Format),
}

/// Parses a strict `YYYY-MM-DD` string.
///
/// Anything other than four year digits, two month digits and two day digits separated by
/// hyphens is rejected before the calendar check, so `2017-8-1` or `+2017-08-01` never parse.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::Malformed(raw.to_owned()));
    }
    Date::parse(raw, DATE_FORMAT).map_err(|e| Error::Invalid(raw.to_owned(), e))
}

pub fn format_date(date: Date) -> Result<String, Error> {
    Ok(date.format(DATE_FORMAT)?)
}

/// The same month and day one calendar year earlier.
///
/// February 29th has no counterpart in the previous year and maps to February 28th, the
/// nearest valid earlier date.
pub fn one_year_before(date: Date) -> Result<Date, Error> {
    let year = date.year() - 1;
    match date.replace_year(year) {
        Ok(shifted) => Ok(shifted),
        Err(_) if date.month() == Month::February && date.day() == 29 => {
            Ok(Date::from_calendar_date(year, Month::February, 28)?)
        }
        Err(e) => Err(Error::OutOfRange(e)),
    }
}

/// Serde adapter that writes and reads [`Date`] as `YYYY-MM-DD`.
pub mod iso_date {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = super::format_date(*date).map_err(ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}
