//! Excel serial dates.
//!
//! Excel stores dates as a day count from 1899-12-31 (serial 0) with the time of
//! day as the fractional part. The 1900 date system keeps Lotus 1-2-3's leap
//! year bug: 1900-02-29 exists as serial 60 and every later date is one day
//! past its true distance from the epoch.

use crate::ooxml::error::{Result, XlsxError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Serial number of 9999-12-31, the last date Excel can represent.
pub const MAX_SERIAL_DAY: u32 = 2_958_465;

/// Serial number of 1970-01-01.
const UNIX_EPOCH_SERIAL: i64 = 25_569;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub(crate) const DEFAULT_DATE_FORMAT: &str = r"yyyy\-mm\-dd;@";
pub(crate) const DEFAULT_TIME_FORMAT: &str = "hh:mm:ss;@";
pub(crate) const DEFAULT_DATETIME_FORMAT: &str = r"yyyy\-mm\-dd\ hh:mm:ss";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateTimeKind {
    Date,
    Time,
    DateTime,
}

/// A date, time or date-time in Excel's serial encoding.
///
/// ```
/// use longan::ExcelDateTime;
///
/// let date = ExcelDateTime::from_ymd(2024, 6, 1)?;
/// assert_eq!(date.to_excel(), 45444.0);
///
/// let noon = date.and_hms(12, 0, 0)?;
/// assert_eq!(noon.to_excel(), 45444.5);
/// # Ok::<(), longan::XlsxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcelDateTime {
    day: u32,
    time: f64,
    kind: DateTimeKind,
}

impl ExcelDateTime {
    /// A calendar date. Valid from 1899-12-31 to 9999-12-31.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        Ok(Self {
            day: serial_day(year, month, day)?,
            time: 0.0,
            kind: DateTimeKind::Date,
        })
    }

    /// A time of day without a date.
    pub fn from_hms(hour: u16, minute: u8, second: u8) -> Result<Self> {
        Self::from_hms_milli(hour, minute, second, 0)
    }

    pub fn from_hms_milli(hour: u16, minute: u8, second: u8, milli: u16) -> Result<Self> {
        Ok(Self {
            day: 0,
            time: day_fraction(hour, minute, second as f64 + milli_seconds(milli)?)?,
            kind: DateTimeKind::Time,
        })
    }

    /// Add a time of day to a date.
    pub fn and_hms(self, hour: u16, minute: u8, second: u8) -> Result<Self> {
        self.and_hms_milli(hour, minute, second, 0)
    }

    pub fn and_hms_milli(self, hour: u16, minute: u8, second: u8, milli: u16) -> Result<Self> {
        let time = day_fraction(hour, minute, second as f64 + milli_seconds(milli)?)?;
        Ok(self.with_time(time))
    }

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDThh:mm[:ss[.fff]][Z]` (a space may
    /// replace the `T`) or a bare `hh:mm[:ss[.fff]]`.
    ///
    /// Strings that are not shaped like one of these fail with
    /// [`XlsxError::Parse`]. A three-field date whose fields are not valid
    /// numbers, or that names a day that does not exist, fails with
    /// [`XlsxError::Range`].
    pub fn parse_from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c == 'T' || c == ' ');

        match split {
            Some(pos) => {
                let date = parse_date(&s[..pos], s)?;
                let time = parse_time(&s[pos + 1..], s)?;
                Ok(date.with_time(time))
            },
            None if s.contains(':') => Ok(Self {
                day: 0,
                time: parse_time(s, s)?,
                kind: DateTimeKind::Time,
            }),
            None => parse_date(s, s),
        }
    }

    /// Wrap an existing serial number.
    pub fn from_serial_datetime(serial: f64) -> Result<Self> {
        if !serial.is_finite() || serial < 0.0 || serial >= (MAX_SERIAL_DAY + 1) as f64 {
            return Err(XlsxError::range(format!(
                "Serial date {} is outside 0..{}",
                serial,
                MAX_SERIAL_DAY + 1
            )));
        }
        let day = serial.floor();
        Ok(Self {
            day: day as u32,
            time: serial - day,
            kind: DateTimeKind::DateTime,
        })
    }

    /// Convert a Unix timestamp in seconds.
    pub fn from_timestamp(timestamp: i64) -> Result<Self> {
        let day = UNIX_EPOCH_SERIAL + timestamp.div_euclid(86_400);
        if !(0..=MAX_SERIAL_DAY as i64).contains(&day) {
            return Err(XlsxError::range(format!(
                "Timestamp {} is outside the Excel date range",
                timestamp
            )));
        }
        Ok(Self {
            day: day as u32,
            time: timestamp.rem_euclid(86_400) as f64 / SECONDS_PER_DAY,
            kind: DateTimeKind::DateTime,
        })
    }

    /// The serial number Excel stores in the cell.
    pub fn to_excel(&self) -> f64 {
        self.day as f64 + self.time
    }

    /// Number format applied when the value is written without a format.
    pub(crate) fn default_num_format(&self) -> &'static str {
        match self.kind {
            DateTimeKind::Date => DEFAULT_DATE_FORMAT,
            DateTimeKind::Time => DEFAULT_TIME_FORMAT,
            DateTimeKind::DateTime => DEFAULT_DATETIME_FORMAT,
        }
    }

    fn with_time(self, time: f64) -> Self {
        Self {
            day: self.day,
            time,
            kind: match self.kind {
                DateTimeKind::Time => DateTimeKind::Time,
                _ => DateTimeKind::DateTime,
            },
        }
    }
}

fn serial_day(year: u16, month: u8, day: u8) -> Result<u32> {
    // The day that only exists in Excel.
    if (year, month, day) == (1900, 2, 29) {
        return Ok(60);
    }

    let out_of_range = || {
        XlsxError::range(format!(
            "Date {:04}-{:02}-{:02} is outside 1899-12-31..=9999-12-31 or does not exist",
            year, month, day
        ))
    };

    if !(1899..=9999).contains(&year) {
        return Err(out_of_range());
    }
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .ok_or_else(out_of_range)?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 31).ok_or_else(out_of_range)?;

    let days = date.signed_duration_since(epoch).num_days();
    if days < 0 {
        return Err(out_of_range());
    }
    // Past the phantom leap day.
    let days = if days > 59 { days + 1 } else { days };
    Ok(days as u32)
}

fn milli_seconds(milli: u16) -> Result<f64> {
    if milli > 999 {
        return Err(XlsxError::range(format!(
            "Millisecond {} is outside 0..=999",
            milli
        )));
    }
    Ok(milli as f64 / 1000.0)
}

fn day_fraction(hour: u16, minute: u8, second: f64) -> Result<f64> {
    if hour > 23 || minute > 59 || !(0.0..60.0).contains(&second) {
        return Err(XlsxError::range(format!(
            "Time {:02}:{:02}:{} is not a valid time of day",
            hour, minute, second
        )));
    }
    Ok((hour as f64 * 3600.0 + minute as f64 * 60.0 + second) / SECONDS_PER_DAY)
}

fn parse_date(s: &str, input: &str) -> Result<ExcelDateTime> {
    let fields: Vec<&str> = s.split('-').collect();
    if fields.len() != 3 {
        return Err(XlsxError::parse(format!(
            "Cannot parse '{}' as a date: expected YYYY-MM-DD",
            input
        )));
    }

    let field = |value: &str, name: &str| {
        value.parse::<u16>().map_err(|_| {
            XlsxError::range(format!(
                "Invalid {} '{}' in date '{}'",
                name, value, input
            ))
        })
    };
    let year = field(fields[0], "year")?;
    let month = u8::try_from(field(fields[1], "month")?)
        .map_err(|_| XlsxError::range(format!("Invalid month in date '{}'", input)))?;
    let day = u8::try_from(field(fields[2], "day")?)
        .map_err(|_| XlsxError::range(format!("Invalid day in date '{}'", input)))?;

    ExcelDateTime::from_ymd(year, month, day)
}

fn parse_time(s: &str, input: &str) -> Result<f64> {
    let s = s.strip_suffix('Z').unwrap_or(s);
    let malformed = || {
        XlsxError::parse(format!(
            "Cannot parse '{}' as a time: expected hh:mm[:ss[.fff]]",
            input
        ))
    };

    let fields: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(malformed());
    }
    let hour = fields[0].parse::<u16>().map_err(|_| malformed())?;
    let minute = fields[1].parse::<u8>().map_err(|_| malformed())?;
    let second = match fields.get(2) {
        Some(value) if value.bytes().all(|b| b.is_ascii_digit() || b == b'.') => {
            value.parse::<f64>().map_err(|_| malformed())?
        },
        Some(_) => return Err(malformed()),
        None => 0.0,
    };

    day_fraction(hour, minute, second)
}

impl TryFrom<NaiveDate> for ExcelDateTime {
    type Error = XlsxError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        let year = u16::try_from(date.year()).map_err(|_| {
            XlsxError::range(format!("Date {} is outside the Excel date range", date))
        })?;
        Self::from_ymd(year, date.month() as u8, date.day() as u8)
    }
}

impl TryFrom<NaiveDateTime> for ExcelDateTime {
    type Error = XlsxError;

    fn try_from(datetime: NaiveDateTime) -> Result<Self> {
        let date = Self::try_from(datetime.date())?;
        Ok(date.with_time(time_fraction(&datetime.time())))
    }
}

impl From<NaiveTime> for ExcelDateTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            day: 0,
            time: time_fraction(&time),
            kind: DateTimeKind::Time,
        }
    }
}

fn time_fraction(time: &NaiveTime) -> f64 {
    // Leap-second nanos (>= 1e9) are folded into the last second of the day.
    let nanos = time.nanosecond().min(999_999_999);
    (time.num_seconds_from_midnight() as f64 + nanos as f64 / 1e9) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn serial(y: u16, m: u8, d: u8) -> f64 {
        ExcelDateTime::from_ymd(y, m, d).unwrap().to_excel()
    }

    #[test]
    fn test_known_serials() {
        assert_eq!(serial(1899, 12, 31), 0.0);
        assert_eq!(serial(1900, 1, 1), 1.0);
        assert_eq!(serial(1900, 2, 28), 59.0);
        assert_eq!(serial(1900, 2, 29), 60.0);
        assert_eq!(serial(1900, 3, 1), 61.0);
        assert_eq!(serial(2024, 1, 1), 45292.0);
        assert_eq!(serial(2024, 2, 29), 45351.0);
        assert_eq!(serial(2024, 6, 1), 45444.0);
        assert_eq!(serial(2024, 12, 31), 45657.0);
        assert_eq!(serial(9999, 12, 31), 2958465.0);
    }

    #[test]
    fn test_invalid_dates_are_range_errors() {
        for (y, m, d) in [(2024, 2, 30), (1899, 12, 30), (2023, 2, 29), (2024, 13, 1), (2024, 0, 1)] {
            assert!(
                matches!(ExcelDateTime::from_ymd(y, m, d), Err(XlsxError::Range(_))),
                "{}-{}-{}",
                y,
                m,
                d
            );
        }
        assert!(matches!(
            ExcelDateTime::from_ymd(10000, 1, 1),
            Err(XlsxError::Range(_))
        ));
    }

    #[test]
    fn test_times() {
        let date = ExcelDateTime::from_ymd(2024, 6, 1).unwrap();
        assert_eq!(date.and_hms(18, 0, 0).unwrap().to_excel(), 45444.75);
        assert_eq!(ExcelDateTime::from_hms(6, 0, 0).unwrap().to_excel(), 0.25);
        let with_milli = ExcelDateTime::from_hms_milli(0, 0, 1, 500).unwrap();
        assert_eq!(with_milli.to_excel(), 1.5 / 86_400.0);

        assert!(matches!(date.and_hms(24, 0, 0), Err(XlsxError::Range(_))));
        assert!(matches!(date.and_hms(0, 60, 0), Err(XlsxError::Range(_))));
        assert!(matches!(date.and_hms(0, 0, 60), Err(XlsxError::Range(_))));
    }

    #[test]
    fn test_parse_from_str() {
        let parsed = ExcelDateTime::parse_from_str("2024-06-01").unwrap();
        assert_eq!(parsed.to_excel(), 45444.0);
        assert_eq!(parsed.default_num_format(), DEFAULT_DATE_FORMAT);

        let parsed = ExcelDateTime::parse_from_str("2024-06-01T12:00:00Z").unwrap();
        assert_eq!(parsed.to_excel(), 45444.5);
        assert_eq!(parsed.default_num_format(), DEFAULT_DATETIME_FORMAT);

        let parsed = ExcelDateTime::parse_from_str("2024-06-01 06:00").unwrap();
        assert_eq!(parsed.to_excel(), 45444.25);

        let parsed = ExcelDateTime::parse_from_str("12:00:00.000").unwrap();
        assert_eq!(parsed.to_excel(), 0.5);
        assert_eq!(parsed.default_num_format(), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn test_parse_errors() {
        for input in ["2024/06/01", "2024.06.01", "20240601", "", "2024-06-01T12", "2024-06-01Tnoon:00"] {
            assert!(
                matches!(ExcelDateTime::parse_from_str(input), Err(XlsxError::Parse(_))),
                "{:?}",
                input
            );
        }
        assert!(matches!(
            ExcelDateTime::parse_from_str("2024-02-30"),
            Err(XlsxError::Range(_))
        ));
        assert!(matches!(
            ExcelDateTime::parse_from_str("not-a-date"),
            Err(XlsxError::Range(_))
        ));
    }

    #[test]
    fn test_serial_and_timestamp() {
        let value = ExcelDateTime::from_serial_datetime(45444.125).unwrap();
        assert_eq!(value.to_excel(), 45444.125);
        assert!(ExcelDateTime::from_serial_datetime(-1.0).is_err());
        assert!(ExcelDateTime::from_serial_datetime(2958466.0).is_err());

        assert_eq!(ExcelDateTime::from_timestamp(0).unwrap().to_excel(), 25569.0);
        assert_eq!(
            ExcelDateTime::from_timestamp(1_717_243_200).unwrap().to_excel(),
            45444.5
        );
        assert!(ExcelDateTime::from_timestamp(i64::MIN / 2).is_err());
    }

    #[test]
    fn test_chrono_conversions() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(ExcelDateTime::try_from(date).unwrap().to_excel(), 45444.0);

        let datetime = date.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(ExcelDateTime::try_from(datetime).unwrap().to_excel(), 45444.5);

        let time = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert_eq!(ExcelDateTime::from(time).to_excel(), 0.25);

        let early = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap();
        assert!(matches!(ExcelDateTime::try_from(early), Err(XlsxError::Range(_))));
    }

    proptest! {
        #[test]
        fn prop_consecutive_days_differ_by_one(days in 61i64..2_958_000) {
            let base = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();
            let date = base + chrono::Duration::days(days - 61);
            let next = date + chrono::Duration::days(1);

            let a = ExcelDateTime::try_from(date).unwrap().to_excel();
            let b = ExcelDateTime::try_from(next).unwrap().to_excel();
            prop_assert_eq!(a, days as f64);
            prop_assert_eq!(b - a, 1.0);
        }

        #[test]
        fn prop_parse_agrees_with_from_ymd(y in 1900u16..=9999, m in 1u8..=12, d in 1u8..=28) {
            let text = format!("{:04}-{:02}-{:02}", y, m, d);
            let parsed = ExcelDateTime::parse_from_str(&text).unwrap();
            prop_assert_eq!(parsed, ExcelDateTime::from_ymd(y, m, d).unwrap());
        }
    }
}
