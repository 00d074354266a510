//! Date/time layouts and keyword resolution.
//!
//! Two layout tables exist. [`LITERAL_FORMATS`] is the narrow set accepted for
//! date/time literals written in a script, where an unambiguous form is
//! required. [`COERCION_FORMATS`] is the permissive set tried when untyped
//! column text is compared against a date/time; it adds the shapes printed by
//! `ls -l`, `ps -ef` and `date`.
//!
//! Both tables are tried top to bottom and the first layout that parses wins.

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc,
    format::{Parsed, StrftimeItems, parse},
};

/// Finest time-of-day field a layout carries. Coarser-grained layouts get the
/// remaining fields set to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Day,
    Hour,
    Minute,
    Second,
}

/// A single chrono layout plus the normalization applied after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeFormat {
    /// strftime-style layout
    pub layout: &'static str,
    pub precision: Precision,
    /// The layout has no year; the current year is assumed.
    pub use_current_year: bool,
    /// The layout has no date at all; today's date is assumed.
    pub use_current_day: bool,
    /// Interpret the wall-clock time in the local timezone rather than UTC.
    pub use_local_timezone: bool,
}

impl DateTimeFormat {
    const fn local(layout: &'static str, precision: Precision) -> Self {
        DateTimeFormat {
            layout,
            precision,
            use_current_year: false,
            use_current_day: false,
            use_local_timezone: true,
        }
    }

    const fn utc(layout: &'static str, precision: Precision) -> Self {
        DateTimeFormat {
            use_local_timezone: false,
            ..Self::local(layout, precision)
        }
    }

    const fn current_year(self) -> Self {
        DateTimeFormat {
            use_current_year: true,
            ..self
        }
    }

    const fn current_day(self) -> Self {
        DateTimeFormat {
            use_current_day: true,
            ..self
        }
    }

    /// Parses `text` with this layout, filling in whatever the layout omits
    /// from `now`.
    pub fn parse_at(&self, text: &str, now: &DateTime<Local>) -> Option<DateTime<FixedOffset>> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(self.layout)).ok()?;

        if self.use_current_day {
            parsed.set_month(i64::from(now.month())).ok()?;
            parsed.set_day(i64::from(now.day())).ok()?;
        }
        if self.use_current_year || self.use_current_day {
            parsed.set_year(i64::from(now.year())).ok()?;
        }
        match self.precision {
            Precision::Day => {
                parsed.set_hour(0).ok()?;
                parsed.set_minute(0).ok()?;
            }
            Precision::Hour => parsed.set_minute(0).ok()?,
            Precision::Minute | Precision::Second => {}
        }

        let naive = NaiveDateTime::new(parsed.to_naive_date().ok()?, parsed.to_naive_time().ok()?);
        if self.use_local_timezone {
            from_local(&naive)
        } else {
            Some(Utc.from_utc_datetime(&naive).fixed_offset())
        }
    }
}

use Precision::{Day, Hour, Minute, Second};

/// Layouts accepted for date/time literals in a script.
pub const LITERAL_FORMATS: &[DateTimeFormat] = &[
    DateTimeFormat::utc("%Y-%m-%dT%H:%M:%S%.3fZ", Second),
    DateTimeFormat::local("%Y-%m-%dT%H:%M:%S", Second),
    DateTimeFormat::local("%Y-%m-%dT%H:%M", Minute),
    DateTimeFormat::local("%Y-%m-%dT%H", Hour),
    DateTimeFormat::local("%Y-%m-%dT", Day),
    DateTimeFormat::local("%m-%dT", Day).current_year(),
    DateTimeFormat::utc("%Y%m%dT%H:%M:%S%.3fZ", Second),
    DateTimeFormat::local("%Y%m%dT%H:%M:%S", Second),
    DateTimeFormat::local("%Y%m%dT%H:%M", Minute),
    DateTimeFormat::local("%Y%m%dT%H", Hour),
    DateTimeFormat::local("%Y%m%dT", Day),
    DateTimeFormat::local("%m%dT", Day).current_year(),
];

/// Layouts tried when untyped text is compared against a date/time.
///
/// chrono's `%a` and `%b` only accept abbreviated names, so full weekday and
/// month names get layouts of their own (`%A`, `%B`). `%Z` zone abbreviations
/// are skipped by chrono and the time is read as local time.
pub const COERCION_FORMATS: &[DateTimeFormat] = &[
    DateTimeFormat::utc("%Y-%m-%dT%H:%M:%S%.3fZ", Second),
    DateTimeFormat::local("%Y-%m-%dT%H:%M:%S", Second),
    DateTimeFormat::local("%Y-%m-%dT%H:%M", Minute),
    DateTimeFormat::local("%Y-%m-%dT%H", Hour),
    DateTimeFormat::local("%Y-%m-%dT", Day),
    DateTimeFormat::local("%Y-%m-%d", Day),
    DateTimeFormat::utc("%Y%m%dT%H:%M:%S%.3fZ", Second),
    DateTimeFormat::local("%Y%m%dT%H:%M:%S", Second),
    DateTimeFormat::local("%Y%m%dT%H:%M", Minute),
    DateTimeFormat::local("%Y%m%dT%H", Hour),
    DateTimeFormat::local("%Y%m%dT", Day),
    DateTimeFormat::local("%Y%m%d", Day),
    // `date`
    DateTimeFormat::local("%a %b %d %H:%M:%S %Z %Y", Second),
    DateTimeFormat::local("%A %b %d %H:%M:%S %Z %Y", Second),
    DateTimeFormat::local("%a %b %d %H:%M:%S", Second).current_year(),
    DateTimeFormat::local("%A %b %d %H:%M:%S", Second).current_year(),
    // `ps -ef` start times: older processes show a date, today's show a time
    DateTimeFormat::local("%d%b%y", Day),
    DateTimeFormat::local("%H:%M", Minute).current_day(),
    // `ls -l`: recent files carry a time, older ones a year
    DateTimeFormat::local("%b %d %H:%M", Minute).current_year(),
    DateTimeFormat::local("%b %d, %Y", Day),
    DateTimeFormat::local("%B %d, %Y", Day),
    DateTimeFormat::local("%b %d %Y", Day),
];

/// Tries each layout in order against `text`, relative to the current moment.
pub fn parse_date_time(formats: &[DateTimeFormat], text: &str) -> Option<DateTime<FixedOffset>> {
    parse_date_time_at(formats, text, &Local::now())
}

/// Same as [`parse_date_time`] with an explicit notion of "now".
pub fn parse_date_time_at(
    formats: &[DateTimeFormat],
    text: &str,
    now: &DateTime<Local>,
) -> Option<DateTime<FixedOffset>> {
    // `date` pads single-digit days with a second space; `ls -l` aligns columns
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    formats
        .iter()
        .find_map(|format| format.parse_at(&normalized, now))
}

/// Date keywords usable as literals. They resolve when compared, never when
/// the script is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Now,
    Today,
    Yesterday,
    Tomorrow,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Keyword> {
        match name {
            "now" => Some(Keyword::Now),
            "today" => Some(Keyword::Today),
            "yesterday" => Some(Keyword::Yesterday),
            "tomorrow" => Some(Keyword::Tomorrow),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Keyword::Now => "now",
            Keyword::Today => "today",
            Keyword::Yesterday => "yesterday",
            Keyword::Tomorrow => "tomorrow",
        }
    }

    pub fn resolve(&self) -> DateTime<FixedOffset> {
        self.resolve_at(&Local::now())
    }

    /// `now` is the instant itself; the day keywords are local midnight.
    pub fn resolve_at(&self, now: &DateTime<Local>) -> DateTime<FixedOffset> {
        let today = now.date_naive();
        let day = match self {
            Keyword::Now => return now.fixed_offset(),
            Keyword::Today => Some(today),
            Keyword::Yesterday => today.pred_opt(),
            Keyword::Tomorrow => today.succ_opt(),
        };
        day.and_then(start_of_day).unwrap_or_else(|| now.fixed_offset())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    from_local(&date.and_hms_opt(0, 0, 0)?)
}

fn from_local(naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).earliest().unwrap()
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .earliest()
            .unwrap()
            .fixed_offset()
    }

    #[test]
    fn literal_full_timestamp_is_utc() {
        let got = parse_date_time_at(LITERAL_FORMATS, "2010-10-11T05:15:00.000Z", &fixed_now());
        let want = Utc.with_ymd_and_hms(2010, 10, 11, 5, 15, 0).unwrap().fixed_offset();
        assert_eq!(got, Some(want));
    }

    #[test]
    fn literal_minute_precision_is_local() {
        let got = parse_date_time_at(LITERAL_FORMATS, "2010-10-11T06:45", &fixed_now());
        assert_eq!(got, Some(local(2010, 10, 11, 6, 45, 0)));
    }

    #[test]
    fn literal_hour_and_day_precision() {
        let now = fixed_now();
        assert_eq!(
            parse_date_time_at(LITERAL_FORMATS, "2010-10-11T06", &now),
            Some(local(2010, 10, 11, 6, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(LITERAL_FORMATS, "2014-09-12T", &now),
            Some(local(2014, 9, 12, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(LITERAL_FORMATS, "20140912T10", &now),
            Some(local(2014, 9, 12, 10, 0, 0))
        );
    }

    #[test]
    fn literal_month_day_uses_current_year() {
        let got = parse_date_time_at(LITERAL_FORMATS, "01-02T", &fixed_now()).unwrap();
        assert_eq!((got.year(), got.month(), got.day()), (2026, 1, 2));
        assert_eq!(got.hour(), 0);
    }

    #[test]
    fn literal_rejects_coercion_only_forms() {
        let now = fixed_now();
        assert_eq!(parse_date_time_at(LITERAL_FORMATS, "2014-09-12", &now), None);
        assert_eq!(parse_date_time_at(LITERAL_FORMATS, "Jan 2, 2006", &now), None);
        assert_eq!(parse_date_time_at(LITERAL_FORMATS, "12:30", &now), None);
    }

    #[test]
    fn coercion_accepts_command_output() {
        let now = fixed_now();
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "2014-09-12", &now),
            Some(local(2014, 9, 12, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Jan 2, 2006", &now),
            Some(local(2006, 1, 2, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "January 2, 2006", &now),
            Some(local(2006, 1, 2, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Mar  5  2019", &now),
            Some(local(2019, 3, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "2Jan06", &now),
            Some(local(2006, 1, 2, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Mon Jan  2 15:04:05 PST 2006", &now),
            Some(local(2006, 1, 2, 15, 4, 5))
        );
    }

    #[test]
    fn coercion_accepts_full_month_and_weekday_names() {
        let now = fixed_now();
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "September 12, 2014", &now),
            Some(local(2014, 9, 12, 0, 0, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Monday Jan 2 15:04:05 PST 2006", &now),
            Some(local(2006, 1, 2, 15, 4, 5))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Monday Jan 5 15:04:05", &now),
            Some(local(2026, 1, 5, 15, 4, 5))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Mon Jan 5 15:04:05", &now),
            Some(local(2026, 1, 5, 15, 4, 5))
        );
    }

    #[test]
    fn coercion_fills_in_today_and_this_year() {
        let now = fixed_now();
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "12:30", &now),
            Some(local(2026, 3, 14, 12, 30, 0))
        );
        assert_eq!(
            parse_date_time_at(COERCION_FORMATS, "Feb 7 09:15", &now),
            Some(local(2026, 2, 7, 9, 15, 0))
        );
    }

    #[test]
    fn coercion_rejects_non_dates() {
        let now = fixed_now();
        assert_eq!(parse_date_time_at(COERCION_FORMATS, "123", &now), None);
        assert_eq!(parse_date_time_at(COERCION_FORMATS, "aaa", &now), None);
        assert_eq!(parse_date_time_at(COERCION_FORMATS, "", &now), None);
    }

    #[test]
    fn keywords_resolve_relative_to_now() {
        let now = fixed_now();
        assert_eq!(Keyword::Now.resolve_at(&now), now.fixed_offset());
        assert_eq!(Keyword::Today.resolve_at(&now), local(2026, 3, 14, 0, 0, 0));
        assert_eq!(Keyword::Yesterday.resolve_at(&now), local(2026, 3, 13, 0, 0, 0));
        assert_eq!(Keyword::Tomorrow.resolve_at(&now), local(2026, 3, 15, 0, 0, 0));
    }

    #[test]
    fn keyword_names_round_trip() {
        for keyword in [Keyword::Now, Keyword::Today, Keyword::Yesterday, Keyword::Tomorrow] {
            assert_eq!(Keyword::from_name(keyword.name()), Some(keyword));
        }
        assert_eq!(Keyword::from_name("later"), None);
    }
}
