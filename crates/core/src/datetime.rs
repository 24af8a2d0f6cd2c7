use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

// ambiguous slash dates are read month first; two-digit years come before
// any `%Y` layout, which would otherwise read them as years 1-99
const DATE_TIME_FORMATS: &[&str] = &[
	"%m/%d/%y %H:%M",
	"%m/%d/%y %I:%M %p",
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%d %H:%M",
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %I:%M:%S %p",
	"%Y-%m-%d %I:%M %p",
	"%Y/%m/%d %H:%M:%S",
	"%Y/%m/%d %H:%M",
	"%m/%d/%Y %H:%M:%S",
	"%m/%d/%Y %H:%M",
	"%m/%d/%Y %I:%M:%S %p",
	"%m/%d/%Y %I:%M %p",
	"%d.%m.%Y %H:%M:%S",
	"%d.%m.%Y %H:%M",
	"%d %B %Y %H:%M",
	"%B %d, %Y %H:%M",
	"%B %d, %Y %I:%M %p",
	"%d-%b-%Y %H:%M",
	"%d-%b-%Y %I:%M %p",
	"%Y%m%dT%H%M%S",
];

const OFFSET_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S%z",
	"%Y-%m-%d %H:%M:%S%:z",
	"%Y-%m-%d %H:%M%z",
	"%Y-%m-%d %H:%M%:z",
];

const DATE_FORMATS: &[&str] = &[
	"%m/%d/%y",
	"%Y-%m-%d",
	"%Y/%m/%d",
	"%m/%d/%Y",
	"%d.%m.%Y",
	"%d %B %Y",
	"%B %d, %Y",
	"%d-%b-%Y",
];

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
	DATE_TIME_FORMATS
		.iter()
		.filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
		.find(has_full_year)
}

// `%Y` happily takes one to three digits
fn has_full_year<T: Datelike>(dt: &T) -> bool {
	dt.year() >= 1000
}

/// A parsed schedule timestamp. Offsets are kept only when the source
/// string carried one; nothing is converted between zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
	Floating(NaiveDateTime),
	Fixed(DateTime<FixedOffset>),
}

impl Timestamp {
	/// Wall-clock time as written in the source.
	#[must_use]
	pub fn local(&self) -> NaiveDateTime {
		match self {
			Self::Floating(dt) => *dt,
			Self::Fixed(dt) => dt.naive_local(),
		}
	}

	#[must_use]
	pub fn date(&self) -> NaiveDate {
		self.local().date()
	}

	#[must_use]
	pub fn time(&self) -> NaiveTime {
		self.local().time()
	}
}

impl FromStr for Timestamp {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();

		if s.is_empty() {
			return Err(());
		}

		if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
			return Ok(Self::Fixed(dt));
		}

		if let Some(dt) = OFFSET_FORMATS
			.iter()
			.filter_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
			.find(has_full_year)
		{
			return Ok(Self::Fixed(dt));
		}

		if let Some(dt) = s
			.strip_suffix('Z')
			.or_else(|| s.strip_suffix('z'))
			.and_then(parse_naive)
		{
			return Ok(Self::Fixed(Utc.from_utc_datetime(&dt).fixed_offset()));
		}

		if let Some(dt) = parse_naive(s) {
			return Ok(Self::Floating(dt));
		}

		DATE_FORMATS
			.iter()
			.filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
			.find(has_full_year)
			.map(|date| Self::Floating(date.and_time(NaiveTime::MIN)))
			.ok_or(())
	}
}

/// Parses `s` into a timestamp, or `None` when no known layout matches.
#[must_use]
pub fn normalize(s: &str) -> Option<Timestamp> {
	s.parse().ok()
}

#[cfg(test)]
mod tests {
	use chrono::{Datelike, Timelike};

	use super::*;

	fn floating(s: &str) -> NaiveDateTime {
		match normalize(s) {
			Some(Timestamp::Floating(dt)) => dt,
			other => panic!("expected floating timestamp for {s:?}, got {other:?}"),
		}
	}

	#[test]
	fn accepts_common_layouts() {
		let expected = NaiveDate::from_ymd_opt(2024, 1, 10)
			.unwrap()
			.and_hms_opt(9, 0, 0)
			.unwrap();

		for s in [
			"2024-01-10 09:00",
			"2024-01-10 09:00:00",
			"2024-01-10T09:00",
			"2024-01-10T09:00:00.000",
			"2024/01/10 09:00",
			"01/10/2024 09:00",
			"1/10/2024 9:00 AM",
			"10.01.2024 09:00",
			"January 10, 2024 09:00",
			"10 January 2024 09:00",
			"  2024-01-10 09:00  ",
			"2024-01-10 9:00 AM",
			"2024-01-10 09:00 AM",
			"10-Jan-2024 09:00",
			"1/10/24 9:00",
			"01/10/24 9:00 AM",
		] {
			assert_eq!(floating(s), expected, "{s}");
		}
	}

	#[test]
	fn two_digit_years_are_not_year_one() {
		let dt = floating("1/10/24 9:00");
		assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

		assert_eq!(floating("1/10/24").date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
		assert_eq!(floating("10-Jan-2024").date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

		// year-first layouts must not swallow short years
		assert_eq!(normalize("24/01/10 09:00"), None);
		assert_eq!(normalize("999-01-10"), None);
	}

	#[test]
	fn utc_suffix_keeps_minute_precision() {
		let ts = normalize("2024-01-10 09:00Z").unwrap();

		assert!(matches!(ts, Timestamp::Fixed(dt) if dt.offset().local_minus_utc() == 0));
		assert_eq!(ts.time().hour(), 9);
	}

	#[test]
	fn date_only_is_midnight() {
		let dt = floating("2024-03-05");

		assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));
		assert_eq!(dt.time(), NaiveTime::MIN);
	}

	#[test]
	fn keeps_embedded_offset() {
		let ts = normalize("2024-01-10T09:00:00-05:00").unwrap();

		assert!(matches!(ts, Timestamp::Fixed(_)));
		assert_eq!(ts.time().hour(), 9);
		assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

		assert!(matches!(
			normalize("2024-01-10 09:00:00+0100"),
			Some(Timestamp::Fixed(_))
		));
	}

	#[test]
	fn rejects_garbage_instead_of_defaulting() {
		for s in ["", "   ", "Start", "Total", "TBD", "2024-13-40 09:00", "25:00"] {
			assert_eq!(normalize(s), None, "{s}");
		}
	}
}
