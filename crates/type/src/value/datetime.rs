// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::fmt::{Display, Formatter};

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{self, Visitor},
};

use super::{
	date::{Date, parse_ymd},
	time::{Time, parse_fraction},
};

/// A MySQL DATETIME value: a calendar date plus time of day with
/// microsecond precision. TIMESTAMP values share this representation; the
/// type descriptor keeps them apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime {
	date: Date,
	hour: u8,
	minute: u8,
	second: u8,
	micro: u32,
}

impl Default for DateTime {
	fn default() -> Self {
		Self {
			date: Date::zero(),
			hour: 0,
			minute: 0,
			second: 0,
			micro: 0,
		}
	}
}

impl DateTime {
	pub fn new(date: Date, hour: u32, minute: u32, second: u32, micro: u32) -> Option<Self> {
		if hour > 23 || minute > 59 || second > 59 || micro > 999_999 {
			return None;
		}
		Some(Self {
			date,
			hour: hour as u8,
			minute: minute as u8,
			second: second as u8,
			micro,
		})
	}

	pub fn from_date(date: Date) -> Self {
		Self {
			date,
			hour: 0,
			minute: 0,
			second: 0,
			micro: 0,
		}
	}

	/// Construct from seconds (plus microseconds) since the Unix epoch,
	/// interpreted in UTC.
	pub fn from_unix(seconds: i64, micro: u32) -> Option<Self> {
		if seconds < 0 {
			return None;
		}
		let days = seconds / 86_400;
		let secs = seconds % 86_400;
		let (year, month, day) = civil_from_days(days);
		let date = Date::new(year, month, day)?;
		Self::new(date, (secs / 3600) as u32, (secs / 60 % 60) as u32, (secs % 60) as u32, micro)
	}

	/// Seconds since the Unix epoch. None for the zero date or dates
	/// before 1970.
	pub fn to_unix(&self) -> Option<i64> {
		if self.date.is_zero() {
			return None;
		}
		let days = days_from_civil(self.date.year(), self.date.month(), self.date.day());
		let seconds =
			days * 86_400 + self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64;
		if seconds < 0 {
			return None;
		}
		Some(seconds)
	}

	pub fn date(&self) -> Date {
		self.date
	}

	pub fn time(&self) -> Time {
		// Hour is within 0..=23 so the constructor cannot fail.
		Time::from_hms_micro(self.hour as u32, self.minute as u32, self.second as u32, self.micro)
			.unwrap_or_default()
	}

	pub fn is_zero(&self) -> bool {
		self.date.is_zero()
	}

	pub fn hour(&self) -> u32 {
		self.hour as u32
	}

	pub fn minute(&self) -> u32 {
		self.minute as u32
	}

	pub fn second(&self) -> u32 {
		self.second as u32
	}

	pub fn microsecond(&self) -> u32 {
		self.micro
	}

	pub fn has_time_part(&self) -> bool {
		self.hour != 0 || self.minute != 0 || self.second != 0 || self.micro != 0
	}

	/// Parse MySQL datetime text: a date optionally followed by a time
	/// part separated by space or `T`. A bare date parses to midnight.
	pub fn parse(s: &str) -> Option<Self> {
		let s = s.trim();

		// Compact form YYYYMMDDHHMMSS
		if s.len() == 14 && s.bytes().all(|b| b.is_ascii_digit()) {
			let date = Date::parse(&s[0..8])?;
			let hour = s[8..10].parse().ok()?;
			let minute = s[10..12].parse().ok()?;
			let second = s[12..14].parse().ok()?;
			return Self::new(date, hour, minute, second, 0);
		}

		let split_at = s.find([' ', 'T']);
		let (date_part, time_part) = match split_at {
			Some(idx) => (&s[..idx], Some(s[idx + 1..].trim())),
			None => (s, None),
		};

		let (year, month, day) = parse_ymd(date_part)?;
		let date = Date::new(year, month, day)?;

		let Some(time_part) = time_part.filter(|t| !t.is_empty()) else {
			return Some(Self::from_date(date));
		};

		let (body, frac) = match time_part.split_once('.') {
			Some((body, frac)) => (body, frac),
			None => (time_part, ""),
		};
		let micro = parse_fraction(frac)?;

		let mut parts = body.split(':');
		let hour: u32 = parts.next()?.parse().ok()?;
		let minute: u32 = match parts.next() {
			Some(p) => p.parse().ok()?,
			None => 0,
		};
		let second: u32 = match parts.next() {
			Some(p) => p.parse().ok()?,
			None => 0,
		};
		if parts.next().is_some() {
			return None;
		}
		Self::new(date, hour, minute, second, micro)
	}
}

// Howard Hinnant's civil-from-days / days-from-civil, over the Unix epoch.
pub(crate) fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
	let (y, m) = if month <= 2 {
		(year - 1, month as i64 + 9)
	} else {
		(year, month as i64 - 3)
	};
	let y = y as i64;
	let era = if y >= 0 { y } else { y - 399 } / 400;
	let yoe = y - era * 400;
	let doy = (153 * m + 2) / 5 + day as i64 - 1;
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
	era * 146097 + doe - 719468
}

pub(crate) fn civil_from_days(days: i64) -> (i32, u32, u32) {
	let z = days + 719468;
	let era = if z >= 0 { z } else { z - 146096 } / 146097;
	let doe = z - era * 146097;
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
	let y = yoe + era * 400;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let d = doy - (153 * mp + 2) / 5 + 1;
	let m = if mp < 10 { mp + 3 } else { mp - 9 };
	let year = if m <= 2 { y + 1 } else { y };
	(year as i32, m as u32, d as u32)
}

impl Display for DateTime {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {:02}:{:02}:{:02}", self.date, self.hour, self.minute, self.second)?;
		if self.micro != 0 {
			write!(f, ".{:06}", self.micro)?;
		}
		Ok(())
	}
}

impl Serialize for DateTime {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

struct DateTimeVisitor;

impl<'de> Visitor<'de> for DateTimeVisitor {
	type Value = DateTime;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a datetime in YYYY-MM-DD HH:MM:SS[.ffffff] format")
	}

	fn visit_str<E>(self, value: &str) -> Result<DateTime, E>
	where
		E: de::Error,
	{
		DateTime::parse(value).ok_or_else(|| E::custom(format!("invalid datetime: {}", value)))
	}
}

impl<'de> Deserialize<'de> for DateTime {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_str(DateTimeVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_datetime_display() {
		let dt = DateTime::parse("2024-03-15 13:05:09").unwrap();
		assert_eq!(format!("{}", dt), "2024-03-15 13:05:09");

		let dt = DateTime::parse("2024-03-15 13:05:09.250000").unwrap();
		assert_eq!(format!("{}", dt), "2024-03-15 13:05:09.250000");
	}

	#[test]
	fn test_parse_bare_date_is_midnight() {
		let dt = DateTime::parse("2024-03-15").unwrap();
		assert_eq!(dt.hour(), 0);
		assert_eq!(dt.date(), Date::new(2024, 3, 15).unwrap());
		assert!(!dt.has_time_part());
	}

	#[test]
	fn test_parse_t_separator() {
		let dt = DateTime::parse("2024-03-15T13:05:09").unwrap();
		assert_eq!(dt.hour(), 13);
	}

	#[test]
	fn test_parse_compact() {
		let dt = DateTime::parse("20240315130509").unwrap();
		assert_eq!(format!("{}", dt), "2024-03-15 13:05:09");
	}

	#[test]
	fn test_parse_invalid() {
		assert!(DateTime::parse("2024-03-15 25:00:00").is_none());
		assert!(DateTime::parse("garbage").is_none());
	}

	#[test]
	fn test_unix_roundtrip() {
		let dt = DateTime::parse("2024-03-15 13:05:09").unwrap();
		let secs = dt.to_unix().unwrap();
		assert_eq!(DateTime::from_unix(secs, 0), Some(dt));

		let epoch = DateTime::parse("1970-01-01 00:00:00").unwrap();
		assert_eq!(epoch.to_unix(), Some(0));
	}

	#[test]
	fn test_zero_datetime_has_no_unix_form() {
		let dt = DateTime::parse("0000-00-00").unwrap();
		assert!(dt.is_zero());
		assert!(dt.to_unix().is_none());
	}

	#[test]
	fn test_serde_roundtrip() {
		let dt = DateTime::parse("2024-03-15 13:05:09.000001").unwrap();
		let json = serde_json::to_string(&dt).unwrap();
		let recovered: DateTime = serde_json::from_str(&json).unwrap();
		assert_eq!(dt, recovered);
	}
}
