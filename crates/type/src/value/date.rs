// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::fmt::{Display, Formatter};

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{self, Visitor},
};

/// A calendar date (year, month, day) in the range MySQL accepts for the
/// DATE type, plus the zero-date sentinel `0000-00-00`.
///
/// Stored as the literal components rather than an epoch offset: the zero
/// date has no epoch representation, and several functions need to observe
/// it before any arithmetic happens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
	year: i32,
	month: u8,
	day: u8,
}

impl Default for Date {
	fn default() -> Self {
		Self::zero()
	}
}

impl Date {
	/// Check if a year is a leap year. Year 0 is not a leap year, a
	/// historical quirk the day-number arithmetic depends on.
	#[inline]
	pub fn is_leap_year(year: i32) -> bool {
		year != 0 && ((year % 4 == 0 && year % 100 != 0) || year % 400 == 0)
	}

	/// Get the number of days in a month.
	#[inline]
	pub fn days_in_month(year: i32, month: u32) -> u32 {
		match month {
			1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
			4 | 6 | 9 | 11 => 30,
			2 => {
				if Self::is_leap_year(year) {
					29
				} else {
					28
				}
			}
			_ => 0,
		}
	}

	pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
		if year == 0 && month == 0 && day == 0 {
			return Some(Self::zero());
		}
		if !(0..=9999).contains(&year) {
			return None;
		}
		if month < 1 || month > 12 || day < 1 || day > Self::days_in_month(year, month) {
			return None;
		}
		Some(Self {
			year,
			month: month as u8,
			day: day as u8,
		})
	}

	/// The `0000-00-00` sentinel.
	pub fn zero() -> Self {
		Self {
			year: 0,
			month: 0,
			day: 0,
		}
	}

	pub fn is_zero(&self) -> bool {
		self.month == 0
	}

	pub fn year(&self) -> i32 {
		self.year
	}

	pub fn month(&self) -> u32 {
		self.month as u32
	}

	pub fn day(&self) -> u32 {
		self.day as u32
	}

	/// The two-digit year rule: 00-69 map to 2000-2069, 70-99 to
	/// 1970-1999. Years of 100 and above pass through unchanged.
	pub fn adjust_two_digit_year(year: i32) -> i32 {
		if (0..100).contains(&year) {
			adjust_two_digit_year(year)
		} else {
			year
		}
	}

	/// Parse MySQL date text: `YYYY-MM-DD` with any punctuation
	/// delimiter, or the delimiter-free `YYYYMMDD` / `YYMMDD` forms.
	/// Two-digit years map 00-69 to 2000-2069 and 70-99 to 1970-1999.
	pub fn parse(s: &str) -> Option<Self> {
		let s = s.trim();
		let (year, month, day) = parse_ymd(s)?;
		Self::new(year, month, day)
	}
}

pub(crate) fn adjust_two_digit_year(year: i32) -> i32 {
	if year < 70 {
		year + 2000
	} else {
		year + 1900
	}
}

pub(crate) fn parse_ymd(s: &str) -> Option<(i32, u32, u32)> {
	if s.is_empty() {
		return None;
	}
	if s.bytes().all(|b| b.is_ascii_digit()) {
		return match s.len() {
			8 => {
				let year = s[0..4].parse().ok()?;
				let month = s[4..6].parse().ok()?;
				let day = s[6..8].parse().ok()?;
				Some((year, month, day))
			}
			6 => {
				let year = adjust_two_digit_year(s[0..2].parse().ok()?);
				let month = s[2..4].parse().ok()?;
				let day = s[4..6].parse().ok()?;
				Some((year, month, day))
			}
			_ => None,
		};
	}

	let mut parts = s.split(|c: char| !c.is_ascii_digit());
	let year_str = parts.next()?;
	let month_str = parts.next()?;
	let day_str = parts.next()?;
	if parts.next().is_some() {
		return None;
	}

	let mut year: i32 = year_str.parse().ok()?;
	if year_str.len() <= 2 {
		year = adjust_two_digit_year(year);
	}
	let month: u32 = month_str.parse().ok()?;
	let day: u32 = day_str.parse().ok()?;
	Some((year, month, day))
}

impl Display for Date {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
	}
}

impl Serialize for Date {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

struct DateVisitor;

impl<'de> Visitor<'de> for DateVisitor {
	type Value = Date;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a date in YYYY-MM-DD format")
	}

	fn visit_str<E>(self, value: &str) -> Result<Date, E>
	where
		E: de::Error,
	{
		Date::parse(value).ok_or_else(|| E::custom(format!("invalid date: {}", value)))
	}
}

impl<'de> Deserialize<'de> for Date {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_str(DateVisitor)
	}
}
