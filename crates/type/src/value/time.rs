// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::fmt::{Display, Formatter};

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{self, Visitor},
};

/// A MySQL TIME value: a signed duration in the range
/// `-838:59:59.999999` to `838:59:59.999999`, with microsecond precision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Time {
	negative: bool,
	hour: u16,
	minute: u8,
	second: u8,
	micro: u32,
}

pub const TIME_MAX_HOUR: u32 = 838;

impl Default for Time {
	fn default() -> Self {
		Self {
			negative: false,
			hour: 0,
			minute: 0,
			second: 0,
			micro: 0,
		}
	}
}

impl Time {
	pub fn new(negative: bool, hour: u32, minute: u32, second: u32, micro: u32) -> Option<Self> {
		if hour > TIME_MAX_HOUR || minute > 59 || second > 59 || micro > 999_999 {
			return None;
		}
		Some(Self {
			negative: negative && (hour | minute | second | micro) != 0,
			hour: hour as u16,
			minute: minute as u8,
			second: second as u8,
			micro,
		})
	}

	/// Time-of-day constructor used when splitting a DATETIME.
	pub fn from_hms_micro(hour: u32, minute: u32, second: u32, micro: u32) -> Option<Self> {
		if hour > 23 {
			return None;
		}
		Self::new(false, hour, minute, second, micro)
	}

	pub fn is_negative(&self) -> bool {
		self.negative
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

	/// Signed total length in microseconds.
	pub fn as_micros(&self) -> i64 {
		let magnitude = (self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64)
			* 1_000_000 + self.micro as i64;
		if self.negative {
			-magnitude
		} else {
			magnitude
		}
	}

	pub fn from_micros(micros: i64) -> Option<Self> {
		let negative = micros < 0;
		let magnitude = micros.unsigned_abs();
		let micro = (magnitude % 1_000_000) as u32;
		let seconds = magnitude / 1_000_000;
		let hour = (seconds / 3600) as u32;
		Self::new(negative, hour, (seconds / 60 % 60) as u32, (seconds % 60) as u32, micro)
	}

	/// Parse MySQL time text: `[-][H]HH:MM[:SS[.fraction]]`, or the
	/// delimiter-free `[H]HMMSS` form.
	pub fn parse(s: &str) -> Option<Self> {
		let s = s.trim();
		let (negative, rest) = match s.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, s),
		};
		if rest.is_empty() {
			return None;
		}

		let (body, frac) = match rest.split_once('.') {
			Some((body, frac)) => (body, Some(frac)),
			None => (rest, None),
		};
		let micro = match frac {
			Some(frac) => parse_fraction(frac)?,
			None => 0,
		};

		if body.contains(':') {
			let mut parts = body.split(':');
			let hour: u32 = parts.next()?.parse().ok()?;
			let minute: u32 = parts.next()?.parse().ok()?;
			let second: u32 = match parts.next() {
				Some(sec) => sec.parse().ok()?,
				None => 0,
			};
			if parts.next().is_some() {
				return None;
			}
			Self::new(negative, hour, minute, second, micro)
		} else {
			if !body.bytes().all(|b| b.is_ascii_digit()) || body.len() > 7 {
				return None;
			}
			let packed: u64 = body.parse().ok()?;
			let hour = (packed / 10_000) as u32;
			let minute = (packed / 100 % 100) as u32;
			let second = (packed % 100) as u32;
			Self::new(negative, hour, minute, second, micro)
		}
	}
}

/// Fraction digits are microseconds, left-aligned: `.5` is 500000.
pub(crate) fn parse_fraction(frac: &str) -> Option<u32> {
	if frac.is_empty() {
		return Some(0);
	}
	if !frac.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	let digits = &frac[..frac.len().min(6)];
	let mut micro: u32 = digits.parse().ok()?;
	for _ in digits.len()..6 {
		micro *= 10;
	}
	Some(micro)
}

impl PartialOrd for Time {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Time {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.as_micros().cmp(&other.as_micros())
	}
}

impl Display for Time {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.negative {
			f.write_str("-")?;
		}
		write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
		if self.micro != 0 {
			write!(f, ".{:06}", self.micro)?;
		}
		Ok(())
	}
}

impl Serialize for Time {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

struct TimeVisitor;

impl<'de> Visitor<'de> for TimeVisitor {
	type Value = Time;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a time in HH:MM:SS[.ffffff] format")
	}

	fn visit_str<E>(self, value: &str) -> Result<Time, E>
	where
		E: de::Error,
	{
		Time::parse(value).ok_or_else(|| E::custom(format!("invalid time: {}", value)))
	}
}

impl<'de> Deserialize<'de> for Time {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_str(TimeVisitor)
	}
}
