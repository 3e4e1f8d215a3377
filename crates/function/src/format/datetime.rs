// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! DATE_FORMAT / TIME_FORMAT specifier rendering and its STR_TO_DATE
//! inverse.

use myexpr_type::value::{Date, DateTime, Time};

use crate::calendar::{self, calc_week, normalize_week_mode};

const MONTH_NAMES: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

const WEEKDAY_NAMES: [&str; 7] =
	["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

fn ordinal_suffix(day: u32) -> &'static str {
	match day % 100 {
		11 | 12 | 13 => "th",
		_ => match day % 10 {
			1 => "st",
			2 => "nd",
			3 => "rd",
			_ => "th",
		},
	}
}

fn hour12(hour: u32) -> u32 {
	match hour % 12 {
		0 => 12,
		h => h,
	}
}

fn week_for(date: &Date, mode: u32) -> u32 {
	calc_week(date, normalize_week_mode(mode)).1
}

fn week_year_for(date: &Date, mode: u32) -> i32 {
	calc_week(date, normalize_week_mode(mode).with_year()).0
}

/// Render a datetime through a DATE_FORMAT pattern. None when a specifier
/// needs calendar context (weekday, week, day of year) and the date is
/// the zero sentinel.
pub fn format_date_time(value: &DateTime, pattern: &str) -> Option<String> {
	let date = value.date();
	let mut out = String::with_capacity(pattern.len() * 2);
	let mut chars = pattern.chars();
	while let Some(ch) = chars.next() {
		if ch != '%' {
			out.push(ch);
			continue;
		}
		let Some(spec) = chars.next() else {
			out.push('%');
			break;
		};
		match spec {
			'a' | 'W' | 'w' | 'j' | 'U' | 'u' | 'V' | 'v' | 'X' | 'x' if date.is_zero() => {
				return None;
			}
			'a' => out.push_str(&WEEKDAY_NAMES[calendar::weekday(&date) as usize][..3]),
			'b' => {
				if date.month() == 0 {
					return None;
				}
				out.push_str(&MONTH_NAMES[date.month() as usize - 1][..3]);
			}
			'c' => out.push_str(&date.month().to_string()),
			'D' => {
				out.push_str(&date.day().to_string());
				out.push_str(ordinal_suffix(date.day()));
			}
			'd' => out.push_str(&format!("{:02}", date.day())),
			'e' => out.push_str(&date.day().to_string()),
			'f' => out.push_str(&format!("{:06}", value.microsecond())),
			'H' => out.push_str(&format!("{:02}", value.hour())),
			'h' | 'I' => out.push_str(&format!("{:02}", hour12(value.hour()))),
			'i' => out.push_str(&format!("{:02}", value.minute())),
			'j' => out.push_str(&format!("{:03}", calendar::day_of_year(&date))),
			'k' => out.push_str(&value.hour().to_string()),
			'l' => out.push_str(&hour12(value.hour()).to_string()),
			'M' => {
				if date.month() == 0 {
					return None;
				}
				out.push_str(MONTH_NAMES[date.month() as usize - 1]);
			}
			'm' => out.push_str(&format!("{:02}", date.month())),
			'p' => out.push_str(if value.hour() < 12 {
				"AM"
			} else {
				"PM"
			}),
			'r' => out.push_str(&format!(
				"{:02}:{:02}:{:02} {}",
				hour12(value.hour()),
				value.minute(),
				value.second(),
				if value.hour() < 12 {
					"AM"
				} else {
					"PM"
				}
			)),
			'S' | 's' => out.push_str(&format!("{:02}", value.second())),
			'T' => out.push_str(&format!(
				"{:02}:{:02}:{:02}",
				value.hour(),
				value.minute(),
				value.second()
			)),
			'U' => out.push_str(&format!("{:02}", week_for(&date, 0))),
			'u' => out.push_str(&format!("{:02}", week_for(&date, 1))),
			'V' => out.push_str(&format!("{:02}", week_for(&date, 2))),
			'v' => out.push_str(&format!("{:02}", week_for(&date, 3))),
			'W' => out.push_str(WEEKDAY_NAMES[calendar::weekday(&date) as usize]),
			'w' => {
				// 0 = Sunday in this specifier
				out.push_str(&((calendar::weekday(&date) + 1) % 7).to_string());
			}
			'X' => out.push_str(&format!("{:04}", week_year_for(&date, 2))),
			'x' => out.push_str(&format!("{:04}", week_year_for(&date, 3))),
			'Y' => out.push_str(&format!("{:04}", date.year())),
			'y' => out.push_str(&format!("{:02}", date.year() % 100)),
			'%' => out.push('%'),
			other => out.push(other),
		}
	}
	Some(out)
}

/// TIME_FORMAT: only time specifiers are meaningful. Hours may exceed 23
/// because TIME is a duration. Date-dependent specifiers yield None.
pub fn format_time_only(value: &Time, pattern: &str) -> Option<String> {
	let mut out = String::with_capacity(pattern.len() * 2);
	let sign = if value.is_negative() {
		"-"
	} else {
		""
	};
	let mut chars = pattern.chars();
	while let Some(ch) = chars.next() {
		if ch != '%' {
			out.push(ch);
			continue;
		}
		let Some(spec) = chars.next() else {
			out.push('%');
			break;
		};
		match spec {
			'f' => out.push_str(&format!("{:06}", value.microsecond())),
			'H' => out.push_str(&format!("{}{:02}", sign, value.hour())),
			'h' | 'I' => out.push_str(&format!("{}{:02}", sign, hour12(value.hour() % 24))),
			'i' => out.push_str(&format!("{:02}", value.minute())),
			'k' => out.push_str(&format!("{}{}", sign, value.hour())),
			'l' => out.push_str(&format!("{}{}", sign, hour12(value.hour() % 24))),
			'p' => out.push_str(if value.hour() % 24 < 12 {
				"AM"
			} else {
				"PM"
			}),
			'r' => out.push_str(&format!(
				"{}{:02}:{:02}:{:02} {}",
				sign,
				hour12(value.hour() % 24),
				value.minute(),
				value.second(),
				if value.hour() % 24 < 12 {
					"AM"
				} else {
					"PM"
				}
			)),
			'S' | 's' => out.push_str(&format!("{:02}", value.second())),
			'T' => out.push_str(&format!(
				"{}{:02}:{:02}:{:02}",
				sign,
				value.hour(),
				value.minute(),
				value.second()
			)),
			'%' => out.push('%'),
			// anything that needs a calendar date
			'a' | 'b' | 'c' | 'D' | 'd' | 'e' | 'j' | 'M' | 'm' | 'U' | 'u' | 'V' | 'v' | 'W'
			| 'w' | 'X' | 'x' | 'Y' | 'y' => return None,
			other => out.push(other),
		}
	}
	Some(out)
}

/// What STR_TO_DATE produced, depending on which field classes the
/// pattern populated.
#[derive(Clone, Debug, PartialEq)]
pub enum StrToDateResult {
	Date(Date),
	Time(Time),
	DateTime(DateTime),
}

#[derive(Default)]
struct ParsedFields {
	year: Option<i32>,
	month: Option<u32>,
	day: Option<u32>,
	day_of_year: Option<u32>,
	hour: Option<u32>,
	hour12: Option<u32>,
	pm: Option<bool>,
	minute: Option<u32>,
	second: Option<u32>,
	micro: Option<u32>,
}

struct Scanner<'a> {
	rest: &'a str,
}

impl<'a> Scanner<'a> {
	fn new(input: &'a str) -> Self {
		Self {
			rest: input.trim(),
		}
	}

	fn number(&mut self, max_digits: usize) -> Option<u32> {
		let len = self.rest.bytes().take(max_digits).take_while(|b| b.is_ascii_digit()).count();
		if len == 0 {
			return None;
		}
		let value = self.rest[..len].parse().ok()?;
		self.rest = &self.rest[len..];
		Some(value)
	}

	fn fraction(&mut self) -> Option<u32> {
		let len = self.rest.bytes().take(6).take_while(|b| b.is_ascii_digit()).count();
		if len == 0 {
			return None;
		}
		let mut value: u32 = self.rest[..len].parse().ok()?;
		for _ in len..6 {
			value *= 10;
		}
		self.rest = &self.rest[len..];
		Some(value)
	}

	/// Match one of `names`, or its 3-letter prefix, case-insensitively.
	/// Returns the 1-based index.
	fn name(&mut self, names: &[&str], abbreviated: bool) -> Option<u32> {
		for (idx, full) in names.iter().enumerate() {
			let candidate = if abbreviated {
				&full[..3]
			} else {
				full
			};
			if self.rest.len() >= candidate.len()
				&& self.rest[..candidate.len()].eq_ignore_ascii_case(candidate)
			{
				self.rest = &self.rest[candidate.len()..];
				return Some(idx as u32 + 1);
			}
		}
		None
	}

	fn literal(&mut self, ch: char) -> bool {
		if ch.is_whitespace() {
			// any run of whitespace matches
			self.rest = self.rest.trim_start();
			return true;
		}
		match self.rest.strip_prefix(ch) {
			Some(rest) => {
				self.rest = rest;
				true
			}
			None => false,
		}
	}

	fn meridiem(&mut self) -> Option<bool> {
		let head = self.rest.get(..2)?;
		let pm = if head.eq_ignore_ascii_case("AM") {
			false
		} else if head.eq_ignore_ascii_case("PM") {
			true
		} else {
			return None;
		};
		self.rest = &self.rest[2..];
		Some(pm)
	}
}

fn scan_field(scanner: &mut Scanner, fields: &mut ParsedFields, spec: char) -> bool {
	match spec {
		'Y' => match scanner.number(4) {
			Some(v) => {
				fields.year = Some(v as i32);
				true
			}
			None => false,
		},
		'y' => match scanner.number(2) {
			Some(v) => {
				fields.year = Some(if v < 70 {
					v as i32 + 2000
				} else {
					v as i32 + 1900
				});
				true
			}
			None => false,
		},
		'm' | 'c' => match scanner.number(2) {
			Some(v) => {
				fields.month = Some(v);
				true
			}
			None => false,
		},
		'b' => match scanner.name(&MONTH_NAMES, true) {
			Some(v) => {
				fields.month = Some(v);
				true
			}
			None => false,
		},
		'M' => match scanner.name(&MONTH_NAMES, false) {
			Some(v) => {
				fields.month = Some(v);
				true
			}
			None => false,
		},
		'd' | 'e' => match scanner.number(2) {
			Some(v) => {
				fields.day = Some(v);
				true
			}
			None => false,
		},
		'D' => {
			let Some(v) = scanner.number(2) else {
				return false;
			};
			fields.day = Some(v);
			// the English suffix is required
			scanner.literal_suffix()
		}
		'j' => match scanner.number(3) {
			Some(v) => {
				fields.day_of_year = Some(v);
				true
			}
			None => false,
		},
		'H' | 'k' => match scanner.number(2) {
			Some(v) => {
				fields.hour = Some(v);
				true
			}
			None => false,
		},
		'h' | 'I' | 'l' => match scanner.number(2) {
			Some(v) => {
				fields.hour12 = Some(v);
				true
			}
			None => false,
		},
		'i' => match scanner.number(2) {
			Some(v) => {
				fields.minute = Some(v);
				true
			}
			None => false,
		},
		'S' | 's' => match scanner.number(2) {
			Some(v) => {
				fields.second = Some(v);
				true
			}
			None => false,
		},
		'f' => match scanner.fraction() {
			Some(v) => {
				fields.micro = Some(v);
				true
			}
			None => false,
		},
		'p' => match scanner.meridiem() {
			Some(pm) => {
				fields.pm = Some(pm);
				true
			}
			None => false,
		},
		'a' => scanner.name(&WEEKDAY_NAMES, true).is_some(),
		'W' => scanner.name(&WEEKDAY_NAMES, false).is_some(),
		'T' => {
			scan_field(scanner, fields, 'H')
				&& scanner.literal(':')
				&& scan_field(scanner, fields, 'i')
				&& scanner.literal(':')
				&& scan_field(scanner, fields, 's')
		}
		'r' => {
			scan_field(scanner, fields, 'h')
				&& scanner.literal(':')
				&& scan_field(scanner, fields, 'i')
				&& scanner.literal(':')
				&& scan_field(scanner, fields, 's')
				&& scanner.literal(' ')
				&& scan_field(scanner, fields, 'p')
		}
		'%' => scanner.literal('%'),
		other => scanner.literal(other),
	}
}

impl Scanner<'_> {
	fn literal_suffix(&mut self) -> bool {
		let head = match self.rest.get(..2) {
			Some(h) => h,
			None => return false,
		};
		if ["st", "nd", "rd", "th"].iter().any(|s| head.eq_ignore_ascii_case(s)) {
			self.rest = &self.rest[2..];
			true
		} else {
			false
		}
	}
}

/// Parse text against a DATE_FORMAT pattern. None on any mismatch, on
/// trailing unmatched input, or when the populated fields do not form a
/// valid date or time.
pub fn str_to_date(input: &str, pattern: &str) -> Option<StrToDateResult> {
	let mut scanner = Scanner::new(input);
	let mut fields = ParsedFields::default();

	let mut chars = pattern.chars();
	while let Some(ch) = chars.next() {
		if ch != '%' {
			if !scanner.literal(ch) {
				return None;
			}
			continue;
		}
		let spec = chars.next()?;
		if !scan_field(&mut scanner, &mut fields, spec) {
			return None;
		}
	}
	if !scanner.rest.trim().is_empty() {
		return None;
	}

	let hour = match (fields.hour, fields.hour12, fields.pm) {
		(Some(h), _, _) => Some(h),
		(None, Some(h), pm) => {
			if h == 0 || h > 12 {
				return None;
			}
			let base = h % 12;
			Some(if pm == Some(true) {
				base + 12
			} else {
				base
			})
		}
		(None, None, _) => None,
	};

	let has_time =
		hour.is_some() || fields.minute.is_some() || fields.second.is_some() || fields.micro.is_some();

	let date = if let (Some(year), Some(doy)) = (fields.year, fields.day_of_year) {
		Some(calendar::make_date(year, doy as i64)?)
	} else if fields.year.is_some() || fields.month.is_some() || fields.day.is_some() {
		// a partial date never forms a value
		let year = fields.year?;
		let month = fields.month?;
		let day = fields.day?;
		Some(Date::new(year, month, day)?)
	} else {
		None
	};

	match (date, has_time) {
		(Some(date), false) => Some(StrToDateResult::Date(date)),
		(Some(date), true) => Some(StrToDateResult::DateTime(DateTime::new(
			date,
			hour.unwrap_or(0),
			fields.minute.unwrap_or(0),
			fields.second.unwrap_or(0),
			fields.micro.unwrap_or(0),
		)?)),
		(None, true) => Some(StrToDateResult::Time(Time::from_hms_micro(
			hour.unwrap_or(0),
			fields.minute.unwrap_or(0),
			fields.second.unwrap_or(0),
			fields.micro.unwrap_or(0),
		)?)),
		(None, false) => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dt(s: &str) -> DateTime {
		DateTime::parse(s).unwrap()
	}

	#[test]
	fn test_format_basic_specifiers() {
		let value = dt("2009-10-04 22:23:00");
		assert_eq!(
			format_date_time(&value, "%W %M %Y").as_deref(),
			Some("Sunday October 2009")
		);
		assert_eq!(format_date_time(&value, "%H:%i:%s").as_deref(), Some("22:23:00"));
		assert_eq!(format_date_time(&value, "%D of %M").as_deref(), Some("4th of October"));
	}

	#[test]
	fn test_format_twelve_hour_clock() {
		assert_eq!(
			format_date_time(&dt("2024-01-01 00:30:00"), "%h:%i %p").as_deref(),
			Some("12:30 AM")
		);
		assert_eq!(
			format_date_time(&dt("2024-01-01 13:05:09"), "%r").as_deref(),
			Some("01:05:09 PM")
		);
	}

	#[test]
	fn test_format_week_specifiers() {
		let value = dt("2000-01-01");
		assert_eq!(format_date_time(&value, "%U").as_deref(), Some("00"));
		assert_eq!(format_date_time(&value, "%V/%X").as_deref(), Some("52/1999"));
	}

	#[test]
	fn test_format_literal_percent_and_unknown() {
		let value = dt("2024-01-01");
		assert_eq!(format_date_time(&value, "100%%").as_deref(), Some("100%"));
		assert_eq!(format_date_time(&value, "%Q").as_deref(), Some("Q"));
	}

	#[test]
	fn test_format_zero_date_weekday_is_none() {
		let value = DateTime::parse("0000-00-00").unwrap();
		assert_eq!(format_date_time(&value, "%W"), None);
		assert_eq!(format_date_time(&value, "%Y").as_deref(), Some("0000"));
	}

	#[test]
	fn test_time_format() {
		let t = Time::parse("123:45:07").unwrap();
		assert_eq!(format_time_only(&t, "%T").as_deref(), Some("123:45:07"));
		assert_eq!(format_time_only(&t, "%i.%s").as_deref(), Some("45.07"));
		assert_eq!(format_time_only(&t, "%Y"), None);
	}

	#[test]
	fn test_str_to_date_full_datetime() {
		assert_eq!(
			str_to_date("2024-03-15 13:05:09", "%Y-%m-%d %H:%i:%s"),
			Some(StrToDateResult::DateTime(dt("2024-03-15 13:05:09")))
		);
	}

	#[test]
	fn test_str_to_date_date_only() {
		assert_eq!(
			str_to_date("May 1, 2013", "%M %d, %Y"),
			Some(StrToDateResult::Date(Date::new(2013, 5, 1).unwrap()))
		);
		assert_eq!(
			str_to_date("01,5,2013", "%d,%m,%Y"),
			Some(StrToDateResult::Date(Date::new(2013, 5, 1).unwrap()))
		);
	}

	#[test]
	fn test_str_to_date_time_only() {
		assert_eq!(
			str_to_date("09:30:17", "%h:%i:%s"),
			Some(StrToDateResult::Time(Time::parse("09:30:17").unwrap()))
		);
		assert_eq!(
			str_to_date("09:30:17 PM", "%r"),
			Some(StrToDateResult::Time(Time::parse("21:30:17").unwrap()))
		);
	}

	#[test]
	fn test_str_to_date_day_of_year() {
		assert_eq!(
			str_to_date("2024 366", "%Y %j"),
			Some(StrToDateResult::Date(Date::new(2024, 12, 31).unwrap()))
		);
	}

	#[test]
	fn test_str_to_date_rejects_mismatch() {
		assert_eq!(str_to_date("2024/03/15", "%Y-%m-%d"), None);
		assert_eq!(str_to_date("2024-03-15 junk", "%Y-%m-%d"), None);
		assert_eq!(str_to_date("2024-02-30", "%Y-%m-%d"), None);
		// partial dates are invalid
		assert_eq!(str_to_date("2024-03", "%Y-%m"), None);
	}

	#[test]
	fn test_str_to_date_month_name_abbreviation() {
		assert_eq!(
			str_to_date("15 Sep 2024", "%d %b %Y"),
			Some(StrToDateResult::Date(Date::new(2024, 9, 15).unwrap()))
		);
	}
}
