// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! DATE_ADD/DATE_SUB/TIMESTAMPDIFF interval arithmetic.
//!
//! An interval is kept as three independent magnitudes (months, days,
//! microseconds) because month arithmetic does not commute with day
//! arithmetic: adding a month clamps to the target month's last day
//! before any day or time offset applies.

use myexpr_type::value::{Date, DateTime};

use super::{day_number, from_day_number};

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// The unit keyword of an INTERVAL expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntervalUnit {
	Microsecond,
	Second,
	Minute,
	Hour,
	Day,
	Week,
	Month,
	Quarter,
	Year,
	SecondMicrosecond,
	MinuteMicrosecond,
	MinuteSecond,
	HourMicrosecond,
	HourSecond,
	HourMinute,
	DayMicrosecond,
	DaySecond,
	DayMinute,
	DayHour,
	YearMonth,
}

impl IntervalUnit {
	pub fn parse(name: &str) -> Option<Self> {
		Some(match name.trim().to_ascii_uppercase().as_str() {
			"MICROSECOND" => Self::Microsecond,
			"SECOND" => Self::Second,
			"MINUTE" => Self::Minute,
			"HOUR" => Self::Hour,
			"DAY" => Self::Day,
			"WEEK" => Self::Week,
			"MONTH" => Self::Month,
			"QUARTER" => Self::Quarter,
			"YEAR" => Self::Year,
			"SECOND_MICROSECOND" => Self::SecondMicrosecond,
			"MINUTE_MICROSECOND" => Self::MinuteMicrosecond,
			"MINUTE_SECOND" => Self::MinuteSecond,
			"HOUR_MICROSECOND" => Self::HourMicrosecond,
			"HOUR_SECOND" => Self::HourSecond,
			"HOUR_MINUTE" => Self::HourMinute,
			"DAY_MICROSECOND" => Self::DayMicrosecond,
			"DAY_SECOND" => Self::DaySecond,
			"DAY_MINUTE" => Self::DayMinute,
			"DAY_HOUR" => Self::DayHour,
			"YEAR_MONTH" => Self::YearMonth,
			_ => return None,
		})
	}

	/// Whether a DATE stays a DATE when this unit is added. Units with a
	/// sub-day component promote DATE to DATETIME.
	pub fn keeps_date(&self) -> bool {
		matches!(
			self,
			Self::Day | Self::Week | Self::Month | Self::Quarter | Self::Year | Self::YearMonth
		)
	}

	fn is_composite(&self) -> bool {
		!matches!(
			self,
			Self::Microsecond
				| Self::Second | Self::Minute
				| Self::Hour | Self::Day
				| Self::Week | Self::Month
				| Self::Quarter | Self::Year
		)
	}

	/// Field slots of a composite literal, most significant first, as
	/// (months, days, micros) multipliers.
	fn slots(&self) -> &'static [(i64, i64, i64)] {
		const MONTH: (i64, i64, i64) = (1, 0, 0);
		const YEAR: (i64, i64, i64) = (12, 0, 0);
		const DAY: (i64, i64, i64) = (0, 1, 0);
		const HOUR: (i64, i64, i64) = (0, 0, MICROS_PER_HOUR);
		const MINUTE: (i64, i64, i64) = (0, 0, MICROS_PER_MINUTE);
		const SECOND: (i64, i64, i64) = (0, 0, MICROS_PER_SECOND);
		const MICRO: (i64, i64, i64) = (0, 0, 1);
		match self {
			Self::SecondMicrosecond => &[SECOND, MICRO],
			Self::MinuteMicrosecond => &[MINUTE, SECOND, MICRO],
			Self::MinuteSecond => &[MINUTE, SECOND],
			Self::HourMicrosecond => &[HOUR, MINUTE, SECOND, MICRO],
			Self::HourSecond => &[HOUR, MINUTE, SECOND],
			Self::HourMinute => &[HOUR, MINUTE],
			Self::DayMicrosecond => &[DAY, HOUR, MINUTE, SECOND, MICRO],
			Self::DaySecond => &[DAY, HOUR, MINUTE, SECOND],
			Self::DayMinute => &[DAY, HOUR, MINUTE],
			Self::DayHour => &[DAY, HOUR],
			Self::YearMonth => &[YEAR, MONTH],
			_ => &[],
		}
	}
}

/// A resolved interval quantity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Interval {
	pub months: i64,
	pub days: i64,
	pub micros: i64,
}

impl Interval {
	/// Build from a single integer count of `unit`. Composite units
	/// treat the integer as their least significant field, the same way
	/// a bare number in the literal position does.
	pub fn from_count(unit: IntervalUnit, count: i64) -> Self {
		match unit {
			IntervalUnit::Microsecond => Self {
				micros: count,
				..Default::default()
			},
			IntervalUnit::Second | IntervalUnit::SecondMicrosecond | IntervalUnit::MinuteSecond => {
				Self {
					micros: count.saturating_mul(MICROS_PER_SECOND),
					..Default::default()
				}
			}
			IntervalUnit::Minute | IntervalUnit::HourMinute | IntervalUnit::DayMinute => Self {
				micros: count.saturating_mul(MICROS_PER_MINUTE),
				..Default::default()
			},
			IntervalUnit::Hour | IntervalUnit::DayHour => Self {
				micros: count.saturating_mul(MICROS_PER_HOUR),
				..Default::default()
			},
			IntervalUnit::MinuteMicrosecond
			| IntervalUnit::HourMicrosecond
			| IntervalUnit::DayMicrosecond => Self {
				micros: count,
				..Default::default()
			},
			IntervalUnit::HourSecond | IntervalUnit::DaySecond => Self {
				micros: count.saturating_mul(MICROS_PER_SECOND),
				..Default::default()
			},
			IntervalUnit::Day => Self {
				days: count,
				..Default::default()
			},
			IntervalUnit::Week => Self {
				days: count.saturating_mul(7),
				..Default::default()
			},
			IntervalUnit::Month | IntervalUnit::YearMonth => Self {
				months: count,
				..Default::default()
			},
			IntervalUnit::Quarter => Self {
				months: count.saturating_mul(3),
				..Default::default()
			},
			IntervalUnit::Year => Self {
				months: count.saturating_mul(12),
				..Default::default()
			},
		}
	}

	/// Parse an interval literal for `unit`. Single units accept a
	/// signed integer (a fractional SECOND carries microseconds).
	/// Composite units split the text into digit groups and right-align
	/// them against the unit's fields, so `'1:1'` for DAY_MINUTE means
	/// one hour one minute. A leading `-` negates the whole quantity.
	pub fn parse(unit: IntervalUnit, text: &str) -> Option<Self> {
		let text = text.trim();
		let (negative, body) = match text.strip_prefix('-') {
			Some(rest) => (true, rest.trim_start()),
			None => (false, text),
		};

		if !unit.is_composite() {
			let mut iv = if unit == IntervalUnit::Second {
				let (sec, frac) = match body.split_once('.') {
					Some((sec, frac)) => (sec, frac),
					None => (body, ""),
				};
				let seconds: i64 = sec.parse().ok()?;
				let micros = parse_micro_fraction(frac)?;
				Self {
					micros: seconds
						.checked_mul(MICROS_PER_SECOND)?
						.checked_add(micros)?,
					..Default::default()
				}
			} else {
				Self::from_count(unit, body.parse().ok()?)
			};
			if negative {
				iv = iv.negated();
			}
			return Some(iv);
		}

		let slots = unit.slots();
		let has_micro_slot = slots.last() == Some(&(0, 0, 1));
		let mut groups: Vec<i64> = Vec::with_capacity(slots.len());

		// The microsecond group is left-aligned within 6 digits, every
		// other group is a plain integer.
		let raw: Vec<&str> =
			body.split(|c: char| !c.is_ascii_digit()).filter(|f| !f.is_empty()).collect();
		if raw.is_empty() || raw.len() > slots.len() {
			return None;
		}
		for (idx, group) in raw.iter().enumerate() {
			let is_micro = has_micro_slot && idx == raw.len() - 1 && raw.len() == slots.len();
			if is_micro {
				groups.push(parse_micro_fraction(group)?);
			} else {
				groups.push(group.parse().ok()?);
			}
		}

		// Right-align: missing groups are the most significant ones.
		let offset = slots.len() - groups.len();
		let mut iv = Self::default();
		for (idx, value) in groups.into_iter().enumerate() {
			let (months, days, micros) = slots[offset + idx];
			iv.months = iv.months.checked_add(months.checked_mul(value)?)?;
			iv.days = iv.days.checked_add(days.checked_mul(value)?)?;
			iv.micros = iv.micros.checked_add(micros.checked_mul(value)?)?;
		}
		if negative {
			iv = iv.negated();
		}
		Some(iv)
	}

	pub fn negated(&self) -> Self {
		Self {
			months: -self.months,
			days: -self.days,
			micros: -self.micros,
		}
	}

	/// Whether any sub-day component is present.
	pub fn has_time_part(&self) -> bool {
		self.micros != 0
	}
}

fn parse_micro_fraction(frac: &str) -> Option<i64> {
	if frac.is_empty() {
		return Some(0);
	}
	if frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	let mut micros: i64 = frac.parse().ok()?;
	for _ in frac.len()..6 {
		micros *= 10;
	}
	Some(micros)
}

/// Add an interval to a datetime. Months apply first with the day clamped
/// to the target month's length, then days and microseconds. None when
/// the result leaves the supported range.
pub fn add_interval(value: &DateTime, interval: &Interval) -> Option<DateTime> {
	if value.is_zero() {
		return None;
	}
	let date = value.date();

	// Month arithmetic on the calendar components.
	let total_months =
		(date.year() as i64 * 12 + date.month() as i64 - 1).checked_add(interval.months)?;
	if total_months < 0 {
		return None;
	}
	let year = (total_months / 12) as i32;
	let month = (total_months % 12 + 1) as u32;
	let day = date.day().min(Date::days_in_month(year, month));
	let date = Date::new(year, month, day)?;

	// Remaining offsets as one day count plus a sub-day remainder.
	let time_micros = value.hour() as i64 * MICROS_PER_HOUR
		+ value.minute() as i64 * MICROS_PER_MINUTE
		+ value.second() as i64 * MICROS_PER_SECOND
		+ value.microsecond() as i64;
	let offset = interval
		.days
		.checked_mul(MICROS_PER_DAY)?
		.checked_add(interval.micros)?
		.checked_add(time_micros)?;

	let daynr = day_number(date.year(), date.month(), date.day())
		.checked_add(offset.div_euclid(MICROS_PER_DAY))?;
	let rem = offset.rem_euclid(MICROS_PER_DAY);

	let date = from_day_number(daynr);
	if date.is_zero() {
		return None;
	}
	DateTime::new(
		date,
		(rem / MICROS_PER_HOUR) as u32,
		(rem / MICROS_PER_MINUTE % 60) as u32,
		(rem / MICROS_PER_SECOND % 60) as u32,
		(rem % MICROS_PER_SECOND) as u32,
	)
}

/// Absolute microsecond position of a datetime, for unit differences.
fn micros_of(value: &DateTime) -> i64 {
	let date = value.date();
	day_number(date.year(), date.month(), date.day()) * MICROS_PER_DAY
		+ value.hour() as i64 * MICROS_PER_HOUR
		+ value.minute() as i64 * MICROS_PER_MINUTE
		+ value.second() as i64 * MICROS_PER_SECOND
		+ value.microsecond() as i64
}

/// Whole months from `from` to `to`, with the partial-month adjustment
/// TIMESTAMPDIFF applies: the count only ticks once the day (and then the
/// time of day) of the later endpoint has caught up.
fn months_between(from: &DateTime, to: &DateTime) -> i64 {
	let (lo, hi, sign) = if micros_of(from) <= micros_of(to) {
		(from, to, 1)
	} else {
		(to, from, -1)
	};
	let (ld, hd) = (lo.date(), hi.date());
	let mut months =
		(hd.year() as i64 - ld.year() as i64) * 12 + hd.month() as i64 - ld.month() as i64;
	let lo_time = micros_of(lo) % MICROS_PER_DAY;
	let hi_time = micros_of(hi) % MICROS_PER_DAY;
	if hd.day() < ld.day() || (hd.day() == ld.day() && hi_time < lo_time) {
		months -= 1;
	}
	months * sign
}

/// TIMESTAMPDIFF: the number of whole `unit`s between two datetimes,
/// signed, truncated toward zero.
pub fn timestamp_diff(unit: IntervalUnit, from: &DateTime, to: &DateTime) -> Option<i64> {
	if from.is_zero() || to.is_zero() {
		return None;
	}
	Some(match unit {
		IntervalUnit::Year => months_between(from, to) / 12,
		IntervalUnit::Quarter => months_between(from, to) / 3,
		IntervalUnit::Month => months_between(from, to),
		IntervalUnit::Week => (micros_of(to) - micros_of(from)) / (7 * MICROS_PER_DAY),
		IntervalUnit::Day => (micros_of(to) - micros_of(from)) / MICROS_PER_DAY,
		IntervalUnit::Hour => (micros_of(to) - micros_of(from)) / MICROS_PER_HOUR,
		IntervalUnit::Minute => (micros_of(to) - micros_of(from)) / MICROS_PER_MINUTE,
		IntervalUnit::Second => (micros_of(to) - micros_of(from)) / MICROS_PER_SECOND,
		IntervalUnit::Microsecond => micros_of(to) - micros_of(from),
		_ => return None,
	})
}
