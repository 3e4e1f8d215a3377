// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Proleptic-Gregorian calendar arithmetic, context-free.
//!
//! Day numbers count from year 0 (day 1 is 0000-01-01, and year 0 is not
//! a leap year), the same origin TO_DAYS/FROM_DAYS expose. Day counts of
//! 365 or less have no valid date and map to the zero-date sentinel.

use myexpr_type::value::Date;

pub mod interval;
pub mod week;

pub use interval::{Interval, IntervalUnit};
pub use week::{WeekMode, calc_week, normalize_week_mode};

/// Days in a year under the calendar's leap rule.
pub fn days_in_year(year: i32) -> i32 {
	if Date::is_leap_year(year) {
		366
	} else {
		365
	}
}

/// Day number of a (year, month, day) triple, counted from year 0.
/// The zero date maps to 0.
pub fn day_number(year: i32, month: u32, day: u32) -> i64 {
	if year == 0 && month == 0 {
		return 0;
	}
	let mut y = year as i64;
	let mut delsum = 365 * y + 31 * (month as i64 - 1) + day as i64;
	if month <= 2 {
		y -= 1;
	} else {
		delsum -= (month as i64 * 4 + 23) / 10;
	}
	let temp = ((y / 100 + 1) * 3) / 4;
	delsum + y / 4 - temp
}

/// Inverse of [`day_number`]. Day counts at or below 365, or beyond the
/// supported range, yield the zero date.
pub fn from_day_number(daynr: i64) -> Date {
	if daynr <= 365 || daynr >= 3_652_500 {
		return Date::zero();
	}

	let mut year = (daynr * 100 / 36525) as i32;
	let temp = (((year as i64 - 1) / 100 + 1) * 3) / 4;
	let mut day_of_year = (daynr - year as i64 * 365 - (year as i64 - 1) / 4 + temp) as i32;
	let mut year_days = days_in_year(year);
	while day_of_year > year_days {
		day_of_year -= year_days;
		year += 1;
		year_days = days_in_year(year);
	}

	let mut leap_day = 0;
	if year_days == 366 && day_of_year > 31 + 28 {
		day_of_year -= 1;
		if day_of_year == 31 + 28 {
			leap_day = 1;
		}
	}

	const MONTH_DAYS: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
	let mut month = 1u32;
	for days in MONTH_DAYS {
		if day_of_year <= days {
			break;
		}
		day_of_year -= days;
		month += 1;
	}

	Date::new(year, month, (day_of_year + leap_day) as u32).unwrap_or_else(Date::zero)
}

/// Weekday of a day number: 0 = Monday when `sunday_first_day` is false,
/// 0 = Sunday when it is true.
pub fn weekday_of(daynr: i64, sunday_first_day: bool) -> u32 {
	let shift = if sunday_first_day {
		6
	} else {
		5
	};
	((daynr + shift) % 7) as u32
}

/// Monday-based weekday (0 = Monday .. 6 = Sunday), the WEEKDAY()
/// convention.
pub fn weekday(date: &Date) -> u32 {
	weekday_of(day_number(date.year(), date.month(), date.day()), false)
}

/// 1-based day of year.
pub fn day_of_year(date: &Date) -> u32 {
	(day_number(date.year(), date.month(), date.day()) - day_number(date.year(), 1, 1) + 1) as u32
}

/// Last day of the date's month.
pub fn last_day(date: &Date) -> Option<Date> {
	if date.is_zero() {
		return None;
	}
	Date::new(date.year(), date.month(), Date::days_in_month(date.year(), date.month()))
}

/// MAKEDATE: the `day_of_year`-th day counted from January 1 of `year`,
/// rolling into following years. Zero or negative day counts are invalid.
pub fn make_date(year: i32, day_of_year: i64) -> Option<Date> {
	if day_of_year <= 0 || !(0..=9999).contains(&year) {
		return None;
	}
	let daynr = day_number(year, 1, 1) + day_of_year - 1;
	let date = from_day_number(daynr);
	if date.is_zero() || date.year() > 9999 {
		return None;
	}
	Some(date)
}

/// Calendar difference in days, `left - right`.
pub fn date_diff(left: &Date, right: &Date) -> i64 {
	day_number(left.year(), left.month(), left.day())
		- day_number(right.year(), right.month(), right.day())
}

/// PERIOD_ADD/PERIOD_DIFF helpers work on YYYYMM periods with two-digit
/// years adjusted the usual way.
pub fn period_to_months(period: u64) -> u64 {
	if period == 0 {
		return 0;
	}
	let mut year = period / 100;
	let month = period % 100;
	if year < 70 {
		year += 2000;
	} else if year < 100 {
		year += 1900;
	}
	year * 12 + month.saturating_sub(1)
}

pub fn months_to_period(months: u64) -> u64 {
	if months == 0 {
		return 0;
	}
	let year = months / 12;
	year * 100 + months % 12 + 1
}
