// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! WEEK/YEARWEEK mode handling.
//!
//! A week mode is a 3-bit flag set. Bit 0 makes Monday the first day of
//! the week, bit 1 allows week 0 instead of rolling back into the prior
//! year, and bit 2 switches the "first week" rule from "contains 4 or
//! more days of the year" to "contains the year's first week-start day".

use myexpr_type::value::Date;

use super::{day_number, days_in_year, weekday_of};

/// Normalized week-mode flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WeekMode(u32);

impl WeekMode {
	pub const MONDAY_FIRST: u32 = 1;
	pub const YEAR: u32 = 2;
	pub const FIRST_WEEKDAY: u32 = 4;

	pub fn monday_first(&self) -> bool {
		self.0 & Self::MONDAY_FIRST != 0
	}

	pub fn week_year(&self) -> bool {
		self.0 & Self::YEAR != 0
	}

	pub fn first_weekday(&self) -> bool {
		self.0 & Self::FIRST_WEEKDAY != 0
	}

	/// Force the year flag, as YEARWEEK does. The mode is already
	/// normalized, so only the flag bit changes.
	pub fn with_year(self) -> Self {
		WeekMode(self.0 | Self::YEAR)
	}
}

/// Reduce a raw mode argument to its three flag bits. Sunday-first modes
/// flip the first-weekday bit so that the internal rule table only has to
/// cover four combinations.
pub fn normalize_week_mode(mode: u32) -> WeekMode {
	let mut mode = mode & 7;
	if mode & WeekMode::MONDAY_FIRST == 0 {
		mode ^= WeekMode::FIRST_WEEKDAY;
	}
	WeekMode(mode)
}

/// Week number of a date under the given mode, together with the year the
/// week belongs to. The returned year differs from the date's calendar
/// year when the date falls in a week that straddles January 1 and the
/// mode assigns that week to the neighbouring year.
pub fn calc_week(date: &Date, mode: WeekMode) -> (i32, u32) {
	let daynr = day_number(date.year(), date.month(), date.day());
	let mut first_daynr = day_number(date.year(), 1, 1);
	let mut week_year = mode.week_year();
	let mut year = date.year();

	let mut weekday = weekday_of(first_daynr, !mode.monday_first()) as i64;

	if date.month() == 1 && date.day() as i64 <= 7 - weekday {
		if !week_year
			&& ((mode.first_weekday() && weekday != 0)
				|| (!mode.first_weekday() && weekday >= 4))
		{
			return (year, 0);
		}
		week_year = true;
		year -= 1;
		let days = days_in_year(year) as i64;
		first_daynr -= days;
		weekday = (weekday + 53 * 7 - days) % 7;
	}

	let days = if (mode.first_weekday() && weekday != 0)
		|| (!mode.first_weekday() && weekday >= 4)
	{
		daynr - (first_daynr + (7 - weekday))
	} else {
		daynr - (first_daynr - weekday)
	};

	if week_year && days >= 52 * 7 {
		weekday = (weekday + days_in_year(year) as i64) % 7;
		if (!mode.first_weekday() && weekday < 4) || (mode.first_weekday() && weekday == 0) {
			return (year + 1, 1);
		}
	}

	(year, (days / 7 + 1) as u32)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn week(s: &str, mode: u32) -> u32 {
		calc_week(&Date::parse(s).unwrap(), normalize_week_mode(mode)).1
	}

	fn yearweek(s: &str, mode: u32) -> i64 {
		let (year, wk) =
			calc_week(&Date::parse(s).unwrap(), normalize_week_mode(mode).with_year());
		year as i64 * 100 + wk as i64
	}

	#[test]
	fn test_week_modes_at_year_start() {
		// 2000-01-01 was a Saturday
		assert_eq!(week("2000-01-01", 0), 0);
		assert_eq!(week("2000-01-01", 1), 0);
		assert_eq!(week("2000-01-01", 2), 52);
		assert_eq!(week("2000-01-01", 3), 52);
		assert_eq!(week("2000-01-01", 4), 0);
		assert_eq!(week("2000-01-01", 5), 0);
		assert_eq!(week("2000-01-01", 6), 52);
		assert_eq!(week("2000-01-01", 7), 52);
	}

	#[test]
	fn test_week_modes_mid_year() {
		assert_eq!(week("2008-02-20", 0), 7);
		assert_eq!(week("2008-02-20", 1), 8);
		assert_eq!(week("2008-12-31", 1), 53);
	}

	#[test]
	fn test_yearweek_rolls_back() {
		assert_eq!(yearweek("2000-01-01", 0), 199952);
		assert_eq!(yearweek("2000-01-01", 0) / 100, 1999);
		assert_eq!(yearweek("1987-01-01", 0), 198652);
	}

	#[test]
	fn test_yearweek_mid_year_keeps_year() {
		assert_eq!(yearweek("2024-06-15", 0), 202423);
	}

	#[test]
	fn test_iso_week() {
		// mode 3 is ISO 8601
		assert_eq!(week("2005-01-01", 3), 53);
		assert_eq!(week("2004-12-31", 3), 53);
		assert_eq!(week("2005-01-03", 3), 1);
	}

	#[test]
	fn test_mode_normalization_folds_high_bits() {
		assert_eq!(week("2008-02-20", 8), week("2008-02-20", 0));
		assert_eq!(week("2008-02-20", 15), week("2008-02-20", 7));
	}
}
