// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Numeric rounding and locale-aware number rendering.

use myexpr_type::value::Decimal;

pub mod datetime;

pub use datetime::{format_date_time, format_time_only, str_to_date, StrToDateResult};

/// Rounding places accepted by ROUND/TRUNCATE; anything beyond the
/// decimal scale ceiling is a no-op in one direction and zeroes the value
/// in the other, so the clamp loses nothing.
const MAX_PLACES: i64 = 30;

fn clamp_places(places: i64) -> i64 {
	places.clamp(-MAX_PLACES, MAX_PLACES)
}

/// ROUND for exact numerics: half away from zero.
pub fn round_decimal(value: &Decimal, places: i64) -> Decimal {
	value.round(clamp_places(places))
}

/// TRUNCATE for exact numerics: toward zero.
pub fn truncate_decimal(value: &Decimal, places: i64) -> Decimal {
	value.truncate(clamp_places(places))
}

/// ROUND for approximate numerics: half away from zero at the given
/// decimal position.
pub fn round_f64(value: f64, places: i64) -> f64 {
	if !value.is_finite() {
		return value;
	}
	let places = clamp_places(places);
	let factor = 10f64.powi(places as i32);
	let scaled = value * factor;
	if !scaled.is_finite() {
		return value;
	}
	scaled.round() / factor
}

/// TRUNCATE for approximate numerics: toward zero.
pub fn truncate_f64(value: f64, places: i64) -> f64 {
	if !value.is_finite() {
		return value;
	}
	let places = clamp_places(places);
	let factor = 10f64.powi(places as i32);
	let scaled = value * factor;
	if !scaled.is_finite() {
		return value;
	}
	scaled.trunc() / factor
}

/// Digit-grouping rules for a FORMAT locale.
#[derive(Copy, Clone, Debug)]
pub struct NumberLocale {
	pub name: &'static str,
	pub decimal_point: char,
	pub group_separator: Option<char>,
}

const LOCALES: &[NumberLocale] = &[
	NumberLocale {
		name: "en_US",
		decimal_point: '.',
		group_separator: Some(','),
	},
	NumberLocale {
		name: "de_DE",
		decimal_point: ',',
		group_separator: Some('.'),
	},
	NumberLocale {
		name: "fr_FR",
		decimal_point: ',',
		group_separator: Some(' '),
	},
];

impl NumberLocale {
	/// Case-insensitive lookup. None for names not in the table; the
	/// caller falls back to `default()` and reports the bad name.
	pub fn lookup(name: &str) -> Option<Self> {
		LOCALES.iter().copied().find(|l| l.name.eq_ignore_ascii_case(name.trim()))
	}

	pub fn default() -> Self {
		LOCALES[0]
	}
}

/// FORMAT(X, D): round to `places` fractional digits and render with the
/// locale's digit grouping. A value that rounds to zero never keeps its
/// sign.
pub fn format_number(value: &Decimal, places: i64, locale: &NumberLocale) -> String {
	let places = places.clamp(0, MAX_PLACES);
	let rounded = value.round(places);

	let plain = if rounded.is_zero() {
		// suppress "-0"
		Decimal::zero().round(places).to_string()
	} else {
		rounded.to_string()
	};

	let (sign, digits) = match plain.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", plain.as_str()),
	};
	let (int_part, frac_part) = match digits.split_once('.') {
		Some((i, f)) => (i, f),
		None => (digits, ""),
	};

	let mut out = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
	out.push_str(sign);
	match locale.group_separator {
		Some(sep) => {
			let len = int_part.len();
			for (idx, ch) in int_part.chars().enumerate() {
				if idx > 0 && (len - idx) % 3 == 0 {
					out.push(sep);
				}
				out.push(ch);
			}
		}
		None => out.push_str(int_part),
	}

	if places > 0 {
		out.push(locale.decimal_point);
		out.push_str(frac_part);
		for _ in frac_part.len() as i64..places {
			out.push('0');
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dec(s: &str) -> Decimal {
		Decimal::parse(s).unwrap()
	}

	#[test]
	fn test_round_decimal() {
		assert_eq!(round_decimal(&dec("2.5"), 0).to_string(), "3");
		assert_eq!(round_decimal(&dec("-2.5"), 0).to_string(), "-3");
		assert_eq!(round_decimal(&dec("1234.56"), -2).to_string(), "1200");
	}

	#[test]
	fn test_truncate_decimal() {
		assert_eq!(truncate_decimal(&dec("-1.999"), 1).to_string(), "-1.9");
		assert_eq!(truncate_decimal(&dec("1999"), -3).to_string(), "1000");
	}

	#[test]
	fn test_round_f64() {
		assert_eq!(round_f64(2.5, 0), 3.0);
		assert_eq!(round_f64(-2.5, 0), -3.0);
		assert_eq!(round_f64(1.005e10, -9), 1.0e10);
	}

	#[test]
	fn test_truncate_f64() {
		assert_eq!(truncate_f64(1.999, 1), 1.9);
		assert_eq!(truncate_f64(-1.999, 1), -1.9);
	}

	#[test]
	fn test_format_default_locale() {
		let locale = NumberLocale::default();
		assert_eq!(format_number(&dec("12332.123456"), 4, &locale), "12,332.1235");
		assert_eq!(format_number(&dec("12332.2"), 0, &locale), "12,332");
		assert_eq!(format_number(&dec("1234567"), 2, &locale), "1,234,567.00");
	}

	#[test]
	fn test_format_negative_zero_suppressed() {
		let locale = NumberLocale::default();
		assert_eq!(format_number(&dec("-0.001"), 0, &locale), "0");
		assert_eq!(format_number(&dec("-0.001"), 2, &locale), "0.00");
	}

	#[test]
	fn test_format_locales() {
		let de = NumberLocale::lookup("de_DE").unwrap();
		assert_eq!(format_number(&dec("12332.2"), 2, &de), "12.332,20");

		let fr = NumberLocale::lookup("fr_FR").unwrap();
		assert_eq!(format_number(&dec("12332.2"), 2, &fr), "12 332,20");

		assert!(NumberLocale::lookup("xx_XX").is_none());
	}

	#[test]
	fn test_format_pads_fraction() {
		let locale = NumberLocale::default();
		assert_eq!(format_number(&dec("5"), 3, &locale), "5.000");
	}
}
