// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Implicit coercion between value classes.
//!
//! These helpers implement the MySQL reading of "any value in a numeric
//! context": string inputs contribute their leading numeric prefix and
//! flag the truncation, floats round half away from zero when an integer
//! is required, and signed/unsigned mixing goes through i128 so no width
//! can silently wrap.

use std::cmp::Ordering;

use crate::{
	error::EvalError,
	value::{Date, DateTime, Decimal, Time, Value},
};

/// Outcome of coercing a non-numeric value into a structured type.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
	/// Input was SQL NULL.
	Null,
	Value(T),
	/// Input was malformed; callers warn and produce NULL.
	Invalid,
}

impl<T> Coerced<T> {
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
		match self {
			Coerced::Null => Coerced::Null,
			Coerced::Value(v) => Coerced::Value(f(v)),
			Coerced::Invalid => Coerced::Invalid,
		}
	}
}

/// Parse the leading floating-point prefix of a string. Returns the value
/// and whether anything was truncated (trailing garbage, or no numeric
/// prefix at all).
pub fn parse_prefix_f64(s: &str) -> (f64, bool) {
	let trimmed = s.trim();
	let bytes = trimmed.as_bytes();
	let mut end = 0;
	let mut seen_digit = false;
	let mut seen_dot = false;
	let mut seen_exp = false;

	while end < bytes.len() {
		let b = bytes[end];
		match b {
			b'0'..=b'9' => {
				seen_digit = true;
			}
			b'+' | b'-' => {
				// Only at the start or right after an exponent marker.
				if end != 0 && !matches!(bytes[end - 1], b'e' | b'E') {
					break;
				}
			}
			b'.' => {
				if seen_dot || seen_exp {
					break;
				}
				seen_dot = true;
			}
			b'e' | b'E' => {
				if seen_exp || !seen_digit {
					break;
				}
				// Only accept the exponent if digits follow.
				let mut probe = end + 1;
				if probe < bytes.len() && matches!(bytes[probe], b'+' | b'-') {
					probe += 1;
				}
				if probe >= bytes.len() || !bytes[probe].is_ascii_digit() {
					break;
				}
				seen_exp = true;
			}
			_ => break,
		}
		end += 1;
	}

	if !seen_digit {
		return (0.0, true);
	}
	let parsed: f64 = trimmed[..end].parse().unwrap_or(0.0);
	(parsed, end != bytes.len())
}

/// Parse the leading integer prefix of a string.
pub fn parse_prefix_i64(s: &str) -> (i64, bool) {
	let (value, truncated) = parse_prefix_f64(s);
	let as_int = round_f64_to_i64(value);
	// A fractional part also counts as truncation toward the integer.
	(as_int, truncated || value.fract() != 0.0)
}

/// MySQL float-to-integer conversion rounds half away from zero and
/// saturates at the i64 range.
pub fn round_f64_to_i64(v: f64) -> i64 {
	if v.is_nan() {
		return 0;
	}
	// f64::round already rounds half away from zero.
	let rounded = v.round();
	if rounded >= i64::MAX as f64 {
		i64::MAX
	} else if rounded <= i64::MIN as f64 {
		i64::MIN
	} else {
		rounded as i64
	}
}

/// Coerce into f64. `None` for NULL; the flag reports lossy string
/// parsing.
pub fn to_f64(value: &Value) -> Option<(f64, bool)> {
	match value {
		Value::Null => None,
		Value::Int1(v) => Some((*v as f64, false)),
		Value::Int2(v) => Some((*v as f64, false)),
		Value::Int4(v) => Some((*v as f64, false)),
		Value::Int8(v) => Some((*v as f64, false)),
		Value::Uint1(v) => Some((*v as f64, false)),
		Value::Uint2(v) => Some((*v as f64, false)),
		Value::Uint4(v) => Some((*v as f64, false)),
		Value::Uint8(v) => Some((*v as f64, false)),
		Value::Float4(v) => Some((*v as f64, false)),
		Value::Float8(v) => Some((*v, false)),
		Value::Decimal(v) => Some((v.to_f64(), false)),
		Value::Text(v) => Some(parse_prefix_f64(v.as_str())),
		Value::Blob(v) => {
			let s = String::from_utf8_lossy(v.as_bytes());
			Some(parse_prefix_f64(&s))
		}
		Value::Date(v) => {
			if v.is_zero() {
				Some((0.0, false))
			} else {
				let packed =
					v.year() as f64 * 10_000.0 + v.month() as f64 * 100.0 + v.day() as f64;
				Some((packed, false))
			}
		}
		Value::Time(v) => {
			let sign = if v.is_negative() { -1.0 } else { 1.0 };
			let packed = v.hour() as f64 * 10_000.0 + v.minute() as f64 * 100.0
				+ v.second() as f64 + v.microsecond() as f64 / 1e6;
			Some((sign * packed, false))
		}
		Value::DateTime(v) => {
			let d = v.date();
			let packed = d.year() as f64 * 1e10
				+ d.month() as f64 * 1e8 + d.day() as f64 * 1e6
				+ v.hour() as f64 * 1e4 + v.minute() as f64 * 100.0
				+ v.second() as f64 + v.microsecond() as f64 / 1e6;
			Some((packed, false))
		}
	}
}

/// Coerce into i64, rounding fractional input half away from zero.
pub fn to_i64(value: &Value) -> Option<(i64, bool)> {
	match value {
		Value::Null => None,
		Value::Int1(v) => Some((*v as i64, false)),
		Value::Int2(v) => Some((*v as i64, false)),
		Value::Int4(v) => Some((*v as i64, false)),
		Value::Int8(v) => Some((*v, false)),
		Value::Uint1(v) => Some((*v as i64, false)),
		Value::Uint2(v) => Some((*v as i64, false)),
		Value::Uint4(v) => Some((*v as i64, false)),
		Value::Uint8(v) => {
			if *v > i64::MAX as u64 {
				Some((i64::MAX, true))
			} else {
				Some((*v as i64, false))
			}
		}
		Value::Float4(v) => Some((round_f64_to_i64(*v as f64), false)),
		Value::Float8(v) => Some((round_f64_to_i64(*v), false)),
		Value::Decimal(v) => Some((v.to_i64().unwrap_or(i64::MAX), false)),
		Value::Text(v) => Some(parse_prefix_i64(v.as_str())),
		Value::Blob(v) => {
			let s = String::from_utf8_lossy(v.as_bytes());
			Some(parse_prefix_i64(&s))
		}
		other => to_f64(other).map(|(f, truncated)| (round_f64_to_i64(f), truncated)),
	}
}

/// Coerce into u64. A negative input is a hard overflow error, never a
/// silent wrap.
pub fn to_u64(value: &Value) -> Result<Option<(u64, bool)>, EvalError> {
	match value {
		Value::Null => Ok(None),
		Value::Uint1(v) => Ok(Some((*v as u64, false))),
		Value::Uint2(v) => Ok(Some((*v as u64, false))),
		Value::Uint4(v) => Ok(Some((*v as u64, false))),
		Value::Uint8(v) => Ok(Some((*v, false))),
		other => {
			let Some((v, truncated)) = to_i64(other) else {
				return Ok(None);
			};
			if v < 0 {
				return Err(EvalError::uint_overflow(other.clone()));
			}
			Ok(Some((v as u64, truncated)))
		}
	}
}

/// Coerce into a fixed-point decimal.
pub fn to_decimal(value: &Value) -> Option<(Decimal, bool)> {
	match value {
		Value::Null => None,
		Value::Decimal(v) => Some((v.clone(), false)),
		Value::Int1(v) => Some((Decimal::from_i64(*v as i64), false)),
		Value::Int2(v) => Some((Decimal::from_i64(*v as i64), false)),
		Value::Int4(v) => Some((Decimal::from_i64(*v as i64), false)),
		Value::Int8(v) => Some((Decimal::from_i64(*v), false)),
		Value::Uint1(v) => Some((Decimal::from_u64(*v as u64), false)),
		Value::Uint2(v) => Some((Decimal::from_u64(*v as u64), false)),
		Value::Uint4(v) => Some((Decimal::from_u64(*v as u64), false)),
		Value::Uint8(v) => Some((Decimal::from_u64(*v), false)),
		Value::Text(v) => match Decimal::parse(v.as_str()) {
			Some(d) => Some((d, false)),
			None => {
				let (f, _) = parse_prefix_f64(v.as_str());
				Some((Decimal::from_f64(f).unwrap_or_else(Decimal::zero), true))
			}
		},
		other => {
			let (f, truncated) = to_f64(other)?;
			Some((Decimal::from_f64(f).unwrap_or_else(Decimal::zero), truncated))
		}
	}
}

/// Render as MySQL string text. `None` for NULL. The flag reports a lossy
/// blob-to-utf8 conversion.
pub fn to_string_lossy(value: &Value) -> Option<(String, bool)> {
	match value {
		Value::Null => None,
		Value::Blob(v) => match std::str::from_utf8(v.as_bytes()) {
			Ok(s) => Some((s.to_string(), false)),
			Err(_) => Some((String::from_utf8_lossy(v.as_bytes()).into_owned(), true)),
		},
		other => Some((other.to_string(), false)),
	}
}

/// Coerce into a Date. Text goes through the MySQL parser; a DATETIME
/// keeps its date part.
pub fn to_date(value: &Value) -> Coerced<Date> {
	match value {
		Value::Null => Coerced::Null,
		Value::Date(v) => Coerced::Value(*v),
		Value::DateTime(v) => Coerced::Value(v.date()),
		Value::Text(v) => match DateTime::parse(v.as_str()) {
			Some(dt) => Coerced::Value(dt.date()),
			None => Coerced::Invalid,
		},
		Value::Int8(packed) => date_from_packed(*packed),
		Value::Int4(packed) => date_from_packed(*packed as i64),
		Value::Uint8(packed) => date_from_packed(*packed as i64),
		_ => Coerced::Invalid,
	}
}

fn date_from_packed(packed: i64) -> Coerced<Date> {
	// YYYYMMDD integer form.
	if packed < 0 {
		return Coerced::Invalid;
	}
	let year = packed / 10_000;
	let month = packed / 100 % 100;
	let day = packed % 100;
	match Date::new(year as i32, month as u32, day as u32) {
		Some(date) => Coerced::Value(date),
		None => Coerced::Invalid,
	}
}

/// Coerce into a DateTime. A bare DATE becomes midnight.
pub fn to_datetime(value: &Value) -> Coerced<DateTime> {
	match value {
		Value::Null => Coerced::Null,
		Value::DateTime(v) => Coerced::Value(*v),
		Value::Date(v) => Coerced::Value(DateTime::from_date(*v)),
		Value::Text(v) => match DateTime::parse(v.as_str()) {
			Some(dt) => Coerced::Value(dt),
			None => Coerced::Invalid,
		},
		Value::Int8(_) | Value::Int4(_) | Value::Uint8(_) => {
			to_date(value).map(DateTime::from_date)
		}
		_ => Coerced::Invalid,
	}
}

/// Coerce into a Time.
pub fn to_time(value: &Value) -> Coerced<Time> {
	match value {
		Value::Null => Coerced::Null,
		Value::Time(v) => Coerced::Value(*v),
		Value::DateTime(v) => Coerced::Value(v.time()),
		Value::Text(v) => match Time::parse(v.as_str()) {
			Some(t) => Coerced::Value(t),
			None => Coerced::Invalid,
		},
		_ => Coerced::Invalid,
	}
}

/// Compare two numeric values with MySQL mixing rules: floats dominate,
/// then decimals, then sign-aware integer comparison through i128.
pub fn compare_numeric(left: &Value, right: &Value) -> Option<Ordering> {
	let lk = left.kind();
	let rk = right.kind();
	if lk.is_float() || rk.is_float() {
		let (l, _) = to_f64(left)?;
		let (r, _) = to_f64(right)?;
		return l.partial_cmp(&r);
	}
	if lk == crate::types::TypeKind::Decimal || rk == crate::types::TypeKind::Decimal {
		let (l, _) = to_decimal(left)?;
		let (r, _) = to_decimal(right)?;
		return Some(l.cmp(&r));
	}
	let l = integer_as_i128(left)?;
	let r = integer_as_i128(right)?;
	Some(l.cmp(&r))
}

pub(crate) fn integer_as_i128(value: &Value) -> Option<i128> {
	match value {
		Value::Int1(v) => Some(*v as i128),
		Value::Int2(v) => Some(*v as i128),
		Value::Int4(v) => Some(*v as i128),
		Value::Int8(v) => Some(*v as i128),
		Value::Uint1(v) => Some(*v as i128),
		Value::Uint2(v) => Some(*v as i128),
		Value::Uint4(v) => Some(*v as i128),
		Value::Uint8(v) => Some(*v as i128),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_prefix_clean() {
		assert_eq!(parse_prefix_f64("123"), (123.0, false));
		assert_eq!(parse_prefix_f64("-12.5"), (-12.5, false));
		assert_eq!(parse_prefix_f64("1e3"), (1000.0, false));
		assert_eq!(parse_prefix_f64("  42  "), (42.0, false));
	}

	#[test]
	fn test_parse_prefix_truncated() {
		assert_eq!(parse_prefix_f64("12abc"), (12.0, true));
		assert_eq!(parse_prefix_f64("12.5xyz"), (12.5, true));
		assert_eq!(parse_prefix_f64("abc"), (0.0, true));
		assert_eq!(parse_prefix_f64(""), (0.0, true));
	}

	#[test]
	fn test_parse_prefix_exponent_needs_digits() {
		// "1e" is not an exponent; the prefix stops at the digit.
		assert_eq!(parse_prefix_f64("1expr"), (1.0, true));
	}

	#[test]
	fn test_round_half_away_from_zero() {
		assert_eq!(round_f64_to_i64(2.5), 3);
		assert_eq!(round_f64_to_i64(-2.5), -3);
		assert_eq!(round_f64_to_i64(2.4), 2);
		assert_eq!(round_f64_to_i64(-2.4), -2);
	}

	#[test]
	fn test_to_i64_saturates_large_unsigned() {
		let (v, truncated) = to_i64(&Value::uint8(u64::MAX)).unwrap();
		assert_eq!(v, i64::MAX);
		assert!(truncated);
	}

	#[test]
	fn test_to_u64_rejects_negative() {
		let result = to_u64(&Value::int4(-1));
		assert!(matches!(result, Err(EvalError::UintOverflow { .. })));
	}

	#[test]
	fn test_to_u64_null_passthrough() {
		assert_eq!(to_u64(&Value::Null).unwrap(), None);
	}

	#[test]
	fn test_string_to_number_prefix() {
		let (v, truncated) = to_f64(&Value::text("3.5 apples")).unwrap();
		assert_eq!(v, 3.5);
		assert!(truncated);
	}

	#[test]
	fn test_to_date_from_text_and_packed() {
		assert_eq!(to_date(&Value::text("2024-03-15")), Coerced::Value(Date::new(2024, 3, 15).unwrap()));
		assert_eq!(to_date(&Value::int8(20240315i64)), Coerced::Value(Date::new(2024, 3, 15).unwrap()));
		assert_eq!(to_date(&Value::text("nope")), Coerced::Invalid);
		assert_eq!(to_date(&Value::Null), Coerced::Null);
	}

	#[test]
	fn test_compare_numeric_signed_unsigned() {
		assert_eq!(
			compare_numeric(&Value::int8(-1), &Value::uint8(u64::MAX)),
			Some(Ordering::Less)
		);
		assert_eq!(compare_numeric(&Value::uint8(3u64), &Value::int8(3)), Some(Ordering::Equal));
	}

	#[test]
	fn test_temporal_to_number_packing() {
		let date = Value::date(Date::new(2024, 3, 15).unwrap());
		assert_eq!(to_f64(&date), Some((20240315.0, false)));
		let (i, _) = to_i64(&date).unwrap();
		assert_eq!(i, 20240315);
	}
}
