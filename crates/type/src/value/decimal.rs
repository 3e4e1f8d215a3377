// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive, num_bigint::BigInt};
use serde::{Deserialize, Serialize};

/// Maximum total digit count a decimal result may declare.
pub const MAX_PRECISION: u8 = 30;
/// Maximum fractional digit count.
pub const MAX_SCALE: u8 = 30;

/// Fixed-point decimal backed by an arbitrary-precision representation.
///
/// The precision/scale ceiling is enforced at construction: out-of-range
/// shapes are clamped silently rather than rejected, matching the engine's
/// conversion rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal(BigDecimal);

impl Decimal {
	pub fn new(inner: BigDecimal) -> Self {
		Self(Self::clamp(inner))
	}

	fn clamp(inner: BigDecimal) -> BigDecimal {
		let mut value = inner;
		if value.fractional_digit_count() > MAX_SCALE as i64 {
			value = value.with_scale_round(MAX_SCALE as i64, bigdecimal::RoundingMode::HalfUp);
		}
		let scale = value.fractional_digit_count();
		let precision = value.digits() as i64;
		if precision > MAX_PRECISION as i64 && scale > 0 {
			let excess = precision - MAX_PRECISION as i64;
			let target = (scale - excess).max(0);
			value = value.with_scale_round(target, bigdecimal::RoundingMode::HalfUp);
		}
		value
	}

	pub fn zero() -> Self {
		Self(BigDecimal::from(0))
	}

	pub fn from_i64(v: i64) -> Self {
		Self(BigDecimal::from(v))
	}

	pub fn from_u64(v: u64) -> Self {
		Self(BigDecimal::from(v))
	}

	pub fn from_i128(v: i128) -> Self {
		Self(BigDecimal::from(BigInt::from(v)))
	}

	pub fn from_f64(v: f64) -> Option<Self> {
		BigDecimal::from_f64(v).map(Self::new)
	}

	/// Parse decimal text. Underscore separators and surrounding
	/// whitespace are tolerated.
	pub fn parse(s: &str) -> Option<Self> {
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return None;
		}
		let cleaned = if trimmed.contains('_') {
			trimmed.replace('_', "")
		} else {
			trimmed.to_string()
		};
		BigDecimal::from_str(&cleaned).ok().map(Self::new)
	}

	pub fn inner(&self) -> &BigDecimal {
		&self.0
	}

	pub fn into_inner(self) -> BigDecimal {
		self.0
	}

	/// Total significant digits.
	pub fn precision(&self) -> u64 {
		self.0.digits()
	}

	/// Fractional digits; negative means trailing integer zeros.
	pub fn scale(&self) -> i64 {
		self.0.fractional_digit_count()
	}

	pub fn is_zero(&self) -> bool {
		bigdecimal::Zero::is_zero(&self.0)
	}

	pub fn is_negative(&self) -> bool {
		self.0.sign() == bigdecimal::num_bigint::Sign::Minus
	}

	pub fn to_f64(&self) -> f64 {
		self.0.to_f64().unwrap_or(0.0)
	}

	pub fn to_i64(&self) -> Option<i64> {
		self.0.with_scale_round(0, bigdecimal::RoundingMode::HalfUp).to_i64()
	}

	pub fn to_u64(&self) -> Option<u64> {
		self.0.with_scale_round(0, bigdecimal::RoundingMode::HalfUp).to_u64()
	}

	/// Round half away from zero to `scale` fractional digits (negative
	/// scale zeroes integer digits).
	pub fn round(&self, scale: i64) -> Self {
		Self(self.0.with_scale_round(scale, bigdecimal::RoundingMode::HalfUp))
	}

	/// Truncate toward zero to `scale` fractional digits, regardless of
	/// sign.
	pub fn truncate(&self, scale: i64) -> Self {
		Self(self.0.with_scale_round(scale, bigdecimal::RoundingMode::Down))
	}
}

impl PartialOrd for Decimal {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Decimal {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.0.cmp(&other.0)
	}
}

impl Display for Decimal {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		// Plain notation, never scientific.
		write!(f, "{}", self.0.to_plain_string())
	}
}

impl From<BigDecimal> for Decimal {
	fn from(inner: BigDecimal) -> Self {
		Self::new(inner)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_integer() {
		let decimal = Decimal::parse("123").unwrap();
		assert_eq!(decimal.to_string(), "123");
	}

	#[test]
	fn test_parse_with_fractional() {
		let decimal = Decimal::parse("123.45").unwrap();
		assert_eq!(decimal.to_string(), "123.45");
	}

	#[test]
	fn test_parse_with_underscores() {
		let decimal = Decimal::parse("1_234.56").unwrap();
		assert_eq!(decimal.to_string(), "1234.56");
	}

	#[test]
	fn test_parse_negative() {
		let decimal = Decimal::parse("-123.45").unwrap();
		assert_eq!(decimal.to_string(), "-123.45");
		assert!(decimal.is_negative());
	}

	#[test]
	fn test_parse_empty() {
		assert!(Decimal::parse("").is_none());
		assert!(Decimal::parse("   ").is_none());
	}

	#[test]
	fn test_parse_invalid() {
		assert!(Decimal::parse("not_a_number").is_none());
	}

	#[test]
	fn test_scale_clamped_to_30() {
		let long = format!("0.{}", "1".repeat(40));
		let decimal = Decimal::parse(&long).unwrap();
		assert_eq!(decimal.scale(), 30);
	}

	#[test]
	fn test_precision_clamped_by_dropping_scale() {
		// 25 integer digits + 10 fractional digits exceeds 30 total;
		// the fractional part gives way.
		let text = format!("{}.{}", "9".repeat(25), "1".repeat(10));
		let decimal = Decimal::parse(&text).unwrap();
		assert!(decimal.precision() <= MAX_PRECISION as u64);
		assert_eq!(decimal.scale(), 5);
	}

	#[test]
	fn test_round_half_away_from_zero() {
		assert_eq!(Decimal::parse("2.5").unwrap().round(0).to_string(), "3");
		assert_eq!(Decimal::parse("-2.5").unwrap().round(0).to_string(), "-3");
		assert_eq!(Decimal::parse("1.994").unwrap().round(2).to_string(), "1.99");
	}

	#[test]
	fn test_truncate_toward_zero() {
		assert_eq!(Decimal::parse("-1.999").unwrap().truncate(1).to_string(), "-1.9");
		assert_eq!(Decimal::parse("1.999").unwrap().truncate(1).to_string(), "1.9");
	}

	#[test]
	fn test_ordering() {
		let a = Decimal::parse("1.5").unwrap();
		let b = Decimal::parse("1.50").unwrap();
		let c = Decimal::parse("2").unwrap();
		assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
		assert!(a < c);
	}
}
