// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

mod blob;
pub mod coerce;
mod date;
mod datetime;
pub mod decimal;
mod text;
mod time;

pub use blob::Blob;
pub use date::Date;
pub use datetime::DateTime;
pub use decimal::Decimal;
pub use text::Text;
pub use time::{TIME_MAX_HOUR, Time};

use crate::types::TypeKind;

/// A scalar value carried between expression nodes.
///
/// The tag always agrees with the producing expression's declared result
/// type once the value has been through `Type::convert`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// SQL NULL.
	Null,
	/// A 1-byte signed integer
	Int1(i8),
	/// A 2-byte signed integer
	Int2(i16),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// A 1-byte unsigned integer
	Uint1(u8),
	/// A 2-byte unsigned integer
	Uint2(u16),
	/// A 4-byte unsigned integer
	Uint4(u32),
	/// An 8-byte unsigned integer
	Uint8(u64),
	/// A 4-byte floating point
	Float4(f32),
	/// An 8-byte floating point
	Float8(f64),
	/// An arbitrary-precision fixed-point decimal
	Decimal(Decimal),
	/// UTF-8 text with collation
	Text(Text),
	/// A binary large object
	Blob(Blob),
	/// A calendar date
	Date(Date),
	/// A time of day or signed duration
	Time(Time),
	/// A date and time with microsecond precision
	DateTime(DateTime),
}

impl Value {
	pub fn null() -> Self {
		Value::Null
	}

	pub fn int1(v: impl Into<i8>) -> Self {
		Value::Int1(v.into())
	}

	pub fn int2(v: impl Into<i16>) -> Self {
		Value::Int2(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn uint1(v: impl Into<u8>) -> Self {
		Value::Uint1(v.into())
	}

	pub fn uint2(v: impl Into<u16>) -> Self {
		Value::Uint2(v.into())
	}

	pub fn uint4(v: impl Into<u32>) -> Self {
		Value::Uint4(v.into())
	}

	pub fn uint8(v: impl Into<u64>) -> Self {
		Value::Uint8(v.into())
	}

	pub fn float4(v: impl Into<f32>) -> Self {
		Value::Float4(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		Value::Float8(v.into())
	}

	pub fn decimal(v: impl Into<Decimal>) -> Self {
		Value::Decimal(v.into())
	}

	/// Text under the default collation.
	pub fn text(v: impl Into<String>) -> Self {
		Value::Text(Text::plain(v))
	}

	pub fn text_with(v: impl Into<String>, collation: crate::collation::Collation) -> Self {
		Value::Text(Text::new(v, collation))
	}

	pub fn blob(v: impl Into<Blob>) -> Self {
		Value::Blob(v.into())
	}

	pub fn date(v: impl Into<Date>) -> Self {
		Value::Date(v.into())
	}

	pub fn time(v: impl Into<Time>) -> Self {
		Value::Time(v.into())
	}

	pub fn datetime(v: impl Into<DateTime>) -> Self {
		Value::DateTime(v.into())
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn kind(&self) -> TypeKind {
		match self {
			Value::Null => TypeKind::Null,
			Value::Int1(_) => TypeKind::Int1,
			Value::Int2(_) => TypeKind::Int2,
			Value::Int4(_) => TypeKind::Int4,
			Value::Int8(_) => TypeKind::Int8,
			Value::Uint1(_) => TypeKind::Uint1,
			Value::Uint2(_) => TypeKind::Uint2,
			Value::Uint4(_) => TypeKind::Uint4,
			Value::Uint8(_) => TypeKind::Uint8,
			Value::Float4(_) => TypeKind::Float4,
			Value::Float8(_) => TypeKind::Float8,
			Value::Decimal(_) => TypeKind::Decimal,
			Value::Text(_) => TypeKind::Text,
			Value::Blob(_) => TypeKind::Blob,
			Value::Date(_) => TypeKind::Date,
			Value::Time(_) => TypeKind::Time,
			Value::DateTime(_) => TypeKind::DateTime,
		}
	}

	pub fn is_integer(&self) -> bool {
		self.kind().is_integer()
	}

	pub fn is_unsigned(&self) -> bool {
		self.kind().is_unsigned()
	}

	pub fn is_numeric(&self) -> bool {
		self.kind().is_numeric()
	}

	pub fn is_temporal(&self) -> bool {
		self.kind().is_temporal()
	}
}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Value::Null, Value::Null) => Some(Ordering::Equal),
			(Value::Null, _) | (_, Value::Null) => None,
			(Value::Text(l), Value::Text(r)) => l.partial_cmp(r),
			(Value::Blob(l), Value::Blob(r)) => l.partial_cmp(r),
			(Value::Date(l), Value::Date(r)) => l.partial_cmp(r),
			(Value::Time(l), Value::Time(r)) => l.partial_cmp(r),
			(Value::DateTime(l), Value::DateTime(r)) => l.partial_cmp(r),
			(l, r) if l.is_numeric() && r.is_numeric() => coerce::compare_numeric(l, r),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Int1(v) => write!(f, "{}", v),
			Value::Int2(v) => write!(f, "{}", v),
			Value::Int4(v) => write!(f, "{}", v),
			Value::Int8(v) => write!(f, "{}", v),
			Value::Uint1(v) => write!(f, "{}", v),
			Value::Uint2(v) => write!(f, "{}", v),
			Value::Uint4(v) => write!(f, "{}", v),
			Value::Uint8(v) => write!(f, "{}", v),
			Value::Float4(v) => write!(f, "{}", v),
			Value::Float8(v) => write!(f, "{}", v),
			Value::Decimal(v) => write!(f, "{}", v),
			Value::Text(v) => write!(f, "{}", v),
			Value::Blob(v) => write!(f, "{}", v),
			Value::Date(v) => write!(f, "{}", v),
			Value::Time(v) => write!(f, "{}", v),
			Value::DateTime(v) => write!(f, "{}", v),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_agrees_with_tag() {
		assert_eq!(Value::int4(1).kind(), TypeKind::Int4);
		assert_eq!(Value::uint8(1u64).kind(), TypeKind::Uint8);
		assert_eq!(Value::text("x").kind(), TypeKind::Text);
		assert_eq!(Value::Null.kind(), TypeKind::Null);
	}

	#[test]
	fn test_null_never_compares() {
		assert_eq!(Value::Null.partial_cmp(&Value::int4(1)), None);
		assert_eq!(Value::int4(1).partial_cmp(&Value::Null), None);
	}

	#[test]
	fn test_mixed_numeric_comparison() {
		assert_eq!(Value::int4(2).partial_cmp(&Value::uint8(2u64)), Some(Ordering::Equal));
		assert_eq!(Value::int4(-1).partial_cmp(&Value::uint8(0u64)), Some(Ordering::Less));
		assert_eq!(Value::float8(1.5).partial_cmp(&Value::int4(1)), Some(Ordering::Greater));
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::Null.to_string(), "NULL");
		assert_eq!(Value::int4(42).to_string(), "42");
		assert_eq!(Value::text("hi").to_string(), "hi");
	}
}
