// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Type descriptors and the conversion table.
//!
//! Every expression node declares exactly one [`Type`] as its result
//! shape; the descriptor owns the single authoritative `convert`
//! operation for that shape. Conversion never silently wraps: narrowing
//! clamps and warns, negative-to-unsigned is a hard error.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
	collation::Collation,
	error::{EvalError, Warning},
	value::{Blob, Text, Value, coerce, decimal},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
	Null,
	Int1,
	Int2,
	Int4,
	Int8,
	Uint1,
	Uint2,
	Uint4,
	Uint8,
	Float4,
	Float8,
	Decimal,
	Text,
	Blob,
	Date,
	Time,
	DateTime,
	Timestamp,
}

impl TypeKind {
	pub fn is_integer(&self) -> bool {
		matches!(
			self,
			TypeKind::Int1
				| TypeKind::Int2 | TypeKind::Int4
				| TypeKind::Int8 | TypeKind::Uint1
				| TypeKind::Uint2 | TypeKind::Uint4
				| TypeKind::Uint8
		)
	}

	pub fn is_unsigned(&self) -> bool {
		matches!(self, TypeKind::Uint1 | TypeKind::Uint2 | TypeKind::Uint4 | TypeKind::Uint8)
	}

	pub fn is_float(&self) -> bool {
		matches!(self, TypeKind::Float4 | TypeKind::Float8)
	}

	pub fn is_numeric(&self) -> bool {
		self.is_integer() || self.is_float() || *self == TypeKind::Decimal
	}

	pub fn is_temporal(&self) -> bool {
		matches!(self, TypeKind::Date | TypeKind::Time | TypeKind::DateTime | TypeKind::Timestamp)
	}

	pub fn is_stringy(&self) -> bool {
		matches!(self, TypeKind::Text | TypeKind::Blob)
	}

	pub fn name(&self) -> &'static str {
		match self {
			TypeKind::Null => "NULL",
			TypeKind::Int1 => "TINYINT",
			TypeKind::Int2 => "SMALLINT",
			TypeKind::Int4 => "INT",
			TypeKind::Int8 => "BIGINT",
			TypeKind::Uint1 => "TINYINT UNSIGNED",
			TypeKind::Uint2 => "SMALLINT UNSIGNED",
			TypeKind::Uint4 => "INT UNSIGNED",
			TypeKind::Uint8 => "BIGINT UNSIGNED",
			TypeKind::Float4 => "FLOAT",
			TypeKind::Float8 => "DOUBLE",
			TypeKind::Decimal => "DECIMAL",
			TypeKind::Text => "TEXT",
			TypeKind::Blob => "BLOB",
			TypeKind::Date => "DATE",
			TypeKind::Time => "TIME",
			TypeKind::DateTime => "DATETIME",
			TypeKind::Timestamp => "TIMESTAMP",
		}
	}
}

impl Display for TypeKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Immutable description of a value shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
	kind: TypeKind,
	/// Total digits, decimal only.
	precision: u8,
	/// Fractional digits, decimal only.
	scale: u8,
	/// Sub-second digits, temporal only.
	fsp: u8,
	/// Output collation, text only.
	collation: Collation,
}

/// Result of a conversion: the converted value plus at most one non-fatal
/// warning for the caller to route to the session.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
	pub value: Value,
	pub warning: Option<Warning>,
}

impl Conversion {
	fn clean(value: Value) -> Self {
		Self {
			value,
			warning: None,
		}
	}

	fn warned(value: Value, warning: Warning) -> Self {
		Self {
			value,
			warning: Some(warning),
		}
	}
}

impl Type {
	fn of(kind: TypeKind) -> Self {
		Self {
			kind,
			precision: 0,
			scale: 0,
			fsp: 0,
			collation: Collation::default(),
		}
	}

	pub fn null() -> Self {
		Self::of(TypeKind::Null)
	}

	pub fn int1() -> Self {
		Self::of(TypeKind::Int1)
	}

	pub fn int2() -> Self {
		Self::of(TypeKind::Int2)
	}

	pub fn int4() -> Self {
		Self::of(TypeKind::Int4)
	}

	pub fn int8() -> Self {
		Self::of(TypeKind::Int8)
	}

	pub fn uint1() -> Self {
		Self::of(TypeKind::Uint1)
	}

	pub fn uint2() -> Self {
		Self::of(TypeKind::Uint2)
	}

	pub fn uint4() -> Self {
		Self::of(TypeKind::Uint4)
	}

	pub fn uint8() -> Self {
		Self::of(TypeKind::Uint8)
	}

	pub fn float4() -> Self {
		Self::of(TypeKind::Float4)
	}

	pub fn float8() -> Self {
		Self::of(TypeKind::Float8)
	}

	/// Out-of-range precision/scale are clamped silently.
	pub fn decimal(precision: u8, scale: u8) -> Self {
		let precision = precision.min(decimal::MAX_PRECISION);
		let scale = scale.min(decimal::MAX_SCALE).min(precision);
		Self {
			precision,
			scale,
			..Self::of(TypeKind::Decimal)
		}
	}

	pub fn text() -> Self {
		Self::of(TypeKind::Text)
	}

	pub fn text_with(collation: Collation) -> Self {
		Self {
			collation,
			..Self::of(TypeKind::Text)
		}
	}

	pub fn blob() -> Self {
		Self {
			collation: Collation::Binary,
			..Self::of(TypeKind::Blob)
		}
	}

	pub fn date() -> Self {
		Self::of(TypeKind::Date)
	}

	pub fn time(fsp: u8) -> Self {
		Self {
			fsp: fsp.min(6),
			..Self::of(TypeKind::Time)
		}
	}

	pub fn datetime(fsp: u8) -> Self {
		Self {
			fsp: fsp.min(6),
			..Self::of(TypeKind::DateTime)
		}
	}

	pub fn timestamp(fsp: u8) -> Self {
		Self {
			fsp: fsp.min(6),
			..Self::of(TypeKind::Timestamp)
		}
	}

	pub fn kind(&self) -> TypeKind {
		self.kind
	}

	pub fn precision(&self) -> u8 {
		self.precision
	}

	pub fn scale(&self) -> u8 {
		self.scale
	}

	pub fn fsp(&self) -> u8 {
		self.fsp
	}

	pub fn collation(&self) -> Collation {
		self.collation
	}

	pub fn is_nullable_kind(&self) -> bool {
		self.kind == TypeKind::Null
	}

	/// Convert a value into this shape with MySQL semantics: clamp and
	/// warn on narrowing, hard-error on negative-to-unsigned, parse
	/// numeric prefixes out of strings.
	pub fn convert(&self, value: &Value) -> Result<Conversion, EvalError> {
		if value.is_null() {
			return Ok(Conversion::clean(Value::Null));
		}
		match self.kind {
			TypeKind::Null => Ok(Conversion::clean(Value::Null)),
			TypeKind::Int1 => self.convert_signed(value, i8::MIN as i64, i8::MAX as i64),
			TypeKind::Int2 => self.convert_signed(value, i16::MIN as i64, i16::MAX as i64),
			TypeKind::Int4 => self.convert_signed(value, i32::MIN as i64, i32::MAX as i64),
			TypeKind::Int8 => self.convert_signed(value, i64::MIN, i64::MAX),
			TypeKind::Uint1 => self.convert_unsigned(value, u8::MAX as u64),
			TypeKind::Uint2 => self.convert_unsigned(value, u16::MAX as u64),
			TypeKind::Uint4 => self.convert_unsigned(value, u32::MAX as u64),
			TypeKind::Uint8 => self.convert_unsigned(value, u64::MAX),
			TypeKind::Float4 => {
				let Some((v, truncated)) = coerce::to_f64(value) else {
					return Ok(Conversion::clean(Value::Null));
				};
				let converted = Value::float4(v as f32);
				if truncated {
					Ok(Conversion::warned(
						converted,
						Warning::truncated_wrong_value("FLOAT", value),
					))
				} else {
					Ok(Conversion::clean(converted))
				}
			}
			TypeKind::Float8 => {
				let Some((v, truncated)) = coerce::to_f64(value) else {
					return Ok(Conversion::clean(Value::Null));
				};
				let converted = Value::float8(v);
				if truncated {
					Ok(Conversion::warned(
						converted,
						Warning::truncated_wrong_value("DOUBLE", value),
					))
				} else {
					Ok(Conversion::clean(converted))
				}
			}
			TypeKind::Decimal => {
				let Some((v, truncated)) = coerce::to_decimal(value) else {
					return Ok(Conversion::clean(Value::Null));
				};
				let rescaled = if self.precision > 0 {
					v.round(self.scale as i64)
				} else {
					v
				};
				let converted = Value::Decimal(rescaled);
				if truncated {
					Ok(Conversion::warned(
						converted,
						Warning::truncated_wrong_value("DECIMAL", value),
					))
				} else {
					Ok(Conversion::clean(converted))
				}
			}
			TypeKind::Text => {
				let Some((s, lossy)) = coerce::to_string_lossy(value) else {
					return Ok(Conversion::clean(Value::Null));
				};
				let converted = Value::Text(Text::new(s, self.collation));
				if lossy {
					Ok(Conversion::warned(converted, Warning::data_truncated(value)))
				} else {
					Ok(Conversion::clean(converted))
				}
			}
			TypeKind::Blob => {
				let converted = match value {
					Value::Blob(b) => Value::Blob(b.clone()),
					Value::Text(t) => {
						Value::Blob(Blob::new(t.as_str().as_bytes().to_vec()))
					}
					other => Value::Blob(Blob::new(other.to_string().into_bytes())),
				};
				Ok(Conversion::clean(converted))
			}
			TypeKind::Date => match coerce::to_date(value) {
				coerce::Coerced::Null => Ok(Conversion::clean(Value::Null)),
				coerce::Coerced::Value(d) => Ok(Conversion::clean(Value::Date(d))),
				coerce::Coerced::Invalid => Ok(Conversion::warned(
					Value::Null,
					Warning::incorrect_value("DATE", value),
				)),
			},
			TypeKind::Time => match coerce::to_time(value) {
				coerce::Coerced::Null => Ok(Conversion::clean(Value::Null)),
				coerce::Coerced::Value(t) => Ok(Conversion::clean(Value::Time(t))),
				coerce::Coerced::Invalid => Ok(Conversion::warned(
					Value::Null,
					Warning::incorrect_value("TIME", value),
				)),
			},
			TypeKind::DateTime | TypeKind::Timestamp => match coerce::to_datetime(value) {
				coerce::Coerced::Null => Ok(Conversion::clean(Value::Null)),
				coerce::Coerced::Value(dt) => {
					Ok(Conversion::clean(Value::DateTime(dt)))
				}
				coerce::Coerced::Invalid => Ok(Conversion::warned(
					Value::Null,
					Warning::incorrect_value("DATETIME", value),
				)),
			},
		}
	}

	fn convert_signed(&self, value: &Value, min: i64, max: i64) -> Result<Conversion, EvalError> {
		let Some((v, truncated)) = coerce::to_i64(value) else {
			return Ok(Conversion::clean(Value::Null));
		};
		let clamped = v.clamp(min, max);
		let converted = self.make_signed(clamped);
		if truncated || clamped != v {
			Ok(Conversion::warned(converted, Warning::truncated_wrong_value("INTEGER", value)))
		} else {
			Ok(Conversion::clean(converted))
		}
	}

	fn make_signed(&self, v: i64) -> Value {
		match self.kind {
			TypeKind::Int1 => Value::int1(v as i8),
			TypeKind::Int2 => Value::int2(v as i16),
			TypeKind::Int4 => Value::int4(v as i32),
			_ => Value::int8(v),
		}
	}

	fn convert_unsigned(&self, value: &Value, max: u64) -> Result<Conversion, EvalError> {
		let Some((v, truncated)) = coerce::to_u64(value)? else {
			return Ok(Conversion::clean(Value::Null));
		};
		let clamped = v.min(max);
		let converted = self.make_unsigned(clamped);
		if truncated || clamped != v {
			Ok(Conversion::warned(converted, Warning::truncated_wrong_value("INTEGER", value)))
		} else {
			Ok(Conversion::clean(converted))
		}
	}

	fn make_unsigned(&self, v: u64) -> Value {
		match self.kind {
			TypeKind::Uint1 => Value::uint1(v as u8),
			TypeKind::Uint2 => Value::uint2(v as u16),
			TypeKind::Uint4 => Value::uint4(v as u32),
			_ => Value::uint8(v),
		}
	}

	/// The numeric result type for a set of argument types, as used by
	/// COALESCE/IF/GREATEST/LEAST: floats dominate, then decimals;
	/// signed/unsigned integer mixing falls back to DECIMAL(20,0); any
	/// non-numeric argument makes the result textual.
	pub fn numeric_union(types: &[Type]) -> Type {
		let kinds: Vec<TypeKind> =
			types.iter().map(Type::kind).filter(|k| *k != TypeKind::Null).collect();
		if kinds.is_empty() {
			return Type::null();
		}
		if kinds.iter().any(|k| !k.is_numeric()) {
			return Type::text();
		}
		if kinds.iter().any(TypeKind::is_float) {
			return Type::float8();
		}
		if kinds.iter().any(|k| *k == TypeKind::Decimal) {
			let scale = types
				.iter()
				.filter(|t| t.kind == TypeKind::Decimal)
				.map(Type::scale)
				.max()
				.unwrap_or(0);
			return Type::decimal(decimal::MAX_PRECISION, scale);
		}
		let any_signed = kinds.iter().any(|k| k.is_integer() && !k.is_unsigned());
		let any_unsigned = kinds.iter().any(TypeKind::is_unsigned);
		match (any_signed, any_unsigned) {
			(true, true) => Type::decimal(20, 0),
			(false, true) => Type::uint8(),
			_ => Type::int8(),
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			TypeKind::Decimal => write!(f, "DECIMAL({},{})", self.precision, self.scale),
			_ => f.write_str(self.kind.name()),
		}
	}
}
