// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::{fmt, sync::Arc};

use myexpr_type::{
	Coercibility, Collation, EvalError, Result, Row, Type, TypeKind, Value,
	value::decimal,
};

use crate::{
	context::SessionContext,
	expr::{ExprRef, ScalarExpr},
};

/// A constant leaf. The type is derived from the value's tag; a text
/// literal sits at the `Coercible` rank and a NULL at `Ignorable`.
#[derive(Clone, Debug)]
pub struct Literal {
	value: Value,
	ty: Type,
}

impl Literal {
	pub fn new(value: Value) -> Self {
		let ty = type_of(&value);
		Self {
			value,
			ty,
		}
	}

	pub fn value(&self) -> &Value {
		&self.value
	}
}

fn type_of(value: &Value) -> Type {
	match value.kind() {
		TypeKind::Null => Type::null(),
		TypeKind::Int1 => Type::int1(),
		TypeKind::Int2 => Type::int2(),
		TypeKind::Int4 => Type::int4(),
		TypeKind::Int8 => Type::int8(),
		TypeKind::Uint1 => Type::uint1(),
		TypeKind::Uint2 => Type::uint2(),
		TypeKind::Uint4 => Type::uint4(),
		TypeKind::Uint8 => Type::uint8(),
		TypeKind::Float4 => Type::float4(),
		TypeKind::Float8 => Type::float8(),
		TypeKind::Decimal => match &value {
			Value::Decimal(d) => Type::decimal(
				d.precision().min(decimal::MAX_PRECISION as u64) as u8,
				d.scale().clamp(0, decimal::MAX_SCALE as i64) as u8,
			),
			_ => Type::decimal(decimal::MAX_PRECISION, 0),
		},
		TypeKind::Text => match &value {
			Value::Text(t) => Type::text_with(t.collation()),
			_ => Type::text(),
		},
		TypeKind::Blob => Type::blob(),
		TypeKind::Date => Type::date(),
		TypeKind::Time => Type::time(6),
		TypeKind::DateTime | TypeKind::Timestamp => Type::datetime(6),
	}
}

impl From<Value> for Literal {
	fn from(value: Value) -> Self {
		Self::new(value)
	}
}

impl ScalarExpr for Literal {
	fn function_name(&self) -> &str {
		"literal"
	}

	fn description(&self) -> &str {
		"constant value"
	}

	fn evaluate(&self, _ctx: &SessionContext, _row: &Row) -> Result<Value> {
		Ok(self.value.clone())
	}

	fn result_type(&self) -> Type {
		self.ty
	}

	fn is_nullable(&self) -> bool {
		self.value.is_null()
	}

	fn is_resolved(&self) -> bool {
		true
	}

	fn children(&self) -> Vec<ExprRef> {
		Vec::new()
	}

	fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
		if !children.is_empty() {
			return Err(EvalError::invalid_children_count("literal", 0, children.len()));
		}
		Ok(Arc::new(self.clone()))
	}

	fn collation(&self) -> (Collation, Coercibility) {
		if self.value.is_null() {
			(Collation::default(), Coercibility::Ignorable)
		} else if self.ty.kind().is_stringy() {
			(self.ty.collation(), Coercibility::Coercible)
		} else {
			(Collation::default(), Coercibility::Numeric)
		}
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.value {
			Value::Text(t) => write!(f, "'{}'", t),
			other => write!(f, "{}", other),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_literal_type_and_value() {
		let ctx = SessionContext::standalone(1);
		let row = Row::empty();
		let literal = Literal::new(Value::int4(42));
		assert_eq!(literal.result_type().kind(), TypeKind::Int4);
		assert_eq!(literal.evaluate(&ctx, &row), Ok(Value::int4(42)));
		assert!(literal.is_resolved());
		assert!(!literal.is_nullable());
	}

	#[test]
	fn test_null_literal_is_ignorable() {
		let literal = Literal::new(Value::Null);
		assert!(literal.is_nullable());
		assert_eq!(literal.collation().1, Coercibility::Ignorable);
	}

	#[test]
	fn test_text_literal_is_coercible() {
		let literal = Literal::new(Value::text("abc"));
		assert_eq!(literal.collation().1, Coercibility::Coercible);
		assert_eq!(format!("{}", literal), "'abc'");
	}

	#[test]
	fn test_with_children_rejects_any() {
		let literal = Literal::new(Value::int4(1));
		let child: ExprRef = Arc::new(Literal::new(Value::int4(2)));
		assert!(literal.with_children(vec![child]).is_err());
		assert!(literal.with_children(Vec::new()).is_ok());
	}
}
