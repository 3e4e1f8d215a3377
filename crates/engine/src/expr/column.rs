// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::{fmt, sync::Arc};

use myexpr_type::{Coercibility, Collation, EvalError, Result, Row, Type, Value};

use crate::{
	context::SessionContext,
	expr::{ExprRef, ScalarExpr},
};

/// A positional reference into the input row, produced by name
/// resolution upstream of evaluation.
#[derive(Clone, Debug)]
pub struct BoundColumn {
	name: String,
	index: usize,
	ty: Type,
	nullable: bool,
}

impl BoundColumn {
	pub fn new(name: impl Into<String>, index: usize, ty: Type, nullable: bool) -> Self {
		Self {
			name: name.into(),
			index,
			ty,
			nullable,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn index(&self) -> usize {
		self.index
	}
}

impl ScalarExpr for BoundColumn {
	fn function_name(&self) -> &str {
		"column"
	}

	fn description(&self) -> &str {
		"bound column reference"
	}

	fn evaluate(&self, _ctx: &SessionContext, row: &Row) -> Result<Value> {
		match row.get(self.index) {
			Some(value) => Ok(value.clone()),
			None => Err(EvalError::Internal {
				message: format!(
					"column {} is bound to index {} but the row has {} values",
					self.name,
					self.index,
					row.len()
				),
			}),
		}
	}

	fn result_type(&self) -> Type {
		self.ty
	}

	fn is_nullable(&self) -> bool {
		self.nullable
	}

	fn is_resolved(&self) -> bool {
		false
	}

	fn children(&self) -> Vec<ExprRef> {
		Vec::new()
	}

	fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
		if !children.is_empty() {
			return Err(EvalError::invalid_children_count("column", 0, children.len()));
		}
		Ok(Arc::new(self.clone()))
	}

	fn collation(&self) -> (Collation, Coercibility) {
		(self.ty.collation(), Coercibility::Implicit)
	}
}

impl fmt::Display for BoundColumn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_reads_by_position() {
		let ctx = SessionContext::standalone(1);
		let row = Row::new(vec![Value::int4(1), Value::text("x")]);
		let column = BoundColumn::new("b", 1, Type::text(), true);
		assert_eq!(column.evaluate(&ctx, &row), Ok(Value::text("x")));
		assert!(!column.is_resolved());
	}

	#[test]
	fn test_out_of_range_index_is_internal_error() {
		let ctx = SessionContext::standalone(1);
		let row = Row::empty();
		let column = BoundColumn::new("a", 0, Type::int4(), false);
		assert!(matches!(column.evaluate(&ctx, &row), Err(EvalError::Internal { .. })));
	}

	#[test]
	fn test_column_coercibility_is_implicit() {
		let column = BoundColumn::new("a", 0, Type::text(), true);
		assert_eq!(column.collation().1, Coercibility::Implicit);
	}
}
