// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! The scalar expression tree.
//!
//! Nodes are immutable and shared through [`ExprRef`]. Rewrites go
//! through `with_children`, which re-checks arity and recomputes the
//! derived type and collation, so a rewritten tree can never carry stale
//! metadata.

use std::{fmt, sync::Arc};

use myexpr_type::{Coercibility, Collation, Result, Row, Type, Value};

use crate::context::SessionContext;

mod column;
mod literal;

pub use column::BoundColumn;
pub use literal::Literal;

pub type ExprRef = Arc<dyn ScalarExpr>;

/// One node of a scalar expression.
pub trait ScalarExpr: fmt::Debug + fmt::Display + Send + Sync {
	/// Lowercase SQL name of this node kind.
	fn function_name(&self) -> &str;

	/// One-line human description, for EXPLAIN-style output.
	fn description(&self) -> &str {
		""
	}

	/// Evaluate against one row. The context supplies session state and
	/// collects warnings.
	fn evaluate(&self, ctx: &SessionContext, row: &Row) -> Result<Value>;

	/// The declared result shape. `evaluate` always returns a value of
	/// this type or NULL.
	fn result_type(&self) -> Type;

	/// Whether NULL is a possible output.
	fn is_nullable(&self) -> bool;

	/// Whether the node is a constant for the duration of a statement:
	/// no column references and no volatile function below it.
	fn is_resolved(&self) -> bool;

	fn children(&self) -> Vec<ExprRef>;

	/// Rebuild this node over new children. Arity is re-checked and the
	/// result type and collation are derived afresh.
	fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef>;

	/// The output (collation, coercibility) pair. Meaningful for string
	/// results; numeric results report their rendering collation.
	fn collation(&self) -> (Collation, Coercibility);
}

/// Collation pairs of the stringy operands among `children`, in order.
/// Non-string operands contribute their to-string rendering at the
/// numeric coercibility rank, so they never win a resolution.
pub(crate) fn operand_collations(children: &[ExprRef]) -> Vec<(Collation, Coercibility)> {
	children
		.iter()
		.map(|child| {
			if child.result_type().kind().is_stringy() {
				child.collation()
			} else {
				(Collation::default(), Coercibility::Numeric)
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_operand_collations_ranks() {
		let text: ExprRef = Arc::new(Literal::from(Value::text("a")));
		let number: ExprRef = Arc::new(Literal::from(Value::int4(1)));
		let pairs = operand_collations(&[text, number]);
		assert_eq!(pairs[0].1, Coercibility::Coercible);
		assert_eq!(pairs[1].1, Coercibility::Numeric);
	}
}
