// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Conditional functions: COALESCE, IFNULL, NULLIF, IF, GREATEST, LEAST.
//!
//! These aggregate their argument types the way comparison does: floats
//! dominate, then decimals, and a signed/unsigned integer mix widens to
//! DECIMAL(20,0) so no 64-bit value is misread. The chosen value is
//! converted into that aggregated type before it leaves the function.

use myexpr_type::{Result, Type, Value};

use crate::{
	context::SessionContext,
	expr::ScalarExpr,
	func::{FuncExpr, FuncMeta, Nullability, is_true, ty_union},
};

/// Convert the winning value into the node's declared result type,
/// routing any conversion warning to the session.
fn converted(node: &FuncExpr, ctx: &SessionContext, value: Value) -> Result<Value> {
	let conversion = node.result_type().convert(&value)?;
	if let Some(warning) = conversion.warning {
		ctx.push_warning(warning);
	}
	Ok(conversion.value)
}

fn eval_coalesce(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	for value in values {
		if !value.is_null() {
			return converted(node, ctx, value);
		}
	}
	Ok(Value::Null)
}

fn eval_ifnull(node: &FuncExpr, ctx: &SessionContext, mut values: Vec<Value>) -> Result<Value> {
	let fallback = values.pop().unwrap_or(Value::Null);
	let first = values.pop().unwrap_or(Value::Null);
	if first.is_null() {
		if fallback.is_null() {
			return Ok(Value::Null);
		}
		return converted(node, ctx, fallback);
	}
	converted(node, ctx, first)
}

fn eval_nullif(_node: &FuncExpr, _ctx: &SessionContext, mut values: Vec<Value>) -> Result<Value> {
	let right = values.pop().unwrap_or(Value::Null);
	let left = values.pop().unwrap_or(Value::Null);
	if left.is_null() {
		return Ok(Value::Null);
	}
	// NULL on the right never compares equal, so the left survives.
	if left.partial_cmp(&right) == Some(std::cmp::Ordering::Equal) {
		return Ok(Value::Null);
	}
	Ok(left)
}

fn ty_nullif(args: &[Type]) -> Type {
	args.first().copied().unwrap_or_else(Type::null)
}

fn eval_if(node: &FuncExpr, ctx: &SessionContext, mut values: Vec<Value>) -> Result<Value> {
	let when_false = values.pop().unwrap_or(Value::Null);
	let when_true = values.pop().unwrap_or(Value::Null);
	let condition = values.pop().unwrap_or(Value::Null);
	let chosen = if !condition.is_null() && is_true(&condition) {
		when_true
	} else {
		when_false
	};
	if chosen.is_null() {
		return Ok(Value::Null);
	}
	converted(node, ctx, chosen)
}

fn ty_if(args: &[Type]) -> Type {
	Type::numeric_union(args.get(1..).unwrap_or_default())
}

fn eval_extreme(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>, want_max: bool) -> Result<Value> {
	let mut best: Option<Value> = None;
	for value in values {
		let candidate = converted(node, ctx, value)?;
		// a value the aggregated type cannot hold at all poisons the
		// whole result
		if candidate.is_null() {
			return Ok(Value::Null);
		}
		best = Some(match best.take() {
			None => candidate,
			Some(current) => {
				let replace = match candidate.partial_cmp(&current) {
					Some(std::cmp::Ordering::Greater) => want_max,
					Some(std::cmp::Ordering::Less) => !want_max,
					_ => false,
				};
				if replace {
					candidate
				} else {
					current
				}
			}
		});
	}
	Ok(best.unwrap_or(Value::Null))
}

fn eval_greatest(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	eval_extreme(node, ctx, values, true)
}

fn eval_least(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	eval_extreme(node, ctx, values, false)
}

pub(super) static COALESCE: FuncMeta = FuncMeta {
	name: "coalesce",
	description: "first non-NULL argument",
	min_args: 1,
	max_args: usize::MAX,
	propagates_null: false,
	nullability: Nullability::Always,
	volatile: false,
	result_type: ty_union,
	eval: eval_coalesce,
};

pub(super) static IFNULL: FuncMeta = FuncMeta {
	name: "ifnull",
	description: "second argument when the first is NULL",
	min_args: 2,
	max_args: 2,
	propagates_null: false,
	nullability: Nullability::Always,
	volatile: false,
	result_type: ty_union,
	eval: eval_ifnull,
};

pub(super) static NULLIF: FuncMeta = FuncMeta {
	name: "nullif",
	description: "NULL when both arguments compare equal",
	min_args: 2,
	max_args: 2,
	propagates_null: false,
	nullability: Nullability::Always,
	volatile: false,
	result_type: ty_nullif,
	eval: eval_nullif,
};

pub(super) static IF: FuncMeta = FuncMeta {
	name: "if",
	description: "ternary choice on a boolean condition",
	min_args: 3,
	max_args: 3,
	propagates_null: false,
	nullability: Nullability::Always,
	volatile: false,
	result_type: ty_if,
	eval: eval_if,
};

pub(super) static GREATEST: FuncMeta = FuncMeta {
	name: "greatest",
	description: "largest argument under comparison rules",
	min_args: 2,
	max_args: usize::MAX,
	propagates_null: true,
	nullability: Nullability::OnNullInput,
	volatile: false,
	result_type: ty_union,
	eval: eval_greatest,
};

pub(super) static LEAST: FuncMeta = FuncMeta {
	name: "least",
	description: "smallest argument under comparison rules",
	min_args: 2,
	max_args: usize::MAX,
	propagates_null: true,
	nullability: Nullability::OnNullInput,
	volatile: false,
	result_type: ty_union,
	eval: eval_least,
};

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![&COALESCE, &IFNULL, &NULLIF, &IF, &GREATEST, &LEAST]
}

#[cfg(test)]
mod tests {
	use myexpr_type::{Decimal, TypeKind};

	use super::*;
	use crate::func::testing::eval_ok;

	#[test]
	fn test_coalesce_first_non_null() {
		assert_eq!(
			eval_ok(&COALESCE, vec![Value::Null, Value::int4(2), Value::int4(3)]),
			Value::int8(2)
		);
		assert_eq!(eval_ok(&COALESCE, vec![Value::Null, Value::Null]), Value::Null);
	}

	#[test]
	fn test_coalesce_signed_unsigned_widens_to_decimal() {
		let out = eval_ok(&COALESCE, vec![Value::int8(-1), Value::uint8(u64::MAX)]);
		assert_eq!(out.kind(), TypeKind::Decimal);
		assert_eq!(out, Value::Decimal(Decimal::from_i64(-1)));
	}

	#[test]
	fn test_ifnull() {
		assert_eq!(eval_ok(&IFNULL, vec![Value::Null, Value::int4(7)]), Value::int8(7));
		assert_eq!(eval_ok(&IFNULL, vec![Value::int4(1), Value::int4(7)]), Value::int8(1));
	}

	#[test]
	fn test_nullif() {
		assert_eq!(eval_ok(&NULLIF, vec![Value::int4(1), Value::int4(1)]), Value::Null);
		assert_eq!(eval_ok(&NULLIF, vec![Value::int4(1), Value::int4(2)]), Value::int4(1));
		assert_eq!(eval_ok(&NULLIF, vec![Value::int4(1), Value::Null]), Value::int4(1));
		assert_eq!(eval_ok(&NULLIF, vec![Value::Null, Value::int4(1)]), Value::Null);
	}

	#[test]
	fn test_if_condition() {
		assert_eq!(
			eval_ok(&IF, vec![Value::int4(1), Value::text("yes"), Value::text("no")]),
			Value::text("yes")
		);
		assert_eq!(
			eval_ok(&IF, vec![Value::int4(0), Value::text("yes"), Value::text("no")]),
			Value::text("no")
		);
		// NULL condition selects the false branch
		assert_eq!(
			eval_ok(&IF, vec![Value::Null, Value::text("yes"), Value::text("no")]),
			Value::text("no")
		);
	}

	#[test]
	fn test_greatest_and_least() {
		assert_eq!(
			eval_ok(&GREATEST, vec![Value::int4(2), Value::int4(9), Value::int4(5)]),
			Value::int8(9)
		);
		assert_eq!(
			eval_ok(&LEAST, vec![Value::int4(2), Value::int4(9), Value::int4(5)]),
			Value::int8(2)
		);
	}

	#[test]
	fn test_greatest_null_poisons() {
		assert_eq!(
			eval_ok(&GREATEST, vec![Value::int4(2), Value::Null, Value::int4(5)]),
			Value::Null
		);
	}

	#[test]
	fn test_greatest_signed_unsigned_mix_is_exact() {
		// through DECIMAL(20,0), u64::MAX beats any signed value
		let out = eval_ok(&GREATEST, vec![Value::int8(-1), Value::uint8(u64::MAX)]);
		assert_eq!(out, Value::Decimal(Decimal::parse("18446744073709551615").unwrap()));
	}

	#[test]
	fn test_least_strings() {
		assert_eq!(
			eval_ok(&LEAST, vec![Value::text("banana"), Value::text("apple")]),
			Value::text("apple")
		);
	}
}
