// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! The SQL function catalog.
//!
//! Every function is described by one [`FuncMeta`]: arity bounds, NULL
//! behaviour, a result-type rule and the evaluation body. [`FuncExpr`]
//! is the single expression node for all of them, so tree rewrites and
//! NULL propagation live in one place instead of one impl per function.

use std::{fmt, sync::Arc};

use myexpr_function::regexp::RegexFlags;
use myexpr_type::{
	Coercibility, Collation, Decimal, Result, Row, Type, TypeKind, Value, Warning,
	collation::resolve_all,
	value::{Date, DateTime, Time, coerce},
};
use parking_lot::Mutex;
use regex::Regex;

use crate::{
	context::SessionContext,
	expr::{ExprRef, ScalarExpr, operand_collations},
};

pub mod control;
pub mod datetime;
pub mod encode;
pub mod lock;
pub mod numeric;
pub mod registry;
pub mod regexp;
pub mod string;

pub type EvalFn = fn(&FuncExpr, &SessionContext, Vec<Value>) -> Result<Value>;
pub type TypeFn = fn(&[Type]) -> Type;

/// How NULL can appear in the output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Nullability {
	/// Never NULL, regardless of input.
	Never,
	/// NULL only when an input is NULL.
	OnNullInput,
	/// May be NULL even for non-NULL input (parse failures, misses).
	Always,
}

#[derive(Debug)]
pub struct FuncMeta {
	pub name: &'static str,
	pub description: &'static str,
	pub min_args: usize,
	pub max_args: usize,
	/// Evaluate to NULL as soon as any argument is NULL, without
	/// running the body. The exceptions in the catalog handle their
	/// NULLs themselves.
	pub propagates_null: bool,
	pub nullability: Nullability,
	/// Not constant within a statement (RAND, SLEEP, SYSDATE, locks).
	pub volatile: bool,
	pub result_type: TypeFn,
	pub eval: EvalFn,
}

#[derive(Clone, Debug)]
struct CachedRegex {
	pattern: String,
	flags: RegexFlags,
	case_insensitive: bool,
	regex: Regex,
}

/// An applied function in the expression tree.
#[derive(Debug)]
pub struct FuncExpr {
	meta: &'static FuncMeta,
	children: Vec<ExprRef>,
	ty: Type,
	collation: (Collation, Coercibility),
	regex_cache: Mutex<Option<CachedRegex>>,
}

impl FuncExpr {
	pub fn new(meta: &'static FuncMeta, children: Vec<ExprRef>) -> Result<Self> {
		if children.len() < meta.min_args || children.len() > meta.max_args {
			return Err(myexpr_type::EvalError::invalid_children_count(
				meta.name,
				meta.min_args,
				children.len(),
			));
		}

		// Collation conflicts surface at build time, not mid-row.
		let collation = resolve_all(operand_collations(&children))?;

		let child_types: Vec<Type> = children.iter().map(|c| c.result_type()).collect();
		let mut ty = (meta.result_type)(&child_types);
		if ty.kind() == TypeKind::Text {
			ty = Type::text_with(collation.0);
		}

		Ok(Self {
			meta,
			children,
			ty,
			collation,
			regex_cache: Mutex::new(None),
		})
	}

	pub fn build(meta: &'static FuncMeta, children: Vec<ExprRef>) -> Result<ExprRef> {
		Ok(Arc::new(Self::new(meta, children)?))
	}

	pub fn meta(&self) -> &'static FuncMeta {
		self.meta
	}

	/// Compile-once regex lookup. The cache key is the full (pattern,
	/// flags, default case) triple, so a non-constant pattern still
	/// evaluates correctly, it just recompiles.
	pub(crate) fn regex_for(
		&self,
		pattern: &str,
		flags: RegexFlags,
		case_insensitive: bool,
	) -> Result<Regex> {
		let mut cache = self.regex_cache.lock();
		if let Some(cached) = cache.as_ref() {
			if cached.pattern == pattern
				&& cached.flags == flags
				&& cached.case_insensitive == case_insensitive
			{
				return Ok(cached.regex.clone());
			}
		}
		let regex = myexpr_function::regexp::compile(pattern, flags, case_insensitive)?;
		*cache = Some(CachedRegex {
			pattern: pattern.to_string(),
			flags,
			case_insensitive,
			regex: regex.clone(),
		});
		Ok(regex)
	}

	/// Rebuild over new children. A rewrite over the very same argument
	/// nodes keeps the compiled pattern; anything else must recompile.
	fn rebuilt(&self, children: Vec<ExprRef>) -> Result<Self> {
		let identical = children.len() == self.children.len()
			&& children.iter().zip(&self.children).all(|(a, b)| Arc::ptr_eq(a, b));
		let node = Self::new(self.meta, children)?;
		if identical {
			*node.regex_cache.lock() = self.regex_cache.lock().clone();
		}
		Ok(node)
	}
}

impl ScalarExpr for FuncExpr {
	fn function_name(&self) -> &str {
		self.meta.name
	}

	fn description(&self) -> &str {
		self.meta.description
	}

	fn evaluate(&self, ctx: &SessionContext, row: &Row) -> Result<Value> {
		let mut values = Vec::with_capacity(self.children.len());
		for child in &self.children {
			values.push(child.evaluate(ctx, row)?);
		}
		if self.meta.propagates_null && values.iter().any(Value::is_null) {
			return Ok(Value::Null);
		}
		(self.meta.eval)(self, ctx, values)
	}

	fn result_type(&self) -> Type {
		self.ty
	}

	fn is_nullable(&self) -> bool {
		match self.meta.nullability {
			Nullability::Never => false,
			Nullability::Always => true,
			Nullability::OnNullInput => self.children.iter().any(|c| c.is_nullable()),
		}
	}

	fn is_resolved(&self) -> bool {
		!self.meta.volatile && self.children.iter().all(|c| c.is_resolved())
	}

	fn children(&self) -> Vec<ExprRef> {
		self.children.clone()
	}

	fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
		Ok(Arc::new(self.rebuilt(children)?))
	}

	fn collation(&self) -> (Collation, Coercibility) {
		self.collation
	}
}

impl fmt::Display for FuncExpr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}(", self.meta.name)?;
		for (idx, child) in self.children.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}", child)?;
		}
		f.write_str(")")
	}
}

// Argument coercion helpers shared by the catalog. Each pushes the
// matching warning and hands back None where the function should produce
// NULL.

pub(crate) fn str_arg(ctx: &SessionContext, value: &Value) -> Option<String> {
	let (s, lossy) = coerce::to_string_lossy(value)?;
	if lossy {
		ctx.push_warning(Warning::data_truncated(value));
	}
	Some(s)
}

pub(crate) fn i64_arg(ctx: &SessionContext, value: &Value) -> Option<i64> {
	let (v, truncated) = coerce::to_i64(value)?;
	if truncated {
		ctx.push_warning(Warning::truncated_wrong_value("INTEGER", value));
	}
	Some(v)
}

pub(crate) fn u64_arg(ctx: &SessionContext, value: &Value) -> Result<Option<u64>> {
	let Some((v, truncated)) = coerce::to_u64(value)? else {
		return Ok(None);
	};
	if truncated {
		ctx.push_warning(Warning::truncated_wrong_value("INTEGER", value));
	}
	Ok(Some(v))
}

pub(crate) fn f64_arg(ctx: &SessionContext, value: &Value) -> Option<f64> {
	let (v, truncated) = coerce::to_f64(value)?;
	if truncated {
		ctx.push_warning(Warning::truncated_wrong_value("DOUBLE", value));
	}
	Some(v)
}

pub(crate) fn decimal_arg(ctx: &SessionContext, value: &Value) -> Option<Decimal> {
	let (v, truncated) = coerce::to_decimal(value)?;
	if truncated {
		ctx.push_warning(Warning::truncated_wrong_value("DECIMAL", value));
	}
	Some(v)
}

pub(crate) fn date_arg(ctx: &SessionContext, value: &Value) -> Option<Date> {
	match coerce::to_date(value) {
		coerce::Coerced::Value(d) => Some(d),
		coerce::Coerced::Null => None,
		coerce::Coerced::Invalid => {
			ctx.push_warning(Warning::truncated_wrong_value("date", value));
			None
		}
	}
}

pub(crate) fn datetime_arg(ctx: &SessionContext, value: &Value) -> Option<DateTime> {
	match coerce::to_datetime(value) {
		coerce::Coerced::Value(dt) => Some(dt),
		coerce::Coerced::Null => None,
		coerce::Coerced::Invalid => {
			ctx.push_warning(Warning::truncated_wrong_value("datetime", value));
			None
		}
	}
}

pub(crate) fn time_arg(ctx: &SessionContext, value: &Value) -> Option<Time> {
	match coerce::to_time(value) {
		coerce::Coerced::Value(t) => Some(t),
		coerce::Coerced::Null => None,
		coerce::Coerced::Invalid => {
			ctx.push_warning(Warning::truncated_wrong_value("time", value));
			None
		}
	}
}

/// SQL truthiness of a non-NULL value: its numeric reading is nonzero.
pub(crate) fn is_true(value: &Value) -> bool {
	coerce::to_f64(value).map(|(v, _)| v != 0.0).unwrap_or(false)
}

// Common result-type rules.

pub(crate) fn ty_int8(_: &[Type]) -> Type {
	Type::int8()
}

pub(crate) fn ty_uint8(_: &[Type]) -> Type {
	Type::uint8()
}

pub(crate) fn ty_float8(_: &[Type]) -> Type {
	Type::float8()
}

pub(crate) fn ty_text(_: &[Type]) -> Type {
	Type::text()
}

pub(crate) fn ty_blob(_: &[Type]) -> Type {
	Type::blob()
}

pub(crate) fn ty_date(_: &[Type]) -> Type {
	Type::date()
}

pub(crate) fn ty_time(_: &[Type]) -> Type {
	Type::time(6)
}

pub(crate) fn ty_datetime(_: &[Type]) -> Type {
	Type::datetime(6)
}

pub(crate) fn ty_union(args: &[Type]) -> Type {
	Type::numeric_union(args)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::Literal;

	fn lit(v: Value) -> ExprRef {
		Arc::new(Literal::new(v))
	}

	fn meta_for(name: &str) -> &'static FuncMeta {
		regexp::all().into_iter().find(|m| m.name == name).unwrap()
	}

	#[test]
	fn test_rewrite_keeps_compiled_pattern_for_identical_children() {
		let ctx = SessionContext::standalone(1);
		let children = vec![lit(Value::text("abc")), lit(Value::text("b"))];
		let node = FuncExpr::new(meta_for("regexp_like"), children.clone()).unwrap();
		node.evaluate(&ctx, &Row::empty()).unwrap();
		assert!(node.regex_cache.lock().is_some());

		let same = node.rebuilt(children).unwrap();
		assert!(same.regex_cache.lock().is_some());

		let other_pattern = vec![lit(Value::text("abc")), lit(Value::text("c"))];
		let different = node.rebuilt(other_pattern).unwrap();
		assert!(different.regex_cache.lock().is_none());
	}
}
