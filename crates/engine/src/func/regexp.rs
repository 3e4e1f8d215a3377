// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! The REGEXP function family.
//!
//! The subject's resolved collation supplies the default case
//! sensitivity; a `c` or `i` in the trailing match-type argument
//! overrides it. Bad patterns, bad flags and out-of-range positions are
//! hard errors rather than NULL.

use myexpr_function::regexp::{
	RegexFlags, regexp_instr, regexp_like, regexp_replace, regexp_substr,
};
use myexpr_type::{Result, Value};

use crate::{
	context::SessionContext,
	expr::ScalarExpr,
	func::{FuncExpr, FuncMeta, Nullability, i64_arg, str_arg, ty_int8, ty_text},
};

struct RegexpCall {
	subject: String,
	regex: regex::Regex,
}

/// Pull the subject, pattern and trailing match-type out of the argument
/// list and compile (or reuse) the pattern. None means a NULL argument.
fn prepare(
	node: &FuncExpr,
	ctx: &SessionContext,
	values: &[Value],
	flags_at: usize,
) -> Result<Option<RegexpCall>> {
	let (Some(subject), Some(pattern)) = (str_arg(ctx, &values[0]), str_arg(ctx, &values[1]))
	else {
		return Ok(None);
	};
	let flags = match values.get(flags_at) {
		Some(v) => match str_arg(ctx, v) {
			Some(s) => RegexFlags::parse(&s)?,
			None => return Ok(None),
		},
		None => RegexFlags::default(),
	};
	let case_insensitive = !node.collation().0.is_case_sensitive();
	let regex = node.regex_for(&pattern, flags, case_insensitive)?;
	Ok(Some(RegexpCall {
		subject,
		regex,
	}))
}

fn optional_i64(ctx: &SessionContext, values: &[Value], at: usize, default: i64) -> Option<i64> {
	match values.get(at) {
		Some(v) => i64_arg(ctx, v),
		None => Some(default),
	}
}

fn eval_regexp_like(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(call) = prepare(node, ctx, &values, 2)? else {
		return Ok(Value::Null);
	};
	Ok(Value::int8(regexp_like(&call.regex, &call.subject) as i64))
}

fn eval_regexp_instr(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(call) = prepare(node, ctx, &values, 5)? else {
		return Ok(Value::Null);
	};
	let (Some(pos), Some(occurrence), Some(return_option)) = (
		optional_i64(ctx, &values, 2, 1),
		optional_i64(ctx, &values, 3, 1),
		optional_i64(ctx, &values, 4, 0),
	) else {
		return Ok(Value::Null);
	};
	let found =
		regexp_instr(&call.regex, &call.subject, pos, occurrence, return_option != 0)?;
	Ok(Value::int8(found))
}

fn eval_regexp_substr(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(call) = prepare(node, ctx, &values, 4)? else {
		return Ok(Value::Null);
	};
	let (Some(pos), Some(occurrence)) =
		(optional_i64(ctx, &values, 2, 1), optional_i64(ctx, &values, 3, 1))
	else {
		return Ok(Value::Null);
	};
	match regexp_substr(&call.regex, &call.subject, pos, occurrence)? {
		Some(s) => Ok(Value::text_with(s, node.collation().0)),
		None => Ok(Value::Null),
	}
}

fn eval_regexp_replace(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(call) = prepare(node, ctx, &values, 5)? else {
		return Ok(Value::Null);
	};
	let Some(replacement) = str_arg(ctx, &values[2]) else {
		return Ok(Value::Null);
	};
	let (Some(pos), Some(occurrence)) =
		(optional_i64(ctx, &values, 3, 1), optional_i64(ctx, &values, 4, 0))
	else {
		return Ok(Value::Null);
	};
	let replaced = regexp_replace(&call.regex, &call.subject, &replacement, pos, occurrence)?;
	Ok(Value::text_with(replaced, node.collation().0))
}

macro_rules! meta {
	($static_name:ident, $name:literal, $desc:literal, $min:expr, $max:expr, $eval:expr, $ty:expr) => {
		pub(super) static $static_name: FuncMeta = FuncMeta {
			name: $name,
			description: $desc,
			min_args: $min,
			max_args: $max,
			propagates_null: true,
			nullability: Nullability::Always,
			volatile: false,
			result_type: $ty,
			eval: $eval,
		};
	};
}

meta!(REGEXP_LIKE, "regexp_like", "1 when the pattern matches the subject", 2, 3, eval_regexp_like, ty_int8);
meta!(REGEXP_INSTR, "regexp_instr", "1-based character position of a match", 2, 6, eval_regexp_instr, ty_int8);
meta!(REGEXP_SUBSTR, "regexp_substr", "text of a match, NULL when none", 2, 5, eval_regexp_substr, ty_text);
meta!(REGEXP_REPLACE, "regexp_replace", "replace one or all matches literally", 3, 6, eval_regexp_replace, ty_text);

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![&REGEXP_LIKE, &REGEXP_INSTR, &REGEXP_SUBSTR, &REGEXP_REPLACE]
}

#[cfg(test)]
mod tests {
	use myexpr_type::EvalError;

	use super::*;
	use crate::func::testing::{eval, eval_ok};

	fn s(v: &str) -> Value {
		Value::text(v)
	}

	#[test]
	fn test_like_inherits_collation_case() {
		// the default collation folds case
		assert_eq!(eval_ok(&REGEXP_LIKE, vec![s("ABC"), s("abc")]), Value::int8(1));
		// an explicit c flag restores sensitivity
		assert_eq!(eval_ok(&REGEXP_LIKE, vec![s("ABC"), s("abc"), s("c")]), Value::int8(0));
		assert_eq!(eval_ok(&REGEXP_LIKE, vec![s("abc"), s("^b")]), Value::int8(0));
	}

	#[test]
	fn test_like_null_and_errors() {
		assert_eq!(eval_ok(&REGEXP_LIKE, vec![Value::Null, s("a")]), Value::Null);
		let ctx = SessionContext::standalone(1);
		assert!(matches!(
			eval(&ctx, &REGEXP_LIKE, vec![s("a"), s("(unclosed")]),
			Err(EvalError::InvalidRegex { .. })
		));
		assert_eq!(
			eval(&ctx, &REGEXP_LIKE, vec![s("a"), s("a"), s("z")]),
			Err(EvalError::InvalidRegexFlag {
				flag: 'z'
			})
		);
	}

	#[test]
	fn test_instr() {
		assert_eq!(
			eval_ok(&REGEXP_INSTR, vec![s("dog cat dog"), s("dog")]),
			Value::int8(1)
		);
		assert_eq!(
			eval_ok(&REGEXP_INSTR, vec![s("dog cat dog"), s("dog"), Value::int4(2)]),
			Value::int8(9)
		);
		assert_eq!(
			eval_ok(
				&REGEXP_INSTR,
				vec![s("aa aaa aaaa"), s("a{2}"), Value::int4(1), Value::int4(2)]
			),
			Value::int8(4)
		);
		assert_eq!(eval_ok(&REGEXP_INSTR, vec![s("abc"), s("z")]), Value::int8(0));
	}

	#[test]
	fn test_substr() {
		assert_eq!(
			eval_ok(&REGEXP_SUBSTR, vec![s("abc def ghi"), s("[a-z]+")]),
			s("abc")
		);
		assert_eq!(
			eval_ok(
				&REGEXP_SUBSTR,
				vec![s("abc def ghi"), s("[a-z]+"), Value::int4(1), Value::int4(3)]
			),
			s("ghi")
		);
		assert_eq!(eval_ok(&REGEXP_SUBSTR, vec![s("abc"), s("[0-9]")]), Value::Null);
	}

	#[test]
	fn test_replace() {
		assert_eq!(
			eval_ok(&REGEXP_REPLACE, vec![s("a b c"), s("b"), s("X")]),
			s("a X c")
		);
		assert_eq!(
			eval_ok(
				&REGEXP_REPLACE,
				vec![s("abc def ghi"), s("[a-z]+"), s("X"), Value::int4(1), Value::int4(3)]
			),
			s("abc def X")
		);
	}

	#[test]
	fn test_replace_bad_position_is_an_error() {
		let ctx = SessionContext::standalone(1);
		assert_eq!(
			eval(&ctx, &REGEXP_REPLACE, vec![s("abc"), s("b"), s("X"), Value::int4(9)]),
			Err(EvalError::IndexOutOfBounds)
		);
	}
}
