// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! End-to-end checks of the function catalog through the registry, the
//! way a query executor drives it: build a tree from names and literal
//! arguments, then evaluate against a session context.

use std::sync::Arc;

use myexpr_engine::{ExprRef, FunctionRegistry, Literal, ScalarExpr, SessionContext};
use myexpr_type::{Coercibility, Decimal, EvalError, Row, TypeKind, Value};

fn lit(v: Value) -> ExprRef {
	Arc::new(Literal::new(v))
}

fn s(v: &str) -> Value {
	Value::text(v)
}

fn call(name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
	let ctx = SessionContext::standalone(1);
	let expr = FunctionRegistry::build(name, args.into_iter().map(lit).collect())?;
	expr.evaluate(&ctx, &Row::empty())
}

fn call_ok(name: &str, args: Vec<Value>) -> Value {
	call(name, args).unwrap()
}

#[test]
fn null_propagates_through_ordinary_functions() {
	for (name, args) in [
		("upper", vec![Value::Null]),
		("length", vec![Value::Null]),
		("abs", vec![Value::Null]),
		("round", vec![Value::float8(1.5), Value::Null]),
		("concat", vec![s("a"), Value::Null, s("c")]),
		("locate", vec![Value::Null, s("abc")]),
		("to_days", vec![Value::Null]),
		("regexp_like", vec![Value::Null, s("a")]),
	] {
		assert_eq!(call_ok(name, args), Value::Null, "{} should be NULL", name);
	}
}

#[test]
fn null_exceptions_handle_their_own() {
	assert_eq!(call_ok("coalesce", vec![Value::Null, Value::int4(3)]), Value::int8(3));
	assert_eq!(call_ok("concat_ws", vec![s("-"), s("a"), Value::Null, s("b")]), s("a-b"));
	assert_eq!(call_ok("quote", vec![Value::Null]), s("NULL"));
	assert_eq!(call_ok("field", vec![Value::Null, s("a")]), Value::int8(0));
}

#[test]
fn uuid_bin_roundtrip_under_both_swap_flags() {
	let text = s("6ccd780c-baba-1026-9564-5b8c656024db");
	for swap in [Value::int4(0), Value::int4(1)] {
		let bin = call_ok("uuid_to_bin", vec![text.clone(), swap.clone()]);
		assert_eq!(call_ok("bin_to_uuid", vec![bin, swap]), text);
	}
}

#[test]
fn hex_and_base64_roundtrip() {
	let original = s("The quick brown fox");
	let hexed = call_ok("hex", vec![original.clone()]);
	let back = call_ok("unhex", vec![hexed]);
	match back {
		Value::Blob(b) => assert_eq!(b.as_bytes(), b"The quick brown fox"),
		other => panic!("unexpected {:?}", other),
	}

	let encoded = call_ok("to_base64", vec![original]);
	let decoded = call_ok("from_base64", vec![encoded]);
	match decoded {
		Value::Blob(b) => assert_eq!(b.as_bytes(), b"The quick brown fox"),
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn round_is_idempotent() {
	let once = call_ok("round", vec![Value::float8(2.675), Value::int4(2)]);
	let twice = call_ok("round", vec![once.clone(), Value::int4(2)]);
	assert_eq!(once, twice);

	let d = Value::Decimal(Decimal::parse("2.675").unwrap());
	let once = call_ok("round", vec![d, Value::int4(2)]);
	assert_eq!(once, Value::Decimal(Decimal::parse("2.68").unwrap()));
	let twice = call_ok("round", vec![once.clone(), Value::int4(2)]);
	assert_eq!(once, twice);
}

#[test]
fn truncate_keeps_the_sign_toward_zero() {
	assert_eq!(
		call_ok("truncate", vec![Value::float8(-1.999), Value::int4(1)]),
		Value::float8(-1.9)
	);
	assert_eq!(
		call_ok("truncate", vec![Value::Decimal(Decimal::parse("-1.999").unwrap()), Value::int4(1)]),
		Value::Decimal(Decimal::parse("-1.9").unwrap())
	);
}

#[test]
fn week_modes_disagree_about_january_first() {
	let date = s("2000-01-01");
	// modes without the YEAR flag place the date before week 1 and
	// return 0; the YEAR flag rolls over to week 52 of 1999 instead
	assert_eq!(call_ok("week", vec![date.clone(), Value::int4(0)]), Value::int8(0));
	assert_eq!(call_ok("week", vec![date.clone(), Value::int4(1)]), Value::int8(0));
	assert_eq!(call_ok("week", vec![date.clone(), Value::int4(2)]), Value::int8(52));
	// YEARWEEK pins the week to the year it belongs to
	let yw = call_ok("yearweek", vec![date]);
	assert_eq!(yw, Value::int8(199_952));
}

#[test]
fn find_in_set_and_locate() {
	assert_eq!(call_ok("find_in_set", vec![s("b"), s("a,b,c")]), Value::int8(2));
	assert_eq!(call_ok("find_in_set", vec![s("a,b"), s("a,b,c")]), Value::int8(0));
	assert_eq!(
		call_ok("locate", vec![s("bar"), s("foobarbar"), Value::int4(5)]),
		Value::int8(7)
	);
	assert_eq!(call_ok("locate", vec![s(""), s("abc")]), Value::int8(1));
	assert_eq!(call_ok("locate", vec![s(""), s(""), Value::int4(1)]), Value::int8(1));
	assert_eq!(call_ok("locate", vec![s("x"), s("abc"), Value::int4(10)]), Value::int8(0));
}

#[test]
fn oversized_repeat_degrades_to_null_with_warning() {
	let ctx = SessionContext::standalone(1);
	ctx.set_variable("max_allowed_packet", Value::uint8(8u64));
	let expr =
		FunctionRegistry::build("repeat", vec![lit(s("abc")), lit(Value::int4(1000))]).unwrap();
	assert_eq!(expr.evaluate(&ctx, &Row::empty()), Ok(Value::Null));
	assert_eq!(ctx.take_warnings()[0].code, 1301);
}

#[test]
fn regexp_replace_position_past_end_is_hard_error() {
	assert_eq!(
		call("regexp_replace", vec![s("abc"), s("b"), s("X"), Value::int4(10)]),
		Err(EvalError::IndexOutOfBounds)
	);
}

#[test]
fn signed_unsigned_comparison_goes_through_decimal() {
	let out = call_ok("greatest", vec![Value::int8(-1), Value::uint8(u64::MAX)]);
	assert_eq!(out, Value::Decimal(Decimal::parse("18446744073709551615").unwrap()));
	let out = call_ok("least", vec![Value::int8(-1), Value::uint8(u64::MAX)]);
	assert_eq!(out, Value::Decimal(Decimal::from_i64(-1)));
}

#[test]
fn text_result_carries_the_resolved_collation() {
	let expr = FunctionRegistry::build("concat", vec![lit(s("a")), lit(s("b"))]).unwrap();
	assert_eq!(expr.result_type().kind(), TypeKind::Text);
	assert_eq!(expr.collation().1, Coercibility::Coercible);
}

#[test]
fn volatile_functions_are_never_resolved() {
	let constant = FunctionRegistry::build("upper", vec![lit(s("x"))]).unwrap();
	assert!(constant.is_resolved());
	let random = FunctionRegistry::build("rand", vec![]).unwrap();
	assert!(!random.is_resolved());
	let wrapped = FunctionRegistry::build("ifnull", vec![random, lit(s("y"))]).unwrap();
	assert!(!wrapped.is_resolved());
}

#[test]
fn coercion_warnings_reach_the_session() {
	let ctx = SessionContext::standalone(1);
	let expr = FunctionRegistry::build("abs", vec![lit(s("12abc"))]).unwrap();
	let out = expr.evaluate(&ctx, &Row::empty()).unwrap();
	assert_eq!(out, Value::float8(12.0));
	let warnings = ctx.take_warnings();
	assert!(!warnings.is_empty());
	assert_eq!(warnings[0].code, 1292);
}

#[test]
fn now_is_stable_within_a_statement() {
	let ctx = SessionContext::standalone(1);
	let now = FunctionRegistry::build("now", vec![]).unwrap();
	let first = now.evaluate(&ctx, &Row::empty()).unwrap();
	std::thread::sleep(std::time::Duration::from_millis(3));
	assert_eq!(now.evaluate(&ctx, &Row::empty()).unwrap(), first);
	// CURRENT_TIMESTAMP is the same function
	let alias = FunctionRegistry::build("current_timestamp", vec![]).unwrap();
	assert_eq!(alias.evaluate(&ctx, &Row::empty()).unwrap(), first);
}

#[test]
fn rewritten_trees_recompute_their_metadata() {
	let expr = FunctionRegistry::build("upper", vec![lit(s("abc"))]).unwrap();
	let rewritten = expr.with_children(vec![lit(s("xyz"))]).unwrap();
	let ctx = SessionContext::standalone(1);
	assert_eq!(rewritten.evaluate(&ctx, &Row::empty()), Ok(s("XYZ")));
	assert!(expr.with_children(vec![]).is_err());
}

#[test]
fn date_arithmetic_end_to_end() {
	assert_eq!(
		call_ok("date_add", vec![s("2024-01-31"), s("1"), s("MONTH")]),
		Value::date(myexpr_type::Date::parse("2024-02-29").unwrap())
	);
	assert_eq!(
		call_ok("timestampdiff", vec![s("DAY"), s("2024-02-28"), s("2024-03-01")]),
		Value::int8(2)
	);
	assert_eq!(call_ok("datediff", vec![s("2024-03-01"), s("2024-02-28")]), Value::int8(2));
}
