// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Mathematical functions.
//!
//! Rounding keeps the input's numeric family: DECIMAL rounds exactly
//! with half-up, floats round through a power-of-ten factor, integers
//! pass through for non-negative place counts. Out-of-domain inputs
//! (SQRT of a negative, LOG of zero) produce NULL rather than an error.

use myexpr_function::{
	encode::{conv, crc32},
	format::{
		NumberLocale, format_number, round_decimal, round_f64, truncate_decimal, truncate_f64,
	},
};
use myexpr_type::{Decimal, Result, Type, TypeKind, Value, Warning};

use crate::{
	context::SessionContext,
	expr::ScalarExpr,
	func::{
		FuncExpr, FuncMeta, Nullability, decimal_arg, f64_arg, i64_arg, str_arg, ty_float8,
		ty_int8, ty_text, ty_uint8, ty_union,
	},
};

/// NULL unless the computation stayed finite.
fn finite(v: f64) -> Value {
	if v.is_finite() {
		Value::float8(v)
	} else {
		Value::Null
	}
}

fn abs_decimal(d: &Decimal) -> Decimal {
	if d.is_negative() {
		Decimal::parse(d.to_string().trim_start_matches('-')).unwrap_or_else(Decimal::zero)
	} else {
		d.clone()
	}
}

fn eval_abs(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match &values[0] {
		Value::Float4(v) => Ok(Value::float8((*v as f64).abs())),
		Value::Float8(v) => Ok(Value::float8(v.abs())),
		Value::Decimal(d) => Ok(Value::Decimal(abs_decimal(d))),
		v if v.kind().is_unsigned() => Ok(v.clone()),
		v if v.kind().is_integer() => {
			let Some(i) = i64_arg(ctx, v) else {
				return Ok(Value::Null);
			};
			match i.checked_abs() {
				Some(a) => Ok(Value::int8(a)),
				// |i64::MIN| only fits in the unsigned range
				None => Ok(Value::uint8(i64::MAX as u64 + 1)),
			}
		}
		v => match f64_arg(ctx, v) {
			Some(f) => Ok(finite(f.abs())),
			None => Ok(Value::Null),
		},
	}
}

fn ceil_floor(ctx: &SessionContext, value: &Value, up: bool) -> Result<Value> {
	match value {
		v if v.kind().is_integer() => Ok(v.clone()),
		Value::Decimal(d) => {
			let truncated = d.truncate(0);
			let exact = truncated == *d;
			let step = if exact {
				0
			} else if up && !d.is_negative() {
				1
			} else if !up && d.is_negative() {
				-1
			} else {
				0
			};
			let stepped = match truncated.to_i64() {
				Some(i) => Decimal::from_i64(i.saturating_add(step)),
				None => truncated,
			};
			Ok(match stepped.to_i64() {
				Some(i) => Value::int8(i),
				None => Value::Decimal(stepped),
			})
		}
		v => match f64_arg(ctx, v) {
			Some(f) => {
				let stepped = if up {
					f.ceil()
				} else {
					f.floor()
				};
				if stepped >= i64::MIN as f64 && stepped <= i64::MAX as f64 {
					Ok(Value::int8(stepped as i64))
				} else {
					Ok(finite(stepped))
				}
			}
			None => Ok(Value::Null),
		},
	}
}

fn eval_ceil(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	ceil_floor(ctx, &values[0], true)
}

fn eval_floor(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	ceil_floor(ctx, &values[0], false)
}

fn eval_sign(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) => Ok(Value::int8(if f > 0.0 {
			1
		} else if f < 0.0 {
			-1
		} else {
			0
		})),
		None => Ok(Value::Null),
	}
}

fn eval_sqrt(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) if f >= 0.0 => Ok(finite(f.sqrt())),
		Some(_) => Ok(Value::Null),
		None => Ok(Value::Null),
	}
}

fn eval_pow(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(base), Some(exponent)) = (f64_arg(ctx, &values[0]), f64_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	Ok(finite(base.powf(exponent)))
}

fn eval_exp(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) => Ok(finite(f.exp())),
		None => Ok(Value::Null),
	}
}

fn eval_ln(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) if f > 0.0 => Ok(finite(f.ln())),
		_ => Ok(Value::Null),
	}
}

fn eval_log(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	if values.len() == 1 {
		return match f64_arg(ctx, &values[0]) {
			Some(f) if f > 0.0 => Ok(finite(f.ln())),
			_ => Ok(Value::Null),
		};
	}
	let (Some(base), Some(x)) = (f64_arg(ctx, &values[0]), f64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	if base <= 0.0 || base == 1.0 || x <= 0.0 {
		return Ok(Value::Null);
	}
	Ok(finite(x.ln() / base.ln()))
}

fn eval_log2(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) if f > 0.0 => Ok(finite(f.log2())),
		_ => Ok(Value::Null),
	}
}

fn eval_log10(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) if f > 0.0 => Ok(finite(f.log10())),
		_ => Ok(Value::Null),
	}
}

macro_rules! unary_float {
	($fn_name:ident, $method:ident) => {
		fn $fn_name(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
			match f64_arg(ctx, &values[0]) {
				Some(f) => Ok(finite(f.$method())),
				None => Ok(Value::Null),
			}
		}
	};
}

unary_float!(eval_sin, sin);
unary_float!(eval_cos, cos);
unary_float!(eval_tan, tan);
unary_float!(eval_atan, atan);

fn eval_asin(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) if (-1.0..=1.0).contains(&f) => Ok(finite(f.asin())),
		_ => Ok(Value::Null),
	}
}

fn eval_acos(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) if (-1.0..=1.0).contains(&f) => Ok(finite(f.acos())),
		_ => Ok(Value::Null),
	}
}

fn eval_atan2(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(y), Some(x)) = (f64_arg(ctx, &values[0]), f64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	Ok(finite(y.atan2(x)))
}

fn eval_cot(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) => Ok(finite(f.cos() / f.sin())),
		None => Ok(Value::Null),
	}
}

fn eval_degrees(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) => Ok(finite(f.to_degrees())),
		None => Ok(Value::Null),
	}
}

fn eval_radians(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match f64_arg(ctx, &values[0]) {
		Some(f) => Ok(finite(f.to_radians())),
		None => Ok(Value::Null),
	}
}

fn eval_pi(_node: &FuncExpr, _ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::float8(std::f64::consts::PI))
}

fn eval_rand(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	if let Some(seed) = values.first() {
		// a NULL seed behaves like seed 0
		let seed = i64_arg(ctx, seed).unwrap_or(0);
		ctx.seed_rand(seed as u64);
	}
	Ok(Value::float8(ctx.rand_f64()))
}

fn eval_crc32(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let bytes = match &values[0] {
		Value::Blob(b) => b.as_bytes().to_vec(),
		other => match str_arg(ctx, other) {
			Some(s) => s.into_bytes(),
			None => return Ok(Value::Null),
		},
	};
	Ok(Value::uint8(crc32(&bytes) as u64))
}

fn eval_conv(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(input), Some(from), Some(to)) =
		(str_arg(ctx, &values[0]), i64_arg(ctx, &values[1]), i64_arg(ctx, &values[2]))
	else {
		return Ok(Value::Null);
	};
	match conv(&input, from, to) {
		Some(s) => Ok(Value::text_with(s, node.collation().0)),
		None => Ok(Value::Null),
	}
}

fn places_arg(ctx: &SessionContext, values: &[Value]) -> Option<i64> {
	match values.get(1) {
		Some(v) => i64_arg(ctx, v),
		None => Some(0),
	}
}

fn round_truncate(ctx: &SessionContext, values: Vec<Value>, round: bool) -> Result<Value> {
	let Some(places) = places_arg(ctx, &values) else {
		return Ok(Value::Null);
	};
	match &values[0] {
		v if v.kind().is_integer() && places >= 0 => Ok(v.clone()),
		v if v.kind().is_integer() => {
			// negative places zero out trailing digits of the integer
			let Some(i) = i64_arg(ctx, v) else {
				return Ok(Value::Null);
			};
			let d = if round {
				round_decimal(&Decimal::from_i64(i), places)
			} else {
				truncate_decimal(&Decimal::from_i64(i), places)
			};
			Ok(match d.to_i64() {
				Some(i) => Value::int8(i),
				None => Value::Decimal(d),
			})
		}
		Value::Decimal(d) => Ok(Value::Decimal(if round {
			round_decimal(d, places)
		} else {
			truncate_decimal(d, places)
		})),
		v => match f64_arg(ctx, v) {
			Some(f) => Ok(finite(if round {
				round_f64(f, places)
			} else {
				truncate_f64(f, places)
			})),
			None => Ok(Value::Null),
		},
	}
}

fn eval_round(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	round_truncate(ctx, values, true)
}

fn eval_truncate(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	round_truncate(ctx, values, false)
}

fn eval_format(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(number), Some(places)) = (decimal_arg(ctx, &values[0]), i64_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	let locale = match values.get(2) {
		None => NumberLocale::default(),
		Some(v) => {
			let Some(name) = str_arg(ctx, v) else {
				return Ok(Value::Null);
			};
			match NumberLocale::lookup(&name) {
				Some(l) => l,
				None => {
					ctx.push_warning(Warning::new(
						1649,
						format!("Unknown locale: '{}'", name),
					));
					NumberLocale::default()
				}
			}
		}
	};
	Ok(Value::text_with(format_number(&number, places, &locale), node.collation().0))
}

fn eval_mod(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let left = &values[0];
	let right = &values[1];
	if left.kind().is_integer() && right.kind().is_integer() {
		let (Some(a), Some(b)) = (i64_arg(ctx, left), i64_arg(ctx, right)) else {
			return Ok(Value::Null);
		};
		if b == 0 {
			return Ok(Value::Null);
		}
		// i64::MIN % -1 would trap
		if a == i64::MIN && b == -1 {
			return Ok(Value::int8(0));
		}
		return Ok(Value::int8(a % b));
	}
	let (Some(a), Some(b)) = (f64_arg(ctx, left), f64_arg(ctx, right)) else {
		return Ok(Value::Null);
	};
	if b == 0.0 {
		return Ok(Value::Null);
	}
	Ok(finite(a % b))
}

fn ty_ceil(args: &[Type]) -> Type {
	match args.first().map(Type::kind) {
		Some(k) if k.is_float() => Type::float8(),
		Some(k) if k.is_unsigned() => Type::uint8(),
		_ => Type::int8(),
	}
}

fn ty_round(args: &[Type]) -> Type {
	match args.first() {
		Some(t) if t.kind().is_float() => Type::float8(),
		Some(t) if t.kind() == TypeKind::Decimal => *t,
		Some(t) if t.kind().is_unsigned() => Type::uint8(),
		Some(t) if t.kind().is_integer() => Type::int8(),
		_ => Type::float8(),
	}
}

macro_rules! meta {
	($static_name:ident, $name:literal, $desc:literal, $min:expr, $max:expr, $prop:expr, $null:expr, $volatile:expr, $ty:expr, $eval:expr) => {
		pub(super) static $static_name: FuncMeta = FuncMeta {
			name: $name,
			description: $desc,
			min_args: $min,
			max_args: $max,
			propagates_null: $prop,
			nullability: $null,
			volatile: $volatile,
			result_type: $ty,
			eval: $eval,
		};
	};
}

meta!(ABS, "abs", "absolute value", 1, 1, true, Nullability::OnNullInput, false, ty_union, eval_abs);
meta!(CEIL, "ceil", "smallest integer not below the argument", 1, 1, true, Nullability::OnNullInput, false, ty_ceil, eval_ceil);
meta!(FLOOR, "floor", "largest integer not above the argument", 1, 1, true, Nullability::OnNullInput, false, ty_ceil, eval_floor);
meta!(SIGN, "sign", "-1, 0 or 1 by the argument's sign", 1, 1, true, Nullability::OnNullInput, false, ty_int8, eval_sign);
meta!(SQRT, "sqrt", "square root, NULL for negatives", 1, 1, true, Nullability::Always, false, ty_float8, eval_sqrt);
meta!(POW, "pow", "base raised to an exponent", 2, 2, true, Nullability::Always, false, ty_float8, eval_pow);
meta!(EXP, "exp", "e raised to the argument", 1, 1, true, Nullability::Always, false, ty_float8, eval_exp);
meta!(LN, "ln", "natural logarithm, NULL outside (0, inf)", 1, 1, true, Nullability::Always, false, ty_float8, eval_ln);
meta!(LOG, "log", "logarithm, natural or to a given base", 1, 2, true, Nullability::Always, false, ty_float8, eval_log);
meta!(LOG2, "log2", "base-2 logarithm", 1, 1, true, Nullability::Always, false, ty_float8, eval_log2);
meta!(LOG10, "log10", "base-10 logarithm", 1, 1, true, Nullability::Always, false, ty_float8, eval_log10);
meta!(SIN, "sin", "sine of radians", 1, 1, true, Nullability::OnNullInput, false, ty_float8, eval_sin);
meta!(COS, "cos", "cosine of radians", 1, 1, true, Nullability::OnNullInput, false, ty_float8, eval_cos);
meta!(TAN, "tan", "tangent of radians", 1, 1, true, Nullability::OnNullInput, false, ty_float8, eval_tan);
meta!(ASIN, "asin", "arc sine, NULL outside [-1, 1]", 1, 1, true, Nullability::Always, false, ty_float8, eval_asin);
meta!(ACOS, "acos", "arc cosine, NULL outside [-1, 1]", 1, 1, true, Nullability::Always, false, ty_float8, eval_acos);
meta!(ATAN, "atan", "arc tangent", 1, 1, true, Nullability::OnNullInput, false, ty_float8, eval_atan);
meta!(ATAN2, "atan2", "arc tangent of y/x using both signs", 2, 2, true, Nullability::OnNullInput, false, ty_float8, eval_atan2);
meta!(COT, "cot", "cotangent, NULL where tangent is zero", 1, 1, true, Nullability::Always, false, ty_float8, eval_cot);
meta!(DEGREES, "degrees", "radians to degrees", 1, 1, true, Nullability::OnNullInput, false, ty_float8, eval_degrees);
meta!(RADIANS, "radians", "degrees to radians", 1, 1, true, Nullability::OnNullInput, false, ty_float8, eval_radians);
meta!(PI, "pi", "the constant pi", 0, 0, false, Nullability::Never, false, ty_float8, eval_pi);
meta!(RAND, "rand", "uniform random in [0, 1), optionally seeded", 0, 1, false, Nullability::Never, true, ty_float8, eval_rand);
meta!(CRC32, "crc32", "CRC-32 checksum of the argument bytes", 1, 1, true, Nullability::OnNullInput, false, ty_uint8, eval_crc32);
meta!(CONV, "conv", "convert a number between bases 2..36", 3, 3, true, Nullability::Always, false, ty_text, eval_conv);
meta!(ROUND, "round", "round half away from zero to n places", 1, 2, true, Nullability::OnNullInput, false, ty_round, eval_round);
meta!(TRUNCATE, "truncate", "truncate toward zero to n places", 2, 2, true, Nullability::OnNullInput, false, ty_round, eval_truncate);
meta!(FORMAT, "format", "group and round a number for display", 2, 3, true, Nullability::OnNullInput, false, ty_text, eval_format);
meta!(MOD, "mod", "remainder, NULL for a zero divisor", 2, 2, true, Nullability::Always, false, ty_union, eval_mod);

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![
		&ABS, &CEIL, &FLOOR, &SIGN, &SQRT, &POW, &EXP, &LN, &LOG, &LOG2, &LOG10, &SIN, &COS,
		&TAN, &ASIN, &ACOS, &ATAN, &ATAN2, &COT, &DEGREES, &RADIANS, &PI, &RAND, &CRC32, &CONV,
		&ROUND, &TRUNCATE, &FORMAT, &MOD,
	]
}
