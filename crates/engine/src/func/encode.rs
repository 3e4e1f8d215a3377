// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Encoding and identifier functions: hex, base64, UUIDs and IPv4
//! addresses.

use myexpr_function::encode::{
	inet::{inet_aton, inet_ntoa},
	uuid::{bin_to_uuid, is_uuid, new_uuid, uuid_to_bin},
};
use myexpr_type::{Blob, Result, Value, Warning, util::hex};

use crate::{
	context::SessionContext,
	func::{
		FuncExpr, FuncMeta, Nullability, is_true, str_arg, ty_blob, ty_int8, ty_text, ty_uint8,
	},
};

// HEX, TO_BASE64 and friends render in the connection character set, so
// their text output carries the default collation even for blob input.

fn eval_hex(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let rendered = match &values[0] {
		// numbers hex their 64-bit value, strings hex their bytes
		v if v.kind().is_numeric() => {
			let Some((n, _)) = myexpr_type::value::coerce::to_i64(v) else {
				return Ok(Value::Null);
			};
			format!("{:X}", n as u64)
		}
		Value::Blob(b) => b.to_hex(),
		other => match str_arg(ctx, other) {
			Some(s) => hex::encode(s.as_bytes()),
			None => return Ok(Value::Null),
		},
	};
	Ok(Value::text(rendered))
}

fn eval_unhex(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	// an odd-length input carries an implicit leading zero
	let padded = if s.len() % 2 == 1 {
		format!("0{}", s)
	} else {
		s
	};
	match hex::decode(&padded) {
		Ok(bytes) => Ok(Value::blob(Blob::new(bytes))),
		Err(()) => Ok(Value::Null),
	}
}

fn eval_to_base64(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let encoded = match &values[0] {
		Value::Blob(b) => b.to_b64(),
		other => match str_arg(ctx, other) {
			Some(s) => Blob::new(s.into_bytes()).to_b64(),
			None => return Ok(Value::Null),
		},
	};
	Ok(Value::text(encoded))
}

fn eval_from_base64(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	match Blob::from_b64(&s) {
		Some(blob) => Ok(Value::blob(blob)),
		None => Ok(Value::Null),
	}
}

fn eval_uuid(_node: &FuncExpr, _ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::text(new_uuid()))
}

fn eval_is_uuid(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(Value::int8(is_uuid(&s) as i64)),
		None => Ok(Value::Null),
	}
}

fn swap_flag(values: &[Value]) -> Option<bool> {
	match values.get(1) {
		Some(v) if v.is_null() => None,
		Some(v) => Some(is_true(v)),
		None => Some(false),
	}
}

fn eval_uuid_to_bin(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let Some(swap) = swap_flag(&values) else {
		return Ok(Value::Null);
	};
	match uuid_to_bin(&s, swap) {
		Some(bytes) => Ok(Value::blob(Blob::new(bytes.to_vec()))),
		None => {
			ctx.push_warning(Warning::incorrect_value("string", &s));
			Ok(Value::Null)
		}
	}
}

fn eval_bin_to_uuid(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let bytes = match &values[0] {
		Value::Blob(b) => b.as_bytes().to_vec(),
		other => match str_arg(ctx, other) {
			Some(s) => s.into_bytes(),
			None => return Ok(Value::Null),
		},
	};
	let Some(swap) = swap_flag(&values) else {
		return Ok(Value::Null);
	};
	match bin_to_uuid(&bytes, swap) {
		Some(s) => Ok(Value::text(s)),
		None => {
			ctx.push_warning(Warning::incorrect_value("binary", &values[0]));
			Ok(Value::Null)
		}
	}
}

fn eval_inet_aton(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	match inet_aton(&s) {
		Some(n) => Ok(Value::uint8(n)),
		None => Ok(Value::Null),
	}
}

fn eval_inet_ntoa(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(n) = crate::func::u64_arg(ctx, &values[0])? else {
		return Ok(Value::Null);
	};
	match inet_ntoa(n) {
		Some(s) => Ok(Value::text(s)),
		None => Ok(Value::Null),
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

meta!(HEX, "hex", "hexadecimal rendering of bytes or a number", 1, 1, true, Nullability::OnNullInput, false, ty_text, eval_hex);
meta!(UNHEX, "unhex", "bytes from hexadecimal text", 1, 1, true, Nullability::Always, false, ty_blob, eval_unhex);
meta!(TO_BASE64, "to_base64", "base64 with 76-column line wrapping", 1, 1, true, Nullability::OnNullInput, false, ty_text, eval_to_base64);
meta!(FROM_BASE64, "from_base64", "bytes from base64 text", 1, 1, true, Nullability::Always, false, ty_blob, eval_from_base64);
meta!(UUID, "uuid", "fresh random UUID text", 0, 0, false, Nullability::Never, true, ty_text, eval_uuid);
meta!(IS_UUID, "is_uuid", "1 when the text parses as a UUID", 1, 1, true, Nullability::OnNullInput, false, ty_int8, eval_is_uuid);
meta!(UUID_TO_BIN, "uuid_to_bin", "16 bytes from UUID text, optionally time-swapped", 1, 2, true, Nullability::Always, false, ty_blob, eval_uuid_to_bin);
meta!(BIN_TO_UUID, "bin_to_uuid", "UUID text from 16 bytes, optionally time-swapped", 1, 2, true, Nullability::Always, false, ty_text, eval_bin_to_uuid);
meta!(INET_ATON, "inet_aton", "IPv4 dotted-quad to its integer", 1, 1, true, Nullability::Always, false, ty_uint8, eval_inet_aton);
meta!(INET_NTOA, "inet_ntoa", "integer to IPv4 dotted-quad", 1, 1, true, Nullability::Always, false, ty_text, eval_inet_ntoa);

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![
		&HEX,
		&UNHEX,
		&TO_BASE64,
		&FROM_BASE64,
		&UUID,
		&IS_UUID,
		&UUID_TO_BIN,
		&BIN_TO_UUID,
		&INET_ATON,
		&INET_NTOA,
	]
}
