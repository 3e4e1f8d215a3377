// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Session and server functions: named user locks, SLEEP, UUID_SHORT
//! and CONNECTION_ID.
//!
//! A NULL or malformed lock name is a hard error, not NULL, so a typo in
//! a lock name cannot silently succeed.

use std::time::Duration;

use myexpr_type::{EvalError, Result, Value};

use crate::{
	context::SessionContext,
	func::{FuncExpr, FuncMeta, Nullability, f64_arg, str_arg, ty_int8, ty_uint8},
	session::locks::ReleaseOutcome,
};

/// Effectively-infinite wait for a negative GET_LOCK timeout.
const INFINITE_WAIT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

fn lock_name(ctx: &SessionContext, value: &Value) -> Result<String> {
	if value.is_null() {
		return Err(EvalError::UserLockWrongName {
			name: "NULL".to_string(),
		});
	}
	str_arg(ctx, value).ok_or(EvalError::UserLockWrongName {
		name: "NULL".to_string(),
	})
}

fn eval_get_lock(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let name = lock_name(ctx, &values[0])?;
	let Some(timeout) = f64_arg(ctx, &values[1]) else {
		return Err(EvalError::IncorrectArguments {
			function: "get_lock".to_string(),
		});
	};
	let wait = if timeout < 0.0 {
		INFINITE_WAIT
	} else {
		Duration::from_secs_f64(timeout)
	};
	let acquired = ctx.locks().get_lock(&name, ctx.session_id(), wait)?;
	Ok(Value::int8(acquired as i64))
}

fn eval_release_lock(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let name = lock_name(ctx, &values[0])?;
	match ctx.locks().release_lock(&name, ctx.session_id())? {
		ReleaseOutcome::Released => Ok(Value::int8(1)),
		ReleaseOutcome::NotOwner => Ok(Value::int8(0)),
		ReleaseOutcome::NotHeld => Ok(Value::Null),
	}
}

fn eval_release_all_locks(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::int8(ctx.locks().release_all(ctx.session_id()) as i64))
}

fn eval_is_free_lock(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let name = lock_name(ctx, &values[0])?;
	Ok(Value::int8(ctx.locks().is_free(&name)? as i64))
}

fn eval_is_used_lock(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let name = lock_name(ctx, &values[0])?;
	match ctx.locks().holder(&name)? {
		Some(owner) => Ok(Value::uint8(owner)),
		None => Ok(Value::Null),
	}
}

fn eval_sleep(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let seconds = match f64_arg(ctx, &values[0]) {
		Some(s) if s >= 0.0 && s.is_finite() => s,
		_ => {
			return Err(EvalError::IncorrectArguments {
				function: "sleep".to_string(),
			});
		}
	};
	if ctx.sleep(Duration::from_secs_f64(seconds)) {
		// killed mid-sleep; the statement must not report success
		return Err(EvalError::QueryInterrupted);
	}
	Ok(Value::int8(0))
}

fn eval_uuid_short(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::uint8(ctx.uuid_short()))
}

fn eval_connection_id(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::uint8(ctx.session_id()))
}

macro_rules! meta {
	($static_name:ident, $name:literal, $desc:literal, $min:expr, $max:expr, $null:expr, $volatile:expr, $ty:expr, $eval:expr) => {
		pub(super) static $static_name: FuncMeta = FuncMeta {
			name: $name,
			description: $desc,
			min_args: $min,
			max_args: $max,
			propagates_null: false,
			nullability: $null,
			volatile: $volatile,
			result_type: $ty,
			eval: $eval,
		};
	};
}

meta!(GET_LOCK, "get_lock", "acquire a named server lock, waiting up to a timeout", 2, 2, Nullability::Always, true, ty_int8, eval_get_lock);
meta!(RELEASE_LOCK, "release_lock", "release a named lock: 1, 0 for another owner, NULL if absent", 1, 1, Nullability::Always, true, ty_int8, eval_release_lock);
meta!(RELEASE_ALL_LOCKS, "release_all_locks", "release every lock this session holds", 0, 0, Nullability::Never, true, ty_int8, eval_release_all_locks);
meta!(IS_FREE_LOCK, "is_free_lock", "1 when nobody holds the named lock", 1, 1, Nullability::Always, true, ty_int8, eval_is_free_lock);
meta!(IS_USED_LOCK, "is_used_lock", "session id of the lock holder, NULL when free", 1, 1, Nullability::Always, true, ty_uint8, eval_is_used_lock);
meta!(SLEEP, "sleep", "pause; 0 on completion, an error when the session is killed", 1, 1, Nullability::Never, true, ty_int8, eval_sleep);
meta!(UUID_SHORT, "uuid_short", "monotonic 64-bit id unique across the server", 0, 0, Nullability::Never, true, ty_uint8, eval_uuid_short);
meta!(CONNECTION_ID, "connection_id", "this session's id", 0, 0, Nullability::Never, false, ty_uint8, eval_connection_id);

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![
		&GET_LOCK,
		&RELEASE_LOCK,
		&RELEASE_ALL_LOCKS,
		&IS_FREE_LOCK,
		&IS_USED_LOCK,
		&SLEEP,
		&UUID_SHORT,
		&CONNECTION_ID,
	]
}
