// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Name-to-function resolution.
//!
//! All families register into one static map at first use. Lookup is
//! case-insensitive and the common SQL aliases resolve to their
//! canonical entry, so CEILING builds the same node as CEIL.

use std::collections::HashMap;

use myexpr_type::{EvalError, Result};
use once_cell::sync::Lazy;

use crate::{
	expr::ExprRef,
	func::{FuncExpr, FuncMeta, control, datetime, encode, lock, numeric, regexp, string},
};

static ALIASES: &[(&str, &str)] = &[
	("adddate", "date_add"),
	("ceiling", "ceil"),
	("character_length", "char_length"),
	("current_date", "curdate"),
	("current_time", "curtime"),
	("current_timestamp", "now"),
	("dayofmonth", "day"),
	("lcase", "lower"),
	("localtime", "now"),
	("localtimestamp", "now"),
	("mid", "substring"),
	("position", "locate"),
	("power", "pow"),
	("subdate", "date_sub"),
	("substr", "substring"),
	("ucase", "upper"),
];

static CATALOG: Lazy<HashMap<&'static str, &'static FuncMeta>> = Lazy::new(|| {
	let mut map = HashMap::new();
	for meta in control::all()
		.into_iter()
		.chain(string::all())
		.chain(numeric::all())
		.chain(datetime::all())
		.chain(regexp::all())
		.chain(encode::all())
		.chain(lock::all())
	{
		let previous = map.insert(meta.name, meta);
		debug_assert!(previous.is_none(), "duplicate function name {}", meta.name);
	}
	map
});

pub struct FunctionRegistry;

impl FunctionRegistry {
	/// Metadata for `name`, resolving aliases and ignoring case.
	pub fn lookup(name: &str) -> Option<&'static FuncMeta> {
		let lowered = name.to_lowercase();
		let canonical = ALIASES
			.iter()
			.find(|(alias, _)| *alias == lowered)
			.map(|(_, target)| *target)
			.unwrap_or(lowered.as_str());
		CATALOG.get(canonical).copied()
	}

	/// Build an expression node for a named function call.
	pub fn build(name: &str, children: Vec<ExprRef>) -> Result<ExprRef> {
		let meta = Self::lookup(name).ok_or_else(|| EvalError::UnknownFunction {
			name: name.to_string(),
		})?;
		FuncExpr::build(meta, children)
	}

	/// Every registered function, for catalog introspection.
	pub fn names() -> Vec<&'static str> {
		let mut names: Vec<&'static str> = CATALOG.keys().copied().collect();
		names.sort_unstable();
		names
	}
}
