// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! String functions.
//!
//! Positions are 1-based and counted in characters. Comparisons and
//! searches respect the collation resolved across the operands: a `_ci`
//! collation folds case, binary collations compare bytes.

use myexpr_type::{Result, Type, Value, Warning};

use crate::{
	context::SessionContext,
	expr::ScalarExpr,
	func::{FuncExpr, FuncMeta, Nullability, i64_arg, str_arg, ty_int8, ty_text, u64_arg},
};

/// Results above the session's max_allowed_packet degrade to NULL with
/// a warning.
fn oversize(ctx: &SessionContext, function: &str) -> Value {
	ctx.push_warning(Warning::new(
		1301,
		format!("Result of {}() was larger than max_allowed_packet - truncated", function),
	));
	Value::Null
}

fn chars_eq(a: char, b: char, case_insensitive: bool) -> bool {
	if case_insensitive {
		a == b || a.to_lowercase().eq(b.to_lowercase())
	} else {
		a == b
	}
}

/// 1-based character position of `needle` in `haystack`, searching from
/// the 1-based `start`. 0 when absent or when `start` is out of range.
fn locate_from(needle: &str, haystack: &str, start: i64, case_insensitive: bool) -> i64 {
	if start < 1 {
		return 0;
	}
	let hay: Vec<char> = haystack.chars().collect();
	let ndl: Vec<char> = needle.chars().collect();
	let start = start as usize - 1;
	if start > hay.len() {
		return 0;
	}
	if ndl.is_empty() {
		return start as i64 + 1;
	}
	if ndl.len() > hay.len() - start {
		return 0;
	}
	for base in start..=(hay.len() - ndl.len()) {
		if ndl.iter().zip(&hay[base..]).all(|(n, h)| chars_eq(*n, *h, case_insensitive)) {
			return base as i64 + 1;
		}
	}
	0
}

fn strings_equal(a: &str, b: &str, case_insensitive: bool) -> bool {
	if case_insensitive {
		a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
	} else {
		a == b
	}
}

fn node_case_insensitive(node: &FuncExpr) -> bool {
	!node.collation().0.is_case_sensitive()
}

fn text(node: &FuncExpr, s: String) -> Value {
	Value::text_with(s, node.collation().0)
}

// CONCAT / CONCAT_WS / ELT / FIELD / FIND_IN_SET / MAKE_SET

fn eval_concat(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let mut out = String::new();
	for value in &values {
		match str_arg(ctx, value) {
			Some(s) => out.push_str(&s),
			None => return Ok(Value::Null),
		}
	}
	Ok(text(node, out))
}

fn eval_concat_ws(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(separator) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let parts: Vec<String> = values[1..].iter().filter_map(|v| str_arg(ctx, v)).collect();
	Ok(text(node, parts.join(&separator)))
}

fn eval_elt(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(index) = i64_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	if index < 1 || index as usize >= values.len() {
		return Ok(Value::Null);
	}
	match str_arg(ctx, &values[index as usize]) {
		Some(s) => Ok(text(node, s)),
		None => Ok(Value::Null),
	}
}

fn eval_field(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let target = &values[0];
	if target.is_null() {
		return Ok(Value::int8(0));
	}
	if target.is_numeric() {
		for (idx, candidate) in values[1..].iter().enumerate() {
			if target.partial_cmp(candidate) == Some(std::cmp::Ordering::Equal) {
				return Ok(Value::int8(idx as i64 + 1));
			}
		}
		return Ok(Value::int8(0));
	}
	let Some(target) = str_arg(ctx, target) else {
		return Ok(Value::int8(0));
	};
	let ci = node_case_insensitive(node);
	for (idx, candidate) in values[1..].iter().enumerate() {
		if let Some(candidate) = str_arg(ctx, candidate) {
			if strings_equal(&target, &candidate, ci) {
				return Ok(Value::int8(idx as i64 + 1));
			}
		}
	}
	Ok(Value::int8(0))
}

fn eval_find_in_set(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(needle), Some(set)) = (str_arg(ctx, &values[0]), str_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	// a needle containing the separator can never be an element
	if needle.contains(',') {
		return Ok(Value::int8(0));
	}
	if set.is_empty() {
		return Ok(Value::int8(0));
	}
	let ci = node_case_insensitive(node);
	for (idx, element) in set.split(',').enumerate() {
		if strings_equal(&needle, element, ci) {
			return Ok(Value::int8(idx as i64 + 1));
		}
	}
	Ok(Value::int8(0))
}

fn eval_make_set(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(bits) = u64_arg(ctx, &values[0])? else {
		return Ok(Value::Null);
	};
	let mut parts = Vec::new();
	for (idx, value) in values[1..].iter().enumerate() {
		if idx < 64 && bits & (1u64 << idx) != 0 {
			if let Some(s) = str_arg(ctx, value) {
				parts.push(s);
			}
		}
	}
	Ok(text(node, parts.join(",")))
}

// LOCATE / INSTR / STRCMP

fn eval_locate(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(needle), Some(haystack)) = (str_arg(ctx, &values[0]), str_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	let start = match values.get(2) {
		Some(v) => match i64_arg(ctx, v) {
			Some(p) => p,
			None => return Ok(Value::Null),
		},
		None => 1,
	};
	Ok(Value::int8(locate_from(&needle, &haystack, start, node_case_insensitive(node))))
}

fn eval_instr(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(haystack), Some(needle)) = (str_arg(ctx, &values[0]), str_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	Ok(Value::int8(locate_from(&needle, &haystack, 1, node_case_insensitive(node))))
}

fn eval_strcmp(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(left), Some(right)) = (str_arg(ctx, &values[0]), str_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	let ordering = if node_case_insensitive(node) {
		left.to_lowercase().cmp(&right.to_lowercase())
	} else {
		left.cmp(&right)
	};
	Ok(Value::int8(match ordering {
		std::cmp::Ordering::Less => -1,
		std::cmp::Ordering::Equal => 0,
		std::cmp::Ordering::Greater => 1,
	}))
}

// Case and length

fn eval_lower(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(text(node, s.to_lowercase())),
		None => Ok(Value::Null),
	}
}

fn eval_upper(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(text(node, s.to_uppercase())),
		None => Ok(Value::Null),
	}
}

fn eval_length(_node: &FuncExpr, _ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let bytes = match &values[0] {
		Value::Blob(b) => b.as_bytes().len(),
		Value::Text(t) => t.len_bytes(),
		other => other.to_string().len(),
	};
	Ok(Value::int8(bytes as i64))
}

fn eval_char_length(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(Value::int8(s.chars().count() as i64)),
		None => Ok(Value::Null),
	}
}

// Slicing

fn take_chars(s: &str, n: usize) -> String {
	s.chars().take(n).collect()
}

fn eval_left(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(s), Some(n)) = (str_arg(ctx, &values[0]), i64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	if n <= 0 {
		return Ok(text(node, String::new()));
	}
	Ok(text(node, take_chars(&s, n as usize)))
}

fn eval_right(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(s), Some(n)) = (str_arg(ctx, &values[0]), i64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	if n <= 0 {
		return Ok(text(node, String::new()));
	}
	let total = s.chars().count();
	let skip = total.saturating_sub(n as usize);
	Ok(text(node, s.chars().skip(skip).collect()))
}

fn eval_substring(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(s), Some(pos)) = (str_arg(ctx, &values[0]), i64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	let len = match values.get(2) {
		Some(v) => match i64_arg(ctx, v) {
			Some(l) => Some(l),
			None => return Ok(Value::Null),
		},
		None => None,
	};
	let total = s.chars().count() as i64;
	// position 0 and a negative length both produce the empty string
	let start = if pos > 0 {
		pos - 1
	} else if pos < 0 && -pos <= total {
		total + pos
	} else {
		return Ok(text(node, String::new()));
	};
	if start >= total {
		return Ok(text(node, String::new()));
	}
	let taken: String = match len {
		None => s.chars().skip(start as usize).collect(),
		Some(l) if l <= 0 => String::new(),
		Some(l) => s.chars().skip(start as usize).take(l as usize).collect(),
	};
	Ok(text(node, taken))
}

fn eval_substring_index(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(s), Some(delim), Some(count)) =
		(str_arg(ctx, &values[0]), str_arg(ctx, &values[1]), i64_arg(ctx, &values[2]))
	else {
		return Ok(Value::Null);
	};
	if delim.is_empty() || count == 0 {
		return Ok(text(node, String::new()));
	}
	let result = if count > 0 {
		let mut end = s.len();
		let mut found = 0;
		for (idx, _) in s.match_indices(&delim) {
			found += 1;
			if found == count {
				end = idx;
				break;
			}
		}
		s[..end].to_string()
	} else {
		let positions: Vec<usize> = s.match_indices(&delim).map(|(idx, _)| idx).collect();
		let wanted = (-count) as usize;
		if wanted > positions.len() {
			s.clone()
		} else {
			let idx = positions[positions.len() - wanted];
			s[idx + delim.len()..].to_string()
		}
	};
	Ok(text(node, result))
}

// Editing

fn eval_replace(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(s), Some(from), Some(to)) =
		(str_arg(ctx, &values[0]), str_arg(ctx, &values[1]), str_arg(ctx, &values[2]))
	else {
		return Ok(Value::Null);
	};
	// REPLACE is always case-sensitive, independent of collation
	if from.is_empty() {
		return Ok(text(node, s));
	}
	Ok(text(node, s.replace(&from, &to)))
}

fn eval_repeat(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(s), Some(n)) = (str_arg(ctx, &values[0]), i64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	if n <= 0 {
		return Ok(text(node, String::new()));
	}
	if s.len().saturating_mul(n as usize) as u64 > ctx.max_allowed_packet() {
		return Ok(oversize(ctx, "repeat"));
	}
	Ok(text(node, s.repeat(n as usize)))
}

fn eval_reverse(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(text(node, s.chars().rev().collect())),
		None => Ok(Value::Null),
	}
}

fn pad(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>, left: bool) -> Result<Value> {
	let (Some(s), Some(target), Some(padding)) =
		(str_arg(ctx, &values[0]), i64_arg(ctx, &values[1]), str_arg(ctx, &values[2]))
	else {
		return Ok(Value::Null);
	};
	if target < 0 {
		return Ok(Value::Null);
	}
	let target = target as usize;
	if target as u64 > ctx.max_allowed_packet() {
		return Ok(oversize(ctx, if left {
			"lpad"
		} else {
			"rpad"
		}));
	}
	let current = s.chars().count();
	if current >= target {
		return Ok(text(node, take_chars(&s, target)));
	}
	if padding.is_empty() {
		return Ok(Value::Null);
	}
	let missing = target - current;
	let fill: String = padding.chars().cycle().take(missing).collect();
	let out = if left {
		format!("{}{}", fill, s)
	} else {
		format!("{}{}", s, fill)
	};
	Ok(text(node, out))
}

fn eval_lpad(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	pad(node, ctx, values, true)
}

fn eval_rpad(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	pad(node, ctx, values, false)
}

fn eval_trim(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let out = match values.get(1) {
		None => s.trim_matches(' ').to_string(),
		Some(v) => {
			let Some(remove) = str_arg(ctx, v) else {
				return Ok(Value::Null);
			};
			if remove.is_empty() {
				s
			} else {
				let mut out = s.as_str();
				while let Some(rest) = out.strip_prefix(remove.as_str()) {
					out = rest;
				}
				while let Some(rest) = out.strip_suffix(remove.as_str()) {
					out = rest;
				}
				out.to_string()
			}
		}
	};
	Ok(text(node, out))
}

fn eval_ltrim(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(text(node, s.trim_start_matches(' ').to_string())),
		None => Ok(Value::Null),
	}
}

fn eval_rtrim(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(text(node, s.trim_end_matches(' ').to_string())),
		None => Ok(Value::Null),
	}
}

fn eval_space(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(n) = i64_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	if n <= 0 {
		return Ok(text(node, String::new()));
	}
	if n as u64 > ctx.max_allowed_packet() {
		return Ok(oversize(ctx, "space"));
	}
	Ok(text(node, " ".repeat(n as usize)))
}

// Character codes and quoting

fn eval_ascii(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match str_arg(ctx, &values[0]) {
		Some(s) => Ok(Value::int8(s.bytes().next().map(|b| b as i64).unwrap_or(0))),
		None => Ok(Value::Null),
	}
}

fn eval_ord(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let Some(first) = s.chars().next() else {
		return Ok(Value::int8(0));
	};
	// multi-byte characters pack their UTF-8 bytes big-endian
	let mut code: i64 = 0;
	let mut buf = [0u8; 4];
	for byte in first.encode_utf8(&mut buf).bytes() {
		code = code << 8 | byte as i64;
	}
	Ok(Value::int8(code))
}

fn eval_quote(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	if values[0].is_null() {
		return Ok(text(node, "NULL".to_string()));
	}
	let Some(s) = str_arg(ctx, &values[0]) else {
		return Ok(text(node, "NULL".to_string()));
	};
	let mut out = String::with_capacity(s.len() + 2);
	out.push('\'');
	for ch in s.chars() {
		match ch {
			'\'' => out.push_str("\\'"),
			'\\' => out.push_str("\\\\"),
			'\0' => out.push_str("\\0"),
			'\u{1a}' => out.push_str("\\Z"),
			other => out.push(other),
		}
	}
	out.push('\'');
	Ok(text(node, out))
}

fn ty_locate_start(_: &[Type]) -> Type {
	Type::int8()
}

macro_rules! meta {
	($static_name:ident, $name:literal, $desc:literal, $min:expr, $max:expr, $prop:expr, $null:expr, $ty:expr, $eval:expr) => {
		pub(super) static $static_name: FuncMeta = FuncMeta {
			name: $name,
			description: $desc,
			min_args: $min,
			max_args: $max,
			propagates_null: $prop,
			nullability: $null,
			volatile: false,
			result_type: $ty,
			eval: $eval,
		};
	};
}

meta!(CONCAT, "concat", "concatenate argument strings", 1, usize::MAX, true, Nullability::OnNullInput, ty_text, eval_concat);
meta!(CONCAT_WS, "concat_ws", "concatenate with a separator, skipping NULLs", 2, usize::MAX, false, Nullability::Always, ty_text, eval_concat_ws);
meta!(ELT, "elt", "argument at the given 1-based index", 2, usize::MAX, false, Nullability::Always, ty_text, eval_elt);
meta!(FIELD, "field", "1-based index of the first argument in the rest", 2, usize::MAX, false, Nullability::Never, ty_int8, eval_field);
meta!(FIND_IN_SET, "find_in_set", "1-based index in a comma-separated set", 2, 2, true, Nullability::OnNullInput, ty_int8, eval_find_in_set);
meta!(MAKE_SET, "make_set", "join the strings selected by a bit mask", 2, usize::MAX, false, Nullability::Always, ty_text, eval_make_set);
meta!(LOCATE, "locate", "1-based position of a substring", 2, 3, true, Nullability::OnNullInput, ty_locate_start, eval_locate);
meta!(INSTR, "instr", "1-based position of a substring", 2, 2, true, Nullability::OnNullInput, ty_int8, eval_instr);
meta!(STRCMP, "strcmp", "-1, 0 or 1 from comparing two strings", 2, 2, true, Nullability::OnNullInput, ty_int8, eval_strcmp);
meta!(LOWER, "lower", "lowercase", 1, 1, true, Nullability::OnNullInput, ty_text, eval_lower);
meta!(UPPER, "upper", "uppercase", 1, 1, true, Nullability::OnNullInput, ty_text, eval_upper);
meta!(LENGTH, "length", "length in bytes", 1, 1, true, Nullability::OnNullInput, ty_int8, eval_length);
meta!(CHAR_LENGTH, "char_length", "length in characters", 1, 1, true, Nullability::OnNullInput, ty_int8, eval_char_length);
meta!(LEFT, "left", "leftmost characters", 2, 2, true, Nullability::OnNullInput, ty_text, eval_left);
meta!(RIGHT, "right", "rightmost characters", 2, 2, true, Nullability::OnNullInput, ty_text, eval_right);
meta!(SUBSTRING, "substring", "substring by position and length", 2, 3, true, Nullability::OnNullInput, ty_text, eval_substring);
meta!(SUBSTRING_INDEX, "substring_index", "prefix or suffix up to the nth delimiter", 3, 3, true, Nullability::OnNullInput, ty_text, eval_substring_index);
meta!(REPLACE, "replace", "replace all occurrences, case-sensitively", 3, 3, true, Nullability::OnNullInput, ty_text, eval_replace);
meta!(REPEAT, "repeat", "repeat a string n times", 2, 2, true, Nullability::Always, ty_text, eval_repeat);
meta!(REVERSE, "reverse", "reverse the characters", 1, 1, true, Nullability::OnNullInput, ty_text, eval_reverse);
meta!(LPAD, "lpad", "left-pad to a length", 3, 3, true, Nullability::Always, ty_text, eval_lpad);
meta!(RPAD, "rpad", "right-pad to a length", 3, 3, true, Nullability::Always, ty_text, eval_rpad);
meta!(TRIM, "trim", "strip spaces or a removal string from both ends", 1, 2, true, Nullability::OnNullInput, ty_text, eval_trim);
meta!(LTRIM, "ltrim", "strip leading spaces", 1, 1, true, Nullability::OnNullInput, ty_text, eval_ltrim);
meta!(RTRIM, "rtrim", "strip trailing spaces", 1, 1, true, Nullability::OnNullInput, ty_text, eval_rtrim);
meta!(SPACE, "space", "string of n spaces", 1, 1, true, Nullability::Always, ty_text, eval_space);
meta!(ASCII, "ascii", "code of the first byte", 1, 1, true, Nullability::OnNullInput, ty_int8, eval_ascii);
meta!(ORD, "ord", "code of the first character", 1, 1, true, Nullability::OnNullInput, ty_int8, eval_ord);
meta!(QUOTE, "quote", "SQL-quote a string literal", 1, 1, false, Nullability::Never, ty_text, eval_quote);

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![
		&CONCAT,
		&CONCAT_WS,
		&ELT,
		&FIELD,
		&FIND_IN_SET,
		&MAKE_SET,
		&LOCATE,
		&INSTR,
		&STRCMP,
		&LOWER,
		&UPPER,
		&LENGTH,
		&CHAR_LENGTH,
		&LEFT,
		&RIGHT,
		&SUBSTRING,
		&SUBSTRING_INDEX,
		&REPLACE,
		&REPEAT,
		&REVERSE,
		&LPAD,
		&RPAD,
		&TRIM,
		&LTRIM,
		&RTRIM,
		&SPACE,
		&ASCII,
		&ORD,
		&QUOTE,
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::func::testing::eval_ok;

	fn s(v: &str) -> Value {
		Value::text(v)
	}

	#[test]
	fn test_concat_propagates_null() {
		assert_eq!(eval_ok(&CONCAT, vec![s("a"), s("b"), s("c")]), s("abc"));
		assert_eq!(eval_ok(&CONCAT, vec![s("a"), Value::Null]), Value::Null);
		assert_eq!(eval_ok(&CONCAT, vec![s("x"), Value::int4(1)]), s("x1"));
	}

	#[test]
	fn test_concat_ws_skips_nulls() {
		assert_eq!(
			eval_ok(&CONCAT_WS, vec![s(","), s("a"), Value::Null, s("b")]),
			s("a,b")
		);
		assert_eq!(eval_ok(&CONCAT_WS, vec![Value::Null, s("a")]), Value::Null);
	}

	#[test]
	fn test_elt_and_field() {
		assert_eq!(eval_ok(&ELT, vec![Value::int4(2), s("a"), s("b"), s("c")]), s("b"));
		assert_eq!(eval_ok(&ELT, vec![Value::int4(0), s("a")]), Value::Null);
		assert_eq!(eval_ok(&ELT, vec![Value::int4(9), s("a")]), Value::Null);

		assert_eq!(eval_ok(&FIELD, vec![s("b"), s("a"), s("b")]), Value::int8(2));
		assert_eq!(eval_ok(&FIELD, vec![s("z"), s("a"), s("b")]), Value::int8(0));
		assert_eq!(eval_ok(&FIELD, vec![Value::Null, s("a")]), Value::int8(0));
	}

	#[test]
	fn test_find_in_set() {
		assert_eq!(eval_ok(&FIND_IN_SET, vec![s("b"), s("a,b,c,d")]), Value::int8(2));
		assert_eq!(eval_ok(&FIND_IN_SET, vec![s("z"), s("a,b,c")]), Value::int8(0));
		// needle with a comma never matches
		assert_eq!(eval_ok(&FIND_IN_SET, vec![s("a,b"), s("a,b,c")]), Value::int8(0));
		assert_eq!(eval_ok(&FIND_IN_SET, vec![s(""), s("a,,c")]), Value::int8(2));
		assert_eq!(eval_ok(&FIND_IN_SET, vec![s("a"), s("")]), Value::int8(0));
		assert_eq!(eval_ok(&FIND_IN_SET, vec![Value::Null, s("a")]), Value::Null);
	}

	#[test]
	fn test_make_set() {
		assert_eq!(
			eval_ok(&MAKE_SET, vec![Value::int4(5), s("a"), s("b"), s("c")]),
			s("a,c")
		);
		assert_eq!(
			eval_ok(&MAKE_SET, vec![Value::int4(3), s("a"), Value::Null, s("c")]),
			s("a")
		);
	}

	#[test]
	fn test_locate_cases() {
		assert_eq!(eval_ok(&LOCATE, vec![s("bar"), s("foobarbar")]), Value::int8(4));
		assert_eq!(
			eval_ok(&LOCATE, vec![s("bar"), s("foobarbar"), Value::int4(5)]),
			Value::int8(7)
		);
		assert_eq!(eval_ok(&LOCATE, vec![s("xbar"), s("foobar")]), Value::int8(0));
		assert_eq!(eval_ok(&LOCATE, vec![s(""), s("abc")]), Value::int8(1));
		assert_eq!(
			eval_ok(&LOCATE, vec![s(""), s("abc"), Value::int4(3)]),
			Value::int8(3)
		);
		assert_eq!(
			eval_ok(&LOCATE, vec![s("a"), s("abc"), Value::int4(0)]),
			Value::int8(0)
		);
		// default collation is accent-insensitive/case-insensitive
		assert_eq!(eval_ok(&LOCATE, vec![s("BAR"), s("foobar")]), Value::int8(4));
	}

	#[test]
	fn test_instr_argument_order() {
		assert_eq!(eval_ok(&INSTR, vec![s("foobarbar"), s("bar")]), Value::int8(4));
	}

	#[test]
	fn test_strcmp() {
		assert_eq!(eval_ok(&STRCMP, vec![s("a"), s("b")]), Value::int8(-1));
		assert_eq!(eval_ok(&STRCMP, vec![s("b"), s("a")]), Value::int8(1));
		assert_eq!(eval_ok(&STRCMP, vec![s("a"), s("A")]), Value::int8(0));
	}

	#[test]
	fn test_case_and_length() {
		assert_eq!(eval_ok(&LOWER, vec![s("HeLLo")]), s("hello"));
		assert_eq!(eval_ok(&UPPER, vec![s("HeLLo")]), s("HELLO"));
		assert_eq!(eval_ok(&LENGTH, vec![s("héllo")]), Value::int8(6));
		assert_eq!(eval_ok(&CHAR_LENGTH, vec![s("héllo")]), Value::int8(5));
	}

	#[test]
	fn test_left_right() {
		assert_eq!(eval_ok(&LEFT, vec![s("foobar"), Value::int4(3)]), s("foo"));
		assert_eq!(eval_ok(&RIGHT, vec![s("foobar"), Value::int4(3)]), s("bar"));
		assert_eq!(eval_ok(&LEFT, vec![s("foobar"), Value::int4(-1)]), s(""));
		assert_eq!(eval_ok(&RIGHT, vec![s("foobar"), Value::int4(99)]), s("foobar"));
	}

	#[test]
	fn test_substring() {
		assert_eq!(eval_ok(&SUBSTRING, vec![s("Quadratically"), Value::int4(5)]), s("ratically"));
		assert_eq!(
			eval_ok(&SUBSTRING, vec![s("Quadratically"), Value::int4(5), Value::int4(6)]),
			s("ratica")
		);
		assert_eq!(eval_ok(&SUBSTRING, vec![s("Sakila"), Value::int4(-3)]), s("ila"));
		assert_eq!(
			eval_ok(&SUBSTRING, vec![s("Sakila"), Value::int4(-5), Value::int4(3)]),
			s("aki")
		);
		assert_eq!(eval_ok(&SUBSTRING, vec![s("Sakila"), Value::int4(0)]), s(""));
		assert_eq!(
			eval_ok(&SUBSTRING, vec![s("Sakila"), Value::int4(2), Value::int4(-1)]),
			s("")
		);
	}

	#[test]
	fn test_substring_index() {
		assert_eq!(
			eval_ok(&SUBSTRING_INDEX, vec![s("www.mysql.com"), s("."), Value::int4(2)]),
			s("www.mysql")
		);
		assert_eq!(
			eval_ok(&SUBSTRING_INDEX, vec![s("www.mysql.com"), s("."), Value::int4(-2)]),
			s("mysql.com")
		);
		assert_eq!(
			eval_ok(&SUBSTRING_INDEX, vec![s("a.b"), s("."), Value::int4(5)]),
			s("a.b")
		);
		assert_eq!(
			eval_ok(&SUBSTRING_INDEX, vec![s("a.b"), s("."), Value::int4(0)]),
			s("")
		);
	}

	#[test]
	fn test_replace_is_case_sensitive() {
		assert_eq!(
			eval_ok(&REPLACE, vec![s("www.mysql.com"), s("w"), s("Ww")]),
			s("WwWwWw.mysql.com")
		);
		assert_eq!(eval_ok(&REPLACE, vec![s("abc"), s("B"), s("x")]), s("abc"));
		assert_eq!(eval_ok(&REPLACE, vec![s("abc"), s(""), s("x")]), s("abc"));
	}

	#[test]
	fn test_repeat_and_space() {
		assert_eq!(eval_ok(&REPEAT, vec![s("ab"), Value::int4(3)]), s("ababab"));
		assert_eq!(eval_ok(&REPEAT, vec![s("ab"), Value::int4(0)]), s(""));
		assert_eq!(eval_ok(&SPACE, vec![Value::int4(3)]), s("   "));
	}

	#[test]
	fn test_reverse_multibyte() {
		assert_eq!(eval_ok(&REVERSE, vec![s("héllo")]), s("olléh"));
	}

	#[test]
	fn test_pad() {
		assert_eq!(eval_ok(&LPAD, vec![s("hi"), Value::int4(5), s("?!")]), s("?!?hi"));
		assert_eq!(eval_ok(&RPAD, vec![s("hi"), Value::int4(5), s("?!")]), s("hi?!?"));
		// shorter target truncates
		assert_eq!(eval_ok(&LPAD, vec![s("hello"), Value::int4(3), s("x")]), s("hel"));
		// empty pad that would be needed yields NULL
		assert_eq!(eval_ok(&LPAD, vec![s("hi"), Value::int4(5), s("")]), Value::Null);
		assert_eq!(eval_ok(&LPAD, vec![s("hi"), Value::int4(-1), s("x")]), Value::Null);
	}

	#[test]
	fn test_trims() {
		assert_eq!(eval_ok(&TRIM, vec![s("  bar  ")]), s("bar"));
		assert_eq!(eval_ok(&TRIM, vec![s("xxbarxx"), s("x")]), s("bar"));
		assert_eq!(eval_ok(&TRIM, vec![s("xyxbarxyx"), s("xy")]), s("xbarxyx"));
		assert_eq!(eval_ok(&LTRIM, vec![s("  bar  ")]), s("bar  "));
		assert_eq!(eval_ok(&RTRIM, vec![s("  bar  ")]), s("  bar"));
	}

	#[test]
	fn test_ascii_ord_quote() {
		assert_eq!(eval_ok(&ASCII, vec![s("2")]), Value::int8(50));
		assert_eq!(eval_ok(&ASCII, vec![s("")]), Value::int8(0));
		assert_eq!(eval_ok(&ORD, vec![s("2")]), Value::int8(50));
		// U+00E9 is 0xC3 0xA9 in UTF-8
		assert_eq!(eval_ok(&ORD, vec![s("é")]), Value::int8(0xC3A9));
		assert_eq!(eval_ok(&QUOTE, vec![s("Don't!")]), s("'Don\\'t!'"));
		assert_eq!(eval_ok(&QUOTE, vec![Value::Null]), s("NULL"));
	}
}
