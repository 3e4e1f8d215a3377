// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! REGEXP_LIKE / REGEXP_INSTR / REGEXP_SUBSTR / REGEXP_REPLACE engine.
//!
//! Positions and occurrence counts are 1-based and measured in
//! characters, not bytes. A compiled pattern is cheap to clone, so
//! expression nodes memoize the result of [`compile`] for constant
//! patterns.

use myexpr_type::{EvalError, Result};
use regex::{NoExpand, Regex, RegexBuilder};

/// Match-type flags from the trailing argument of the REGEXP family.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegexFlags {
	/// None means "inherit from the subject's collation".
	case_insensitive: Option<bool>,
	multiline: bool,
	/// `n`: dot also matches line terminators. Off by default.
	dot_matches_newline: bool,
	/// `u`: only `\n` terminates a line; by default `\r` does too.
	unix_lines: bool,
}

impl RegexFlags {
	/// Parse a match-type string. `c` and `i` may both appear; the last
	/// occurrence wins. Anything outside the documented set is an error.
	pub fn parse(match_type: &str) -> Result<Self> {
		let mut flags = Self::default();
		for ch in match_type.chars() {
			match ch {
				'c' => flags.case_insensitive = Some(false),
				'i' => flags.case_insensitive = Some(true),
				'm' => flags.multiline = true,
				'n' => flags.dot_matches_newline = true,
				'u' => flags.unix_lines = true,
				other => {
					return Err(EvalError::InvalidRegexFlag {
						flag: other,
					});
				}
			}
		}
		Ok(flags)
	}
}

/// Compile a pattern. `collation_case_insensitive` supplies the default
/// when no `c`/`i` flag overrides it.
pub fn compile(pattern: &str, flags: RegexFlags, collation_case_insensitive: bool) -> Result<Regex> {
	RegexBuilder::new(pattern)
		.case_insensitive(flags.case_insensitive.unwrap_or(collation_case_insensitive))
		.multi_line(flags.multiline)
		.dot_matches_new_line(flags.dot_matches_newline)
		.crlf(!flags.unix_lines)
		.build()
		.map_err(|err| EvalError::InvalidRegex {
			message: err.to_string(),
		})
}

/// Byte offset of the 1-based character position, validating the range
/// the way the REGEXP family does: anything before 1 or past the end of
/// a non-empty subject is an error.
fn start_offset(subject: &str, pos: i64) -> Result<usize> {
	if pos < 1 {
		return Err(EvalError::IndexOutOfBounds);
	}
	if subject.is_empty() {
		return if pos == 1 {
			Ok(0)
		} else {
			Err(EvalError::IndexOutOfBounds)
		};
	}
	let mut indices = subject.char_indices();
	match indices.nth(pos as usize - 1) {
		Some((offset, _)) => Ok(offset),
		None => Err(EvalError::IndexOutOfBounds),
	}
}

fn char_position(subject: &str, byte_offset: usize) -> i64 {
	subject[..byte_offset].chars().count() as i64 + 1
}

pub fn regexp_like(re: &Regex, subject: &str) -> bool {
	re.is_match(subject)
}

/// 1-based character position of the `occurrence`-th match at or after
/// `pos`. `return_end` reports the position just past the match instead
/// of its start. 0 when there is no such match.
pub fn regexp_instr(
	re: &Regex,
	subject: &str,
	pos: i64,
	occurrence: i64,
	return_end: bool,
) -> Result<i64> {
	if occurrence < 1 {
		return Err(EvalError::IndexOutOfBounds);
	}
	let offset = start_offset(subject, pos)?;
	match re.find_iter(&subject[offset..]).nth(occurrence as usize - 1) {
		Some(m) => {
			let byte = offset
				+ if return_end {
					m.end()
				} else {
					m.start()
				};
			Ok(char_position(subject, byte))
		}
		None => Ok(0),
	}
}

/// Text of the `occurrence`-th match at or after `pos`, or None when the
/// pattern stops matching first.
pub fn regexp_substr(re: &Regex, subject: &str, pos: i64, occurrence: i64) -> Result<Option<String>> {
	if occurrence < 1 {
		return Err(EvalError::IndexOutOfBounds);
	}
	let offset = start_offset(subject, pos)?;
	Ok(re
		.find_iter(&subject[offset..])
		.nth(occurrence as usize - 1)
		.map(|m| m.as_str().to_string()))
}

/// Replace matches at or after `pos` with the literal replacement text.
/// Occurrence 0 replaces every match, otherwise only the given one.
pub fn regexp_replace(
	re: &Regex,
	subject: &str,
	replacement: &str,
	pos: i64,
	occurrence: i64,
) -> Result<String> {
	if occurrence < 0 {
		return Err(EvalError::IndexOutOfBounds);
	}
	let offset = start_offset(subject, pos)?;
	let (head, tail) = subject.split_at(offset);

	let replaced = if occurrence == 0 {
		re.replace_all(tail, NoExpand(replacement)).into_owned()
	} else {
		match re.find_iter(tail).nth(occurrence as usize - 1) {
			Some(m) => {
				let mut out = String::with_capacity(tail.len() + replacement.len());
				out.push_str(&tail[..m.start()]);
				out.push_str(replacement);
				out.push_str(&tail[m.end()..]);
				out
			}
			None => tail.to_string(),
		}
	};

	let mut out = String::with_capacity(head.len() + replaced.len());
	out.push_str(head);
	out.push_str(&replaced);
	Ok(out)
}
