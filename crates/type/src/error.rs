// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! The three error tiers of the engine.
//!
//! Warnings are queued on the session and evaluation continues with a
//! best-effort value. Soft failures are expressed as `Value::Null` by the
//! function itself, usually together with a warning. Hard errors abort the
//! statement and are carried as [`EvalError`].

use std::fmt::{Display, Formatter};

/// A non-fatal diagnostic queued on the session context, visible to the
/// client after the statement completes. Codes follow the MySQL error
/// code space so compatibility suites can assert on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
	pub code: u16,
	pub message: String,
}

impl Warning {
	pub fn new(code: u16, message: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
		}
	}

	/// 1292: value could not be interpreted in the target type and was
	/// truncated or clamped.
	pub fn truncated_wrong_value(kind: &str, value: impl Display) -> Self {
		Self::new(1292, format!("Truncated incorrect {} value: '{}'", kind, value))
	}

	/// 1265: data was truncated while narrowing.
	pub fn data_truncated(value: impl Display) -> Self {
		Self::new(1265, format!("Data truncated for value '{}'", value))
	}

	/// 1366: value is not valid for the target type at all.
	pub fn incorrect_value(kind: &str, value: impl Display) -> Self {
		Self::new(1366, format!("Incorrect {} value: '{}'", kind, value))
	}

	/// 1411: malformed datetime handed to a parsing function.
	pub fn incorrect_datetime(value: impl Display, function: &str) -> Self {
		Self::new(1411, format!("Incorrect datetime value: '{}' for function {}", value, function))
	}
}

impl Display for Warning {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Warning {}: {}", self.code, self.message)
	}
}

/// Hard errors: contract violations and inputs MySQL defines as fatal to
/// the statement. Functions must not use these for conditions MySQL
/// defines as "return NULL with a warning".
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum EvalError {
	#[error("invalid children count: {function} expects {expected}, got {actual}")]
	InvalidChildrenCount {
		function: String,
		expected: usize,
		actual: usize,
	},

	#[error("BIGINT UNSIGNED value is out of range: '{value}'")]
	UintOverflow {
		value: String,
	},

	#[error("Illegal mix of collations ({left},{left_coercibility}) and ({right},{right_coercibility})")]
	CoercibilityConflict {
		left: String,
		left_coercibility: u8,
		right: String,
		right_coercibility: u8,
	},

	#[error("Got error 'invalid regular expression: {message}' from regexp")]
	InvalidRegex {
		message: String,
	},

	#[error("Incorrect arguments to regexp: unknown match type '{flag}'")]
	InvalidRegexFlag {
		flag: char,
	},

	#[error("Index out of bounds for regular expression search")]
	IndexOutOfBounds,

	#[error("Incorrect arguments to {function}")]
	IncorrectArguments {
		function: String,
	},

	#[error("Function {name} does not exist")]
	UnknownFunction {
		name: String,
	},

	#[error("Unsupported type {ty} for {operation}")]
	UnsupportedType {
		operation: String,
		ty: String,
	},

	#[error("Incorrect user-level lock name '{name}'")]
	UserLockWrongName {
		name: String,
	},

	#[error("Query execution was interrupted")]
	QueryInterrupted,

	#[error("{message}")]
	Internal {
		message: String,
	},
}

impl EvalError {
	pub fn invalid_children_count(function: impl Into<String>, expected: usize, actual: usize) -> Self {
		EvalError::InvalidChildrenCount {
			function: function.into(),
			expected,
			actual,
		}
	}

	pub fn uint_overflow(value: impl Display) -> Self {
		EvalError::UintOverflow {
			value: value.to_string(),
		}
	}

	pub fn unsupported_type(operation: impl Into<String>, ty: impl Display) -> Self {
		EvalError::UnsupportedType {
			operation: operation.into(),
			ty: ty.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_warning_truncated_wrong_value() {
		let warning = Warning::truncated_wrong_value("DOUBLE", "12abc");
		assert_eq!(warning.code, 1292);
		assert_eq!(warning.message, "Truncated incorrect DOUBLE value: '12abc'");
	}

	#[test]
	fn test_warning_incorrect_datetime() {
		let warning = Warning::incorrect_datetime("not-a-date", "str_to_date");
		assert_eq!(warning.code, 1411);
		assert!(warning.message.contains("str_to_date"));
	}

	#[test]
	fn test_eval_error_display() {
		let err = EvalError::invalid_children_count("concat", 2, 3);
		assert_eq!(err.to_string(), "invalid children count: concat expects 2, got 3");

		let err = EvalError::uint_overflow(-5);
		assert_eq!(err.to_string(), "BIGINT UNSIGNED value is out of range: '-5'");
	}
}
