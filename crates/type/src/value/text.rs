// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::collation::Collation;

/// A string value together with the collation it was produced under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Text {
	data: String,
	collation: Collation,
}

impl Text {
	pub fn new(data: impl Into<String>, collation: Collation) -> Self {
		Self {
			data: data.into(),
			collation,
		}
	}

	pub fn plain(data: impl Into<String>) -> Self {
		Self::new(data, Collation::default())
	}

	pub fn as_str(&self) -> &str {
		&self.data
	}

	pub fn into_string(self) -> String {
		self.data
	}

	pub fn collation(&self) -> Collation {
		self.collation
	}

	pub fn with_collation(mut self, collation: Collation) -> Self {
		self.collation = collation;
		self
	}

	pub fn len_bytes(&self) -> usize {
		self.data.len()
	}

	pub fn len_chars(&self) -> usize {
		self.data.chars().count()
	}

	/// Equality under this text's collation: case-insensitive collations
	/// compare case-folded.
	pub fn collates_equal(&self, other: &str) -> bool {
		if self.collation.is_case_sensitive() {
			self.data == other
		} else {
			self.data.eq_ignore_ascii_case(other)
				|| self.data.to_lowercase() == other.to_lowercase()
		}
	}
}

impl Display for Text {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.data)
	}
}

impl PartialOrd for Text {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Text {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		if self.collation.is_case_sensitive() {
			self.data.cmp(&other.data)
		} else {
			self.data.to_lowercase().cmp(&other.data.to_lowercase())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_collates_equal_case_insensitive() {
		let text = Text::new("Hello", Collation::Utf8mb4GeneralCi);
		assert!(text.collates_equal("hello"));
		assert!(text.collates_equal("HELLO"));
		assert!(!text.collates_equal("world"));
	}

	#[test]
	fn test_collates_equal_binary() {
		let text = Text::new("Hello", Collation::Utf8mb4Bin);
		assert!(text.collates_equal("Hello"));
		assert!(!text.collates_equal("hello"));
	}

	#[test]
	fn test_ordering_respects_collation() {
		let a = Text::new("apple", Collation::Utf8mb4GeneralCi);
		let b = Text::new("APPLE", Collation::Utf8mb4GeneralCi);
		assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
	}

	#[test]
	fn test_char_length() {
		let text = Text::plain("héllo");
		assert_eq!(text.len_chars(), 5);
		assert_eq!(text.len_bytes(), 6);
	}
}
