// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Collations and the coercibility resolution algorithm.
//!
//! Every string-producing expression carries a (collation, coercibility)
//! pair. When two differently-collated operands combine, the pair with the
//! strictly lower coercibility rank wins. Equal ranks with differing
//! collations are only resolvable when one side is binary.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Character set of a collation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charset {
	Utf8mb4,
	Latin1,
	Ascii,
	Binary,
}

impl Charset {
	pub fn name(&self) -> &'static str {
		match self {
			Charset::Utf8mb4 => "utf8mb4",
			Charset::Latin1 => "latin1",
			Charset::Ascii => "ascii",
			Charset::Binary => "binary",
		}
	}
}

/// The closed set of collations the engine understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collation {
	Utf8mb40900AiCi,
	Utf8mb40900AsCs,
	Utf8mb4GeneralCi,
	Utf8mb4Bin,
	Latin1SwedishCi,
	AsciiGeneralCi,
	Binary,
}

impl Default for Collation {
	fn default() -> Self {
		Collation::Utf8mb40900AiCi
	}
}

impl Collation {
	pub fn name(&self) -> &'static str {
		match self {
			Collation::Utf8mb40900AiCi => "utf8mb4_0900_ai_ci",
			Collation::Utf8mb40900AsCs => "utf8mb4_0900_as_cs",
			Collation::Utf8mb4GeneralCi => "utf8mb4_general_ci",
			Collation::Utf8mb4Bin => "utf8mb4_bin",
			Collation::Latin1SwedishCi => "latin1_swedish_ci",
			Collation::AsciiGeneralCi => "ascii_general_ci",
			Collation::Binary => "binary",
		}
	}

	pub fn charset(&self) -> Charset {
		match self {
			Collation::Utf8mb40900AiCi
			| Collation::Utf8mb40900AsCs
			| Collation::Utf8mb4GeneralCi
			| Collation::Utf8mb4Bin => Charset::Utf8mb4,
			Collation::Latin1SwedishCi => Charset::Latin1,
			Collation::AsciiGeneralCi => Charset::Ascii,
			Collation::Binary => Charset::Binary,
		}
	}

	/// Case sensitivity is inferred from the collation name: a `_ci`
	/// suffix means comparisons (and regex matches) ignore case.
	pub fn is_case_sensitive(&self) -> bool {
		!self.name().ends_with("_ci")
	}

	pub fn is_binary(&self) -> bool {
		matches!(self, Collation::Binary | Collation::Utf8mb4Bin)
	}
}

impl Display for Collation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Coercibility rank, 0 most authoritative through 6 least.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Coercibility {
	/// Explicit COLLATE clause.
	Explicit = 0,
	/// Concatenation of operands with no common collation.
	None = 1,
	/// Column reference or stored routine parameter.
	Implicit = 2,
	/// System constant such as USER().
	SysConst = 3,
	/// String literal.
	Coercible = 4,
	/// Numeric or temporal value rendered as a string.
	Numeric = 5,
	/// NULL or an expression derived from NULL.
	Ignorable = 6,
}

impl Coercibility {
	pub fn rank(&self) -> u8 {
		*self as u8
	}

	pub fn from_rank(rank: u8) -> Self {
		match rank {
			0 => Coercibility::Explicit,
			1 => Coercibility::None,
			2 => Coercibility::Implicit,
			3 => Coercibility::SysConst,
			4 => Coercibility::Coercible,
			5 => Coercibility::Numeric,
			_ => Coercibility::Ignorable,
		}
	}

	/// Saturating step toward the most authoritative rank.
	pub fn strengthen(&self) -> Self {
		Self::from_rank(self.rank().saturating_sub(1))
	}
}

/// Resolve the collation of a binary operation over two string operands.
///
/// The strictly lower rank wins outright. On equal rank the collations
/// must agree, unless one side is binary-compatible, in which case the
/// binary side wins.
pub fn resolve(
	left: (Collation, Coercibility),
	right: (Collation, Coercibility),
) -> Result<(Collation, Coercibility), EvalError> {
	let (lc, lr) = left;
	let (rc, rr) = right;

	if lr < rr {
		return Ok((lc, lr));
	}
	if rr < lr {
		return Ok((rc, rr));
	}
	if lc == rc {
		return Ok((lc, lr));
	}
	if lc.is_binary() {
		return Ok((lc, lr));
	}
	if rc.is_binary() {
		return Ok((rc, rr));
	}
	Err(EvalError::CoercibilityConflict {
		left: lc.name().to_string(),
		left_coercibility: lr.rank(),
		right: rc.name().to_string(),
		right_coercibility: rr.rank(),
	})
}

/// Fold `resolve` left-to-right over a list of operands, as every
/// multi-argument string function does.
pub fn resolve_all(
	pairs: impl IntoIterator<Item = (Collation, Coercibility)>,
) -> Result<(Collation, Coercibility), EvalError> {
	let mut iter = pairs.into_iter();
	let mut acc = match iter.next() {
		Some(first) => first,
		None => (Collation::default(), Coercibility::Coercible),
	};
	for next in iter {
		acc = resolve(acc, next)?;
	}
	Ok(acc)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lower_rank_wins() {
		let resolved = resolve(
			(Collation::Utf8mb4GeneralCi, Coercibility::Implicit),
			(Collation::Latin1SwedishCi, Coercibility::Coercible),
		)
		.unwrap();
		assert_eq!(resolved, (Collation::Utf8mb4GeneralCi, Coercibility::Implicit));
	}

	#[test]
	fn test_lower_rank_wins_for_all_rank_pairs() {
		// Same collation at rank 2 vs rank 5 must always resolve to
		// the rank-2 side, regardless of the other rank values.
		for rank in 0u8..=6 {
			let low = Coercibility::from_rank(rank);
			for other in (rank + 1)..=6 {
				let high = Coercibility::from_rank(other);
				let resolved = resolve(
					(Collation::Utf8mb4GeneralCi, low),
					(Collation::Utf8mb4GeneralCi, high),
				)
				.unwrap();
				assert_eq!(resolved.0, Collation::Utf8mb4GeneralCi);
				assert_eq!(resolved.1, low);
			}
		}
	}

	#[test]
	fn test_equal_rank_same_collation() {
		let resolved = resolve(
			(Collation::Utf8mb4Bin, Coercibility::Implicit),
			(Collation::Utf8mb4Bin, Coercibility::Implicit),
		)
		.unwrap();
		assert_eq!(resolved.0, Collation::Utf8mb4Bin);
	}

	#[test]
	fn test_equal_rank_binary_wins() {
		let resolved = resolve(
			(Collation::Utf8mb4GeneralCi, Coercibility::Implicit),
			(Collation::Binary, Coercibility::Implicit),
		)
		.unwrap();
		assert_eq!(resolved.0, Collation::Binary);
	}

	#[test]
	fn test_equal_rank_conflict() {
		let result = resolve(
			(Collation::Utf8mb4GeneralCi, Coercibility::Implicit),
			(Collation::Latin1SwedishCi, Coercibility::Implicit),
		);
		assert!(matches!(result, Err(EvalError::CoercibilityConflict { .. })));
	}

	#[test]
	fn test_strengthen_saturates() {
		assert_eq!(Coercibility::Explicit.strengthen(), Coercibility::Explicit);
		assert_eq!(Coercibility::Implicit.strengthen(), Coercibility::None);
	}

	#[test]
	fn test_resolve_all_folds_left_to_right() {
		let resolved = resolve_all([
			(Collation::Utf8mb4GeneralCi, Coercibility::Coercible),
			(Collation::Utf8mb4GeneralCi, Coercibility::Implicit),
			(Collation::Latin1SwedishCi, Coercibility::Coercible),
		])
		.unwrap();
		assert_eq!(resolved, (Collation::Utf8mb4GeneralCi, Coercibility::Implicit));
	}

	#[test]
	fn test_case_sensitivity_from_name() {
		assert!(!Collation::Utf8mb4GeneralCi.is_case_sensitive());
		assert!(!Collation::Utf8mb40900AiCi.is_case_sensitive());
		assert!(Collation::Utf8mb4Bin.is_case_sensitive());
		assert!(Collation::Binary.is_case_sensitive());
		assert!(Collation::Utf8mb40900AsCs.is_case_sensitive());
	}
}
