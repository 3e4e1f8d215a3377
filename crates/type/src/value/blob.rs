// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::util::{base64, hex};

/// A binary large object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Blob(Vec<u8>);

impl Blob {
	pub fn new(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn from_hex(s: &str) -> Option<Self> {
		let clean = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
		hex::decode(clean).ok().map(Blob::new)
	}

	pub fn to_hex(&self) -> String {
		hex::encode(&self.0)
	}

	pub fn from_b64(s: &str) -> Option<Self> {
		base64::decode(s).ok().map(Blob::new)
	}

	pub fn to_b64(&self) -> String {
		base64::encode_wrapped(&self.0)
	}
}

impl Display for Blob {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "0x{}", self.to_hex())
	}
}

impl From<Vec<u8>> for Blob {
	fn from(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}
}

impl From<&[u8]> for Blob {
	fn from(bytes: &[u8]) -> Self {
		Self(bytes.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_hex() {
		let blob = Blob::from_hex("48656c6c6f").unwrap();
		assert_eq!(blob.as_bytes(), b"Hello");
	}

	#[test]
	fn test_from_hex_with_prefix() {
		let blob = Blob::from_hex("0x48656c6c6f").unwrap();
		assert_eq!(blob.as_bytes(), b"Hello");
	}

	#[test]
	fn test_from_hex_invalid() {
		assert!(Blob::from_hex("xyz").is_none());
		assert!(Blob::from_hex("48656c6c6").is_none()); // odd length
	}

	#[test]
	fn test_hex_roundtrip() {
		let original = b"Hello, World! \x00\x01\x02\xFF";
		let blob = Blob::new(original.to_vec());
		assert_eq!(Blob::from_hex(&blob.to_hex()).unwrap().as_bytes(), original);
	}

	#[test]
	fn test_b64_roundtrip() {
		let original = b"Hello, World! \x00\x01\x02\xFF";
		let blob = Blob::new(original.to_vec());
		assert_eq!(Blob::from_b64(&blob.to_b64()).unwrap().as_bytes(), original);
	}
}
