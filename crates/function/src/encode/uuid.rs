// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! UUID text/binary conversions.
//!
//! The swap flag of UUID_TO_BIN/BIN_TO_UUID moves the timestamp-high
//! group to the front of the binary form so that time-ordered UUIDs
//! cluster in index order. The two functions invert each other for
//! either flag value.

use uuid::Uuid;

/// A fresh random UUID in the canonical hyphenated form.
pub fn new_uuid() -> String {
	Uuid::new_v4().hyphenated().to_string()
}

/// IS_UUID: accepts the hyphenated, braced and bare 32-digit forms.
pub fn is_uuid(text: &str) -> bool {
	parse(text).is_some()
}

fn parse(text: &str) -> Option<Uuid> {
	Uuid::try_parse(text.trim()).ok()
}

/// UUID_TO_BIN. None when the text is not a UUID.
pub fn uuid_to_bin(text: &str, swap: bool) -> Option<[u8; 16]> {
	let bytes = *parse(text)?.as_bytes();
	if !swap {
		return Some(bytes);
	}
	let mut out = [0u8; 16];
	// time-high, time-mid, time-low, then the rest untouched
	out[0] = bytes[6];
	out[1] = bytes[7];
	out[2] = bytes[4];
	out[3] = bytes[5];
	out[4..8].copy_from_slice(&bytes[0..4]);
	out[8..].copy_from_slice(&bytes[8..]);
	Some(out)
}

/// BIN_TO_UUID. None unless the input is exactly 16 bytes.
pub fn bin_to_uuid(data: &[u8], swap: bool) -> Option<String> {
	let bytes: [u8; 16] = data.try_into().ok()?;
	let unswapped = if swap {
		let mut out = [0u8; 16];
		out[0..4].copy_from_slice(&bytes[4..8]);
		out[4] = bytes[2];
		out[5] = bytes[3];
		out[6] = bytes[0];
		out[7] = bytes[1];
		out[8..].copy_from_slice(&bytes[8..]);
		out
	} else {
		bytes
	};
	Some(Uuid::from_bytes(unswapped).hyphenated().to_string())
}
