// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! INET_ATON / INET_NTOA dotted-quad codecs.

/// INET_ATON. Short forms are accepted the way the classic C routine
/// accepts them: the last group fills the remaining bytes, so `127.1`
/// is 127.0.0.1. None for malformed addresses.
pub fn inet_aton(text: &str) -> Option<u64> {
	let text = text.trim();
	if text.is_empty() || text.ends_with('.') {
		return None;
	}
	let mut groups: Vec<u64> = Vec::with_capacity(4);
	for part in text.split('.') {
		if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		groups.push(part.parse().ok()?);
	}
	if groups.len() > 4 {
		return None;
	}

	// all but the last group are single bytes; the last spans the rest
	let last = groups.pop()?;
	let tail_bytes = 4 - groups.len() as u32;
	if last >= 1u64 << (8 * tail_bytes) {
		return None;
	}
	let mut value = 0u64;
	for group in groups {
		if group > 255 {
			return None;
		}
		value = (value << 8) | group;
	}
	Some((value << (8 * tail_bytes)) | last)
}

/// INET_NTOA. None when the value does not fit 32 bits.
pub fn inet_ntoa(value: u64) -> Option<String> {
	if value > u32::MAX as u64 {
		return None;
	}
	let v = value as u32;
	Some(format!("{}.{}.{}.{}", v >> 24, v >> 16 & 0xFF, v >> 8 & 0xFF, v & 0xFF))
}
