// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

const UPPER: &[u8; 16] = b"0123456789ABCDEF";

pub fn encode(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 2);
	for &b in bytes {
		out.push(UPPER[(b >> 4) as usize] as char);
		out.push(UPPER[(b & 0x0f) as usize] as char);
	}
	out
}

fn nibble(c: u8) -> Option<u8> {
	match c {
		b'0'..=b'9' => Some(c - b'0'),
		b'a'..=b'f' => Some(c - b'a' + 10),
		b'A'..=b'F' => Some(c - b'A' + 10),
		_ => None,
	}
}

/// Decode a hex string. An odd-length input is rejected.
pub fn decode(s: &str) -> Result<Vec<u8>, ()> {
	let bytes = s.as_bytes();
	if bytes.len() % 2 != 0 {
		return Err(());
	}
	let mut out = Vec::with_capacity(bytes.len() / 2);
	for pair in bytes.chunks_exact(2) {
		let hi = nibble(pair[0]).ok_or(())?;
		let lo = nibble(pair[1]).ok_or(())?;
		out.push((hi << 4) | lo);
	}
	Ok(out)
}
