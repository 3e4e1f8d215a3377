// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn value_of(c: u8) -> Option<u8> {
	match c {
		b'A'..=b'Z' => Some(c - b'A'),
		b'a'..=b'z' => Some(c - b'a' + 26),
		b'0'..=b'9' => Some(c - b'0' + 52),
		b'+' => Some(62),
		b'/' => Some(63),
		_ => None,
	}
}

/// Standard base64 with padding, wrapped at 76 characters the way MySQL's
/// TO_BASE64 wraps its output.
pub fn encode_wrapped(bytes: &[u8]) -> String {
	let raw = encode(bytes);
	if raw.len() <= 76 {
		return raw;
	}
	let mut out = String::with_capacity(raw.len() + raw.len() / 76 + 1);
	for (i, c) in raw.chars().enumerate() {
		if i > 0 && i % 76 == 0 {
			out.push('\n');
		}
		out.push(c);
	}
	out
}

pub fn encode(bytes: &[u8]) -> String {
	let mut out = String::with_capacity((bytes.len() + 2) / 3 * 4);
	for chunk in bytes.chunks(3) {
		let b0 = chunk[0] as u32;
		let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
		let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
		let triple = (b0 << 16) | (b1 << 8) | b2;

		out.push(ALPHABET[(triple >> 18) as usize & 0x3f] as char);
		out.push(ALPHABET[(triple >> 12) as usize & 0x3f] as char);
		out.push(if chunk.len() > 1 {
			ALPHABET[(triple >> 6) as usize & 0x3f] as char
		} else {
			'='
		});
		out.push(if chunk.len() > 2 {
			ALPHABET[triple as usize & 0x3f] as char
		} else {
			'='
		});
	}
	out
}

/// Decode standard base64. Whitespace (including the newlines TO_BASE64
/// emits) is skipped; anything else outside the alphabet is an error.
pub fn decode(s: &str) -> Result<Vec<u8>, ()> {
	let mut acc: u32 = 0;
	let mut bits = 0u8;
	let mut out = Vec::with_capacity(s.len() / 4 * 3);
	for &c in s.as_bytes() {
		if c.is_ascii_whitespace() {
			continue;
		}
		if c == b'=' {
			break;
		}
		let v = value_of(c).ok_or(())?;
		acc = (acc << 6) | v as u32;
		bits += 6;
		if bits >= 8 {
			bits -= 8;
			out.push((acc >> bits) as u8);
		}
	}
	Ok(out)
}
