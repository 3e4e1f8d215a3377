// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Binary and radix codecs without session dependencies.

pub mod inet;
pub mod uuid;

/// CRC-32 (IEEE 802.3 polynomial, reflected), the checksum CRC32()
/// exposes.
pub fn crc32(data: &[u8]) -> u32 {
	static TABLE: once_cell::sync::Lazy<[u32; 256]> = once_cell::sync::Lazy::new(|| {
		let mut table = [0u32; 256];
		for (idx, slot) in table.iter_mut().enumerate() {
			let mut crc = idx as u32;
			for _ in 0..8 {
				crc = if crc & 1 != 0 {
					(crc >> 1) ^ 0xEDB8_8320
				} else {
					crc >> 1
				};
			}
			*slot = crc;
		}
		table
	});

	let mut crc = !0u32;
	for &byte in data {
		crc = (crc >> 8) ^ TABLE[((crc ^ byte as u32) & 0xFF) as usize];
	}
	!crc
}

/// CONV(N, from_base, to_base): reinterpret the digits of `input` from
/// one radix into another. Bases run 2 to 36; a negative `to_base` keeps
/// the value signed, otherwise it is treated as a 64-bit unsigned
/// quantity. Digits beyond the valid set terminate the parse, and an
/// empty parse yields None.
pub fn conv(input: &str, from_base: i64, to_base: i64) -> Option<String> {
	let from = from_base.unsigned_abs();
	let to = to_base.unsigned_abs();
	if !(2..=36).contains(&from) || !(2..=36).contains(&to) {
		return None;
	}

	let trimmed = input.trim();
	let (negative, digits) = match trimmed.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
	};

	let mut value: u64 = 0;
	let mut seen = false;
	for ch in digits.chars() {
		let digit = match ch.to_digit(36) {
			Some(d) if (d as u64) < from => d as u64,
			_ => break,
		};
		seen = true;
		// saturate instead of wrapping, the way string-to-integer
		// conversion clamps
		value = match value.checked_mul(from).and_then(|v| v.checked_add(digit)) {
			Some(v) => v,
			None => u64::MAX,
		};
	}
	if !seen {
		return None;
	}

	let signed_value = if negative {
		(value as i64).wrapping_neg() as u64
	} else {
		value
	};

	Some(if to_base < 0 {
		render_radix_signed(signed_value as i64, to)
	} else {
		render_radix(signed_value, to)
	})
}

fn render_radix(mut value: u64, base: u64) -> String {
	const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
	if value == 0 {
		return "0".to_string();
	}
	let mut buf = Vec::new();
	while value > 0 {
		buf.push(DIGITS[(value % base) as usize]);
		value /= base;
	}
	buf.reverse();
	// digits are always ASCII
	String::from_utf8(buf).unwrap_or_default()
}

fn render_radix_signed(value: i64, base: u64) -> String {
	if value < 0 {
		format!("-{}", render_radix(value.unsigned_abs(), base))
	} else {
		render_radix(value as u64, base)
	}
}
