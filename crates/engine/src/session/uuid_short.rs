// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! The UUID_SHORT counter.
//!
//! Values pack a server id into the top 8 bits, the server startup time
//! (seconds, truncated to 32 bits) into the next 32, and a 24-bit
//! incrementing sequence below that. One instance per server; uniqueness
//! holds as long as fewer than 2^24 values are drawn between restarts.

use std::sync::atomic::{AtomicU64, Ordering};

pub struct UuidShortGenerator {
	next: AtomicU64,
}

impl UuidShortGenerator {
	pub fn new(server_id: u8, startup_unix_seconds: u64) -> Self {
		let base =
			((server_id as u64) << 56) | ((startup_unix_seconds & 0xFFFF_FFFF) << 24);
		Self {
			next: AtomicU64::new(base),
		}
	}

	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::Relaxed)
	}
}

#[cfg(test)]
mod tests {
	use std::{collections::HashSet, sync::Arc, thread};

	use super::*;

	#[test]
	fn test_bit_layout() {
		let generator = UuidShortGenerator::new(7, 0x1234_5678);
		let value = generator.next();
		assert_eq!(value >> 56, 7);
		assert_eq!(value >> 24 & 0xFFFF_FFFF, 0x1234_5678);
		assert_eq!(value & 0xFF_FFFF, 0);
		assert_eq!(generator.next() & 0xFF_FFFF, 1);
	}

	#[test]
	fn test_startup_seconds_truncated() {
		let generator = UuidShortGenerator::new(1, 0x1_0000_0001);
		assert_eq!(generator.next() >> 24 & 0xFFFF_FFFF, 1);
	}

	#[test]
	fn test_concurrent_draws_are_unique() {
		let generator = Arc::new(UuidShortGenerator::new(1, 1_700_000_000));
		let mut handles = Vec::new();
		for _ in 0..4 {
			let generator = Arc::clone(&generator);
			handles.push(thread::spawn(move || {
				(0..1000).map(|_| generator.next()).collect::<Vec<_>>()
			}));
		}
		let mut seen = HashSet::new();
		for handle in handles {
			for value in handle.join().unwrap() {
				assert!(seen.insert(value));
			}
		}
		assert_eq!(seen.len(), 4000);
	}
}
