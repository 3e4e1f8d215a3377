// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Cross-statement session machinery: named locks, the UUID_SHORT
//! counter, and query cancellation.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

pub mod locks;
pub mod uuid_short;

pub use locks::LockTable;
pub use uuid_short::UuidShortGenerator;

/// Cooperative cancellation handle shared between the session thread and
/// whoever issues the kill.
#[derive(Default)]
pub struct CancelToken {
	cancelled: Mutex<bool>,
	signal: Condvar,
}

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		let mut cancelled = self.cancelled.lock();
		*cancelled = true;
		self.signal.notify_all();
	}

	pub fn is_cancelled(&self) -> bool {
		*self.cancelled.lock()
	}

	/// Clear the flag so the session can run its next statement.
	pub fn reset(&self) {
		*self.cancelled.lock() = false;
	}

	/// Block for `duration` unless cancellation arrives first. Returns
	/// true when the wait was interrupted.
	pub fn sleep(&self, duration: Duration) -> bool {
		let deadline = Instant::now() + duration;
		let mut cancelled = self.cancelled.lock();
		while !*cancelled {
			if self.signal.wait_until(&mut cancelled, deadline).timed_out() {
				return *cancelled;
			}
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread, time::Duration};

	use super::*;

	#[test]
	fn test_sleep_runs_to_completion() {
		let token = CancelToken::new();
		let interrupted = token.sleep(Duration::from_millis(10));
		assert!(!interrupted);
	}

	#[test]
	fn test_cancel_interrupts_sleep() {
		let token = Arc::new(CancelToken::new());
		let waker = Arc::clone(&token);
		let handle = thread::spawn(move || {
			thread::sleep(Duration::from_millis(20));
			waker.cancel();
		});
		let started = std::time::Instant::now();
		let interrupted = token.sleep(Duration::from_secs(10));
		assert!(interrupted);
		assert!(started.elapsed() < Duration::from_secs(5));
		handle.join().unwrap();
	}

	#[test]
	fn test_reset_clears_flag() {
		let token = CancelToken::new();
		token.cancel();
		assert!(token.is_cancelled());
		token.reset();
		assert!(!token.is_cancelled());
	}
}
