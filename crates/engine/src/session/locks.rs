// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Server-wide named user locks (GET_LOCK and friends).
//!
//! Locks are re-entrant within the owning session: acquiring a name the
//! session already holds bumps a counter, and each release decrements it.
//! Lock names compare case-insensitively, the way the server treats them.

use std::{
	collections::HashMap,
	time::{Duration, Instant},
};

use myexpr_type::{EvalError, Result};
use parking_lot::{Condvar, Mutex};
use tracing::debug;

const MAX_LOCK_NAME_LEN: usize = 64;

struct LockEntry {
	owner: u64,
	count: u32,
}

/// One instance per server, shared by every session context.
#[derive(Default)]
pub struct LockTable {
	state: Mutex<HashMap<String, LockEntry>>,
	released: Condvar,
}

/// Outcome of RELEASE_LOCK.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
	/// The caller held the lock and it was released.
	Released,
	/// The lock exists but belongs to another session.
	NotOwner,
	/// No such lock exists.
	NotHeld,
}

fn normalize(name: &str) -> Result<String> {
	if name.is_empty() || name.len() > MAX_LOCK_NAME_LEN {
		return Err(EvalError::UserLockWrongName {
			name: name.to_string(),
		});
	}
	Ok(name.to_lowercase())
}

impl LockTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Acquire `name` for `owner`, waiting up to `timeout`. Returns true
	/// on acquisition, false when the wait timed out. Re-entrant.
	pub fn get_lock(&self, name: &str, owner: u64, timeout: Duration) -> Result<bool> {
		let key = normalize(name)?;
		let deadline = Instant::now() + timeout;
		let mut state = self.state.lock();
		loop {
			match state.get_mut(&key) {
				None => {
					state.insert(
						key.clone(),
						LockEntry {
							owner,
							count: 1,
						},
					);
					debug!(lock = %key, owner, "user lock acquired");
					return Ok(true);
				}
				Some(entry) if entry.owner == owner => {
					entry.count += 1;
					debug!(lock = %key, owner, count = entry.count, "user lock re-entered");
					return Ok(true);
				}
				Some(_) => {
					if self.released.wait_until(&mut state, deadline).timed_out() {
						debug!(lock = %key, owner, "user lock wait timed out");
						return Ok(false);
					}
				}
			}
		}
	}

	pub fn release_lock(&self, name: &str, owner: u64) -> Result<ReleaseOutcome> {
		let key = normalize(name)?;
		let mut state = self.state.lock();
		match state.get_mut(&key) {
			None => Ok(ReleaseOutcome::NotHeld),
			Some(entry) if entry.owner != owner => Ok(ReleaseOutcome::NotOwner),
			Some(entry) => {
				entry.count -= 1;
				if entry.count == 0 {
					state.remove(&key);
					self.released.notify_all();
				}
				debug!(lock = %key, owner, "user lock released");
				Ok(ReleaseOutcome::Released)
			}
		}
	}

	/// Release every lock `owner` holds, counting each re-entrant
	/// acquisition separately. Used by RELEASE_ALL_LOCKS and session
	/// teardown.
	pub fn release_all(&self, owner: u64) -> u64 {
		let mut state = self.state.lock();
		let mut released = 0u64;
		state.retain(|key, entry| {
			if entry.owner == owner {
				released += entry.count as u64;
				debug!(lock = %key, owner, count = entry.count, "user lock dropped");
				false
			} else {
				true
			}
		});
		if released > 0 {
			self.released.notify_all();
		}
		released
	}

	pub fn is_free(&self, name: &str) -> Result<bool> {
		let key = normalize(name)?;
		Ok(!self.state.lock().contains_key(&key))
	}

	/// Session id of the current holder, if any.
	pub fn holder(&self, name: &str) -> Result<Option<u64>> {
		let key = normalize(name)?;
		Ok(self.state.lock().get(&key).map(|entry| entry.owner))
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use super::*;

	const NO_WAIT: Duration = Duration::from_millis(0);

	#[test]
	fn test_acquire_and_release() {
		let table = LockTable::new();
		assert_eq!(table.get_lock("mylock", 1, NO_WAIT), Ok(true));
		assert_eq!(table.is_free("mylock"), Ok(false));
		assert_eq!(table.holder("mylock"), Ok(Some(1)));
		assert_eq!(table.release_lock("mylock", 1), Ok(ReleaseOutcome::Released));
		assert_eq!(table.is_free("mylock"), Ok(true));
	}

	#[test]
	fn test_reentrant_acquisition() {
		let table = LockTable::new();
		assert_eq!(table.get_lock("a", 1, NO_WAIT), Ok(true));
		assert_eq!(table.get_lock("a", 1, NO_WAIT), Ok(true));
		assert_eq!(table.release_lock("a", 1), Ok(ReleaseOutcome::Released));
		// still held after one release
		assert_eq!(table.is_free("a"), Ok(false));
		assert_eq!(table.release_lock("a", 1), Ok(ReleaseOutcome::Released));
		assert_eq!(table.is_free("a"), Ok(true));
	}

	#[test]
	fn test_contention_times_out() {
		let table = LockTable::new();
		assert_eq!(table.get_lock("a", 1, NO_WAIT), Ok(true));
		assert_eq!(table.get_lock("a", 2, Duration::from_millis(10)), Ok(false));
	}

	#[test]
	fn test_release_outcomes() {
		let table = LockTable::new();
		assert_eq!(table.release_lock("absent", 1), Ok(ReleaseOutcome::NotHeld));
		table.get_lock("a", 1, NO_WAIT).unwrap();
		assert_eq!(table.release_lock("a", 2), Ok(ReleaseOutcome::NotOwner));
	}

	#[test]
	fn test_names_are_case_insensitive() {
		let table = LockTable::new();
		table.get_lock("MyLock", 1, NO_WAIT).unwrap();
		assert_eq!(table.is_free("mylock"), Ok(false));
		assert_eq!(table.release_lock("MYLOCK", 1), Ok(ReleaseOutcome::Released));
	}

	#[test]
	fn test_bad_names_rejected() {
		let table = LockTable::new();
		assert!(matches!(
			table.get_lock("", 1, NO_WAIT),
			Err(EvalError::UserLockWrongName { .. })
		));
		let long = "x".repeat(65);
		assert!(matches!(
			table.is_free(&long),
			Err(EvalError::UserLockWrongName { .. })
		));
	}

	#[test]
	fn test_release_all() {
		let table = LockTable::new();
		table.get_lock("a", 1, NO_WAIT).unwrap();
		table.get_lock("a", 1, NO_WAIT).unwrap();
		table.get_lock("b", 1, NO_WAIT).unwrap();
		table.get_lock("c", 2, NO_WAIT).unwrap();
		assert_eq!(table.release_all(1), 3);
		assert_eq!(table.is_free("a"), Ok(true));
		assert_eq!(table.is_free("c"), Ok(false));
	}

	#[test]
	fn test_handoff_between_threads() {
		let table = Arc::new(LockTable::new());
		table.get_lock("a", 1, NO_WAIT).unwrap();

		let contender = Arc::clone(&table);
		let handle = thread::spawn(move || contender.get_lock("a", 2, Duration::from_secs(10)));

		thread::sleep(Duration::from_millis(20));
		table.release_lock("a", 1).unwrap();
		assert_eq!(handle.join().unwrap(), Ok(true));
		assert_eq!(table.holder("a"), Ok(Some(2)));
	}
}
