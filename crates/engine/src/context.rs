// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Per-statement evaluation context.
//!
//! A [`SessionContext`] carries everything a function may observe beyond
//! its arguments: the frozen statement timestamp, the warning queue, the
//! session's random stream, and the server-wide lock table, UUID_SHORT
//! counter and cancellation token.

use std::{
	collections::HashMap,
	sync::Arc,
	time::{Duration, SystemTime, UNIX_EPOCH},
};

use myexpr_type::{Collation, DateTime, Value, Warning};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use crate::session::{CancelToken, LockTable, UuidShortGenerator};

/// Shared server state handed to every session.
pub struct ServerShared {
	pub locks: Arc<LockTable>,
	pub uuid_short: Arc<UuidShortGenerator>,
}

impl ServerShared {
	pub fn new(server_id: u8) -> Self {
		Self {
			locks: Arc::new(LockTable::new()),
			uuid_short: Arc::new(UuidShortGenerator::new(server_id, unix_now().0)),
		}
	}
}

const DEFAULT_MAX_ALLOWED_PACKET: u64 = 16 * 1024 * 1024;

fn default_variables() -> HashMap<String, Value> {
	HashMap::from([("max_allowed_packet".to_string(), Value::uint8(DEFAULT_MAX_ALLOWED_PACKET))])
}

fn unix_now() -> (u64, u32) {
	match SystemTime::now().duration_since(UNIX_EPOCH) {
		Ok(elapsed) => (elapsed.as_secs(), elapsed.subsec_micros()),
		Err(_) => (0, 0),
	}
}

fn wall_clock() -> DateTime {
	let (seconds, micros) = unix_now();
	DateTime::from_unix(seconds as i64, micros).unwrap_or_default()
}

pub struct SessionContext {
	session_id: u64,
	default_collation: Collation,
	/// Frozen at statement start; NOW() and CURDATE() read this.
	query_time: Mutex<DateTime>,
	warnings: Mutex<Vec<Warning>>,
	variables: Mutex<HashMap<String, Value>>,
	rng: Mutex<StdRng>,
	locks: Arc<LockTable>,
	uuid_short: Arc<UuidShortGenerator>,
	cancel: Arc<CancelToken>,
}

impl SessionContext {
	pub fn new(session_id: u64, shared: &ServerShared) -> Self {
		Self {
			session_id,
			default_collation: Collation::default(),
			query_time: Mutex::new(wall_clock()),
			warnings: Mutex::new(Vec::new()),
			variables: Mutex::new(default_variables()),
			rng: Mutex::new(StdRng::from_os_rng()),
			locks: Arc::clone(&shared.locks),
			uuid_short: Arc::clone(&shared.uuid_short),
			cancel: Arc::new(CancelToken::new()),
		}
	}

	/// A context with its own private server state, for single-session
	/// embedding and tests.
	pub fn standalone(session_id: u64) -> Self {
		Self::new(session_id, &ServerShared::new(1))
	}

	pub fn session_id(&self) -> u64 {
		self.session_id
	}

	pub fn default_collation(&self) -> Collation {
		self.default_collation
	}

	pub fn set_default_collation(&mut self, collation: Collation) {
		self.default_collation = collation;
	}

	/// Re-freeze the statement timestamp. Called once per statement so
	/// every NOW() within it agrees.
	pub fn begin_statement(&self) {
		*self.query_time.lock() = wall_clock();
		self.cancel.reset();
	}

	/// The frozen statement timestamp.
	pub fn now(&self) -> DateTime {
		*self.query_time.lock()
	}

	/// The wall clock at the moment of the call; SYSDATE() reads this
	/// and deliberately drifts within a statement.
	pub fn sysdate(&self) -> DateTime {
		wall_clock()
	}

	#[cfg(test)]
	pub fn freeze_time(&self, at: DateTime) {
		*self.query_time.lock() = at;
	}

	pub fn push_warning(&self, warning: Warning) {
		trace!(code = warning.code, message = %warning.message, "statement warning");
		self.warnings.lock().push(warning);
	}

	pub fn warnings(&self) -> Vec<Warning> {
		self.warnings.lock().clone()
	}

	pub fn take_warnings(&self) -> Vec<Warning> {
		std::mem::take(&mut *self.warnings.lock())
	}

	/// A session system variable, if set.
	pub fn variable(&self, name: &str) -> Option<Value> {
		self.variables.lock().get(&name.to_lowercase()).cloned()
	}

	pub fn set_variable(&self, name: &str, value: Value) {
		self.variables.lock().insert(name.to_lowercase(), value);
	}

	/// The byte ceiling for string-building functions; results above it
	/// become NULL with a warning, as the wire could not carry them.
	pub fn max_allowed_packet(&self) -> u64 {
		match self.variable("max_allowed_packet") {
			Some(Value::Uint8(v)) => v,
			Some(Value::Int8(v)) if v > 0 => v as u64,
			_ => DEFAULT_MAX_ALLOWED_PACKET,
		}
	}

	/// Uniform draw in [0, 1).
	pub fn rand_f64(&self) -> f64 {
		self.rng.lock().random()
	}

	/// RAND(N) reseeds the session stream.
	pub fn seed_rand(&self, seed: u64) {
		*self.rng.lock() = StdRng::seed_from_u64(seed);
	}

	pub fn locks(&self) -> &LockTable {
		&self.locks
	}

	pub fn uuid_short(&self) -> u64 {
		self.uuid_short.next()
	}

	pub fn cancel_token(&self) -> Arc<CancelToken> {
		Arc::clone(&self.cancel)
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Block for `duration` or until the session is killed. True when
	/// interrupted.
	pub fn sleep(&self, duration: Duration) -> bool {
		self.cancel.sleep(duration)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_query_time_is_frozen_until_next_statement() {
		let ctx = SessionContext::standalone(1);
		let first = ctx.now();
		std::thread::sleep(Duration::from_millis(5));
		assert_eq!(ctx.now(), first);
		ctx.begin_statement();
		// the second statement may land in the same microsecond, but
		// never earlier
		assert!(ctx.now() >= first);
	}

	#[test]
	fn test_warning_queue() {
		let ctx = SessionContext::standalone(1);
		ctx.push_warning(Warning::new(1292, "boom"));
		assert_eq!(ctx.warnings().len(), 1);
		assert_eq!(ctx.take_warnings().len(), 1);
		assert!(ctx.warnings().is_empty());
	}

	#[test]
	fn test_seeded_rand_is_deterministic() {
		let ctx = SessionContext::standalone(1);
		ctx.seed_rand(42);
		let a = ctx.rand_f64();
		ctx.seed_rand(42);
		let b = ctx.rand_f64();
		assert_eq!(a, b);
		assert!((0.0..1.0).contains(&a));
	}

	#[test]
	fn test_session_variables() {
		let ctx = SessionContext::standalone(1);
		assert_eq!(ctx.max_allowed_packet(), 16 * 1024 * 1024);
		ctx.set_variable("MAX_ALLOWED_PACKET", Value::uint8(64u64));
		assert_eq!(ctx.max_allowed_packet(), 64);
		assert_eq!(ctx.variable("no_such_variable"), None);
	}

	#[test]
	fn test_sessions_share_server_locks() {
		let shared = ServerShared::new(1);
		let a = SessionContext::new(1, &shared);
		let b = SessionContext::new(2, &shared);
		a.locks().get_lock("x", a.session_id(), Duration::ZERO).unwrap();
		assert_eq!(b.locks().is_free("x"), Ok(false));
	}
}
