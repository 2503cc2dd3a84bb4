//! Decides per request whether providers are called or canned answers are served.

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

use lumen_config::Config;

/// Holds the operator-controlled test-mode flag.
pub trait TestModeStore
where
	Self: Send + Sync,
{
	fn explicit(&self) -> bool;

	fn set_explicit(&self, enabled: bool);
}

#[derive(Debug, Default)]
pub struct InMemoryTestModeStore {
	enabled: AtomicBool,
}
impl InMemoryTestModeStore {
	pub fn new(enabled: bool) -> Self {
		Self { enabled: AtomicBool::new(enabled) }
	}
}
impl TestModeStore for InMemoryTestModeStore {
	fn explicit(&self) -> bool {
		self.enabled.load(Ordering::SeqCst)
	}

	fn set_explicit(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::SeqCst);
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Credentials {
	pub llm_api_key_present: bool,
	pub search_api_key_present: bool,
}
impl Credentials {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			llm_api_key_present: cfg.llm_api_key().is_some(),
			search_api_key_present: cfg.search_api_key().is_some(),
		}
	}

	fn missing_any(self) -> bool {
		!(self.llm_api_key_present && self.search_api_key_present)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestModeStatus {
	pub test_mode: bool,
	pub forced_test_mode: bool,
}
impl TestModeStatus {
	pub fn mode(self) -> Mode {
		if self.test_mode { Mode::Test } else { Mode::Live }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	Live,
	Test,
}

#[derive(Clone)]
pub struct TestModeGate {
	store: Arc<dyn TestModeStore>,
	credentials: Credentials,
}
impl TestModeGate {
	pub fn new(store: Arc<dyn TestModeStore>, credentials: Credentials) -> Self {
		Self { store, credentials }
	}

	pub fn from_config(cfg: &Config) -> Self {
		Self::new(
			Arc::new(InMemoryTestModeStore::new(cfg.test_mode.enabled)),
			Credentials::from_config(cfg),
		)
	}

	pub fn status(&self) -> TestModeStatus {
		let forced = self.credentials.missing_any();

		TestModeStatus { test_mode: self.store.explicit() || forced, forced_test_mode: forced }
	}

	pub fn mode(&self) -> Mode {
		self.status().mode()
	}

	/// Updates the explicit flag. A forced test mode stays in effect regardless.
	pub fn set_explicit(&self, enabled: bool) {
		self.store.set_explicit(enabled);

		tracing::info!(enabled, forced = self.credentials.missing_any(), "Test mode toggled.");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const ALL_KEYS: Credentials =
		Credentials { llm_api_key_present: true, search_api_key_present: true };

	#[test]
	fn live_only_with_both_keys_and_flag_off() {
		let gate = TestModeGate::new(Arc::new(InMemoryTestModeStore::new(false)), ALL_KEYS);

		assert_eq!(gate.mode(), Mode::Live);

		gate.set_explicit(true);

		assert_eq!(gate.status(), TestModeStatus { test_mode: true, forced_test_mode: false });
	}

	#[test]
	fn missing_search_key_forces_test_mode() {
		let credentials = Credentials { search_api_key_present: false, ..ALL_KEYS };
		let gate = TestModeGate::new(Arc::new(InMemoryTestModeStore::default()), credentials);

		assert_eq!(gate.status(), TestModeStatus { test_mode: true, forced_test_mode: true });
	}
}
