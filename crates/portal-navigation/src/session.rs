//! Navigation session.
//!
//! Everything that outlives a single navigation lives here: the loading
//! overlay, the modal manager, the signing-out flag, the navigation
//! generation counter and the scratch store pages use to hand data to each
//! other (for example the patients selected on one page and consumed on the
//! next).

use crate::modal::ModalManager;
use crate::overlay::LoadingOverlay;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared state of one running portal client.
#[derive(Debug)]
pub struct NavigationSession {
	overlay: LoadingOverlay,
	modal: ModalManager,
	signing_out: AtomicBool,
	listening: AtomicBool,
	generation: AtomicU64,
	store: RwLock<HashMap<String, Value>>,
}

impl NavigationSession {
	/// Creates a session around `overlay`.
	pub fn new(overlay: LoadingOverlay) -> Self {
		Self {
			overlay,
			modal: ModalManager::new(),
			signing_out: AtomicBool::new(false),
			listening: AtomicBool::new(false),
			generation: AtomicU64::new(0),
			store: RwLock::new(HashMap::new()),
		}
	}

	/// The loading overlay.
	pub fn overlay(&self) -> &LoadingOverlay {
		&self.overlay
	}

	/// The modal manager.
	pub fn modal(&self) -> &ModalManager {
		&self.modal
	}

	/// Whether a sign-out is in progress.
	pub fn is_signing_out(&self) -> bool {
		self.signing_out.load(Ordering::SeqCst)
	}

	/// Marks that a sign-out has started. Never cleared: the page is about to
	/// be replaced.
	pub fn mark_signing_out(&self) {
		self.signing_out.store(true, Ordering::SeqCst);
	}

	/// Marks that back/forward notifications are subscribed. Returns whether
	/// they already were.
	pub fn mark_listening(&self) -> bool {
		self.listening.swap(true, Ordering::SeqCst)
	}

	/// Starts a navigation and returns its generation.
	pub fn begin_generation(&self) -> u64 {
		self.generation.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// The most recently started generation.
	pub fn current_generation(&self) -> u64 {
		self.generation.load(Ordering::SeqCst)
	}

	/// Whether `generation` is still the most recently started navigation.
	pub fn is_current(&self, generation: u64) -> bool {
		self.current_generation() == generation
	}

	/// Stores `value` under `key`, replacing the previous value.
	pub fn store(&self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.store.write().insert(key.into(), value)
	}

	/// Serializes `value` and stores it under `key`.
	pub fn store_typed<T: Serialize>(
		&self,
		key: impl Into<String>,
		value: &T,
	) -> Result<(), serde_json::Error> {
		let value = serde_json::to_value(value)?;
		self.store(key, value);
		Ok(())
	}

	/// The value stored under `key`.
	pub fn load(&self, key: &str) -> Option<Value> {
		self.store.read().get(key).cloned()
	}

	/// Deserializes the value stored under `key`. `Ok(None)` when absent.
	pub fn load_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
		self.load(key).map(serde_json::from_value).transpose()
	}

	/// Removes and returns the value stored under `key`.
	pub fn take(&self, key: &str) -> Option<Value> {
		self.store.write().remove(key)
	}
}
