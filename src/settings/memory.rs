//! Thread-safe in-memory [`SettingsStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	settings::{SettingsFuture, SettingsKey, SettingsStore},
};

type SettingsMap = Arc<RwLock<HashMap<SettingsKey, String>>>;

/// Storage backend that keeps raw settings documents in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySettingsStore(SettingsMap);
impl MemorySettingsStore {
	/// Stores (or replaces) the raw JSON document under `(category, key)`.
	pub fn insert(&self, category: &str, key: &str, json: impl Into<String>) {
		self.0.write().insert(SettingsKey::new(category, key), json.into());
	}

	/// Removes the document under `(category, key)`, returning it when present.
	pub fn remove(&self, category: &str, key: &str) -> Option<String> {
		self.0.write().remove(&SettingsKey::new(category, key))
	}

	fn lookup_now(map: SettingsMap, key: SettingsKey) -> Option<String> {
		map.read().get(&key).cloned()
	}
}
impl SettingsStore for MemorySettingsStore {
	fn lookup<'a>(
		&'a self,
		category: &'a str,
		key: &'a str,
	) -> SettingsFuture<'a, Option<String>> {
		let map = self.0.clone();
		let key = SettingsKey::new(category, key);

		Box::pin(async move { Ok(Self::lookup_now(map, key)) })
	}
}
