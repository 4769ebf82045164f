//! Per-tenant settings lookup and the Temporary Access Pass single-use resolver.
//!
//! Overrides live in an external key-value store keyed by `(category, tenant)`. The
//! resolver walks tenant override, then the organization-wide `AllTenants` override, then
//! the configured literal default. A missing store, a missing entry, a backend failure, or
//! malformed JSON all fall through to the next level; none of them is an error to callers.

pub mod file;
pub mod memory;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::TenantId, obs};

/// Category under which tenant standards (including TAP overrides) are stored.
pub const STANDARDS_CATEGORY: &str = "standards";

/// Boxed future returned by [`SettingsStore`] lookups.
pub type SettingsFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, SettingsError>> + 'a + Send>>;

/// Key-value source of raw JSON settings documents.
pub trait SettingsStore
where
	Self: Send + Sync,
{
	/// Returns the raw JSON document stored under `(category, key)`, if any.
	fn lookup<'a>(
		&'a self,
		category: &'a str,
		key: &'a str,
	) -> SettingsFuture<'a, Option<String>>;
}

/// Error type produced by [`SettingsStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SettingsError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored settings document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingsKey {
	/// Settings category, e.g. [`STANDARDS_CATEGORY`].
	pub category: String,
	/// Tenant identifier or `AllTenants`.
	pub key: String,
}
impl SettingsKey {
	/// Builds a key from its parts.
	pub fn new(category: impl Into<String>, key: impl Into<String>) -> Self {
		Self { category: category.into(), key: key.into() }
	}
}

/// Resolves per-tenant overrides with organization-wide and literal fallbacks.
#[derive(Clone)]
pub struct SettingsResolver {
	store: Option<Arc<dyn SettingsStore>>,
	default_usable_once: bool,
}
impl SettingsResolver {
	/// Creates a resolver backed by `store`, defaulting single-use passes to `true`.
	pub fn new(store: Arc<dyn SettingsStore>) -> Self {
		Self { store: Some(store), default_usable_once: true }
	}

	/// Creates a resolver with no backing store; every lookup yields the literal default.
	pub fn without_store() -> Self {
		Self { store: None, default_usable_once: true }
	}

	/// Overrides the literal single-use default at the bottom of the chain.
	pub fn with_default_usable_once(mut self, usable_once: bool) -> Self {
		self.default_usable_once = usable_once;

		self
	}

	/// Resolves whether Temporary Access Passes issued for `tenant` are single-use.
	pub async fn resolve_tap_usable_once(&self, tenant: &TenantId) -> bool {
		if let Some(value) = self.tap_config_at(tenant.as_ref()).await {
			return value;
		}
		if !tenant.is_all_tenants()
			&& let Some(value) = self.tap_config_at(TenantId::ALL_TENANTS).await
		{
			return value;
		}

		self.default_usable_once
	}

	async fn tap_config_at(&self, key: &str) -> Option<bool> {
		let store = self.store.as_deref()?;
		let raw = match store.lookup(STANDARDS_CATEGORY, key).await {
			Ok(raw) => raw?,
			Err(e) => {
				obs::trace_settings_fallback(key, &e.to_string());

				return None;
			},
		};
		let parsed = parse_tap_config(&raw);

		if parsed.is_none() {
			obs::trace_settings_fallback(key, "TAP.config is missing or malformed");
		}

		parsed
	}
}
impl Debug for SettingsResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SettingsResolver")
			.field("store_set", &self.store.is_some())
			.field("default_usable_once", &self.default_usable_once)
			.finish()
	}
}

fn parse_tap_config(raw: &str) -> Option<bool> {
	let document: Value = serde_json::from_str(raw).ok()?;

	match document.get("TAP")?.get("config")? {
		Value::Bool(value) => Some(*value),
		Value::String(value) if value.eq_ignore_ascii_case("true") => Some(true),
		Value::String(value) if value.eq_ignore_ascii_case("false") => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn tenant() -> TenantId {
		TenantId::new("contoso.onmicrosoft.com").expect("Tenant fixture should be valid.")
	}

	#[test]
	fn tap_config_accepts_booleans_and_boolean_strings() {
		assert_eq!(parse_tap_config(r#"{"TAP":{"config":false}}"#), Some(false));
		assert_eq!(parse_tap_config(r#"{"TAP":{"config":"True"}}"#), Some(true));
		assert_eq!(parse_tap_config(r#"{"TAP":{"config":"sometimes"}}"#), None);
		assert_eq!(parse_tap_config(r#"{"TAP":{}}"#), None);
		assert_eq!(parse_tap_config("{not json"), None);
	}

	#[tokio::test]
	async fn tenant_override_wins_over_global() {
		let store = MemorySettingsStore::default();

		store.insert(STANDARDS_CATEGORY, "contoso.onmicrosoft.com", r#"{"TAP":{"config":false}}"#);
		store.insert(STANDARDS_CATEGORY, TenantId::ALL_TENANTS, r#"{"TAP":{"config":true}}"#);

		let resolver = SettingsResolver::new(Arc::new(store));

		assert!(!resolver.resolve_tap_usable_once(&tenant()).await);
	}

	#[tokio::test]
	async fn malformed_tenant_entry_falls_through_to_global() {
		let store = MemorySettingsStore::default();

		store.insert(STANDARDS_CATEGORY, "contoso.onmicrosoft.com", "{\"TAP\":");
		store.insert(STANDARDS_CATEGORY, TenantId::ALL_TENANTS, r#"{"TAP":{"config":"false"}}"#);

		let resolver = SettingsResolver::new(Arc::new(store));

		assert!(!resolver.resolve_tap_usable_once(&tenant()).await);
	}

	#[tokio::test]
	async fn absent_levels_fall_back_to_literal_default() {
		let empty = SettingsResolver::new(Arc::new(MemorySettingsStore::default()));

		assert!(empty.resolve_tap_usable_once(&tenant()).await);
		assert!(SettingsResolver::without_store().resolve_tap_usable_once(&tenant()).await);
		assert!(
			!SettingsResolver::without_store()
				.with_default_usable_once(false)
				.resolve_tap_usable_once(&tenant())
				.await
		);
	}

	#[tokio::test]
	async fn backend_failures_are_treated_as_absence() {
		struct BrokenStore;
		impl SettingsStore for BrokenStore {
			fn lookup<'a>(
				&'a self,
				_category: &'a str,
				_key: &'a str,
			) -> SettingsFuture<'a, Option<String>> {
				Box::pin(async {
					Err(SettingsError::Backend { message: "table unreachable".into() })
				})
			}
		}

		let resolver = SettingsResolver::new(Arc::new(BrokenStore));

		assert!(resolver.resolve_tap_usable_once(&tenant()).await);
	}
}
