//! File-backed [`SettingsStore`] for lightweight deployments and scripts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	settings::{SettingsError, SettingsFuture, SettingsKey, SettingsStore},
};

/// One persisted settings document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsEntry {
	/// Settings category.
	pub category: String,
	/// Tenant identifier or `AllTenants`.
	pub key: String,
	/// Raw JSON document, stored verbatim so malformed entries survive a reload.
	pub json: String,
}

/// Persists settings documents to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileSettingsStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<SettingsKey, String>>>,
}
impl FileSettingsStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Stores (or replaces) a document and rewrites the snapshot file.
	pub fn upsert(&self, entry: SettingsEntry) -> Result<(), SettingsError> {
		let mut guard = self.inner.write();

		guard.insert(SettingsKey::new(entry.category, entry.key), entry.json);

		self.persist_locked(&guard)
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<SettingsKey, String>, SettingsError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| SettingsError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let entries: Vec<SettingsEntry> =
			serde_json::from_slice(&bytes).map_err(|e| SettingsError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries
			.into_iter()
			.map(|entry| (SettingsKey::new(entry.category, entry.key), entry.json))
			.collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), SettingsError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| SettingsError::Backend {
				message: format!("Failed to create settings directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(
		&self,
		contents: &HashMap<SettingsKey, String>,
	) -> Result<(), SettingsError> {
		let mut snapshot: Vec<SettingsEntry> = contents
			.iter()
			.map(|(key, json)| SettingsEntry {
				category: key.category.clone(),
				key: key.key.clone(),
				json: json.clone(),
			})
			.collect();

		snapshot.sort_by(|a, b| (&a.category, &a.key).cmp(&(&b.category, &b.key)));

		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| SettingsError::Serialization {
				message: format!("Failed to serialize settings snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| SettingsError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| SettingsError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| SettingsError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| SettingsError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SettingsStore for FileSettingsStore {
	fn lookup<'a>(
		&'a self,
		category: &'a str,
		key: &'a str,
	) -> SettingsFuture<'a, Option<String>> {
		Box::pin(async move {
			let key = SettingsKey::new(category, key);

			Ok(self.inner.read().get(&key).cloned())
		})
	}
}
