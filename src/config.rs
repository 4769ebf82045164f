//! Reconciler configuration with literal defaults.

// crates.io
use serde::Deserializer;
// self
use crate::{_prelude::*, error::ConfigError};

/// Top-level reconciler configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
	/// Base URL of the remote policy service; resource paths are joined onto it.
	#[serde(deserialize_with = "deserialize_base_url")]
	pub base_url: Url,
	/// Per-call transport timeout, in seconds.
	pub timeout_secs: u64,
	/// Temporary Access Pass defaults applied when callers omit values.
	pub tap: TapDefaults,
}
impl ReconcilerConfig {
	/// Default policy service endpoint.
	pub const DEFAULT_BASE_URL: &'static str = "https://graph.microsoft.com/beta/";
	/// Default transport timeout, in seconds.
	pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

	/// Replaces the base URL, appending a trailing slash so relative joins keep the path.
	pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		self.base_url = directory_url(url);

		Ok(self)
	}

	/// Transport timeout as a std duration.
	pub fn timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.timeout_secs)
	}
}
impl Default for ReconcilerConfig {
	fn default() -> Self {
		Self {
			base_url: Url::parse(Self::DEFAULT_BASE_URL)
				.unwrap_or_else(|e| panic!("Built-in base URL must parse: {e}")),
			timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
			tap: TapDefaults::default(),
		}
	}
}

/// Ensures `url`'s path ends with `/`, so [`Url::join`] appends below it instead of replacing
/// the last segment.
pub fn directory_url(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}

fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
	D: Deserializer<'de>,
{
	Url::deserialize(deserializer).map(directory_url)
}

/// Process-wide Temporary Access Pass defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapDefaults {
	/// Minimum pass lifetime, in minutes.
	pub minimum_lifetime_minutes: u32,
	/// Maximum pass lifetime, in minutes.
	pub maximum_lifetime_minutes: u32,
	/// Default pass lifetime, in minutes.
	pub default_lifetime_minutes: u32,
	/// Default pass length.
	pub default_length: u32,
	/// Single-use default when no tenant or organization override exists.
	pub is_usable_once: bool,
}
impl Default for TapDefaults {
	fn default() -> Self {
		Self {
			minimum_lifetime_minutes: 60,
			maximum_lifetime_minutes: 480,
			default_lifetime_minutes: 60,
			default_length: 8,
			is_usable_once: true,
		}
	}
}
