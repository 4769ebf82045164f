//! Resolved Temporary Access Pass tuning.

// self
use crate::{_prelude::*, error::ConfigError};

/// Temporary Access Pass values written when the method is enabled.
///
/// Lifetimes and length come from caller parameters (falling back to configured defaults);
/// `is_usable_once` comes from the settings resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapSettings {
	/// Shortest lifetime an administrator may pick, in minutes.
	pub minimum_lifetime_minutes: u32,
	/// Longest lifetime an administrator may pick, in minutes.
	pub maximum_lifetime_minutes: u32,
	/// Lifetime used when none is picked, in minutes.
	pub default_lifetime_minutes: u32,
	/// Number of characters in a generated pass.
	pub default_length: u32,
	/// Whether a pass is consumed by its first sign-in.
	pub is_usable_once: bool,
}
impl TapSettings {
	/// Checks that the lifetime bounds are ordered and the length is non-zero.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.minimum_lifetime_minutes > self.maximum_lifetime_minutes {
			return Err(ConfigError::InvalidTapSettings {
				reason: "minimum lifetime exceeds maximum lifetime",
			});
		}
		if !(self.minimum_lifetime_minutes..=self.maximum_lifetime_minutes)
			.contains(&self.default_lifetime_minutes)
		{
			return Err(ConfigError::InvalidTapSettings {
				reason: "default lifetime lies outside the minimum and maximum",
			});
		}
		if self.default_length == 0 {
			return Err(ConfigError::InvalidTapSettings {
				reason: "default length must be positive",
			});
		}

		Ok(())
	}
}
