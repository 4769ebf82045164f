//! Caller-supplied tuning parameters and batch requests.

// self
use crate::{_prelude::*, config::TapDefaults, policy::TapSettings};

/// Optional per-call tuning; unset values fall back to [`TapDefaults`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyParams {
	/// Software OTP toggle written on Microsoft Authenticator enable; left as read when unset.
	pub microsoft_authenticator_software_oath_enabled: Option<bool>,
	/// Temporary Access Pass minimum lifetime, in minutes.
	pub tap_minimum_lifetime: Option<u32>,
	/// Temporary Access Pass maximum lifetime, in minutes.
	pub tap_maximum_lifetime: Option<u32>,
	/// Temporary Access Pass default lifetime, in minutes.
	pub tap_default_lifetime: Option<u32>,
	/// Temporary Access Pass length.
	pub tap_default_length: Option<u32>,
}
impl PolicyParams {
	/// Sets the Microsoft Authenticator software OTP flag.
	pub fn with_software_oath_enabled(mut self, enabled: bool) -> Self {
		self.microsoft_authenticator_software_oath_enabled = Some(enabled);

		self
	}

	/// Sets all three Temporary Access Pass lifetimes, in minutes.
	pub fn with_tap_lifetimes(mut self, minimum: u32, maximum: u32, default: u32) -> Self {
		self.tap_minimum_lifetime = Some(minimum);
		self.tap_maximum_lifetime = Some(maximum);
		self.tap_default_lifetime = Some(default);

		self
	}

	/// Sets the Temporary Access Pass length.
	pub fn with_tap_default_length(mut self, length: u32) -> Self {
		self.tap_default_length = Some(length);

		self
	}

	/// Combines these parameters with `defaults` and the resolved single-use flag.
	pub fn tap_settings(&self, defaults: &TapDefaults, is_usable_once: bool) -> TapSettings {
		TapSettings {
			minimum_lifetime_minutes: self
				.tap_minimum_lifetime
				.unwrap_or(defaults.minimum_lifetime_minutes),
			maximum_lifetime_minutes: self
				.tap_maximum_lifetime
				.unwrap_or(defaults.maximum_lifetime_minutes),
			default_lifetime_minutes: self
				.tap_default_lifetime
				.unwrap_or(defaults.default_lifetime_minutes),
			default_length: self.tap_default_length.unwrap_or(defaults.default_length),
			is_usable_once,
		}
	}
}

/// One entry of a multi-method batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRequest {
	/// Method identifier as supplied by the caller.
	pub method: String,
	/// Desired enablement.
	pub desired_enabled: bool,
	/// Per-call tuning.
	#[serde(default)]
	pub params: PolicyParams,
}
impl MethodRequest {
	/// Creates a request with default parameters.
	pub fn new(method: impl Into<String>, desired_enabled: bool) -> Self {
		Self { method: method.into(), desired_enabled, params: PolicyParams::default() }
	}

	/// Replaces the request's parameters.
	pub fn with_params(mut self, params: PolicyParams) -> Self {
		self.params = params;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unset_tap_values_fall_back_to_defaults() {
		let settings = PolicyParams::default()
			.with_tap_default_length(12)
			.tap_settings(&TapDefaults::default(), false);

		assert_eq!(settings.default_length, 12);
		assert_eq!(settings.minimum_lifetime_minutes, 60);
		assert_eq!(settings.maximum_lifetime_minutes, 480);
		assert_eq!(settings.default_lifetime_minutes, 60);
		assert!(!settings.is_usable_once);
	}

	#[test]
	fn batch_requests_deserialize_with_camel_case_params() {
		let request: MethodRequest = serde_json::from_str(
			r#"{"method":"MicrosoftAuthenticator","desiredEnabled":true,
				"params":{"microsoftAuthenticatorSoftwareOathEnabled":true}}"#,
		)
		.expect("Batch request should deserialize.");

		assert_eq!(request.params.microsoft_authenticator_software_oath_enabled, Some(true));
		assert_eq!(MethodRequest::new("SMS", false).params, PolicyParams::default());
	}
}
