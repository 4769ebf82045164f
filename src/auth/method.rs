//! The fixed authentication-method set and the policy state each method can take.

// self
use crate::_prelude::*;

/// Authentication methods whose organization-level policy the reconciler governs.
///
/// Identifiers match case-insensitively when parsed from caller input, mirroring the remote
/// service's own resource lookup; [`MethodId::as_str`] yields the canonical spelling used in
/// resource paths and log records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum MethodId {
	/// FIDO2 security keys and passkeys.
	Fido2,
	/// Microsoft Authenticator push and passwordless sign-in.
	MicrosoftAuthenticator,
	/// One-time codes delivered by text message.
	Sms,
	/// Time-limited Temporary Access Pass.
	TemporaryAccessPass,
	/// Hardware OATH tokens.
	HardwareOath,
	/// Third-party software OATH tokens.
	SoftwareOath,
	/// One-time codes delivered by voice call.
	Voice,
	/// One-time codes delivered by email.
	Email,
	/// Certificate-based authentication.
	X509Certificate,
}
impl MethodId {
	/// Every method the rule table covers, in table order.
	pub const ALL: [Self; 9] = [
		Self::Fido2,
		Self::MicrosoftAuthenticator,
		Self::Sms,
		Self::TemporaryAccessPass,
		Self::HardwareOath,
		Self::SoftwareOath,
		Self::Voice,
		Self::Email,
		Self::X509Certificate,
	];

	/// Returns the canonical identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Fido2 => "FIDO2",
			Self::MicrosoftAuthenticator => "MicrosoftAuthenticator",
			Self::Sms => "SMS",
			Self::TemporaryAccessPass => "TemporaryAccessPass",
			Self::HardwareOath => "HardwareOATH",
			Self::SoftwareOath => "softwareOath",
			Self::Voice => "Voice",
			Self::Email => "Email",
			Self::X509Certificate => "x509Certificate",
		}
	}

	/// Looks up a caller-supplied identifier; `None` for anything outside the method set.
	pub fn lookup(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|method| method.as_str().eq_ignore_ascii_case(raw))
	}
}
impl Display for MethodId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for MethodId {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::lookup(s).ok_or_else(|| Error::UnknownMethod { method: s.to_owned() })
	}
}
impl TryFrom<String> for MethodId {
	type Error = Error;

	fn try_from(value: String) -> Result<Self> {
		value.parse()
	}
}
impl From<MethodId> for &'static str {
	fn from(value: MethodId) -> Self {
		value.as_str()
	}
}

/// Organization-level enablement of a method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyState {
	/// Users in the targeted groups may register and sign in with the method.
	Enabled,
	/// The method is unavailable organization-wide.
	Disabled,
}
impl PolicyState {
	/// Returns the wire spelling used in method configuration documents.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Enabled => "enabled",
			Self::Disabled => "disabled",
		}
	}

	/// Returns `true` for [`PolicyState::Enabled`].
	pub const fn is_enabled(self) -> bool {
		matches!(self, Self::Enabled)
	}

	/// Parses the wire spelling, ignoring ASCII case.
	pub fn from_wire(raw: &str) -> Option<Self> {
		if raw.eq_ignore_ascii_case("enabled") {
			Some(Self::Enabled)
		} else if raw.eq_ignore_ascii_case("disabled") {
			Some(Self::Disabled)
		} else {
			None
		}
	}
}
impl From<bool> for PolicyState {
	fn from(enabled: bool) -> Self {
		if enabled { Self::Enabled } else { Self::Disabled }
	}
}
impl Display for PolicyState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
