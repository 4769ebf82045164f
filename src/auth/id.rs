//! Tenant identifier and the organization-wide settings key.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

const TENANT_ID_MAX_LEN: usize = 128;

/// Error returned when a tenant identifier is unusable as a resource or settings key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum TenantIdError {
	/// The identifier was empty.
	#[error("Tenant identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Tenant identifier `{0}` contains whitespace.")]
	ContainsWhitespace(String),
	/// The identifier exceeded the allowed character count.
	#[error("Tenant identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Tenant whose authentication-method policy is reconciled.
///
/// Usually the tenant's default domain or directory GUID. The reserved value
/// [`TenantId::ALL_TENANTS`] names the organization-wide settings level.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);
impl TenantId {
	/// Reserved key under which organization-wide settings overrides are stored.
	pub const ALL_TENANTS: &'static str = "AllTenants";

	/// Validates and wraps `value`.
	pub fn new(value: impl Into<String>) -> Result<Self, TenantIdError> {
		let value = value.into();

		if value.is_empty() {
			return Err(TenantIdError::Empty);
		}
		if value.chars().any(char::is_whitespace) {
			return Err(TenantIdError::ContainsWhitespace(value));
		}
		if value.chars().count() > TENANT_ID_MAX_LEN {
			return Err(TenantIdError::TooLong { max: TENANT_ID_MAX_LEN });
		}

		Ok(Self(value))
	}

	/// Returns the organization-wide pseudo tenant used for settings fallbacks.
	pub fn all_tenants() -> Self {
		Self(Self::ALL_TENANTS.to_owned())
	}

	/// Returns `true` for the organization-wide pseudo tenant.
	pub fn is_all_tenants(&self) -> bool {
		self.0 == Self::ALL_TENANTS
	}
}
impl AsRef<str> for TenantId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for TenantId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<TenantId> for String {
	fn from(value: TenantId) -> Self {
		value.0
	}
}
impl TryFrom<String> for TenantId {
	type Error = TenantIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for TenantId {
	type Err = TenantIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for TenantId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Tenant({})", self.0)
	}
}
impl Display for TenantId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn surrounding_whitespace_is_rejected() {
		assert!(
			TenantId::new(" contoso.onmicrosoft.com").is_err(),
			"Leading whitespace must be rejected."
		);
		assert!(
			TenantId::new("contoso.onmicrosoft.com ").is_err(),
			"Trailing whitespace must be rejected."
		);

		let tenant = TenantId::new("contoso.onmicrosoft.com")
			.expect("Tenant fixture should be considered valid.");

		assert_eq!(tenant.as_ref(), "contoso.onmicrosoft.com");
		assert_eq!(TenantId::new(""), Err(TenantIdError::Empty));
		assert!(TenantId::new("contoso onmicrosoft").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let payload = "\"fabrikam.onmicrosoft.com\"";
		let tenant: TenantId =
			serde_json::from_str(payload).expect("Tenant should deserialize successfully.");

		assert_eq!(tenant.as_ref(), "fabrikam.onmicrosoft.com");
		assert!(serde_json::from_str::<TenantId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<TenantId>("\" fabrikam.onmicrosoft.com\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("tenant{}id", '\u{00A0}');

		assert!(matches!(TenantId::new(nbsp), Err(TenantIdError::ContainsWhitespace(_))));

		let exact = "a".repeat(TENANT_ID_MAX_LEN);

		TenantId::new(exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(TENANT_ID_MAX_LEN + 1);

		assert_eq!(TenantId::new(too_long), Err(TenantIdError::TooLong { max: TENANT_ID_MAX_LEN }));
	}

	#[test]
	fn all_tenants_key_is_a_valid_identifier() {
		let global = TenantId::all_tenants();

		assert!(global.is_all_tenants());
		assert_eq!(TenantId::new("AllTenants").expect("Reserved key should validate."), global);
		assert!(
			!TenantId::new("contoso.onmicrosoft.com")
				.expect("Tenant fixture should be considered valid.")
				.is_all_tenants()
		);
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<TenantId, u8> = HashMap::from_iter([(
			TenantId::new("contoso.onmicrosoft.com")
				.expect("Tenant used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("contoso.onmicrosoft.com"), Some(&7));
	}
}
