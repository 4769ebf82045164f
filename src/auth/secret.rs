//! Bearer token handed to the transport for one policy-service call.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use reqwest::header::{HeaderValue, InvalidHeaderValue};

const BEARER_SCHEME: &str = "Bearer";

/// Access token sent in the `Authorization` header; formatting never reveals it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a raw access token.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Never log the result.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value, `Bearer <token>`.
	pub fn authorization(&self) -> String {
		format!("{BEARER_SCHEME} {}", self.0)
	}

	/// Builds the `Authorization` header, flagged sensitive so HTTP-level logging masks it.
	///
	/// Fails when the token carries bytes a header cannot hold (for example a newline).
	#[cfg(feature = "reqwest")]
	pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
		let mut value = HeaderValue::from_str(&self.authorization())?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BearerToken(<redacted>)")
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{BEARER_SCHEME} <redacted>")
	}
}
