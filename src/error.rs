//! Reconciler-level error types shared across the client, rule table, and orchestrator.

// self
use crate::_prelude::*;

/// Reconciler-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical reconciler error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem (base URL, HTTP client, TAP bounds).
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Read or write against the remote policy service failed.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Tenant credentials could not be resolved for the requested context.
	#[error(transparent)]
	Credential(#[from] CredentialError),

	/// Caller supplied a method identifier outside the fixed method set.
	#[error("Unknown authentication method `{method}`.")]
	UnknownMethod {
		/// Identifier exactly as the caller supplied it.
		method: String,
	},
	/// The method's static policy forbids the requested transition.
	#[error("Policy rejected {method}: {reason}.")]
	PolicyRejection {
		/// Canonical method identifier.
		method: &'static str,
		/// Why the transition is refused.
		reason: &'static str,
	},
}
impl Error {
	/// Returns `true` when the error was raised before any remote call was attempted.
	pub fn is_rejection(&self) -> bool {
		matches!(self, Self::UnknownMethod { .. } | Self::PolicyRejection { .. } | Self::Config(_))
	}
}

/// Configuration and validation failures raised by the reconciler.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL of the remote policy service cannot be used to build resource paths.
	#[error("Policy service base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Resolved Temporary Access Pass settings are inconsistent.
	#[error("Temporary Access Pass settings are invalid: {reason}.")]
	InvalidTapSettings {
		/// Which constraint was violated.
		reason: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures against the remote policy service.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure (DNS, TCP, TLS, timeout).
	#[error("Network error occurred while calling the policy service: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Policy service answered with a non-success status.
	#[error("Policy service returned HTTP {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Service-supplied error code, when the body carried one.
		code: Option<String>,
		/// Service-supplied message or a body preview.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Policy service returned a document that is not a JSON object.
	#[error("Policy service returned a malformed method configuration: {source}.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Outgoing method configuration could not be serialized.
	#[error("Method configuration could not be serialized: {0}.")]
	Encode(#[source] serde_json::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when the service responded at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failure resolving a tenant-scoped bearer token.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Credentials unavailable for tenant `{tenant}` ({context}): {message}.")]
pub struct CredentialError {
	/// Tenant the credentials were requested for.
	pub tenant: String,
	/// Credential context label (`user` or `application`).
	pub context: &'static str,
	/// Provider-supplied reason.
	pub message: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejections_are_distinguished_from_failures() {
		let unknown = Error::UnknownMethod { method: "Fax".into() };
		let rejected =
			Error::PolicyRejection { method: "SMS", reason: "enabling is not permitted" };
		let transport: Error = TransportError::Status {
			status: 503,
			code: None,
			message: "unavailable".into(),
			retry_after: None,
		}
		.into();

		assert!(unknown.is_rejection());
		assert!(rejected.is_rejection());
		assert!(!transport.is_rejection());
		assert_eq!(rejected.to_string(), "Policy rejected SMS: enabling is not permitted.");
	}

	#[test]
	fn transport_error_exposes_status_and_source() {
		let err = TransportError::Status {
			status: 403,
			code: Some("Authorization_RequestDenied".into()),
			message: "Insufficient privileges".into(),
			retry_after: None,
		};

		assert_eq!(err.status(), Some(403));
		assert!(err.to_string().contains("Insufficient privileges"));

		let io = TransportError::network(std::io::Error::other("reset"));
		let wrapped: Error = io.into();

		let source = StdError::source(&wrapped)
			.expect("Transparent transport errors should expose the network cause.");

		assert_eq!(source.to_string(), "reset");
	}

	#[test]
	fn network_and_decode_messages_carry_the_cause() {
		#[derive(Debug, Deserialize)]
		struct Document {
			#[allow(dead_code)]
			feature: Feature,
		}
		#[derive(Debug, Deserialize)]
		struct Feature {
			#[allow(dead_code)]
			state: String,
		}

		let network = TransportError::network(std::io::Error::other("connection reset by peer"));

		assert!(network.to_string().contains("connection reset by peer"));

		let mut de = serde_json::Deserializer::from_str(r#"{"feature":{"state":1}}"#);
		let source = serde_path_to_error::deserialize::<_, Document>(&mut de)
			.expect_err("Numeric state should fail to decode.");
		let decode = TransportError::Decode { source };

		assert!(decode.to_string().contains("feature.state"), "Message: {decode}.");
	}
}
