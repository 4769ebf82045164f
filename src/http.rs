//! Transport primitives for policy-service calls.
//!
//! [`PolicyHttpClient`] is the reconciler's only dependency on an HTTP stack. Requests and
//! responses are plain crate-owned structs so custom transports (and test doubles) never
//! need to speak reqwest types. Implementations report network-level failures as
//! [`TransportError`]; non-success statuses are returned as ordinary responses and
//! classified by the policy client.

// self
use crate::{_prelude::*, auth::BearerToken, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;
#[cfg(feature = "reqwest")]
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;

/// Boxed future returned by [`PolicyHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<PolicyResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of reading and writing method configurations.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many
/// reconcilers, and the returned future must own whatever state it needs.
pub trait PolicyHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` and returns the raw response, whatever its status.
	fn execute(&self, request: PolicyRequest) -> HttpFuture<'_>;
}

/// HTTP verbs used against the policy service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// Read the current method configuration.
	Get,
	/// Submit a complete method configuration document.
	Patch,
}
impl HttpMethod {
	/// Returns the verb as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Patch => "PATCH",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request prepared by the policy client.
#[derive(Clone, Debug)]
pub struct PolicyRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute resource URL.
	pub url: Url,
	/// Bearer token for the `Authorization` header.
	pub bearer: BearerToken,
	/// JSON body, present for writes.
	pub body: Option<Vec<u8>>,
}

/// Raw response handed back to the policy client.
#[derive(Clone, Debug, Default)]
pub struct PolicyResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl PolicyResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose calls give up after `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl PolicyHttpClient for ReqwestHttpClient {
	fn execute(&self, request: PolicyRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Patch => reqwest::Method::PATCH,
			};
			let authorization =
				request.bearer.header_value().map_err(TransportError::network)?;
			let mut builder = client
				.request(method, request.url)
				.header(AUTHORIZATION, authorization)
				.header(ACCEPT, "application/json");

			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(PolicyResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return i64::try_from(secs).ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("17"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(17)));
	}

	#[test]
	fn retry_after_beyond_i64_is_dropped() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("18446744073709551615"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("9223372036854775807"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(i64::MAX)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}

	#[test]
	fn success_range_covers_no_content() {
		let ack = PolicyResponse { status: 204, ..Default::default() };
		let denied = PolicyResponse { status: 403, ..Default::default() };

		assert!(ack.is_success());
		assert!(!denied.is_success());
	}
}
