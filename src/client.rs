//! Remote Policy Client: reads and writes one method configuration resource.
//!
//! Reads return the exact remote document. Writes submit a complete document with PATCH; the
//! remote service leaves fields it does not receive untouched, so callers echo back what they
//! read (minus the fields a rule strips) rather than a diff.

// self
use crate::{
	_prelude::*,
	auth::{CredentialContext, CredentialProvider, MethodId, TenantId},
	config::directory_url,
	error::{ConfigError, TransportError},
	http::{HttpMethod, PolicyHttpClient, PolicyRequest, PolicyResponse},
	policy::MethodConfig,
};

const RESOURCE_PREFIX: &str =
	"policies/authenticationMethodsPolicy/authenticationMethodConfigurations/";
const BODY_PREVIEW_LIMIT: usize = 256;

/// Client for the remote authentication-methods policy resource.
pub struct PolicyClient<C>
where
	C: ?Sized + PolicyHttpClient,
{
	http_client: Arc<C>,
	credentials: Arc<dyn CredentialProvider>,
	base_url: Url,
}
impl<C> PolicyClient<C>
where
	C: ?Sized + PolicyHttpClient,
{
	/// Creates a client rooted at `base_url`; a missing trailing slash is added.
	pub fn new(
		base_url: Url,
		http_client: impl Into<Arc<C>>,
		credentials: Arc<dyn CredentialProvider>,
	) -> Self {
		Self { http_client: http_client.into(), credentials, base_url: directory_url(base_url) }
	}

	/// Absolute URL of the configuration resource for `method`.
	pub fn resource_url(&self, method: MethodId) -> Result<Url, ConfigError> {
		self.base_url
			.join(RESOURCE_PREFIX)
			.and_then(|prefix| prefix.join(method.as_str()))
			.map_err(|source| ConfigError::InvalidBaseUrl { source })
	}

	/// Fetches the current configuration of `method` for `tenant`.
	pub async fn read(
		&self,
		tenant: &TenantId,
		method: MethodId,
		context: CredentialContext,
	) -> Result<MethodConfig> {
		let response = self.send(tenant, method, HttpMethod::Get, None, context).await?;

		Ok(MethodConfig::from_slice(&response.body)?)
	}

	/// Submits `config` as the complete configuration of `method` for `tenant`.
	pub async fn write(
		&self,
		tenant: &TenantId,
		method: MethodId,
		config: &MethodConfig,
		context: CredentialContext,
	) -> Result<()> {
		let body = config.to_vec()?;

		self.send(tenant, method, HttpMethod::Patch, Some(body), context).await?;

		Ok(())
	}

	async fn send(
		&self,
		tenant: &TenantId,
		method: MethodId,
		verb: HttpMethod,
		body: Option<Vec<u8>>,
		context: CredentialContext,
	) -> Result<PolicyResponse> {
		let url = self.resource_url(method)?;
		let bearer = self.credentials.bearer_token(tenant, context).await?;
		let request = PolicyRequest { method: verb, url, bearer, body };
		let response = self.http_client.execute(request).await?;

		if response.is_success() { Ok(response) } else { Err(status_error(response).into()) }
	}
}
impl<C> Clone for PolicyClient<C>
where
	C: ?Sized + PolicyHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			credentials: self.credentials.clone(),
			base_url: self.base_url.clone(),
		}
	}
}
impl<C> Debug for PolicyClient<C>
where
	C: ?Sized + PolicyHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PolicyClient").field("base_url", &self.base_url.as_str()).finish()
	}
}

/// OData error envelope returned by the policy service.
#[derive(Debug, Deserialize)]
struct ODataError {
	error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
	code: Option<String>,
	message: Option<String>,
}

fn status_error(response: PolicyResponse) -> TransportError {
	let PolicyResponse { status, retry_after, body } = response;
	let (code, message) = match serde_json::from_slice::<ODataError>(&body) {
		Ok(ODataError { error }) => (error.code, error.message),
		Err(_) => (None, None),
	};
	let message = message.unwrap_or_else(|| body_preview(&body, status));

	TransportError::Status { status, code, message, retry_after }
}

fn body_preview(body: &[u8], status: u16) -> String {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return format!("empty response body (HTTP {status})");
	}

	trimmed.chars().take(BODY_PREVIEW_LIMIT).collect()
}
