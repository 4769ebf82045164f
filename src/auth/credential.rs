//! Tenant-scoped credential resolution consumed by the policy client.
//!
//! Session and token acquisition live outside this crate; callers plug their own
//! [`CredentialProvider`] in. Writes normally run as the signed-in operator, but some
//! upstream resources only accept application-level tokens, hence [`CredentialContext`].

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, TenantId},
	error::CredentialError,
};

/// Boxed future returned by [`CredentialProvider::bearer_token`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<BearerToken, CredentialError>> + 'a + Send>>;

/// Identity under which a remote call is issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialContext {
	#[default]
	/// Delegated token of the calling operator.
	User,
	/// Application (app-only) token for the tenant.
	Application,
}
impl CredentialContext {
	/// Returns a stable label suitable for span fields and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Application => "application",
		}
	}
}
impl Display for CredentialContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Resolves bearer tokens for a tenant and credential context.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Returns a token valid for calls against `tenant` in `context`.
	fn bearer_token<'a>(
		&'a self,
		tenant: &'a TenantId,
		context: CredentialContext,
	) -> CredentialFuture<'a>;
}

/// Fixed tokens for each context, useful for scripts and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
	user: Option<BearerToken>,
	application: Option<BearerToken>,
}
impl StaticCredentials {
	/// Uses `token` for user-context calls.
	pub fn with_user_token(mut self, token: impl Into<String>) -> Self {
		self.user = Some(BearerToken::new(token));

		self
	}

	/// Uses `token` for application-context calls.
	pub fn with_application_token(mut self, token: impl Into<String>) -> Self {
		self.application = Some(BearerToken::new(token));

		self
	}
}
impl CredentialProvider for StaticCredentials {
	fn bearer_token<'a>(
		&'a self,
		tenant: &'a TenantId,
		context: CredentialContext,
	) -> CredentialFuture<'a> {
		let token = match context {
			CredentialContext::User => self.user.clone(),
			CredentialContext::Application => self.application.clone(),
		};

		Box::pin(async move {
			token.ok_or_else(|| CredentialError {
				tenant: tenant.to_string(),
				context: context.as_str(),
				message: "no token configured".into(),
			})
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn static_credentials_select_token_by_context() {
		let tenant = TenantId::new("contoso.onmicrosoft.com").expect("Tenant should be valid.");
		let credentials =
			StaticCredentials::default().with_user_token("user-token").with_application_token("a");
		let user = credentials
			.bearer_token(&tenant, CredentialContext::User)
			.await
			.expect("User token should resolve.");
		let app = credentials
			.bearer_token(&tenant, CredentialContext::Application)
			.await
			.expect("Application token should resolve.");

		assert_eq!(user.expose(), "user-token");
		assert_eq!(app.expose(), "a");
	}

	#[tokio::test]
	async fn missing_context_token_is_a_credential_error() {
		let tenant = TenantId::new("contoso.onmicrosoft.com").expect("Tenant should be valid.");
		let credentials = StaticCredentials::default().with_user_token("user-token");
		let err = credentials
			.bearer_token(&tenant, CredentialContext::Application)
			.await
			.expect_err("Application context has no token configured.");

		assert_eq!(err.context, "application");
		assert_eq!(err.tenant, "contoso.onmicrosoft.com");
	}
}
