//! Reconciliation Orchestrator.
//!
//! [`Reconciler::reconcile`] drives one method: it resolves the rule, refuses forbidden
//! transitions before touching the network, reads the current document when the rule needs
//! it, applies the rule's mutation, writes the result, and reports the outcome. Every error is
//! folded into the returned [`ReconciliationResult`]; nothing propagates to the caller, so a
//! failing method never aborts the others in a batch.

pub mod params;
pub mod result;

pub use params::*;
pub use result::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialProvider, MethodId, PolicyState, TenantId},
	client::PolicyClient,
	config::{ReconcilerConfig, TapDefaults},
	http::PolicyHttpClient,
	obs::{self, ReconcileOutcome, ReconcileSpan},
	policy::{self, MethodConfig, MethodRule, Mutation, TapSettings, Transition},
	report::{OutcomeReporter, OutcomeSink},
	settings::SettingsResolver,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Reconciler specialized for the crate's default reqwest transport.
pub type ReqwestReconciler = Reconciler<ReqwestHttpClient>;

/// Reconciles authentication-method policy for tenants against the remote policy service.
///
/// The reconciler holds no per-call state: the rule table is static, the client and settings
/// resolver are shared read-only, and each call owns the document it reads for the duration
/// of that call.
pub struct Reconciler<C>
where
	C: ?Sized + PolicyHttpClient,
{
	/// Remote policy client.
	pub client: PolicyClient<C>,
	/// Resolver for per-tenant settings overrides.
	pub settings: SettingsResolver,
	/// Destination for outcome records.
	pub reporter: OutcomeReporter,
	/// Temporary Access Pass defaults for unset parameters.
	pub tap_defaults: TapDefaults,
}
impl<C> Reconciler<C>
where
	C: ?Sized + PolicyHttpClient,
{
	/// Creates a reconciler that reuses the caller-provided transport.
	pub fn with_http_client(
		config: &ReconcilerConfig,
		http_client: impl Into<Arc<C>>,
		credentials: Arc<dyn CredentialProvider>,
	) -> Self {
		Self {
			client: PolicyClient::new(config.base_url.clone(), http_client, credentials),
			settings: SettingsResolver::without_store()
				.with_default_usable_once(config.tap.is_usable_once),
			reporter: OutcomeReporter::default(),
			tap_defaults: config.tap,
		}
	}

	/// Replaces the settings resolver.
	pub fn with_settings(mut self, settings: SettingsResolver) -> Self {
		self.settings = settings;

		self
	}

	/// Sends outcome records to `sink` instead of the default tracing sink.
	pub fn with_sink(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
		self.reporter = OutcomeReporter::new(sink);

		self
	}

	/// Public entry point: sets `method` to the desired state for `tenant`.
	pub async fn set_authentication_policy(
		&self,
		tenant: &TenantId,
		method: &str,
		desired_enabled: bool,
		params: PolicyParams,
	) -> ReconciliationResult {
		self.reconcile(tenant, method, desired_enabled, &params).await
	}

	/// Reconciles one method and reports the outcome.
	pub async fn reconcile(
		&self,
		tenant: &TenantId,
		method: &str,
		desired_enabled: bool,
		params: &PolicyParams,
	) -> ReconciliationResult {
		let state = PolicyState::from(desired_enabled);
		let span = ReconcileSpan::new(tenant, method, state);
		let rule = policy::resolve(method);
		let label =
			rule.map_or_else(|| method.to_owned(), |rule| rule.method.as_str().to_owned());

		obs::record_reconcile_outcome(
			rule.map_or(obs::UNKNOWN_METHOD_LABEL, |rule| rule.method.as_str()),
			ReconcileOutcome::Attempt,
		);

		span.instrument(async {
			let outcome = match rule {
				Some(rule) => self.drive(tenant, rule, state, params).await,
				None => Err(Error::UnknownMethod { method: method.to_owned() }),
			};
			let result = match outcome {
				Ok(detail) =>
					ReconciliationResult::new(tenant, &label, state, Outcome::Success, detail),
				Err(e) if e.is_rejection() => ReconciliationResult::new(
					tenant,
					&label,
					state,
					Outcome::Rejected,
					format!("Refused to set {label} to {state}: {e}"),
				),
				Err(e) => ReconciliationResult::new(
					tenant,
					&label,
					state,
					Outcome::Failure,
					format!("Failed to set {label} to {state}: {e}"),
				),
			};

			// Sink events must fire inside the reconcile span.
			self.reporter.report(&result);

			result
		})
		.await
	}

	/// Reconciles each request in order, returning one independent result per request.
	pub async fn reconcile_many<I>(
		&self,
		tenant: &TenantId,
		requests: I,
	) -> Vec<ReconciliationResult>
	where
		I: IntoIterator<Item = MethodRequest>,
	{
		let mut results = Vec::new();

		for request in requests {
			results.push(
				self.reconcile(tenant, &request.method, request.desired_enabled, &request.params)
					.await,
			);
		}

		results
	}

	async fn drive(
		&self,
		tenant: &TenantId,
		rule: &MethodRule,
		state: PolicyState,
		params: &PolicyParams,
	) -> Result<String> {
		let method = rule.method;

		match rule.transition(state) {
			Transition::Forbidden { reason } =>
				Err(Error::PolicyRejection { method: method.as_str(), reason }),
			Transition::Acknowledge => Ok(format!(
				"{method} support set to {state}; the policy service exposes no toggle for it, \
				 so nothing was written"
			)),
			Transition::Build { context, tap_settings } => {
				let tap = if tap_settings {
					Some(self.resolve_tap_settings(tenant, params).await?)
				} else {
					None
				};
				let mutation = Mutation { state, params, tap: tap.as_ref() };
				let document = rule.apply(MethodConfig::new(), &mutation);

				self.client.write(tenant, method, &document, context).await?;

				Ok(format!("{method} support set to {state}"))
			},
			Transition::ReadModifyWrite { context } => {
				let current = self.client.read(tenant, method, context).await?;
				let mutation = Mutation { state, params, tap: None };
				let document = rule.apply(current, &mutation);

				self.client.write(tenant, method, &document, context).await?;

				Ok(format!("{method} support set to {state}"))
			},
		}
	}

	async fn resolve_tap_settings(
		&self,
		tenant: &TenantId,
		params: &PolicyParams,
	) -> Result<TapSettings> {
		// Bounds are checked before the settings store is consulted.
		params.tap_settings(&self.tap_defaults, true).validate()?;

		let usable_once = self.settings.resolve_tap_usable_once(tenant).await;

		Ok(params.tap_settings(&self.tap_defaults, usable_once))
	}
}
#[cfg(feature = "reqwest")]
impl Reconciler<ReqwestHttpClient> {
	/// Creates a reconciler that provisions its own reqwest transport from `config`.
	pub fn new(
		config: &ReconcilerConfig,
		credentials: Arc<dyn CredentialProvider>,
	) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::with_timeout(config.timeout())?;

		Ok(Self::with_http_client(config, http_client, credentials))
	}
}
impl<C> Debug for Reconciler<C>
where
	C: ?Sized + PolicyHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Reconciler")
			.field("client", &self.client)
			.field("settings", &self.settings)
			.field("tap_defaults", &self.tap_defaults)
			.finish()
	}
}

/// Returns every method identifier the reconciler understands, in table order.
pub fn supported_methods() -> impl Iterator<Item = &'static str> {
	MethodId::ALL.into_iter().map(MethodId::as_str)
}
