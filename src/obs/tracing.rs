// self
use crate::{
	_prelude::*,
	auth::{PolicyState, TenantId},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedReconcile<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedReconcile<F> = F;

/// A span builder used by the orchestrator.
#[derive(Clone, Debug)]
pub struct ReconcileSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ReconcileSpan {
	/// Creates a new span tagged with the tenant, raw method identifier, and desired state.
	pub fn new(tenant: &TenantId, method: &str, state: PolicyState) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"auth_policy.reconcile",
				tenant = tenant.as_ref(),
				method,
				state = state.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (tenant, method, state);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedReconcile<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Notes that a settings level was skipped, so the next fallback applies.
pub fn trace_settings_fallback(key: &str, reason: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(settings_key = key, reason, "settings override unavailable; falling back");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, reason);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let tenant = TenantId::new("contoso.onmicrosoft.com").expect("Tenant should be valid.");
		let span = ReconcileSpan::new(&tenant, "FIDO2", PolicyState::Enabled);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn settings_fallback_trace_is_infallible() {
		trace_settings_fallback("AllTenants", "missing");
	}
}
