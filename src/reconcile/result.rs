//! Per-call reconciliation outcome.

// self
use crate::{
	_prelude::*,
	auth::{PolicyState, TenantId},
};

/// Outcome category of one reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
	/// The transition was written, or acknowledged for methods without a remote toggle.
	Success,
	/// The remote service or credential resolution failed.
	Failure,
	/// The reconciler refused to try (unknown method, forbidden transition, bad settings).
	Rejected,
}
impl Outcome {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Failure => "failure",
			Self::Rejected => "rejected",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Structured result handed back to the caller and to the outcome reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
	/// Method identifier (canonical when known, raw otherwise).
	pub method: String,
	/// Tenant the call targeted.
	pub tenant: TenantId,
	/// State the caller asked for.
	pub desired_state: PolicyState,
	/// Outcome category.
	pub outcome: Outcome,
	/// Human-readable detail; carries the underlying error message on failure.
	pub detail: String,
	/// When the outcome was determined.
	#[serde(with = "time::serde::rfc3339")]
	pub recorded_at: OffsetDateTime,
}
impl ReconciliationResult {
	pub(crate) fn new(
		tenant: &TenantId,
		method: impl Into<String>,
		desired_state: PolicyState,
		outcome: Outcome,
		detail: impl Into<String>,
	) -> Self {
		Self {
			method: method.into(),
			tenant: tenant.clone(),
			desired_state,
			outcome,
			detail: detail.into(),
			recorded_at: OffsetDateTime::now_utc(),
		}
	}

	/// Returns `true` for [`Outcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self.outcome, Outcome::Success)
	}
}
