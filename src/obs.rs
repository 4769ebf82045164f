//! Optional observability helpers for reconciliation calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `auth_policy.reconcile` with the `tenant`,
//!   `method`, and `state` fields, plus debug events when settings lookups fall through.
//! - Enable `metrics` to increment the `auth_policy_reconcile_total` counter for every
//!   attempt/success/failure/rejection, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, auth::MethodId, reconcile::Outcome};

/// Metric label recorded for identifiers outside the method set.
pub const UNKNOWN_METHOD_LABEL: &str = "unknown";

/// Maps a caller-supplied method identifier onto the bounded metric label set.
pub fn method_label(raw: &str) -> &'static str {
	MethodId::lookup(raw).map_or(UNKNOWN_METHOD_LABEL, MethodId::as_str)
}

/// Outcome labels recorded for each reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReconcileOutcome {
	/// Entry to the orchestrator.
	Attempt,
	/// The transition was written or acknowledged.
	Success,
	/// The remote service (or credential resolution) failed.
	Failure,
	/// The reconciler refused to try.
	Rejected,
}
impl ReconcileOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ReconcileOutcome::Attempt => "attempt",
			ReconcileOutcome::Success => "success",
			ReconcileOutcome::Failure => "failure",
			ReconcileOutcome::Rejected => "rejected",
		}
	}
}
impl Display for ReconcileOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<Outcome> for ReconcileOutcome {
	fn from(value: Outcome) -> Self {
		match value {
			Outcome::Success => Self::Success,
			Outcome::Failure => Self::Failure,
			Outcome::Rejected => Self::Rejected,
		}
	}
}
