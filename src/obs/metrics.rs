// self
use crate::obs::ReconcileOutcome;

/// Records a reconciliation outcome via the global metrics recorder (when enabled).
pub fn record_reconcile_outcome(method: &'static str, outcome: ReconcileOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"auth_policy_reconcile_total",
			"method" => method,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome);
	}
}
