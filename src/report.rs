//! Outcome Reporter: turns every reconciliation result into a log/audit record.

// self
use crate::{
	_prelude::*,
	auth::TenantId,
	obs::{self, ReconcileOutcome},
	reconcile::{Outcome, ReconciliationResult},
};

/// Operation name attached to every record.
pub const OPERATION_NAME: &str = "Set Authentication Policy";

/// Record severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
	/// The transition succeeded.
	Info,
	/// The transition was rejected or failed.
	Error,
}
impl Severity {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Info => "Info",
			Self::Error => "Error",
		}
	}
}
impl From<Outcome> for Severity {
	fn from(value: Outcome) -> Self {
		match value {
			Outcome::Success => Self::Info,
			Outcome::Failure | Outcome::Rejected => Self::Error,
		}
	}
}

/// Structured record accepted by an [`OutcomeSink`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Tenant the call targeted.
	pub tenant: TenantId,
	/// Always [`OPERATION_NAME`].
	pub operation: String,
	/// Method identifier (canonical when known, raw otherwise).
	pub method: String,
	/// Outcome category.
	pub outcome: Outcome,
	/// Record severity.
	pub severity: Severity,
	/// Human-readable message.
	pub message: String,
}
impl From<&ReconciliationResult> for LogEntry {
	fn from(result: &ReconciliationResult) -> Self {
		Self {
			tenant: result.tenant.clone(),
			operation: OPERATION_NAME.into(),
			method: result.method.clone(),
			outcome: result.outcome,
			severity: result.outcome.into(),
			message: result.detail.clone(),
		}
	}
}

/// Log or audit destination for reconciliation records.
pub trait OutcomeSink
where
	Self: Send + Sync,
{
	/// Accepts one record. Sinks must not panic on delivery problems.
	fn record(&self, entry: &LogEntry);
}

/// Sink that emits records as `tracing` events (no-op without the `tracing` feature).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;
impl OutcomeSink for TracingSink {
	fn record(&self, entry: &LogEntry) {
		#[cfg(feature = "tracing")]
		{
			match entry.severity {
				Severity::Info => tracing::info!(
					tenant = entry.tenant.as_ref(),
					operation = %entry.operation,
					method = %entry.method,
					outcome = entry.outcome.as_str(),
					"{}",
					entry.message
				),
				Severity::Error => tracing::error!(
					tenant = entry.tenant.as_ref(),
					operation = %entry.operation,
					method = %entry.method,
					outcome = entry.outcome.as_str(),
					"{}",
					entry.message
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = entry;
		}
	}
}

/// Sink that keeps records in memory for callers that batch or inspect them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<LogEntry>>>);
impl RecordingSink {
	/// Returns a snapshot of every record received so far.
	pub fn entries(&self) -> Vec<LogEntry> {
		self.0.lock().clone()
	}

	/// Drains and returns the recorded entries.
	pub fn take(&self) -> Vec<LogEntry> {
		std::mem::take(&mut *self.0.lock())
	}
}
impl OutcomeSink for RecordingSink {
	fn record(&self, entry: &LogEntry) {
		self.0.lock().push(entry.clone());
	}
}

/// Fans a result out to the configured sink and the metrics recorder.
#[derive(Clone)]
pub struct OutcomeReporter {
	sink: Arc<dyn OutcomeSink>,
}
impl OutcomeReporter {
	/// Creates a reporter writing to `sink`.
	pub fn new(sink: Arc<dyn OutcomeSink>) -> Self {
		Self { sink }
	}

	/// Records `result`.
	pub fn report(&self, result: &ReconciliationResult) {
		obs::record_reconcile_outcome(
			obs::method_label(&result.method),
			ReconcileOutcome::from(result.outcome),
		);
		self.sink.record(&LogEntry::from(result));
	}
}
impl Default for OutcomeReporter {
	fn default() -> Self {
		Self::new(Arc::new(TracingSink))
	}
}
impl Debug for OutcomeReporter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OutcomeReporter(..)")
	}
}
