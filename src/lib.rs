//! Reconcile a tenant's authentication-method policy against a remote identity-policy service:
//! a static rule per method decides whether a transition is allowed, whether the current
//! document must be read first, and which fields change before the document is written back.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod policy;
pub mod reconcile;
pub mod report;
pub mod settings;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		auth::{CredentialProvider, StaticCredentials},
		config::ReconcilerConfig,
		error::TransportError,
		http::{HttpFuture, PolicyHttpClient, PolicyRequest, PolicyResponse, ReqwestHttpClient},
		reconcile::Reconciler,
		report::RecordingSink,
		settings::{MemorySettingsStore, SettingsResolver},
	};

	/// Bearer token handed out for user-context calls in tests.
	pub const TEST_USER_TOKEN: &str = "user-token";
	/// Bearer token handed out for application-context calls in tests.
	pub const TEST_APP_TOKEN: &str = "app-token";

	/// Reconciler type alias used by reqwest-backed integration tests.
	pub type ReqwestTestReconciler = Reconciler<ReqwestHttpClient>;
	/// Reconciler type alias used by in-process transport tests.
	pub type RecordingTestReconciler = Reconciler<RecordingHttpClient>;

	/// Handles returned alongside a test reconciler.
	#[derive(Clone, Debug)]
	pub struct TestHarness {
		/// Settings store consulted by the reconciler.
		pub settings: Arc<MemorySettingsStore>,
		/// Sink receiving every outcome record.
		pub sink: Arc<RecordingSink>,
	}

	/// In-process transport that records requests and replays scripted responses in order.
	///
	/// Once the script runs out, every request is answered with `204 No Content`.
	#[derive(Clone, Default)]
	pub struct RecordingHttpClient {
		requests: Arc<Mutex<Vec<PolicyRequest>>>,
		script: Arc<Mutex<VecDeque<Result<PolicyResponse, String>>>>,
	}
	impl RecordingHttpClient {
		/// Queues a JSON response.
		pub fn respond_json(self, status: u16, body: serde_json::Value) -> Self {
			let body = body.to_string().into_bytes();

			self.script.lock().push_back(Ok(PolicyResponse { status, retry_after: None, body }));

			self
		}

		/// Queues an empty response with `status`.
		pub fn respond_status(self, status: u16) -> Self {
			self.script.lock().push_back(Ok(PolicyResponse { status, ..Default::default() }));

			self
		}

		/// Queues a network-level failure.
		pub fn fail_network(self, message: impl Into<String>) -> Self {
			self.script.lock().push_back(Err(message.into()));

			self
		}

		/// Returns every request dispatched so far.
		pub fn requests(&self) -> Vec<PolicyRequest> {
			self.requests.lock().clone()
		}

		/// Parses the body of the `index`-th request as JSON.
		pub fn request_json(&self, index: usize) -> Option<serde_json::Value> {
			let requests = self.requests.lock();
			let body = requests.get(index)?.body.as_ref()?;

			serde_json::from_slice(body).ok()
		}
	}
	impl PolicyHttpClient for RecordingHttpClient {
		fn execute(&self, request: PolicyRequest) -> HttpFuture<'_> {
			self.requests.lock().push(request);

			let next = self.script.lock().pop_front();

			Box::pin(async move {
				match next {
					Some(Ok(response)) => Ok(response),
					Some(Err(message)) =>
						Err(TransportError::network(std::io::Error::other(message))),
					None => Ok(PolicyResponse { status: 204, ..Default::default() }),
				}
			})
		}
	}

	/// Credentials that hand out [`TEST_USER_TOKEN`] and [`TEST_APP_TOKEN`].
	pub fn test_credentials() -> Arc<dyn CredentialProvider> {
		Arc::new(
			StaticCredentials::default()
				.with_user_token(TEST_USER_TOKEN)
				.with_application_token(TEST_APP_TOKEN),
		)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a reconciler over `http_client` with an in-memory settings store and a
	/// recording sink.
	pub fn build_test_reconciler<C>(
		base_url: &str,
		http_client: impl Into<Arc<C>>,
	) -> (Reconciler<C>, TestHarness)
	where
		C: PolicyHttpClient,
	{
		let config = ReconcilerConfig::default()
			.with_base_url(base_url)
			.expect("Test base URL should parse.");
		let settings = Arc::new(MemorySettingsStore::default());
		let sink = Arc::new(RecordingSink::default());
		let reconciler = Reconciler::with_http_client(&config, http_client, test_credentials())
			.with_settings(SettingsResolver::new(settings.clone()))
			.with_sink(sink.clone());

		(reconciler, TestHarness { settings, sink })
	}

	/// Constructs a reqwest-backed reconciler pointed at `base_url` (typically an `httpmock`
	/// server).
	pub fn build_reqwest_test_reconciler(base_url: &str) -> (ReqwestTestReconciler, TestHarness) {
		build_test_reconciler(base_url, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
