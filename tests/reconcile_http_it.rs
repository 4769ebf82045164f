// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use auth_policy_reconciler::{
	auth::{StaticCredentials, TenantId},
	config::ReconcilerConfig,
	http::ReqwestHttpClient,
	reconcile::{Outcome, PolicyParams, ReqwestReconciler},
	report::{RecordingSink, Severity},
	settings::{MemorySettingsStore, STANDARDS_CATEGORY, SettingsResolver},
};

const RESOURCE_PATH: &str =
	"/beta/policies/authenticationMethodsPolicy/authenticationMethodConfigurations";

struct Harness {
	reconciler: ReqwestReconciler,
	settings: Arc<MemorySettingsStore>,
	sink: Arc<RecordingSink>,
}

fn build_harness(server: &MockServer) -> Harness {
	let config = ReconcilerConfig::default()
		.with_base_url(&server.url("/beta"))
		.expect("Mock server base URL should parse.");
	let credentials = StaticCredentials::default()
		.with_user_token("delegated-token")
		.with_application_token("application-token");
	let settings = Arc::new(MemorySettingsStore::default());
	let sink = Arc::new(RecordingSink::default());
	let reconciler = ReqwestReconciler::with_http_client(
		&config,
		ReqwestHttpClient::default(),
		Arc::new(credentials),
	)
	.with_settings(SettingsResolver::new(settings.clone()))
	.with_sink(sink.clone());

	Harness { reconciler, settings, sink }
}

fn tenant() -> TenantId {
	TenantId::new("fabrikam.onmicrosoft.com")
		.expect("Tenant identifier should be valid for HTTP reconcile tests.")
}

#[tokio::test]
async fn fido2_enable_patches_the_built_document() {
	let server = MockServer::start_async().await;
	let harness = build_harness(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path(format!("{RESOURCE_PATH}/FIDO2"))
				.header("authorization", "Bearer delegated-token")
				.header("content-type", "application/json")
				.json_body(json!({
					"@odata.type": "#microsoft.graph.fido2AuthenticationMethodConfiguration",
					"id": "Fido2",
					"includeTargets": [{
						"id": "all_users",
						"targetType": "group",
						"isRegistrationRequired": false,
						"displayName": "All users"
					}],
					"excludeTargets": [],
					"isAttestationEnforced": true,
					"isSelfServiceRegistrationAllowed": true,
					"keyRestrictions": {
						"aaGuids": [],
						"enforcementType": "block",
						"isEnforced": false
					},
					"state": "enabled"
				}));
			then.status(204);
		})
		.await;
	let result = harness
		.reconciler
		.set_authentication_policy(&tenant(), "FIDO2", true, PolicyParams::default())
		.await;

	assert_eq!(result.outcome, Outcome::Success, "Unexpected result: {result:?}.");

	mock.assert_calls_async(1).await;

	let entries = harness.sink.take();

	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].severity, Severity::Info);
	assert_eq!(entries[0].operation, "Set Authentication Policy");
}

#[tokio::test]
async fn software_oath_disable_round_trips_the_remote_document() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let harness = build_harness(&server);
	let current = json!({
		"@odata.type": "#microsoft.graph.softwareOathAuthenticationMethodConfiguration",
		"id": "SoftwareOath",
		"state": "enabled",
		"excludeTargets": []
	});
	let mut expected = current.clone();

	expected["state"] = json!("disabled");

	let read = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{RESOURCE_PATH}/softwareOath"))
				.header("authorization", "Bearer delegated-token");
			then.status(200).header("content-type", "application/json").json_body(current);
		})
		.await;
	let write = server
		.mock_async(|when, then| {
			when.method(PATCH).path(format!("{RESOURCE_PATH}/softwareOath")).json_body(expected);
			then.status(204);
		})
		.await;
	let result = harness
		.reconciler
		.set_authentication_policy(&tenant(), "SOFTWAREOATH", false, PolicyParams::default())
		.await;

	assert!(result.is_success(), "Unexpected result: {result:?}.");

	read.assert_calls_async(1).await;
	write.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn temporary_access_pass_uses_the_application_token_and_global_override() {
	let server = MockServer::start_async().await;
	let harness = build_harness(&server);

	harness.settings.insert(
		STANDARDS_CATEGORY,
		TenantId::ALL_TENANTS,
		r#"{"TAP":{"config":"false"}}"#,
	);

	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path(format!("{RESOURCE_PATH}/TemporaryAccessPass"))
				.header("authorization", "Bearer application-token")
				.json_body(json!({
					"@odata.type":
						"#microsoft.graph.temporaryAccessPassAuthenticationMethodConfiguration",
					"id": "TemporaryAccessPass",
					"includeTargets": [{
						"id": "all_users",
						"targetType": "group",
						"isRegistrationRequired": false,
						"displayName": "All users"
					}],
					"defaultLength": 10,
					"defaultLifetimeInMinutes": 60,
					"isUsableOnce": false,
					"maximumLifetimeInMinutes": 240,
					"minimumLifetimeInMinutes": 30,
					"state": "enabled"
				}));
			then.status(200).json_body(json!({}));
		})
		.await;
	let params =
		PolicyParams::default().with_tap_lifetimes(30, 240, 60).with_tap_default_length(10);
	let result = harness
		.reconciler
		.set_authentication_policy(&tenant(), "TemporaryAccessPass", true, params)
		.await;

	assert!(result.is_success(), "Unexpected result: {result:?}.");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn microsoft_authenticator_read_error_surfaces_odata_message() {
	let server = MockServer::start_async().await;
	let harness = build_harness(&server);
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{RESOURCE_PATH}/MicrosoftAuthenticator"));
			then.status(403).header("content-type", "application/json").json_body(json!({
				"error": {
					"code": "Authorization_RequestDenied",
					"message": "Insufficient privileges to complete the operation."
				}
			}));
		})
		.await;
	let write = server
		.mock_async(|when, then| {
			when.method(PATCH).path(format!("{RESOURCE_PATH}/MicrosoftAuthenticator"));
			then.status(204);
		})
		.await;
	let result = harness
		.reconciler
		.set_authentication_policy(
			&tenant(),
			"MicrosoftAuthenticator",
			true,
			PolicyParams::default(),
		)
		.await;

	assert_eq!(result.outcome, Outcome::Failure);
	assert!(result.detail.contains("Insufficient privileges"), "Detail: {}.", result.detail);

	read.assert_calls_async(1).await;
	write.assert_calls_async(0).await;

	assert_eq!(harness.sink.entries()[0].severity, Severity::Error);
}

#[tokio::test]
async fn voice_enable_is_rejected_before_any_request() {
	let server = MockServer::start_async().await;
	let harness = build_harness(&server);
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{RESOURCE_PATH}/Voice"));
			then.status(200).json_body(json!({ "id": "Voice", "state": "disabled" }));
		})
		.await;
	let write = server
		.mock_async(|when, then| {
			when.method(PATCH).path(format!("{RESOURCE_PATH}/Voice"));
			then.status(204);
		})
		.await;
	let result = harness
		.reconciler
		.set_authentication_policy(&tenant(), "Voice", true, PolicyParams::default())
		.await;

	assert_eq!(result.outcome, Outcome::Rejected);

	read.assert_calls_async(0).await;
	write.assert_calls_async(0).await;
}
