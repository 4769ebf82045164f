//! Static per-method mutation rules.
//!
//! Each [`MethodRule`] states, for one method, what happens on enable and on disable
//! ([`Transition`]), which fields are stripped from a freshly read document, and the
//! [`FieldSetter`] that shapes the outgoing document. The table is immutable and covers the
//! full [`MethodId`] set, so adding a method means adding one entry.

// crates.io
use serde_json::{Value, json};
// self
use crate::{
	_prelude::*,
	auth::{CredentialContext, MethodId, PolicyState},
	policy::{FieldPath, MethodConfig, TapSettings, TargetGroup},
	reconcile::PolicyParams,
};

/// Mutation applied to an in-memory [`MethodConfig`] before it is written.
pub type FieldSetter = fn(&mut MethodConfig, &Mutation<'_>);

/// Inputs available to a [`FieldSetter`].
#[derive(Clone, Copy, Debug)]
pub struct Mutation<'a> {
	/// Desired policy state.
	pub state: PolicyState,
	/// Caller-supplied tuning parameters.
	pub params: &'a PolicyParams,
	/// Resolved Temporary Access Pass settings, present when the transition asked for them.
	pub tap: Option<&'a TapSettings>,
}

/// What the reconciler does for one direction of one method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	/// The transition is refused before any remote call.
	Forbidden {
		/// Human-readable refusal reason.
		reason: &'static str,
	},
	/// No remote call; the transition is only acknowledged and reported.
	Acknowledge,
	/// Build a fresh document and write it without reading first.
	Build {
		/// Identity used for the write.
		context: CredentialContext,
		/// Whether Temporary Access Pass settings must be resolved for the setter.
		tap_settings: bool,
	},
	/// Read the current document, mutate it, and write it back.
	ReadModifyWrite {
		/// Identity used for the read and the write.
		context: CredentialContext,
	},
}
impl Transition {
	/// Returns `true` when the transition issues any remote call.
	pub const fn is_remote(self) -> bool {
		matches!(self, Self::Build { .. } | Self::ReadModifyWrite { .. })
	}

	/// Credential context for remote transitions.
	pub const fn context(self) -> Option<CredentialContext> {
		match self {
			Self::Build { context, .. } | Self::ReadModifyWrite { context } => Some(context),
			Self::Forbidden { .. } | Self::Acknowledge => None,
		}
	}
}

/// Static policy for one authentication method.
#[derive(Clone, Copy)]
pub struct MethodRule {
	/// Method the rule governs.
	pub method: MethodId,
	/// Behavior when the desired state is enabled.
	pub on_enable: Transition,
	/// Behavior when the desired state is disabled.
	pub on_disable: Transition,
	/// Fields stripped from a read document before re-submission.
	pub fields_to_clear: &'static [FieldPath],
	/// Shapes the outgoing document.
	pub setter: FieldSetter,
}
impl MethodRule {
	/// Returns the transition for `state`.
	pub const fn transition(&self, state: PolicyState) -> Transition {
		match state {
			PolicyState::Enabled => self.on_enable,
			PolicyState::Disabled => self.on_disable,
		}
	}

	/// Whether the method may be enabled at all.
	pub const fn allows_enable(&self) -> bool {
		!matches!(self.on_enable, Transition::Forbidden { .. })
	}

	/// Whether reaching `state` requires reading the current document first.
	pub const fn requires_read_before_write(&self, state: PolicyState) -> bool {
		matches!(self.transition(state), Transition::ReadModifyWrite { .. })
	}

	/// Produces the outgoing document: clears the rule's fields, then runs its setter.
	pub fn apply(&self, mut config: MethodConfig, mutation: &Mutation<'_>) -> MethodConfig {
		for path in self.fields_to_clear {
			config.clear(*path);
		}

		(self.setter)(&mut config, mutation);

		config
	}
}
impl Debug for MethodRule {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MethodRule")
			.field("method", &self.method)
			.field("on_enable", &self.on_enable)
			.field("on_disable", &self.on_disable)
			.field("fields_to_clear", &self.fields_to_clear)
			.finish_non_exhaustive()
	}
}

const ENABLE_NOT_PERMITTED: Transition =
	Transition::Forbidden { reason: "enabling this method is not permitted" };
const READ_AS_USER: Transition =
	Transition::ReadModifyWrite { context: CredentialContext::User };

const NUMBER_MATCHING: FieldPath =
	FieldPath::new(&["featureSettings", "numberMatchingRequiredState"]);
const DISPLAY_APP_INFORMATION: FieldPath =
	FieldPath::new(&["featureSettings", "displayAppInformationRequiredState", "state"]);
const DISPLAY_LOCATION_INFORMATION: FieldPath =
	FieldPath::new(&["featureSettings", "displayLocationInformationRequiredState", "state"]);
const SOFTWARE_OATH_ENABLED: FieldPath = FieldPath::new(&["isSoftwareOathEnabled"]);

static RULES: [MethodRule; 9] = [
	MethodRule {
		method: MethodId::Fido2,
		on_enable: Transition::Build { context: CredentialContext::User, tap_settings: false },
		on_disable: Transition::Build { context: CredentialContext::User, tap_settings: false },
		fields_to_clear: &[],
		setter: build_fido2,
	},
	MethodRule {
		method: MethodId::MicrosoftAuthenticator,
		on_enable: READ_AS_USER,
		on_disable: READ_AS_USER,
		fields_to_clear: &[NUMBER_MATCHING],
		setter: set_microsoft_authenticator,
	},
	MethodRule {
		method: MethodId::Sms,
		on_enable: ENABLE_NOT_PERMITTED,
		on_disable: READ_AS_USER,
		fields_to_clear: &[],
		setter: set_state_only,
	},
	MethodRule {
		method: MethodId::TemporaryAccessPass,
		on_enable: Transition::Build {
			context: CredentialContext::Application,
			tap_settings: true,
		},
		on_disable: READ_AS_USER,
		fields_to_clear: &[],
		setter: set_temporary_access_pass,
	},
	MethodRule {
		method: MethodId::HardwareOath,
		on_enable: Transition::Acknowledge,
		on_disable: Transition::Acknowledge,
		fields_to_clear: &[],
		setter: acknowledge_only,
	},
	MethodRule {
		method: MethodId::SoftwareOath,
		on_enable: READ_AS_USER,
		on_disable: READ_AS_USER,
		fields_to_clear: &[],
		setter: set_state_only,
	},
	MethodRule {
		method: MethodId::Voice,
		on_enable: ENABLE_NOT_PERMITTED,
		on_disable: READ_AS_USER,
		fields_to_clear: &[],
		setter: set_state_only,
	},
	MethodRule {
		method: MethodId::Email,
		on_enable: Transition::Acknowledge,
		on_disable: Transition::Acknowledge,
		fields_to_clear: &[],
		setter: acknowledge_only,
	},
	MethodRule {
		method: MethodId::X509Certificate,
		on_enable: Transition::Acknowledge,
		on_disable: Transition::Acknowledge,
		fields_to_clear: &[],
		setter: acknowledge_only,
	},
];

/// Returns the rule for a known method.
pub fn rule(method: MethodId) -> &'static MethodRule {
	// `RULES` is laid out in `MethodId::ALL` order.
	&RULES[method as usize]
}

/// Resolves a caller-supplied identifier; `None` when it names no known method.
pub fn resolve(raw: &str) -> Option<&'static MethodRule> {
	MethodId::lookup(raw).map(rule)
}

fn build_fido2(config: &mut MethodConfig, mutation: &Mutation<'_>) {
	config.set(
		FieldPath::new(&["@odata.type"]),
		"#microsoft.graph.fido2AuthenticationMethodConfiguration",
	);
	config.set(FieldPath::new(&["id"]), "Fido2");
	config.set(FieldPath::new(&["includeTargets"]), all_users_targets());
	config.set(FieldPath::new(&["excludeTargets"]), Value::Array(Vec::new()));
	config.set(FieldPath::new(&["isAttestationEnforced"]), true);
	config.set(FieldPath::new(&["isSelfServiceRegistrationAllowed"]), true);
	config.set(
		FieldPath::new(&["keyRestrictions"]),
		json!({ "aaGuids": [], "enforcementType": "block", "isEnforced": false }),
	);
	config.set_state(mutation.state);
}

fn set_microsoft_authenticator(config: &mut MethodConfig, mutation: &Mutation<'_>) {
	if mutation.state.is_enabled() {
		config.set(DISPLAY_APP_INFORMATION, mutation.state.as_str());
		config.set(DISPLAY_LOCATION_INFORMATION, mutation.state.as_str());

		if let Some(enabled) = mutation.params.microsoft_authenticator_software_oath_enabled {
			config.set(SOFTWARE_OATH_ENABLED, enabled);
		}
	}

	config.set_state(mutation.state);
}

fn set_temporary_access_pass(config: &mut MethodConfig, mutation: &Mutation<'_>) {
	if let (PolicyState::Enabled, Some(tap)) = (mutation.state, mutation.tap) {
		config.set(
			FieldPath::new(&["@odata.type"]),
			"#microsoft.graph.temporaryAccessPassAuthenticationMethodConfiguration",
		);
		config.set(FieldPath::new(&["id"]), "TemporaryAccessPass");
		config.set(FieldPath::new(&["includeTargets"]), all_users_targets());
		config.set(FieldPath::new(&["defaultLength"]), tap.default_length);
		config.set(FieldPath::new(&["defaultLifetimeInMinutes"]), tap.default_lifetime_minutes);
		config.set(FieldPath::new(&["isUsableOnce"]), tap.is_usable_once);
		config.set(FieldPath::new(&["maximumLifetimeInMinutes"]), tap.maximum_lifetime_minutes);
		config.set(FieldPath::new(&["minimumLifetimeInMinutes"]), tap.minimum_lifetime_minutes);
	}

	config.set_state(mutation.state);
}

fn set_state_only(config: &mut MethodConfig, mutation: &Mutation<'_>) {
	config.set_state(mutation.state);
}

// The upstream service exposes no toggle these rules could drive yet.
fn acknowledge_only(_: &mut MethodConfig, _: &Mutation<'_>) {}

fn all_users_targets() -> Value {
	json!([TargetGroup::all_users()])
}
