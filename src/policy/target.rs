//! The built-in "all users" scoping target.

// self
use crate::_prelude::*;

/// Include/exclude target entry of a method configuration.
///
/// The reconciler only ever targets the built-in all-users group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
	/// Group object identifier.
	pub id: String,
	/// Target kind; always `group` here.
	pub target_type: String,
	/// Whether users in the group must register the method.
	pub is_registration_required: bool,
	/// Human-readable group name.
	pub display_name: String,
}
impl TargetGroup {
	/// Identifier of the built-in all-users group.
	pub const ALL_USERS_ID: &'static str = "all_users";

	/// Returns the all-users target without mandatory registration.
	pub fn all_users() -> Self {
		Self {
			id: Self::ALL_USERS_ID.into(),
			target_type: "group".into(),
			is_registration_required: false,
			display_name: "All users".into(),
		}
	}
}
