//! Wire representation of one method's policy configuration.
//!
//! The remote service treats writes as a full-document replace, so the reconciler has to echo
//! back everything it read. [`MethodConfig`] therefore keeps the raw JSON object and only
//! exposes typed access to the handful of fields the rule table touches.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::PolicyState, error::TransportError};

/// Dotted path to a (possibly nested) field of a [`MethodConfig`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath(&'static [&'static str]);
impl FieldPath {
	/// Top-level `state` field.
	pub const STATE: Self = Self::new(&["state"]);

	/// Creates a path from its segments, outermost first.
	pub const fn new(segments: &'static [&'static str]) -> Self {
		Self(segments)
	}

	/// Returns the path segments, outermost first.
	pub const fn segments(self) -> &'static [&'static str] {
		self.0
	}
}
impl Debug for FieldPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "FieldPath({self})")
	}
}
impl Display for FieldPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.join("."))
	}
}

/// Method configuration document exchanged with the remote policy service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodConfig(Map<String, Value>);
impl MethodConfig {
	/// Creates an empty document, used when a rule builds its configuration from scratch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a response body, reporting the offending path on failure.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, TransportError> {
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| TransportError::Decode { source })
	}

	/// Serializes the document for a write.
	pub fn to_vec(&self) -> Result<Vec<u8>, TransportError> {
		serde_json::to_vec(&self.0).map_err(TransportError::Encode)
	}

	/// Borrows the underlying JSON object.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the document, returning the underlying JSON object.
	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}

	/// Returns the top-level policy state, if present and recognized.
	pub fn state(&self) -> Option<PolicyState> {
		self.get(FieldPath::STATE).and_then(Value::as_str).and_then(PolicyState::from_wire)
	}

	/// Overwrites the top-level policy state.
	pub fn set_state(&mut self, state: PolicyState) {
		self.set(FieldPath::STATE, state.as_str());
	}

	/// Looks up the value at `path`.
	pub fn get(&self, path: FieldPath) -> Option<&Value> {
		let (last, parents) = path.segments().split_last()?;
		let mut cursor = &self.0;

		for segment in parents {
			cursor = cursor.get(*segment)?.as_object()?;
		}

		cursor.get(*last)
	}

	/// Writes `value` at `path`, creating (or replacing non-object) intermediate objects.
	pub fn set(&mut self, path: FieldPath, value: impl Into<Value>) {
		let Some((last, parents)) = path.segments().split_last() else {
			return;
		};
		let mut cursor = &mut self.0;

		for segment in parents {
			let slot = cursor.entry(*segment).or_insert_with(|| Value::Object(Map::new()));

			if !slot.is_object() {
				*slot = Value::Object(Map::new());
			}

			let Some(next) = slot.as_object_mut() else {
				return;
			};

			cursor = next;
		}

		cursor.insert((*last).to_owned(), value.into());
	}

	/// Removes the value at `path`, returning it when it existed.
	pub fn clear(&mut self, path: FieldPath) -> Option<Value> {
		let (last, parents) = path.segments().split_last()?;
		let mut cursor = &mut self.0;

		for segment in parents {
			cursor = cursor.get_mut(*segment)?.as_object_mut()?;
		}

		cursor.remove(*last)
	}
}
impl From<Map<String, Value>> for MethodConfig {
	fn from(value: Map<String, Value>) -> Self {
		Self(value)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	const NUMBER_MATCHING: FieldPath =
		FieldPath::new(&["featureSettings", "numberMatchingRequiredState"]);
	const APP_INFO_STATE: FieldPath =
		FieldPath::new(&["featureSettings", "displayAppInformationRequiredState", "state"]);

	fn authenticator_document() -> MethodConfig {
		let value = json!({
			"id": "MicrosoftAuthenticator",
			"state": "disabled",
			"featureSettings": {
				"numberMatchingRequiredState": { "state": "default" },
				"displayAppInformationRequiredState": { "state": "default" }
			}
		});

		serde_json::from_value(value).expect("Fixture should deserialize into a MethodConfig.")
	}

	#[test]
	fn state_accessors_read_and_write_the_top_level_field() {
		let mut doc = authenticator_document();

		assert_eq!(doc.state(), Some(PolicyState::Disabled));

		doc.set_state(PolicyState::Enabled);

		assert_eq!(doc.get(FieldPath::STATE), Some(&json!("enabled")));
		assert_eq!(MethodConfig::new().state(), None);
	}

	#[test]
	fn nested_paths_can_be_set_and_cleared() {
		let mut doc = authenticator_document();

		assert_eq!(doc.clear(NUMBER_MATCHING), Some(json!({ "state": "default" })));
		assert_eq!(doc.clear(NUMBER_MATCHING), None);

		doc.set(APP_INFO_STATE, "enabled");

		assert_eq!(doc.get(APP_INFO_STATE), Some(&json!("enabled")));
	}

	#[test]
	fn set_creates_missing_and_replaces_scalar_parents() {
		let mut doc = MethodConfig::from(Map::new());

		doc.set(APP_INFO_STATE, "disabled");

		assert_eq!(
			serde_json::to_value(&doc).expect("Document should serialize."),
			json!({
				"featureSettings": { "displayAppInformationRequiredState": { "state": "disabled" } }
			})
		);

		doc.set(FieldPath::new(&["featureSettings"]), "flat");
		doc.set(APP_INFO_STATE, "enabled");

		assert_eq!(doc.get(APP_INFO_STATE), Some(&json!("enabled")));
	}

	#[test]
	fn from_slice_rejects_non_objects_with_path_context() {
		let err = MethodConfig::from_slice(b"[1, 2]")
			.expect_err("Arrays are not method configurations.");

		assert!(matches!(err, TransportError::Decode { .. }));

		let doc = MethodConfig::from_slice(br#"{"state":"enabled","@odata.context":"x"}"#)
			.expect("Objects should parse.");

		assert_eq!(doc.as_map().len(), 2);
	}
}
