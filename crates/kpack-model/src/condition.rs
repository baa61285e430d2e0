//! Knative-style status conditions shared by every kpack resource.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type reported once a resource has been fully reconciled.
pub const CONDITION_READY: &str = "Ready";

/// A single entry of a resource's `status.conditions`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
	#[serde(rename = "type")]
	pub type_: String,
	pub status: ConditionStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub severity: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_transition_time: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Condition {
	pub fn ready(status: ConditionStatus) -> Self {
		Self {
			type_: CONDITION_READY.into(),
			status,
			severity: None,
			last_transition_time: None,
			reason: None,
			message: None,
		}
	}
}

/// Tri-state condition status as serialized by the API server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
	True,
	False,
	#[serde(other)]
	Unknown,
}

impl fmt::Display for ConditionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::True => "True",
			Self::False => "False",
			Self::Unknown => "Unknown",
		})
	}
}

/// Uniform access to the status duck carried by every kpack resource.
///
/// `observed_generation` and `conditions` come straight from the resource
/// status; everything else is derived. A resource with no status yet reports
/// an empty condition list.
pub trait KpackResource {
	fn observed_generation(&self) -> Option<i64>;
	fn conditions(&self) -> &[Condition];

	fn condition(&self, type_: &str) -> Option<&Condition> {
		self.conditions().iter().find(|c| c.type_ == type_)
	}

	fn ready_condition(&self) -> Option<&Condition> {
		self.condition(CONDITION_READY)
	}

	/// Ready column text: the ready condition status, or `Unknown` before the
	/// controller has reported anything.
	fn ready_text(&self) -> &'static str {
		match self.ready_condition().map(|c| c.status) {
			Some(ConditionStatus::True) => "True",
			Some(ConditionStatus::False) => "False",
			_ => "Unknown",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Fake(Vec<Condition>);
	impl KpackResource for Fake {
		fn observed_generation(&self) -> Option<i64> {
			None
		}
		fn conditions(&self) -> &[Condition] {
			&self.0
		}
	}

	#[test]
	fn unknown_status_variants_deserialize() {
		let c: Condition =
			serde_json::from_value(serde_json::json!({"type": "Ready", "status": "Maybe"}))
				.unwrap();
		assert_eq!(c.status, ConditionStatus::Unknown);
	}

	#[test]
	fn ready_lookup_ignores_other_conditions() {
		let fake = Fake(vec![
			Condition {
				type_: "BuilderReady".into(),
				status: ConditionStatus::False,
				severity: None,
				last_transition_time: None,
				reason: None,
				message: None,
			},
			Condition::ready(ConditionStatus::True),
		]);
		assert_eq!(fake.ready_text(), "True");
	}

	#[test]
	fn missing_status_reports_unknown() {
		assert_eq!(Fake(vec![]).ready_text(), "Unknown");
	}
}
