//! `ClusterStack`: paired build and run base images.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::{Condition, KpackResource};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "ClusterStack",
	plural = "clusterstacks",
	status = "ClusterStackStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStackSpec {
	/// Stack identifier, e.g. `io.buildpacks.stacks.jammy`. The controller
	/// resolves it from the build image when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub build_image: StackImage,
	pub run_image: StackImage,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackImage {
	pub image: String,
}

impl StackImage {
	pub fn new(image: impl Into<String>) -> Self {
		Self {
			image: image.into(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStackStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub observed_generation: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub conditions: Vec<Condition>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub build_image: Option<StackStatusImage>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub run_image: Option<StackStatusImage>,
}

/// Image as resolved by the controller, pinned by digest.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackStatusImage {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_image: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl KpackResource for ClusterStack {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}
