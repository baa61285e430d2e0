//! `Builder` and `ClusterBuilder`: composed buildpack order on a stack.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
	build::BuildpackMetadata,
	condition::{Condition, KpackResource},
	references::{ServiceAccountRef, TypedReference},
};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "Builder",
	plural = "builders",
	namespaced,
	status = "BuilderStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BuilderSpec {
	/// Registry tag the composed builder image is written to.
	pub tag: String,
	pub stack: TypedReference,
	pub store: TypedReference,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub order: Vec<OrderEntry>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account: Option<String>,
}

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "ClusterBuilder",
	plural = "clusterbuilders",
	status = "BuilderStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBuilderSpec {
	pub tag: String,
	pub stack: TypedReference,
	pub store: TypedReference,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub order: Vec<OrderEntry>,
	/// Service account holding the credentials used to push the builder.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account_ref: Option<ServiceAccountRef>,
}

/// One detection group of a builder order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
	pub group: Vec<BuildpackRef>,
}

impl OrderEntry {
	pub fn single(id: impl Into<String>) -> Self {
		Self {
			group: vec![BuildpackRef {
				id: id.into(),
				version: None,
				optional: None,
			}],
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildpackRef {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub optional: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuilderStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub observed_generation: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub conditions: Vec<Condition>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_image: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stack: Option<BuilderStack>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub builder_metadata: Vec<BuildpackMetadata>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub order: Vec<OrderEntry>,
}

/// Stack the builder was last built against.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuilderStack {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub run_image: Option<String>,
}

impl KpackResource for Builder {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}

impl KpackResource for ClusterBuilder {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}
