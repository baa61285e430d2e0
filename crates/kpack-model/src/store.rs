//! `ClusterStore`: the pool of buildpackages builders draw from.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
	condition::{Condition, KpackResource},
	references::ServiceAccountRef,
};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "ClusterStore",
	plural = "clusterstores",
	status = "ClusterStoreStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStoreSpec {
	/// Digested buildpackage references backing the store.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub sources: Vec<StoreImage>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account_ref: Option<ServiceAccountRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreImage {
	pub image: String,
}

impl StoreImage {
	pub fn new(image: impl Into<String>) -> Self {
		Self {
			image: image.into(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStoreStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub observed_generation: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub conditions: Vec<Condition>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub buildpacks: Vec<Buildpackage>,
}

/// A buildpack the controller extracted from one of the store sources.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Buildpackage {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub homepage: Option<String>,
}

impl KpackResource for ClusterStore {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}
