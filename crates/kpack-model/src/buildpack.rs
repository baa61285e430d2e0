//! `Buildpack` and `ClusterBuildpack`: a single buildpackage made available
//! to builders without going through a store.

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
	kind = "Buildpack",
	plural = "buildpacks",
	namespaced,
	status = "BuildpackStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BuildpackSpec {
	/// Digested buildpackage reference.
	pub image: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account_name: Option<String>,
}

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "ClusterBuildpack",
	plural = "clusterbuildpacks",
	status = "BuildpackStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBuildpackSpec {
	pub image: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account_ref: Option<ServiceAccountRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildpackStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub observed_generation: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub conditions: Vec<Condition>,
	/// Buildpacks discovered inside the buildpackage.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub buildpacks: Vec<ResolvedBuildpack>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuildpack {
	pub id: String,
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub homepage: Option<String>,
}

impl KpackResource for Buildpack {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}

impl KpackResource for ClusterBuildpack {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}
