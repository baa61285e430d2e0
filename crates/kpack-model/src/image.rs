//! The `Image` resource: a continuously rebuilt application image.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
	condition::{Condition, KpackResource},
	references::{EnvVar, TypedReference},
};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "Image",
	plural = "images",
	namespaced,
	status = "ImageStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
	/// Registry tag the built image is written to.
	pub tag: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub additional_tags: Vec<String>,
	/// Builder or ClusterBuilder providing the buildpacks and stack.
	pub builder: TypedReference,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account_name: Option<String>,
	pub source: SourceConfig,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub build: Option<ImageBuild>,
}

/// Exactly one of `git`, `blob` or `registry` is set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub git: Option<Git>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub blob: Option<Blob>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registry: Option<Registry>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sub_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Git {
	pub url: String,
	pub revision: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
	pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
	pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageBuild {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub observed_generation: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub conditions: Vec<Condition>,
	/// Fully qualified digested reference of the most recent successful build.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_image: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_build_ref: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_build_reason: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub build_counter: Option<i64>,
}

impl KpackResource for Image {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}

impl SourceConfig {
	pub fn git(url: impl Into<String>, revision: impl Into<String>) -> Self {
		Self {
			git: Some(Git {
				url: url.into(),
				revision: revision.into(),
			}),
			..Self::default()
		}
	}

	pub fn blob(url: impl Into<String>) -> Self {
		Self {
			blob: Some(Blob { url: url.into() }),
			..Self::default()
		}
	}

	pub fn registry(image: impl Into<String>) -> Self {
		Self {
			registry: Some(Registry {
				image: image.into(),
			}),
			..Self::default()
		}
	}
}
