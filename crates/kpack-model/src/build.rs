//! The `Build` resource: one execution of an image's build pipeline.
//!
//! Builds are created by the kpack controller, never by the CLI, so the spec
//! here only covers the fields the CLI reads back.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
	condition::{Condition, KpackResource},
	image::SourceConfig,
	references::EnvVar,
};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
	group = "kpack.io",
	version = "v1alpha2",
	kind = "Build",
	plural = "builds",
	namespaced,
	status = "BuildStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub builder: Option<BuildBuilderSpec>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_account_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<SourceConfig>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub env: Vec<EnvVar>,
}

/// Builder image a build ran against, pinned by digest.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildBuilderSpec {
	pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub observed_generation: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub conditions: Vec<Condition>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub build_metadata: Vec<BuildpackMetadata>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_image: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pod_name: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub steps_completed: Vec<String>,
}

/// A buildpack that participated in a build or builder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildpackMetadata {
	pub id: String,
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub homepage: Option<String>,
}

impl KpackResource for Build {
	fn observed_generation(&self) -> Option<i64> {
		self.status.as_ref()?.observed_generation
	}
	fn conditions(&self) -> &[Condition] {
		self.status.as_ref().map_or(&[], |s| &s.conditions)
	}
}

impl Build {
	/// Build ordinal from the well-known annotation, for sorting listings.
	pub fn build_number(&self) -> Option<u64> {
		self.metadata
			.annotations
			.as_ref()?
			.get(crate::BUILD_NUMBER_ANNOTATION)?
			.parse()
			.ok()
	}

	pub fn build_reason(&self) -> Option<&str> {
		self.metadata
			.annotations
			.as_ref()?
			.get(crate::BUILD_REASON_ANNOTATION)
			.map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_number_parses_annotation() {
		let build: Build = serde_json::from_value(serde_json::json!({
			"apiVersion": "kpack.io/v1alpha2",
			"kind": "Build",
			"metadata": {
				"name": "app-build-3",
				"annotations": {"image.kpack.io/buildNumber": "3"},
			},
			"spec": {},
		}))
		.unwrap();
		assert_eq!(build.build_number(), Some(3));
		assert_eq!(build.build_reason(), None);
	}
}
