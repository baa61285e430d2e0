//! Build-service settings stored in the kpack namespace.
//!
//! kp keeps its cluster-level defaults in the `kp-config` ConfigMap: the
//! default repository builder images are written to, and the service account
//! cluster-scoped resources use for registry credentials.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
	api::{Api, Patch, PatchParams, PostParams},
	core::ObjectMeta,
	Client,
};
use kpack_model::ServiceAccountRef;
use thiserror::Error;

/// Namespace the kpack controller and its configuration live in.
pub const KPACK_NAMESPACE: &str = "kpack";
/// Name of the settings ConfigMap.
pub const KP_CONFIG_NAME: &str = "kp-config";
/// ConfigMap holding the lifecycle image used by builds.
pub const LIFECYCLE_CONFIG_NAME: &str = "lifecycle-image";
/// Key of the lifecycle image inside [`LIFECYCLE_CONFIG_NAME`].
pub const LIFECYCLE_IMAGE_KEY: &str = "image";

const DEFAULT_REPOSITORY_KEY: &str = "default.repository";
const DEFAULT_SERVICE_ACCOUNT_KEY: &str = "default.serviceaccount";
// Older releases wrote the repository under this key
const LEGACY_REPOSITORY_KEY: &str = "canonical.repository";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error(
		"failed to get default repository: use \"kp config default-repository\" to set it"
	)]
	RepositoryUnset,

	#[error(transparent)]
	Kube(#[from] kube::Error),
}

/// Accessor for the `kp-config` ConfigMap.
pub struct KpConfig {
	api: Api<ConfigMap>,
}

impl KpConfig {
	pub fn new(client: Client) -> Self {
		Self {
			api: Api::namespaced(client, KPACK_NAMESPACE),
		}
	}

	/// Repository builder images are written to. Errors with guidance when
	/// not configured.
	pub async fn default_repository(&self) -> Result<String, ConfigError> {
		let config = self.get().await?;
		let data = config.as_ref().and_then(|c| c.data.as_ref());

		data.and_then(|d| {
			d.get(DEFAULT_REPOSITORY_KEY)
				.or_else(|| d.get(LEGACY_REPOSITORY_KEY))
		})
		.filter(|repo| !repo.is_empty())
		.cloned()
		.ok_or(ConfigError::RepositoryUnset)
	}

	/// Service account referenced by cluster-scoped resources, falling back
	/// to `default` in the kpack namespace.
	pub async fn service_account_ref(&self) -> Result<ServiceAccountRef, ConfigError> {
		let config = self.get().await?;
		let name = config
			.as_ref()
			.and_then(|c| c.data.as_ref())
			.and_then(|d| d.get(DEFAULT_SERVICE_ACCOUNT_KEY))
			.filter(|sa| !sa.is_empty())
			.cloned()
			.unwrap_or_else(|| "default".to_string());

		Ok(ServiceAccountRef {
			name,
			namespace: KPACK_NAMESPACE.to_string(),
		})
	}

	pub async fn set_default_repository(&self, repository: &str) -> Result<(), ConfigError> {
		self.set_key(DEFAULT_REPOSITORY_KEY, repository).await
	}

	pub async fn set_default_service_account(&self, name: &str) -> Result<(), ConfigError> {
		self.set_key(DEFAULT_SERVICE_ACCOUNT_KEY, name).await
	}

	async fn get(&self) -> Result<Option<ConfigMap>, ConfigError> {
		Ok(self.api.get_opt(KP_CONFIG_NAME).await?)
	}

	async fn set_key(&self, key: &str, value: &str) -> Result<(), ConfigError> {
		match self.get().await? {
			Some(_) => {
				let patch = serde_json::json!({"data": {key: value}});
				self.api
					.patch(KP_CONFIG_NAME, &PatchParams::default(), &Patch::Merge(patch))
					.await?;
			}
			None => {
				let config = ConfigMap {
					metadata: ObjectMeta {
						name: Some(KP_CONFIG_NAME.to_string()),
						namespace: Some(KPACK_NAMESPACE.to_string()),
						..ObjectMeta::default()
					},
					data: Some(BTreeMap::from([(key.to_string(), value.to_string())])),
					..ConfigMap::default()
				};
				self.api.create(&PostParams::default(), &config).await?;
			}
		}
		Ok(())
	}
}

/// Tag a cluster builder image is pushed to, derived from the default
/// repository.
pub fn default_builder_tag(repository: &str, name: &str) -> String {
	format!("{repository}:clusterbuilder-{name}")
}

#[cfg(test)]
mod tests {
	use super::default_builder_tag;

	#[test]
	fn builder_tag_appends_name() {
		assert_eq!(
			default_builder_tag("registry.example.com/kpack", "default"),
			"registry.example.com/kpack:clusterbuilder-default"
		);
	}
}
