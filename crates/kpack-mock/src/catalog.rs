//! Static resource catalog used to derive API paths for seeded manifests.
//!
//! The CLI only talks to typed endpoints, so the mock does not serve API
//! discovery; it just needs to know the plural name and scope of every kind a
//! test might seed.

/// The kinds the mock server knows how to route.
pub struct ResourceCatalog {
	entries: Vec<CatalogEntry>,
}

/// One kind: its group/version, plural path segment and scope.
pub struct CatalogEntry {
	/// Empty for the core group.
	pub api_version: String,
	pub kind: String,
	pub plural: String,
	pub namespaced: bool,
}

impl CatalogEntry {
	fn namespaced(api_version: &str, kind: &str, plural: &str) -> Self {
		Self {
			api_version: api_version.to_string(),
			kind: kind.to_string(),
			plural: plural.to_string(),
			namespaced: true,
		}
	}

	fn cluster_scoped(api_version: &str, kind: &str, plural: &str) -> Self {
		Self {
			namespaced: false,
			..Self::namespaced(api_version, kind, plural)
		}
	}
}

impl Default for ResourceCatalog {
	fn default() -> Self {
		Self {
			entries: vec![
				CatalogEntry::namespaced("v1", "ConfigMap", "configmaps"),
				CatalogEntry::namespaced("v1", "Secret", "secrets"),
				CatalogEntry::namespaced("v1", "ServiceAccount", "serviceaccounts"),
				CatalogEntry::cluster_scoped("v1", "Namespace", "namespaces"),
				CatalogEntry::namespaced("kpack.io/v1alpha2", "Image", "images"),
				CatalogEntry::namespaced("kpack.io/v1alpha2", "Build", "builds"),
				CatalogEntry::namespaced("kpack.io/v1alpha2", "Builder", "builders"),
				CatalogEntry::namespaced("kpack.io/v1alpha2", "Buildpack", "buildpacks"),
				CatalogEntry::cluster_scoped("kpack.io/v1alpha2", "ClusterBuilder", "clusterbuilders"),
				CatalogEntry::cluster_scoped(
					"kpack.io/v1alpha2",
					"ClusterBuildpack",
					"clusterbuildpacks",
				),
				CatalogEntry::cluster_scoped("kpack.io/v1alpha2", "ClusterStack", "clusterstacks"),
				CatalogEntry::cluster_scoped("kpack.io/v1alpha2", "ClusterStore", "clusterstores"),
			],
		}
	}
}

impl ResourceCatalog {
	/// Every plural path segment the catalog knows.
	pub fn plurals(&self) -> std::collections::HashSet<String> {
		self.entries.iter().map(|e| e.plural.clone()).collect()
	}

	/// Derive `(collection path, name)` for a manifest, e.g.
	/// `/apis/kpack.io/v1alpha2/namespaces/default/images` + `my-image`.
	pub fn api_path_for(&self, manifest: &serde_json::Value) -> Option<(String, String)> {
		let api_version = manifest.get("apiVersion")?.as_str()?;
		let kind = manifest.get("kind")?.as_str()?;
		let name = manifest.get("metadata")?.get("name")?.as_str()?.to_string();
		let namespace = manifest
			.get("metadata")
			.and_then(|m| m.get("namespace"))
			.and_then(|n| n.as_str())
			.unwrap_or("default");

		let entry = self
			.entries
			.iter()
			.find(|e| e.api_version == api_version && e.kind == kind)?;

		let prefix = if api_version.contains('/') {
			format!("/apis/{api_version}")
		} else {
			format!("/api/{api_version}")
		};
		let path = if entry.namespaced {
			format!("{prefix}/namespaces/{namespace}/{}", entry.plural)
		} else {
			format!("{prefix}/{}", entry.plural)
		};

		Some((path, name))
	}
}
