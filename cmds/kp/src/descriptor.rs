//! Dependency descriptor parsing and version migration.
//!
//! Descriptors are versioned YAML documents (`kind: DependencyDescriptor`)
//! listing the cluster-level dependencies to import. Every older version
//! converts to the next one, so parsing dispatches on `apiVersion` and walks
//! the chain up to v1.

use std::collections::HashSet;

use kpack_model::{OrderEntry, ServiceAccountRef};
use serde::Deserialize;
use thiserror::Error;

use crate::reference::{self, ReferenceError};

pub const API_V1ALPHA1: &str = "kp.kpack.io/v1alpha1";
pub const API_V1ALPHA3: &str = "kp.kpack.io/v1alpha3";
pub const API_V1: &str = "kp.kpack.io/v1";
pub const DESCRIPTOR_KIND: &str = "DependencyDescriptor";

#[derive(Debug, Error)]
pub enum DescriptorError {
	#[error("unsupported descriptor api version {0:?}")]
	UnsupportedVersion(String),

	#[error("unexpected descriptor kind {0:?}, expected {DESCRIPTOR_KIND:?}")]
	UnexpectedKind(String),

	#[error(transparent)]
	Parse(#[from] serde_yaml::Error),

	#[error("duplicate {kind} {name:?} in descriptor")]
	DuplicateName { kind: &'static str, name: String },

	#[error("cluster builder {builder:?} references unknown cluster stack {stack:?}")]
	UnknownStack { builder: String, stack: String },

	#[error("cluster builder {builder:?} references unknown cluster store {store:?}")]
	UnknownStore { builder: String, store: String },

	#[error("default cluster stack {0:?} is not defined in the descriptor")]
	UnknownDefaultStack(String),

	#[error("default cluster builder {0:?} is not defined in the descriptor")]
	UnknownDefaultBuilder(String),

	#[error(transparent)]
	Reference(#[from] ReferenceError),
}

/// A plain image reference inside a descriptor.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
	pub image: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSource {
	pub name: String,
	#[serde(default)]
	pub sources: Vec<ImageSource>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackSource {
	pub name: String,
	pub build_image: ImageSource,
	pub run_image: ImageSource,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuilderSource {
	pub name: String,
	pub cluster_stack: String,
	pub cluster_store: String,
	#[serde(default)]
	pub order: Vec<OrderEntry>,
}

/// The current (v1) descriptor. Older versions are converted into this.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
	#[serde(default)]
	pub default_cluster_stack: Option<String>,
	#[serde(default)]
	pub default_cluster_builder: Option<String>,
	#[serde(default)]
	pub cluster_stores: Vec<StoreSource>,
	#[serde(default)]
	pub cluster_stacks: Vec<StackSource>,
	#[serde(default)]
	pub cluster_builders: Vec<BuilderSource>,
	#[serde(default)]
	pub lifecycle: Option<ImageSource>,
	#[serde(default)]
	pub service_account_ref: Option<ServiceAccountRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorV1Alpha3 {
	#[serde(default)]
	default_cluster_stack: Option<String>,
	#[serde(default)]
	default_cluster_builder: Option<String>,
	#[serde(default)]
	cluster_stores: Vec<StoreSource>,
	#[serde(default)]
	cluster_stacks: Vec<StackSource>,
	#[serde(default)]
	cluster_builders: Vec<BuilderSource>,
	#[serde(default)]
	lifecycle: Option<ImageSource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorV1Alpha1 {
	#[serde(default)]
	default_stack: Option<String>,
	#[serde(default)]
	default_cluster_builder: Option<String>,
	#[serde(default)]
	stores: Vec<StoreSource>,
	#[serde(default)]
	stacks: Vec<StackSource>,
	#[serde(default)]
	cluster_builders: Vec<BuilderSourceV1Alpha1>,
}

/// v1alpha1 builders reference a stack only; the store reference was added
/// in v1alpha3.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuilderSourceV1Alpha1 {
	name: String,
	stack: String,
	#[serde(default)]
	order: Vec<OrderEntry>,
}

impl DescriptorV1Alpha1 {
	/// v1alpha1 descriptors predate multiple stores, so converted builders
	/// point at the descriptor's first store.
	fn to_next_version(self) -> DescriptorV1Alpha3 {
		let store_name = self
			.stores
			.first()
			.map(|s| s.name.clone())
			.unwrap_or_default();

		DescriptorV1Alpha3 {
			default_cluster_stack: self.default_stack,
			default_cluster_builder: self.default_cluster_builder,
			cluster_stores: self.stores,
			cluster_stacks: self.stacks,
			cluster_builders: self
				.cluster_builders
				.into_iter()
				.map(|b| BuilderSource {
					name: b.name,
					cluster_stack: b.stack,
					cluster_store: store_name.clone(),
					order: b.order,
				})
				.collect(),
			lifecycle: None,
		}
	}
}

impl DescriptorV1Alpha3 {
	fn to_next_version(self) -> Descriptor {
		Descriptor {
			default_cluster_stack: self.default_cluster_stack,
			default_cluster_builder: self.default_cluster_builder,
			cluster_stores: self.cluster_stores,
			cluster_stacks: self.cluster_stacks,
			cluster_builders: self.cluster_builders,
			lifecycle: self.lifecycle,
			service_account_ref: None,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
	#[serde(default)]
	api_version: String,
	#[serde(default)]
	kind: String,
}

/// Parse a descriptor of any supported version, migrate it to v1 and
/// validate it.
pub fn parse(contents: &str) -> Result<Descriptor, DescriptorError> {
	let header: Header = serde_yaml::from_str(contents)?;
	if header.kind != DESCRIPTOR_KIND {
		return Err(DescriptorError::UnexpectedKind(header.kind));
	}

	let descriptor = match header.api_version.as_str() {
		API_V1ALPHA1 => serde_yaml::from_str::<DescriptorV1Alpha1>(contents)?
			.to_next_version()
			.to_next_version(),
		API_V1ALPHA3 => serde_yaml::from_str::<DescriptorV1Alpha3>(contents)?.to_next_version(),
		API_V1 => serde_yaml::from_str::<Descriptor>(contents)?,
		other => return Err(DescriptorError::UnsupportedVersion(other.to_string())),
	};

	descriptor.validate()?;
	Ok(descriptor)
}

impl Descriptor {
	/// Check internal consistency: unique names, resolvable references and
	/// digested store sources.
	pub fn validate(&self) -> Result<(), DescriptorError> {
		unique_names("cluster store", self.cluster_stores.iter().map(|s| &s.name))?;
		unique_names("cluster stack", self.cluster_stacks.iter().map(|s| &s.name))?;
		unique_names(
			"cluster builder",
			self.cluster_builders.iter().map(|b| &b.name),
		)?;

		for store in &self.cluster_stores {
			for source in &store.sources {
				reference::digest(&source.image)?;
			}
		}

		let stacks: HashSet<_> = self.cluster_stacks.iter().map(|s| s.name.as_str()).collect();
		let stores: HashSet<_> = self.cluster_stores.iter().map(|s| s.name.as_str()).collect();
		for builder in &self.cluster_builders {
			if !stacks.contains(builder.cluster_stack.as_str()) {
				return Err(DescriptorError::UnknownStack {
					builder: builder.name.clone(),
					stack: builder.cluster_stack.clone(),
				});
			}
			if !stores.contains(builder.cluster_store.as_str()) {
				return Err(DescriptorError::UnknownStore {
					builder: builder.name.clone(),
					store: builder.cluster_store.clone(),
				});
			}
		}

		if let Some(default_stack) = &self.default_cluster_stack {
			if !stacks.contains(default_stack.as_str()) {
				return Err(DescriptorError::UnknownDefaultStack(default_stack.clone()));
			}
		}
		if let Some(default_builder) = &self.default_cluster_builder {
			let builders: HashSet<_> = self
				.cluster_builders
				.iter()
				.map(|b| b.name.as_str())
				.collect();
			if !builders.contains(default_builder.as_str()) {
				return Err(DescriptorError::UnknownDefaultBuilder(
					default_builder.clone(),
				));
			}
		}

		Ok(())
	}

	pub fn stack(&self, name: &str) -> Option<&StackSource> {
		self.cluster_stacks.iter().find(|s| s.name == name)
	}

	pub fn builder(&self, name: &str) -> Option<&BuilderSource> {
		self.cluster_builders.iter().find(|b| b.name == name)
	}
}

fn unique_names<'n>(
	kind: &'static str,
	names: impl Iterator<Item = &'n String>,
) -> Result<(), DescriptorError> {
	let mut seen = HashSet::new();
	for name in names {
		if !seen.insert(name.as_str()) {
			return Err(DescriptorError::DuplicateName {
				kind,
				name: name.clone(),
			});
		}
	}
	Ok(())
}
