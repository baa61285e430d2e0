//! ClusterStore source reconciliation.
//!
//! The store spec is an ordered list of buildpackage references; the digest
//! is each entry's identity. Adding skips digests already present, removing
//! requires every named digest to exist.

use std::collections::HashSet;

use kpack_model::{ClusterStore, ClusterStoreSpec, StoreImage};
use kube::core::ObjectMeta;
use thiserror::Error;

use crate::reference::{self, ReferenceError};

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("at least one buildpackage must be provided")]
	NoBuildpackages,

	#[error("buildpackage {0:?} does not exist in the ClusterStore")]
	NotFound(String),

	#[error(transparent)]
	Reference(#[from] ReferenceError),
}

/// Build a new ClusterStore from digested buildpackage references,
/// de-duplicating repeats within the request.
pub fn new_store(name: &str, buildpackages: &[String]) -> Result<ClusterStore, StoreError> {
	if buildpackages.is_empty() {
		return Err(StoreError::NoBuildpackages);
	}

	let mut seen = HashSet::new();
	let mut sources = Vec::new();
	for reference in buildpackages {
		let digest = reference::digest(reference)?;
		if seen.insert(digest.to_string()) {
			sources.push(StoreImage::new(reference.clone()));
		}
	}

	Ok(ClusterStore {
		metadata: ObjectMeta {
			name: Some(name.to_string()),
			..ObjectMeta::default()
		},
		spec: ClusterStoreSpec {
			sources,
			service_account_ref: None,
		},
		status: None,
	})
}

/// Result of reconciling new buildpackages into an existing store.
pub struct AddOutcome {
	/// The store with new sources appended.
	pub store: ClusterStore,
	pub added: Vec<String>,
	pub already_present: Vec<String>,
}

impl AddOutcome {
	pub fn changed(&self) -> bool {
		!self.added.is_empty()
	}
}

/// Append buildpackages whose digest is not already a source.
pub fn add_sources(store: &ClusterStore, buildpackages: &[String]) -> Result<AddOutcome, StoreError> {
	let mut digests = existing_digests(store);

	let mut updated = store.clone();
	let mut added = Vec::new();
	let mut already_present = Vec::new();

	for reference in buildpackages {
		let digest = reference::digest(reference)?;
		if digests.insert(digest.to_string()) {
			updated.spec.sources.push(StoreImage::new(reference.clone()));
			added.push(reference.clone());
		} else {
			already_present.push(reference.clone());
		}
	}

	Ok(AddOutcome {
		store: updated,
		added,
		already_present,
	})
}

/// Remove buildpackages by digest. Every named reference must match an
/// existing source.
pub fn remove_sources(
	store: &ClusterStore,
	buildpackages: &[String],
) -> Result<ClusterStore, StoreError> {
	let existing = existing_digests(store);

	let mut removals = HashSet::new();
	for reference in buildpackages {
		let digest = reference::digest(reference)?;
		if !existing.contains(digest) {
			return Err(StoreError::NotFound(reference.clone()));
		}
		removals.insert(digest.to_string());
	}

	let mut updated = store.clone();
	updated
		.spec
		.sources
		.retain(|source| !reference::digest_opt(&source.image).is_some_and(|d| removals.contains(d)));

	Ok(updated)
}

/// Digests of the store's current sources. Sources without a digest (written
/// by other tools) simply never match.
fn existing_digests(store: &ClusterStore) -> HashSet<String> {
	store
		.spec
		.sources
		.iter()
		.filter_map(|source| reference::digest_opt(&source.image))
		.map(str::to_string)
		.collect()
}
