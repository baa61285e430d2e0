//! RFC 7386 merge-patch computation.
//!
//! Every mutating command goes through the same path: fetch the current
//! resource, build the desired one, diff the two into a JSON Merge Patch and
//! submit only when the patch is non-empty.

use kube::api::{Api, Patch, PatchParams};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
	#[error("serializing resource")]
	Serialize(#[source] serde_json::Error),

	#[error(transparent)]
	Kube(#[from] kube::Error),
}

/// Compute the RFC 7386 merge patch turning `current` into `desired`.
///
/// Keys present only in `current` map to `null`, changed keys map to the
/// desired value and arrays are replaced wholesale. Returns `None` when the
/// two values are already equal.
pub fn merge_patch(current: &Value, desired: &Value) -> Option<Value> {
	match (current, desired) {
		(Value::Object(current_map), Value::Object(desired_map)) => {
			let mut patch = serde_json::Map::new();

			for (key, desired_value) in desired_map {
				match current_map.get(key) {
					Some(current_value) => {
						if let Some(child) = merge_patch(current_value, desired_value) {
							patch.insert(key.clone(), child);
						}
					}
					None => {
						patch.insert(key.clone(), desired_value.clone());
					}
				}
			}

			for key in current_map.keys() {
				if !desired_map.contains_key(key) {
					patch.insert(key.clone(), Value::Null);
				}
			}

			if patch.is_empty() {
				None
			} else {
				Some(Value::Object(patch))
			}
		}
		_ if current == desired => None,
		_ => Some(desired.clone()),
	}
}

/// Diff `current` against `desired` and submit the merge patch.
///
/// Returns the patched resource, or `None` when there was nothing to patch.
/// `dry_run` computes the patch without submitting it.
pub async fn submit_merge_patch<K>(
	api: &Api<K>,
	name: &str,
	current: &K,
	desired: &K,
	dry_run: bool,
) -> Result<Option<K>, PatchError>
where
	K: Clone + Serialize + DeserializeOwned + std::fmt::Debug,
{
	let current_value = serde_json::to_value(current).map_err(PatchError::Serialize)?;
	let desired_value = serde_json::to_value(desired).map_err(PatchError::Serialize)?;

	let Some(patch) = merge_patch(&current_value, &desired_value) else {
		return Ok(None);
	};

	if dry_run {
		return Ok(Some(desired.clone()));
	}

	let patched = api
		.patch(name, &PatchParams::default(), &Patch::Merge(patch))
		.await?;
	Ok(Some(patched))
}
