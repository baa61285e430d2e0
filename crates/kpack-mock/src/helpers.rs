//! JSON merge helpers backing the mock PATCH handler.

/// Apply an RFC 7386 merge patch to a base value.
///
/// Objects merge recursively, `null` patch members remove the key, and
/// everything else (including arrays) replaces the base value wholesale.
pub fn merge_json(base: serde_json::Value, patch: serde_json::Value) -> serde_json::Value {
	match (base, patch) {
		(serde_json::Value::Object(mut base_map), serde_json::Value::Object(patch_map)) => {
			for (key, patch_value) in patch_map {
				if patch_value.is_null() {
					base_map.remove(&key);
					continue;
				}
				let base_value = base_map.remove(&key).unwrap_or(serde_json::Value::Null);
				base_map.insert(key, merge_json(base_value, patch_value));
			}
			serde_json::Value::Object(base_map)
		}
		(_, patch) => patch,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::merge_json;

	#[test]
	fn objects_merge_recursively() {
		let merged = merge_json(
			json!({"metadata": {"name": "a", "labels": {"x": "1"}}}),
			json!({"metadata": {"labels": {"y": "2"}}}),
		);
		assert_eq!(
			merged,
			json!({"metadata": {"name": "a", "labels": {"x": "1", "y": "2"}}})
		);
	}

	#[test]
	fn null_removes_key() {
		let merged = merge_json(
			json!({"metadata": {"annotations": {"a": "1", "b": "2"}}}),
			json!({"metadata": {"annotations": {"a": null}}}),
		);
		assert_eq!(merged, json!({"metadata": {"annotations": {"b": "2"}}}));
	}

	#[test]
	fn arrays_replace_wholesale() {
		let merged = merge_json(
			json!({"spec": {"sources": [{"image": "a"}, {"image": "b"}]}}),
			json!({"spec": {"sources": [{"image": "c"}]}}),
		);
		assert_eq!(merged, json!({"spec": {"sources": [{"image": "c"}]}}));
	}
}
