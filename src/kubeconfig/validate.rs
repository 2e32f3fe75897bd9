use crate::error::ValidationError;
use serde_yaml::Value;

const REQUIRED_FIELDS: [&str; 5] = ["apiVersion", "kind", "clusters", "contexts", "users"];
const COLLECTIONS: [&str; 3] = ["clusters", "contexts", "users"];

/// Check that a parsed document can stand in as a kubeconfig.
///
/// The document must be a mapping carrying every required top-level field,
/// and each of `clusters`, `contexts` and `users` must be a non-empty list.
/// Entry shapes are not inspected here.
pub fn validate(document: &Value) -> Result<(), ValidationError> {
	let mapping = document.as_mapping().ok_or(ValidationError::NotAMapping)?;

	for field in REQUIRED_FIELDS {
		if !mapping.contains_key(field) {
			return Err(ValidationError::MissingField(field));
		}
	}

	for field in COLLECTIONS {
		let entries = mapping
			.get(field)
			.and_then(Value::as_sequence)
			.ok_or(ValidationError::NotASequence(field))?;
		if entries.is_empty() {
			return Err(ValidationError::EmptyCollection(field));
		}
	}

	Ok(())
}

/// Boolean form of [`validate`].
pub fn is_valid(document: &Value) -> bool {
	validate(document).is_ok()
}
