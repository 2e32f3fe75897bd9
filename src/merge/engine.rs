use crate::error::Result;
use crate::kubeconfig::{Kubeconfig, parse_lenient, to_yaml};
use crate::merge::resolver::{NamingPolicy, resolve_duplicates};
use tracing::{debug, warn};

/// Merge `added` into a copy of `base`.
///
/// Entries of `added` are renamed against `base` and appended after the
/// base's own clusters, contexts and users. `current-context`,
/// `preferences` and any other top-level keys come from `base` unchanged.
pub fn merge_configs(base: &Kubeconfig, added: &Kubeconfig, policy: NamingPolicy) -> Kubeconfig {
	let mut merged = base.clone();
	let resolved = resolve_duplicates(base, added, policy);

	debug!(
		clusters = resolved.clusters.len(),
		contexts = resolved.contexts.len(),
		users = resolved.users.len(),
		"appending entries"
	);

	merged.clusters.extend(resolved.clusters);
	merged.contexts.extend(resolved.contexts);
	merged.users.extend(resolved.users);

	for duplicate in merged.duplicate_names() {
		warn!(
			collection = duplicate.collection,
			name = %duplicate.name,
			"merged config still contains a duplicate name"
		);
	}

	merged
}

/// Merge one kubeconfig text into another and return the merged YAML.
///
/// Either input may be malformed; it is then treated as an empty config.
/// The only error is a failure to serialize the result.
pub fn merge(base: &str, added: &str, policy: NamingPolicy) -> Result<String> {
	let base = parse_lenient(base);
	let added = parse_lenient(added);
	to_yaml(&merge_configs(&base, &added, policy))
}

/// Merge each of `added` in turn, feeding every result back in as the next base.
///
/// Later additions are checked against everything merged before them. With
/// no additions the base is still parsed and re-serialized, so the output is
/// always a normalized kubeconfig.
pub fn merge_all<S: AsRef<str>>(base: &str, added: &[S], policy: NamingPolicy) -> Result<String> {
	if added.is_empty() {
		return to_yaml(&parse_lenient(base));
	}

	let mut merged = base.to_string();
	for (step, next) in added.iter().enumerate() {
		debug!(step, "merging addition");
		merged = merge(&merged, next.as_ref(), policy)?;
	}
	Ok(merged)
}
