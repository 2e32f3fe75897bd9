use crate::kubeconfig::Kubeconfig;
use crate::merge::naming::ensure_unique;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Which identifier stays authoritative when an added entry collides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingPolicy {
	/// Keep context names distinct; suffix colliding clusters and users
	/// with the resolved context name.
	ContextFirst,

	/// Give colliding clusters and users fresh names; derive the context
	/// name as `<user>@<cluster>`.
	#[default]
	ContextLast,
}

impl NamingPolicy {
	pub fn from_context_first(context_first: bool) -> Self {
		if context_first {
			NamingPolicy::ContextFirst
		} else {
			NamingPolicy::ContextLast
		}
	}

	pub fn is_context_first(self) -> bool {
		self == NamingPolicy::ContextFirst
	}
}

/// New names for one added context and the entries it references.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Renamed {
	context: String,
	cluster: String,
	user: String,
}

/// Names already present in the config being merged into.
struct Taken<'a> {
	contexts: BTreeSet<&'a str>,
	clusters: BTreeSet<&'a str>,
	users: BTreeSet<&'a str>,
}

/// Names a fresh name must avoid: everything in either config plus every
/// name handed out so far.
struct Reserved {
	contexts: BTreeSet<String>,
	clusters: BTreeSet<String>,
	users: BTreeSet<String>,
}

impl Reserved {
	fn new(merged: &Kubeconfig, added: &Kubeconfig) -> Self {
		Reserved {
			contexts: union(merged.context_names(), added.context_names()),
			clusters: union(merged.cluster_names(), added.cluster_names()),
			users: union(merged.user_names(), added.user_names()),
		}
	}
}

fn union(left: BTreeSet<&str>, right: BTreeSet<&str>) -> BTreeSet<String> {
	left.into_iter().chain(right).map(str::to_string).collect()
}

/// Return a copy of `added` whose colliding entries are renamed against `merged`.
///
/// Contexts are processed in order. Whether an entry collides is decided by
/// the names in `merged` alone. Fresh names from [`ensure_unique`] also avoid
/// every name in `added` and every name assigned earlier in the same pass. A
/// cluster or user shared by several added contexts is renamed once, by the
/// first context that needs it, and later references reuse that name.
///
/// Under [`NamingPolicy::ContextFirst`] the `<name>-<context>` suffix given to
/// a colliding cluster or user is not re-checked for uniqueness.
pub fn resolve_duplicates(
	merged: &Kubeconfig,
	added: &Kubeconfig,
	policy: NamingPolicy,
) -> Kubeconfig {
	let taken = Taken {
		contexts: merged.context_names(),
		clusters: merged.cluster_names(),
		users: merged.user_names(),
	};
	let mut reserved = Reserved::new(merged, added);

	let mut resolved = added.clone();
	let mut cluster_renames: HashMap<&str, String> = HashMap::new();
	let mut user_renames: HashMap<&str, String> = HashMap::new();

	for (index, added_context) in added.contexts.iter().enumerate() {
		let context_name = added_context.name.as_str();
		let cluster_name = added_context.context.cluster.as_str();
		let user_name = added_context.context.user.as_str();

		let context_exists = taken.contexts.contains(context_name);
		let cluster_exists = taken.clusters.contains(cluster_name);
		let user_exists = taken.users.contains(user_name);

		if !(context_exists || cluster_exists || user_exists) {
			continue;
		}

		let renamed = match policy {
			NamingPolicy::ContextFirst => {
				let context = if context_exists {
					ensure_unique(context_name, &reserved.contexts)
				} else {
					context_name.to_string()
				};
				let cluster = match cluster_renames.get(cluster_name) {
					Some(previous) => previous.clone(),
					None if cluster_exists => format!("{cluster_name}-{context}"),
					None => cluster_name.to_string(),
				};
				let user = match user_renames.get(user_name) {
					Some(previous) => previous.clone(),
					None if user_exists => format!("{user_name}-{context}"),
					None => user_name.to_string(),
				};
				Renamed {
					context,
					cluster,
					user,
				}
			}
			NamingPolicy::ContextLast => {
				let cluster = match cluster_renames.get(cluster_name) {
					Some(previous) => previous.clone(),
					None if cluster_exists => ensure_unique(cluster_name, &reserved.clusters),
					None => cluster_name.to_string(),
				};
				let user = match user_renames.get(user_name) {
					Some(previous) => previous.clone(),
					None if user_exists => ensure_unique(user_name, &reserved.users),
					None => user_name.to_string(),
				};
				let context = if cluster_exists || user_exists {
					format!("{user}@{cluster}")
				} else {
					// Only the context name collided
					ensure_unique(context_name, &reserved.contexts)
				};
				Renamed {
					context,
					cluster,
					user,
				}
			}
		};

		debug!(
			context = context_name,
			cluster = cluster_name,
			user = user_name,
			new_context = %renamed.context,
			new_cluster = %renamed.cluster,
			new_user = %renamed.user,
			?policy,
			"renaming colliding entries"
		);

		reserved.contexts.insert(renamed.context.clone());
		reserved.clusters.insert(renamed.cluster.clone());
		reserved.users.insert(renamed.user.clone());

		if cluster_exists && !cluster_renames.contains_key(cluster_name) {
			if let Some(position) = added.clusters.iter().position(|c| c.name == cluster_name) {
				resolved.clusters[position].name = renamed.cluster.clone();
			}
			cluster_renames.insert(cluster_name, renamed.cluster.clone());
		}

		if user_exists && !user_renames.contains_key(user_name) {
			if let Some(position) = added.users.iter().position(|u| u.name == user_name) {
				resolved.users[position].name = renamed.user.clone();
			}
			user_renames.insert(user_name, renamed.user.clone());
		}

		let context = &mut resolved.contexts[index];
		context.name = renamed.context;
		context.context.cluster = renamed.cluster;
		context.context.user = renamed.user;
	}

	resolved
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::kubeconfig::{Cluster, Context, NamedCluster, NamedContext, NamedUser, User};

	fn config(entries: &[(&str, &str, &str)]) -> Kubeconfig {
		let mut config = Kubeconfig::empty();
		for (context, cluster, user) in entries {
			config.contexts.push(NamedContext {
				name: context.to_string(),
				context: Context {
					cluster: cluster.to_string(),
					user: user.to_string(),
					..Default::default()
				},
			});
			if !config.clusters.iter().any(|c| c.name == *cluster) {
				config.clusters.push(NamedCluster {
					name: cluster.to_string(),
					cluster: Cluster {
						server: format!("https://{cluster}:6443"),
						..Default::default()
					},
				});
			}
			if !config.users.iter().any(|u| u.name == *user) {
				config.users.push(NamedUser {
					name: user.to_string(),
					user: User {
						token: Some(format!("{user}-token")),
						..Default::default()
					},
				});
			}
		}
		config
	}

	fn names(config: &Kubeconfig) -> (Vec<&str>, Vec<&str>, Vec<&str>) {
		(
			config.contexts.iter().map(|c| c.name.as_str()).collect(),
			config.clusters.iter().map(|c| c.name.as_str()).collect(),
			config.users.iter().map(|u| u.name.as_str()).collect(),
		)
	}

	#[test]
	fn test_policy_from_context_first() {
		assert_eq!(
			NamingPolicy::from_context_first(true),
			NamingPolicy::ContextFirst
		);
		assert_eq!(
			NamingPolicy::from_context_first(false),
			NamingPolicy::ContextLast
		);
		assert_eq!(NamingPolicy::default(), NamingPolicy::ContextLast);
	}

	#[test]
	fn test_disjoint_names_pass_through() {
		let base = config(&[("dev", "dev-cluster", "dev-user")]);
		let added = config(&[("prod", "prod-cluster", "prod-user")]);

		for policy in [NamingPolicy::ContextFirst, NamingPolicy::ContextLast] {
			assert_eq!(resolve_duplicates(&base, &added, policy), added);
		}
	}

	#[test]
	fn test_context_first_full_collision() {
		let base = config(&[("kind", "kind-cluster", "kind-user")]);
		let resolved = resolve_duplicates(&base, &base, NamingPolicy::ContextFirst);

		assert_eq!(
			names(&resolved),
			(
				vec!["kind-2"],
				vec!["kind-cluster-kind-2"],
				vec!["kind-user-kind-2"]
			)
		);
		assert_eq!(resolved.contexts[0].context.cluster, "kind-cluster-kind-2");
		assert_eq!(resolved.contexts[0].context.user, "kind-user-kind-2");
	}

	#[test]
	fn test_context_first_cluster_only_collision() {
		let base = config(&[("dev", "shared", "dev-user")]);
		let added = config(&[("prod", "shared", "prod-user")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextFirst);

		assert_eq!(
			names(&resolved),
			(vec!["prod"], vec!["shared-prod"], vec!["prod-user"])
		);
	}

	#[test]
	fn test_context_last_full_collision() {
		let base = config(&[("kind", "kind-cluster", "kind-user")]);
		let resolved = resolve_duplicates(&base, &base, NamingPolicy::ContextLast);

		assert_eq!(
			names(&resolved),
			(
				vec!["kind-user-2@kind-cluster-2"],
				vec!["kind-cluster-2"],
				vec!["kind-user-2"]
			)
		);
	}

	#[test]
	fn test_context_last_renames_context_even_without_context_collision() {
		let base = config(&[("dev", "shared", "dev-user")]);
		let added = config(&[("prod", "shared", "prod-user")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);

		assert_eq!(
			names(&resolved),
			(vec!["prod-user@shared-2"], vec!["shared-2"], vec!["prod-user"])
		);
	}

	#[test]
	fn test_context_last_context_only_collision() {
		let base = config(&[("default", "a", "a")]);
		let added = config(&[("default", "b", "b")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);

		assert_eq!(names(&resolved), (vec!["default-2"], vec!["b"], vec!["b"]));
	}

	#[test]
	fn test_context_last_uses_ensure_unique_against_base() {
		let base = config(&[("one", "c", "u"), ("two", "c-2", "u-2")]);
		let added = config(&[("three", "c", "u")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);

		assert_eq!(names(&resolved), (vec!["u-3@c-3"], vec!["c-3"], vec!["u-3"]));
	}

	#[test]
	fn test_shared_cluster_renamed_once() {
		let base = config(&[("dev", "shared", "dev-user")]);
		let added = config(&[("a", "shared", "a-user"), ("b", "shared", "b-user")]);

		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextFirst);
		assert_eq!(
			names(&resolved),
			(vec!["a", "b"], vec!["shared-a"], vec!["a-user", "b-user"])
		);
		assert_eq!(resolved.contexts[1].context.cluster, "shared-a");

		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);
		assert_eq!(
			names(&resolved),
			(
				vec!["a-user@shared-2", "b-user@shared-2"],
				vec!["shared-2"],
				vec!["a-user", "b-user"]
			)
		);
	}

	#[test]
	fn test_lookup_uses_original_positions() {
		// Renaming "c" to "c-2" must not make the later lookup of the added
		// "c-2" cluster land on the renamed entry.
		let base = config(&[("x", "c", "ux"), ("y", "c-2", "uy")]);
		let added = config(&[("p", "c", "up"), ("q", "c-2", "uq")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);

		assert_eq!(resolved.clusters[0].name, "c-3");
		assert_eq!(resolved.clusters[0].cluster.server, "https://c:6443");
		assert_eq!(resolved.clusters[1].name, "c-4");
		assert_eq!(resolved.clusters[1].cluster.server, "https://c-2:6443");
		assert_eq!(resolved.contexts[0].name, "up@c-3");
		assert_eq!(resolved.contexts[1].name, "uq@c-4");
	}

	#[test]
	fn test_fresh_name_skips_names_in_addition() {
		let base = config(&[("x", "c", "ux")]);
		let added = config(&[("p", "c", "up"), ("q", "c-2", "uq")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);

		assert_eq!(
			names(&resolved),
			(vec!["up@c-3", "q"], vec!["c-3", "c-2"], vec!["up", "uq"])
		);
	}

	#[test]
	fn test_context_first_fresh_names_stay_distinct() {
		let base = config(&[("dev", "a", "a")]);
		let added = config(&[("dev", "b", "b"), ("dev-2", "c", "c")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextFirst);

		assert_eq!(resolved.contexts[0].name, "dev-3");
		assert_eq!(resolved.contexts[1].name, "dev-2");
	}

	#[test]
	fn test_context_only_collisions_get_distinct_names() {
		let base = config(&[("default", "a", "a")]);
		let added = config(&[("default", "b", "b"), ("default", "c", "c")]);
		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextLast);

		assert_eq!(names(&resolved).0, vec!["default-2", "default-3"]);
	}

	#[test]
	fn test_dangling_reference_is_tolerated() {
		let base = config(&[("dev", "dev", "dev")]);
		let mut added = config(&[("dev", "dev", "dev")]);
		added.clusters.clear();

		let resolved = resolve_duplicates(&base, &added, NamingPolicy::ContextFirst);
		assert!(resolved.clusters.is_empty());
		assert_eq!(resolved.contexts[0].name, "dev-2");
		assert_eq!(resolved.contexts[0].context.cluster, "dev-dev-2");
		assert_eq!(resolved.users[0].name, "dev-dev-2");
	}

	#[test]
	fn test_inputs_untouched() {
		let base = config(&[("kind", "kind", "kind")]);
		let snapshot = base.clone();
		let _ = resolve_duplicates(&base, &base, NamingPolicy::ContextLast);
		assert_eq!(base, snapshot);
	}
}
