use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A kubeconfig document (`kind: Config`).
///
/// Field order matches what `kubectl config view` emits so serialized
/// output stays familiar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kubeconfig {
	#[serde(rename = "apiVersion", deserialize_with = "scalar_string")]
	pub api_version: String,

	#[serde(deserialize_with = "scalar_string")]
	pub kind: String,

	pub clusters: Vec<NamedCluster>,

	pub contexts: Vec<NamedContext>,

	pub users: Vec<NamedUser>,

	/// Name of the active context. Not remapped when contexts are renamed.
	#[serde(
		rename = "current-context",
		default,
		deserialize_with = "scalar_string"
	)]
	pub current_context: String,

	#[serde(default, deserialize_with = "null_as_default")]
	pub preferences: Mapping,

	/// Top-level keys this model does not name (e.g. `extensions`).
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCluster {
	#[serde(deserialize_with = "scalar_string")]
	pub name: String,
	pub cluster: Cluster,
}

/// Connection details for an API server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cluster {
	#[serde(deserialize_with = "scalar_string")]
	pub server: String,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub certificate_authority: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub certificate_authority_data: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub insecure_skip_tls_verify: Option<bool>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub tls_server_name: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub proxy_url: Option<String>,

	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedUser {
	#[serde(deserialize_with = "scalar_string")]
	pub name: String,
	pub user: User,
}

/// Credentials. Every field is optional; exec/auth-provider blocks land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct User {
	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub client_certificate: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub client_certificate_data: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub client_key: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub client_key_data: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub token: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub username: Option<String>,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub password: Option<String>,

	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedContext {
	#[serde(deserialize_with = "scalar_string")]
	pub name: String,
	pub context: Context,
}

/// Binds a cluster and a user by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
	#[serde(deserialize_with = "scalar_string")]
	pub cluster: String,

	#[serde(deserialize_with = "scalar_string")]
	pub user: String,

	#[serde(
		default,
		deserialize_with = "optional_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub namespace: Option<String>,

	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// A name that occurs more than once within one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
	pub collection: &'static str,
	pub name: String,
}

impl Kubeconfig {
	/// The canonical empty document substituted for unusable input.
	pub fn empty() -> Self {
		Kubeconfig {
			api_version: "v1".to_string(),
			kind: "Config".to_string(),
			clusters: Vec::new(),
			contexts: Vec::new(),
			users: Vec::new(),
			current_context: String::new(),
			preferences: Mapping::new(),
			extra: BTreeMap::new(),
		}
	}

	pub fn cluster_names(&self) -> BTreeSet<&str> {
		self.clusters.iter().map(|c| c.name.as_str()).collect()
	}

	pub fn user_names(&self) -> BTreeSet<&str> {
		self.users.iter().map(|u| u.name.as_str()).collect()
	}

	pub fn context_names(&self) -> BTreeSet<&str> {
		self.contexts.iter().map(|c| c.name.as_str()).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.clusters.is_empty() && self.contexts.is_empty() && self.users.is_empty()
	}

	/// Report every name that appears more than once within its own collection.
	///
	/// Names shared across collections (a context named like its cluster) are
	/// normal and not reported.
	pub fn duplicate_names(&self) -> Vec<DuplicateName> {
		let mut duplicates = Vec::new();
		collect_duplicates(
			"clusters",
			self.clusters.iter().map(|c| c.name.as_str()),
			&mut duplicates,
		);
		collect_duplicates(
			"contexts",
			self.contexts.iter().map(|c| c.name.as_str()),
			&mut duplicates,
		);
		collect_duplicates(
			"users",
			self.users.iter().map(|u| u.name.as_str()),
			&mut duplicates,
		);
		duplicates
	}
}

impl Default for Kubeconfig {
	fn default() -> Self {
		Self::empty()
	}
}

fn collect_duplicates<'a>(
	collection: &'static str,
	names: impl Iterator<Item = &'a str>,
	out: &mut Vec<DuplicateName>,
) {
	let mut seen = BTreeSet::new();
	let mut reported = BTreeSet::new();
	for name in names {
		if !seen.insert(name) && reported.insert(name) {
			out.push(DuplicateName {
				collection,
				name: name.to_string(),
			});
		}
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept any YAML scalar for a text field (`namespace: 2024` reads as "2024").
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	scalar_to_string(Value::deserialize(deserializer)?)
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => Ok(None),
		Some(value) => scalar_to_string(value).map(Some),
	}
}

fn scalar_to_string<E: serde::de::Error>(value: Value) -> Result<String, E> {
	match value {
		Value::String(text) => Ok(text),
		Value::Number(number) => Ok(number.to_string()),
		Value::Bool(flag) => Ok(flag.to_string()),
		Value::Null => Ok(String::new()),
		other => Err(E::custom(format!("expected a scalar, found {other:?}"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
clusters:
- name: prod
  cluster:
    server: https://prod.example.com:6443
    certificate-authority-data: Y2EtZGF0YQ==
contexts:
- name: prod-admin
  context:
    cluster: prod
    user: admin
    namespace: kube-system
users:
- name: admin
  user:
    exec:
      apiVersion: client.authentication.k8s.io/v1beta1
      command: aws
current-context: prod-admin
preferences: {}
"#;

	#[test]
	fn test_parse_typed_kubeconfig() {
		let config: Kubeconfig = serde_yaml::from_str(KUBECONFIG).unwrap();

		assert_eq!(config.api_version, "v1");
		assert_eq!(config.clusters[0].name, "prod");
		assert_eq!(
			config.clusters[0].cluster.certificate_authority_data,
			Some("Y2EtZGF0YQ==".to_string())
		);
		assert_eq!(config.contexts[0].context.cluster, "prod");
		assert_eq!(
			config.contexts[0].context.namespace,
			Some("kube-system".to_string())
		);
		assert_eq!(config.current_context, "prod-admin");
		assert!(config.users[0].user.extra.contains_key("exec"));
	}

	#[test]
	fn test_unknown_fields_round_trip() {
		let config: Kubeconfig = serde_yaml::from_str(KUBECONFIG).unwrap();
		let text = serde_yaml::to_string(&config).unwrap();

		assert!(text.contains("exec:"));
		assert!(text.contains("command: aws"));
		assert!(!text.contains("token"));

		let reparsed: Kubeconfig = serde_yaml::from_str(&text).unwrap();
		assert_eq!(reparsed, config);
	}

	#[test]
	fn test_null_current_context_and_preferences() {
		let yaml = r#"
apiVersion: v1
kind: Config
clusters: []
contexts: []
users: []
current-context:
preferences:
"#;
		let config: Kubeconfig = serde_yaml::from_str(yaml).unwrap();
		assert_eq!(config.current_context, "");
		assert!(config.preferences.is_empty());
	}

	#[test]
	fn test_numeric_scalars_read_as_text() {
		let yaml = r#"
apiVersion: v1
kind: Config
clusters:
- name: 2024
  cluster:
    server: https://10.0.0.1:6443
    tls-server-name: 42
contexts:
- name: 2024
  context:
    cluster: 2024
    user: true
    namespace: 2024
users:
- name: true
  user:
    token: 12345
current-context: 2024
"#;
		let config: Kubeconfig = serde_yaml::from_str(yaml).unwrap();

		assert_eq!(config.clusters[0].name, "2024");
		assert_eq!(
			config.clusters[0].cluster.tls_server_name,
			Some("42".to_string())
		);
		assert_eq!(config.contexts[0].context.user, "true");
		assert_eq!(
			config.contexts[0].context.namespace,
			Some("2024".to_string())
		);
		assert_eq!(config.users[0].user.token, Some("12345".to_string()));
		assert_eq!(config.current_context, "2024");
	}

	#[test]
	fn test_non_scalar_text_field_rejected() {
		let yaml = r#"
apiVersion: v1
kind: Config
clusters: [{name: [a, b], cluster: {server: https://a}}]
contexts: []
users: []
"#;
		assert!(serde_yaml::from_str::<Kubeconfig>(yaml).is_err());
	}

	#[test]
	fn test_empty_document_shape() {
		let empty = Kubeconfig::empty();
		assert_eq!(empty.api_version, "v1");
		assert_eq!(empty.kind, "Config");
		assert!(empty.is_empty());
		assert!(empty.current_context.is_empty());

		let text = serde_yaml::to_string(&empty).unwrap();
		assert!(text.contains("clusters: []"));
		assert!(text.contains("preferences: {}"));
	}

	#[test]
	fn test_duplicate_names_ignores_cross_collection() {
		let mut config: Kubeconfig = serde_yaml::from_str(KUBECONFIG).unwrap();
		config.contexts[0].name = "prod".to_string();
		assert!(config.duplicate_names().is_empty());

		config.clusters.push(config.clusters[0].clone());
		config.clusters.push(config.clusters[0].clone());
		let duplicates = config.duplicate_names();
		assert_eq!(
			duplicates,
			vec![DuplicateName {
				collection: "clusters",
				name: "prod".to_string(),
			}]
		);
	}
}
