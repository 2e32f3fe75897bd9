use std::path::PathBuf;

/// Library-level structured errors for kcmerge.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum KubeconfigError {
	#[error("Failed to read kubeconfig: {path}")]
	ReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Kubeconfig is not valid YAML")]
	InvalidYaml(#[source] serde_yaml::Error),

	#[error("Kubeconfig failed validation")]
	Invalid(#[source] ValidationError),

	#[error("Kubeconfig entries do not match the expected shape")]
	Malformed(#[source] serde_yaml::Error),

	#[error("Failed to serialize kubeconfig")]
	SerializeError(#[source] serde_yaml::Error),
}

/// Reasons a parsed document is rejected by the well-formedness gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("document is not a mapping")]
	NotAMapping,

	#[error("missing required field: {0}")]
	MissingField(&'static str),

	#[error("field is not a list: {0}")]
	NotASequence(&'static str),

	#[error("list is empty: {0}")]
	EmptyCollection(&'static str),
}

/// Errors from loading `.kcmerge.toml` settings files.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to read settings file: {path}")]
	ReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	ParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using KubeconfigError.
pub type Result<T> = std::result::Result<T, KubeconfigError>;
