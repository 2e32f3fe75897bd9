use crate::error::{KubeconfigError, Result};
use crate::kubeconfig::types::Kubeconfig;
use crate::kubeconfig::validate::{is_valid, validate};
use std::path::Path;
use tracing::warn;

/// Read a kubeconfig file into a string.
pub fn read_kubeconfig_file(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| KubeconfigError::ReadError {
		path: path.to_path_buf(),
		source,
	})
}

/// Parse kubeconfig text, reporting why it was rejected.
pub fn parse_strict(content: &str) -> Result<Kubeconfig> {
	let document: serde_yaml::Value =
		serde_yaml::from_str(content).map_err(KubeconfigError::InvalidYaml)?;

	validate(&document).map_err(KubeconfigError::Invalid)?;

	serde_yaml::from_value(document).map_err(KubeconfigError::Malformed)
}

/// Parse kubeconfig text, substituting an empty config for anything unusable.
///
/// Never fails: malformed YAML, a document rejected by the validator and a
/// document whose entries do not fit the model all yield [`Kubeconfig::empty`].
pub fn parse_lenient(content: &str) -> Kubeconfig {
	let document: serde_yaml::Value = match serde_yaml::from_str(content) {
		Ok(document) => document,
		Err(e) => {
			warn!(error = %e, "kubeconfig is not valid YAML, using an empty config");
			return Kubeconfig::empty();
		}
	};

	if !is_valid(&document) {
		warn!("kubeconfig failed validation, using an empty config");
		return Kubeconfig::empty();
	}

	match serde_yaml::from_value(document) {
		Ok(config) => config,
		Err(e) => {
			let e = KubeconfigError::Malformed(e);
			warn!(error = %error_chain(&e), "unusable kubeconfig, using an empty config");
			Kubeconfig::empty()
		}
	}
}

/// Serialize a kubeconfig to YAML.
pub fn to_yaml(config: &Kubeconfig) -> Result<String> {
	serde_yaml::to_string(config).map_err(KubeconfigError::SerializeError)
}

fn error_chain(error: &dyn std::error::Error) -> String {
	let mut message = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
