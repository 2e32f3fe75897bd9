use crate::error::SettingsError;
use crate::settings::types::Settings;
use std::path::Path;

/// Parse a settings file from the given path.
pub fn parse_settings_file(path: &Path) -> Result<Settings, SettingsError> {
	let content = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_settings_str(&content, path)
}

/// Parse settings from a string (useful for testing).
pub fn parse_settings_str(content: &str, path: &Path) -> Result<Settings, SettingsError> {
	toml::from_str(content).map_err(|source| SettingsError::ParseError {
		path: path.to_path_buf(),
		source,
	})
}

/// Template written by `kcmerge --init`.
pub fn generate_init_template() -> &'static str {
	r#"# kcmerge settings
#
# Files are discovered from the current directory upwards, then ~/.kcmerge.toml.
# The nearest file wins for each key; command-line flags win over all files.

# Stop the upward search at this file.
root = true

# Never read ~/.kcmerge.toml.
# no-user-config = true

# Skip ~/.kcmerge.toml when this variable is set to a truthy value.
# user-config-disable-env-var = "CI"

# Resolve collisions context-first: colliding contexts get a numeric suffix and
# their clusters/users are suffixed with the new context name. When false,
# clusters/users get a numeric suffix and the context becomes <user>@<cluster>.
context-first = false

# Write merged output here instead of stdout.
# output = "merged.kubeconfig"
"#
}
