use crate::error::SettingsError;
use crate::settings::parser::parse_settings_file;
use crate::settings::types::{EffectiveSettings, LoadedSettings};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in each directory and in the home directory.
pub const SETTINGS_FILE_NAME: &str = ".kcmerge.toml";

/// Discover and load all settings files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.kcmerge.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.kcmerge.toml (unless disabled)
///
/// Returns settings in cascade order (most specific first).
pub fn discover_settings(start_dir: &Path) -> Result<Vec<LoadedSettings>, SettingsError> {
	let mut found = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let settings_path = current_dir.join(SETTINGS_FILE_NAME);

		if settings_path.exists() {
			let settings = parse_settings_file(&settings_path)?;
			debug!(path = %settings_path.display(), "loaded settings");
			let is_root = settings.root;

			found.push(LoadedSettings {
				settings,
				path: settings_path,
			});

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	if let Some(user_settings) = load_user_settings(&found)? {
		// A home directory inside the walked tree was already picked up
		if !found.iter().any(|loaded| loaded.path == user_settings.path) {
			found.push(user_settings);
		}
	}

	Ok(found)
}

/// Load ~/.kcmerge.toml if it exists and isn't disabled.
fn load_user_settings(
	existing: &[LoadedSettings],
) -> Result<Option<LoadedSettings>, SettingsError> {
	for loaded in existing {
		if loaded.settings.no_user_config {
			return Ok(None);
		}
		if let Some(ref env_var) = loaded.settings.user_config_disable_env_var
			&& is_env_truthy(env_var)
		{
			return Ok(None);
		}
	}

	let user_path = user_settings_path()?;

	if user_path.exists() {
		let settings = parse_settings_file(&user_path)?;
		Ok(Some(LoadedSettings {
			settings,
			path: user_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Fold the cascade into effective settings. The first file setting a key wins.
pub fn merge_settings(loaded: &[LoadedSettings]) -> EffectiveSettings {
	let mut effective = EffectiveSettings::default();

	for entry in loaded {
		if effective.context_first.is_none() {
			effective.context_first = entry.settings.context_first;
		}
		if effective.output.is_none() {
			effective.output = entry.settings.output.clone();
		}
	}

	effective
}

/// Convenience function to discover, load, and merge settings from a directory.
pub fn load_effective_settings(start_dir: &Path) -> Result<EffectiveSettings, SettingsError> {
	let loaded = discover_settings(start_dir)?;
	Ok(merge_settings(&loaded))
}

/// Get the path to the user's settings file.
pub fn user_settings_path() -> Result<PathBuf, SettingsError> {
	let home_dir = dirs::home_dir().ok_or(SettingsError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(SETTINGS_FILE_NAME))
}
