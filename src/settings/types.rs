use crate::merge::NamingPolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level settings from a `.kcmerge.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
	/// If true, stop the directory cascade here and jump to ~/.kcmerge.toml.
	#[serde(default)]
	pub root: bool,

	/// If true, never consult ~/.kcmerge.toml.
	#[serde(default)]
	pub no_user_config: bool,

	/// Environment variable name that, if truthy, skips ~/.kcmerge.toml lookup.
	#[serde(default)]
	pub user_config_disable_env_var: Option<String>,

	/// Default naming policy; `true` selects context-first.
	#[serde(default)]
	pub context_first: Option<bool>,

	/// Default output file for merged kubeconfigs.
	#[serde(default)]
	pub output: Option<PathBuf>,
}

/// A loaded settings file with its source path for display.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
	/// The parsed settings.
	pub settings: Settings,

	/// The path these settings were loaded from.
	pub path: PathBuf,
}

/// Effective settings after applying the cascade (nearest file wins per key).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveSettings {
	pub context_first: Option<bool>,
	pub output: Option<PathBuf>,
}

impl EffectiveSettings {
	/// Naming policy to use when the command line does not pick one.
	pub fn naming_policy(&self) -> NamingPolicy {
		NamingPolicy::from_context_first(self.context_first.unwrap_or(false))
	}
}
