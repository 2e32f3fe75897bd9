//! Settings loading for the kcmerge CLI.
//!
//! This module handles:
//! - TOML settings file parsing
//! - Directory cascade discovery
//! - Folding the cascade into effective defaults

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	SETTINGS_FILE_NAME, discover_settings, load_effective_settings, merge_settings,
	user_settings_path,
};
pub use parser::{generate_init_template, parse_settings_file, parse_settings_str};
pub use types::{EffectiveSettings, LoadedSettings, Settings};
