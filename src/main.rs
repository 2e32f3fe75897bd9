use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, prelude::*};

use kcmerge_cli::kubeconfig::{parse_strict, read_kubeconfig_file};
use kcmerge_cli::merge::{NamingPolicy, merge_all};
use kcmerge_cli::settings::{
	SETTINGS_FILE_NAME, discover_settings, generate_init_template, load_effective_settings,
	merge_settings, user_settings_path,
};

#[derive(Parser)]
#[command(name = "kcmerge")]
#[command(
	author,
	version,
	about = "CLI tool for merging kubeconfig files with deterministic collision renaming"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .kcmerge.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .kcmerge.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Keep context names distinct and suffix colliding clusters/users with them
	#[arg(long, conflicts_with = "context_last")]
	context_first: bool,

	/// Renumber colliding clusters/users and name contexts <user>@<cluster> (default)
	#[arg(long)]
	context_last: bool,

	/// Write the merged kubeconfig to FILE instead of stdout
	#[arg(short, long, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Only log errors
	#[arg(short, long, global = true, conflicts_with = "verbose")]
	quiet: bool,

	/// Base kubeconfig followed by the kubeconfigs to merge into it ("-" reads stdin)
	#[arg(value_name = "FILE")]
	files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Check kubeconfig files without merging anything
	Validate {
		/// Kubeconfig files to check
		#[arg(required = true, value_name = "FILE")]
		files: Vec<PathBuf>,
	},
	/// Settings management commands
	Settings {
		#[command(subcommand)]
		action: SettingsAction,
	},
}

#[derive(Subcommand)]
enum SettingsAction {
	/// Display the settings cascade with source annotations
	Show,
	/// Check all settings files for errors without merging anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	init_logging(cli.verbose, cli.quiet);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Validate { files } => handle_validate(&files),
			Commands::Settings { action } => match action {
				SettingsAction::Show => handle_settings_show(),
				SettingsAction::Validate => handle_settings_validate(),
			},
		};
	}

	let policy = if cli.context_first {
		Some(NamingPolicy::ContextFirst)
	} else if cli.context_last {
		Some(NamingPolicy::ContextLast)
	} else {
		None
	};

	handle_merge(&cli.files, policy, cli.output)
}

fn init_logging(verbose: u8, quiet: bool) {
	let level = if quiet {
		Level::ERROR
	} else {
		match verbose {
			0 => Level::WARN,
			1 => Level::INFO,
			_ => Level::DEBUG,
		}
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(std::io::stderr().is_terminal())
				.with_target(false),
		)
		.with(EnvFilter::from_default_env().add_directive(level.into()))
		.init();
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let settings_path = PathBuf::from(SETTINGS_FILE_NAME);

	if settings_path.exists() && !force {
		anyhow::bail!("{SETTINGS_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&settings_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", settings_path.display()))?;

	println!("Created {SETTINGS_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_merge(
	files: &[PathBuf],
	policy: Option<NamingPolicy>,
	output: Option<PathBuf>,
) -> Result<ExitCode> {
	if files.len() < 2 {
		anyhow::bail!("Expected a base kubeconfig and at least one kubeconfig to merge into it");
	}

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_effective_settings(&cwd).context("Failed to load settings")?;

	let policy = policy.unwrap_or_else(|| settings.naming_policy());
	let output = output.or(settings.output);

	let base = read_input(&files[0])?;
	let added = files[1..]
		.iter()
		.map(|path| {
			if path == Path::new("-") {
				anyhow::bail!("Only the base kubeconfig can be read from stdin");
			}
			read_input(path)
		})
		.collect::<Result<Vec<_>>>()?;

	info!(
		additions = added.len(),
		context_first = policy.is_context_first(),
		"merging kubeconfigs"
	);

	let merged = merge_all(&base, &added, policy).context("Failed to merge kubeconfigs")?;

	match output {
		Some(path) => {
			std::fs::write(&path, &merged)
				.with_context(|| format!("Failed to write {}", path.display()))?;
			info!(path = %path.display(), "wrote merged kubeconfig");
		}
		None => print!("{merged}"),
	}

	Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<String> {
	if path == Path::new("-") {
		let mut content = String::new();
		std::io::stdin()
			.read_to_string(&mut content)
			.context("Failed to read kubeconfig from stdin")?;
		return Ok(content);
	}

	Ok(read_kubeconfig_file(path)?)
}

fn handle_validate(files: &[PathBuf]) -> Result<ExitCode> {
	let mut all_valid = true;

	for path in files {
		let content = match read_kubeconfig_file(path) {
			Ok(content) => content,
			Err(e) => {
				println!("  {}: {}", path.display(), e);
				all_valid = false;
				continue;
			}
		};

		match parse_strict(&content) {
			Ok(config) => {
				let duplicates = config.duplicate_names();
				if duplicates.is_empty() {
					println!(
						"  {}: valid ({} clusters, {} contexts, {} users)",
						path.display(),
						config.clusters.len(),
						config.contexts.len(),
						config.users.len()
					);
				} else {
					all_valid = false;
					for duplicate in duplicates {
						println!(
							"  {}: invalid: duplicate name in {}: {}",
							path.display(),
							duplicate.collection,
							duplicate.name
						);
					}
				}
			}
			Err(e) => {
				all_valid = false;
				let reason = match std::error::Error::source(&e) {
					Some(source) => format!("{e}: {source}"),
					None => e.to_string(),
				};
				println!("  {}: invalid: {}", path.display(), reason);
			}
		}
	}

	if all_valid {
		Ok(ExitCode::SUCCESS)
	} else {
		Ok(ExitCode::FAILURE)
	}
}

fn handle_settings_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let loaded = discover_settings(&cwd).context("Failed to discover settings files")?;

	if loaded.is_empty() {
		println!("No settings files found.");
	} else {
		println!("Settings files (in cascade order):\n");

		for entry in &loaded {
			println!("# Source: {}", entry.path.display());
			println!("  root: {}", entry.settings.root);
			println!("  no-user-config: {}", entry.settings.no_user_config);
			if let Some(ref env_var) = entry.settings.user_config_disable_env_var {
				println!("  user-config-disable-env-var: {}", env_var);
			}
			if let Some(context_first) = entry.settings.context_first {
				println!("  context-first: {}", context_first);
			}
			if let Some(ref output) = entry.settings.output {
				println!("  output: {}", output.display());
			}
			println!();
		}
	}

	let effective = merge_settings(&loaded);
	println!(
		"Effective naming policy: {}",
		if effective.naming_policy().is_context_first() {
			"context-first"
		} else {
			"context-last"
		}
	);
	if let Some(ref output) = effective.output {
		println!("Effective output: {}", output.display());
	}

	// Show user settings path
	if let Ok(user_path) = user_settings_path() {
		println!("User settings path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_settings_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_settings(&cwd) {
		Ok(loaded) => {
			if loaded.is_empty() {
				println!("No settings files found.");
			} else {
				println!("All settings files are valid:");
				for entry in &loaded {
					println!("  {}", entry.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Settings error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
