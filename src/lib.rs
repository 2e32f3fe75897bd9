//! kcmerge - merge kubeconfig files without losing entries.
//!
//! This library provides the core functionality for kcmerge, including:
//! - Typed kubeconfig parsing with a lenient fallback to an empty config
//! - Collision detection and deterministic renaming of clusters, users and contexts
//! - Merging one or many kubeconfigs into a base
//! - Settings file parsing and cascade discovery for the CLI
//!
//! # Example
//!
//! ```
//! use kcmerge_cli::merge::{NamingPolicy, merge};
//!
//! let base = r#"
//! apiVersion: v1
//! kind: Config
//! clusters: [{name: kind, cluster: {server: "https://127.0.0.1:6443"}}]
//! contexts: [{name: kind, context: {cluster: kind, user: kind}}]
//! users: [{name: kind, user: {token: abc}}]
//! current-context: kind
//! "#;
//!
//! let merged = merge(base, base, NamingPolicy::ContextFirst).unwrap();
//! assert!(merged.contains("name: kind-2"));
//! assert!(merged.contains("name: kind-kind-2"));
//! ```

pub mod error;
pub mod kubeconfig;
pub mod merge;
pub mod settings;

pub use error::{KubeconfigError, Result, SettingsError, ValidationError};
pub use kubeconfig::Kubeconfig;
pub use merge::{NamingPolicy, merge, merge_all, merge_configs};
