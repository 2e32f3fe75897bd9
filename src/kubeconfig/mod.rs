//! Kubeconfig document model and parsing for kcmerge.
//!
//! This module handles:
//! - Typed kubeconfig structures that preserve unknown keys
//! - The well-formedness gate for parsed documents
//! - Strict and lenient YAML parsing, and serialization

pub mod parser;
pub mod types;
pub mod validate;

pub use parser::{parse_lenient, parse_strict, read_kubeconfig_file, to_yaml};
pub use types::{
	Cluster, Context, DuplicateName, Kubeconfig, NamedCluster, NamedContext, NamedUser, User,
};
pub use validate::{is_valid, validate};
