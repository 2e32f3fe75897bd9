//! Kubeconfig merging for kcmerge.
//!
//! This module handles:
//! - Fresh name generation for colliding identifiers
//! - Collision detection and renaming under either naming policy
//! - Appending resolved entries onto a base config, once or as a fold

pub mod engine;
pub mod naming;
pub mod resolver;

pub use engine::{merge, merge_all, merge_configs};
pub use naming::{ensure_unique, generate_name};
pub use resolver::{NamingPolicy, resolve_duplicates};
