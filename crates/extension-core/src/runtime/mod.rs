//! Host runtime probing
//!
//! This module provides:
//! - Dependency checks run before a template is cloned (Node.js version)
//! - Package manager detection and invocation (npm, yarn)

pub mod check;
pub mod js_system;
pub mod version;

pub use check::{check_node, CheckFailure, DependencyCheck, RuntimeInfo};
pub use js_system::{JsSystem, ManagerArgs, ManagerOutput, PackageManager};
