//! Runtime settings for the extension commands

pub mod settings;

pub use settings::{PackageManagerPreference, Settings, UnknownPackageManager};
