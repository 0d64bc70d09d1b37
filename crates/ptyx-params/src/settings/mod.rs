//! Whole-tree persistence of top-level parameter groups.
//!
//! The settings file is a TOML document with one table per top-level group
//! and one string entry per parameter, holding the parameter's canonical
//! text form.

pub mod document;
mod file;
mod prefix;
mod registry;

pub use document::SettingsDocument;
pub use prefix::PathPrefixChange;
pub use registry::{LoadSummary, SettingsRegistry};
