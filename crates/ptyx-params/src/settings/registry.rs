//! Root directory of persisted parameter groups.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{ParamsError, Result};
use crate::group::ParameterGroup;
use crate::observer::Publisher;
use crate::parameter::{AnyParameter, Parameter};
use crate::value::ParameterKind;

use super::document::SettingsDocument;
use super::file::{read_document, write_atomic};
use super::prefix::PathPrefixChange;

/// Outcome of applying a settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of entries passed to a parameter.
    pub applied: usize,
    /// Sections with no matching top-level group.
    pub unknown_sections: Vec<String>,
    /// `(section, key)` pairs with no matching parameter.
    pub unknown_keys: Vec<(String, String)>,
    /// `(section, key)` pairs whose text the parameter could not parse.
    pub rejected: Vec<(String, String)>,
}

/// Owner of the top-level parameter groups, each persisted as one section.
///
/// The registry publishes once after every successful load. Top-level groups
/// keep their own publishers; registering a group does not forward its
/// changes to the registry.
#[derive(Debug)]
pub struct SettingsRegistry {
    root: Rc<ParameterGroup>,
    publisher: Publisher,
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self {
            root: ParameterGroup::new("settings"),
            publisher: Publisher::new(),
        }
    }

    /// Register a new top-level group. Fails when `name` is taken.
    pub fn create_group(&self, name: &str) -> Result<Rc<ParameterGroup>> {
        self.root.create_group(name)
    }

    pub fn get_group(&self, name: &str) -> Option<Rc<ParameterGroup>> {
        self.root.get_group(name)
    }

    pub fn group_names(&self) -> Vec<String> {
        self.root.group_names()
    }

    pub fn groups(&self) -> Vec<(String, Rc<ParameterGroup>)> {
        self.root.groups()
    }

    pub fn len(&self) -> usize {
        self.root.group_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Load a settings file into the registered parameters.
    ///
    /// Returns `None` and leaves every parameter untouched when the file
    /// cannot be read or is not a valid document.
    pub fn open_settings(&self, path: &Path) -> Option<LoadSummary> {
        match read_document(path) {
            Ok(document) => {
                let summary = self.apply_document(&document);
                tracing::info!(
                    path = %path.display(),
                    applied = summary.applied,
                    "loaded settings"
                );
                Some(summary)
            }
            Err(error) => {
                tracing::warn!(%error, "settings not loaded");
                None
            }
        }
    }

    /// Load settings from document text.
    pub fn open_settings_str(&self, text: &str) -> Option<LoadSummary> {
        match SettingsDocument::parse(text) {
            Ok(document) => Some(self.apply_document(&document)),
            Err(error) => {
                tracing::warn!(%error, "settings not loaded");
                None
            }
        }
    }

    /// Apply a parsed document, then publish once.
    ///
    /// Each top-level group is suspended while its entries are applied, so it
    /// publishes at most once regardless of how many of its parameters
    /// changed.
    pub fn apply_document(&self, document: &SettingsDocument) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for (section_name, entries) in document.sections() {
            let Some(group) = self.root.get_group(section_name) else {
                tracing::debug!(section = section_name, "ignoring unknown settings section");
                summary.unknown_sections.push(section_name.to_string());
                continue;
            };

            let _batch = group.publisher().batch();
            for (key, text) in entries {
                let Some(parameter) = group.parameter(key) else {
                    tracing::debug!(section = section_name, key = %key, "ignoring unknown settings key");
                    summary
                        .unknown_keys
                        .push((section_name.to_string(), key.clone()));
                    continue;
                };

                match parameter.assign_from_string(text) {
                    Ok(()) => summary.applied += 1,
                    Err(error) => {
                        tracing::warn!(section = section_name, key = %key, %error, "rejected settings value");
                        summary
                            .rejected
                            .push((section_name.to_string(), key.clone()));
                    }
                }
            }
        }

        self.publisher.publish();
        summary
    }

    /// Snapshot every top-level group as a document.
    ///
    /// Path values are rewritten through `change` when given; the parameters
    /// themselves keep their values.
    pub fn to_document(&self, change: Option<&PathPrefixChange>) -> SettingsDocument {
        let mut document = SettingsDocument::new();
        for (group_name, group) in self.root.groups() {
            let section = document.section_mut(&group_name);
            for (name, parameter) in group.parameters() {
                section.insert(name, written_text(parameter.as_ref(), change));
            }
        }
        document
    }

    /// Render the settings file text.
    pub fn render_settings(&self, change: Option<&PathPrefixChange>) -> Result<String> {
        self.to_document(change)
            .render()
            .map_err(|source| ParamsError::Serialize { source })
    }

    /// Write every top-level group to `path`.
    ///
    /// Failures are logged and reported as `false`.
    pub fn save_settings(&self, path: &Path, change: Option<&PathPrefixChange>) -> bool {
        let written = self
            .render_settings(change)
            .and_then(|text| write_atomic(path, &text));

        match written {
            Ok(()) => {
                tracing::info!(path = %path.display(), "saved settings");
                true
            }
            Err(error) => {
                tracing::error!(%error, "failed to save settings");
                false
            }
        }
    }
}

fn written_text(parameter: &dyn AnyParameter, change: Option<&PathPrefixChange>) -> String {
    let path = match (change, parameter.kind()) {
        (Some(change), ParameterKind::Path) => parameter
            .as_any()
            .downcast_ref::<Parameter<PathBuf>>()
            .map(|path| change.apply(&path.get_value())),
        _ => None,
    };

    match path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => parameter.value_as_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::CallbackSubscriber;
    use std::cell::Cell;

    fn registry() -> SettingsRegistry {
        let registry = SettingsRegistry::new();
        let patterns = registry.create_group("Patterns").unwrap();
        patterns
            .create_path_parameter("FilePath", "/beamline/data/scan.h5")
            .unwrap();
        patterns
            .create_integer_parameter("CropWidthInPixels", 64, Some(1), None)
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_top_level_group_fails() {
        let registry = registry();
        assert!(registry.create_group("Patterns").is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_apply_publishes_once() {
        let registry = registry();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let subscriber = CallbackSubscriber::new(move || seen.set(seen.get() + 1));
        registry.publisher().add_subscriber(&subscriber);

        let group_count = Rc::new(Cell::new(0));
        let group_seen = Rc::clone(&group_count);
        let group_subscriber = CallbackSubscriber::new(move || group_seen.set(group_seen.get() + 1));
        let patterns = registry.get_group("Patterns").unwrap();
        patterns.publisher().add_subscriber(&group_subscriber);

        let summary = registry
            .open_settings_str(
                "[Patterns]\nFilePath = \"/tmp/a.h5\"\nCropWidthInPixels = \"32\"\n",
            )
            .unwrap();

        assert_eq!(summary.applied, 2);
        assert_eq!(count.get(), 1);
        assert_eq!(group_count.get(), 1);
    }

    #[test]
    fn test_rejected_value_is_reported() {
        let registry = registry();
        let summary = registry
            .open_settings_str("[Patterns]\nCropWidthInPixels = \"wide\"\n")
            .unwrap();

        assert_eq!(summary.applied, 0);
        assert_eq!(
            summary.rejected,
            vec![("Patterns".to_string(), "CropWidthInPixels".to_string())]
        );
        let crop = registry
            .get_group("Patterns")
            .and_then(|g| g.get_parameter::<i64>("CropWidthInPixels"))
            .unwrap();
        assert_eq!(crop.get_value(), 64);
    }

    #[test]
    fn test_written_path_is_rewritten_only_in_output() {
        let registry = registry();
        let change = PathPrefixChange::new("/beamline", "/home/user");

        let document = registry.to_document(Some(&change));
        assert_eq!(
            document.get("Patterns", "FilePath"),
            Some("/home/user/data/scan.h5")
        );
        assert_eq!(document.get("Patterns", "CropWidthInPixels"), Some("64"));

        let path = registry
            .get_group("Patterns")
            .and_then(|g| g.get_parameter::<PathBuf>("FilePath"))
            .unwrap();
        assert_eq!(path.get_value(), PathBuf::from("/beamline/data/scan.h5"));
    }
}
