//! Settings registry populated with every group the application registers.
//!
//! Settings are stored in the platform-specific configuration folder:
//! - macOS: ~/Library/Application Support/org.ptyx.ptyx/
//! - Windows: %APPDATA%/ptyx/ptyx/config/
//! - Linux: ~/.config/ptyx/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Serialize;

use ptyx_params::{LoadSummary, PathPrefixChange, SettingsRegistry};
use ptyx_repository::ProductFactory;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "ptyx";
const APP_NAME: &str = "ptyx";
const CONFIG_FILENAME: &str = "settings.toml";

/// Get the path to the settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// One parameter as shown by `ptyx show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
    pub section: String,
    pub key: String,
    pub kind: &'static str,
    pub value: String,
}

pub struct Session {
    registry: SettingsRegistry,
    products: ProductFactory,
}

impl Session {
    /// A registry holding the default value of every setting.
    pub fn new() -> Result<Self> {
        let registry = SettingsRegistry::new();
        let products = ProductFactory::new(&registry).context("register product settings")?;
        Ok(Self { registry, products })
    }

    pub fn registry(&self) -> &SettingsRegistry {
        &self.registry
    }

    pub fn products(&self) -> &ProductFactory {
        &self.products
    }

    /// Load `path` into the registry.
    pub fn load(&self, path: &Path) -> Result<LoadSummary> {
        self.registry
            .open_settings(path)
            .ok_or_else(|| anyhow!("could not load settings from {}", path.display()))
    }

    /// Write the current settings to `path`.
    pub fn save(&self, path: &Path, change: Option<&PathPrefixChange>) -> Result<()> {
        if self.registry.save_settings(path, change) {
            Ok(())
        } else {
            Err(anyhow!("could not write settings to {}", path.display()))
        }
    }

    pub fn render(&self) -> Result<String> {
        self.registry.render_settings(None).context("render settings")
    }

    /// Every parameter of every top-level group, in registration order.
    pub fn entries(&self) -> Vec<SettingEntry> {
        self.registry
            .groups()
            .into_iter()
            .flat_map(|(section, group)| {
                group
                    .parameters()
                    .into_iter()
                    .map(move |(key, parameter)| SettingEntry {
                        section: section.clone(),
                        key,
                        kind: parameter.kind().label(),
                        value: parameter.value_as_string(),
                    })
            })
            .collect()
    }
}

/// Load `input`, then save it to `output` with path values rewritten.
pub fn rewrite_paths(input: &Path, output: &Path, change: &PathPrefixChange) -> Result<LoadSummary> {
    let session = Session::new()?;
    let summary = session.load(input)?;
    session.save(output, Some(change))?;
    Ok(summary)
}
