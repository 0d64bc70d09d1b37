use std::rc::Rc;

use super::builder::{
    CSV_FILE, CsvScanBuilder, EXPLICIT, ExplicitScanBuilder, RASTER, RasterScanBuilder, ScanBuilder,
};
use crate::error::{RepositoryError, Result};
use crate::product::settings::ScanSettings;

/// Creates scan builders by name, seeded from the scan settings.
#[derive(Debug, Clone)]
pub struct ScanBuilderFactory {
    settings: Rc<ScanSettings>,
}

impl ScanBuilderFactory {
    pub fn new(settings: Rc<ScanSettings>) -> Self {
        Self { settings }
    }

    pub fn names(&self) -> [&'static str; 3] {
        [RASTER, EXPLICIT, CSV_FILE]
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn ScanBuilder>> {
        let builder: Box<dyn ScanBuilder> = match name.trim().to_lowercase().as_str() {
            RASTER => Box::new(RasterScanBuilder::new(&self.settings)?),
            EXPLICIT => Box::new(ExplicitScanBuilder::new(&self.settings)?),
            CSV_FILE => Box::new(CsvScanBuilder::new(&self.settings)?),
            _ => {
                return Err(RepositoryError::UnknownName {
                    kind: "scan builder",
                    name: name.to_string(),
                });
            }
        };
        Ok(builder)
    }

    /// The builder named by the `Builder` setting, or a raster when that
    /// name is unknown.
    pub fn create_default(&self) -> Result<Box<dyn ScanBuilder>> {
        let name = self.settings.builder.get_value();
        match self.create(&name) {
            Err(RepositoryError::UnknownName { .. }) => {
                tracing::warn!(name = %name, "unknown scan builder setting, using raster");
                self.create(RASTER)
            }
            other => other,
        }
    }

    pub fn settings(&self) -> &Rc<ScanSettings> {
        &self.settings
    }
}
