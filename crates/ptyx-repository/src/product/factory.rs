use std::rc::Rc;

use ptyx_params::SettingsRegistry;

use super::item::{Product, ProductRepository};
use super::metadata::Metadata;
use super::object::Object;
use super::probe::Probe;
use super::scan::{Scan, ScanBuilderFactory};
use super::settings::ProductModelSettings;
use crate::error::Result;

/// Builds new products from the registered product settings.
#[derive(Debug, Clone)]
pub struct ProductFactory {
    settings: ProductModelSettings,
    scan_builders: ScanBuilderFactory,
}

impl ProductFactory {
    /// Register the product settings groups in `registry`.
    pub fn new(registry: &SettingsRegistry) -> Result<Self> {
        let settings = ProductModelSettings::register(registry)?;
        let scan_builders = ScanBuilderFactory::new(Rc::clone(&settings.scan));
        Ok(Self {
            settings,
            scan_builders,
        })
    }

    pub fn settings(&self) -> &ProductModelSettings {
        &self.settings
    }

    pub fn scan_builders(&self) -> &ScanBuilderFactory {
        &self.scan_builders
    }

    /// A product seeded from the settings, named uniquely within `repository`.
    ///
    /// An empty `name` falls back to the `Name` setting.
    pub fn create(&self, name: &str, repository: &ProductRepository) -> Result<Product> {
        let candidate = if name.is_empty() {
            self.settings.product.name.get_value()
        } else {
            name.to_string()
        };
        let unique = repository.create_unique_name(&candidate);

        let metadata = Metadata::new(&self.settings.product, &unique)?;
        let scan = Scan::new(self.scan_builders.create_default()?);
        let probe = Probe::new(&self.settings.probe)?;
        let object = Object::new(&self.settings.object)?;
        Ok(Product::new(metadata, scan, probe, object))
    }

    /// Create a product and append it to `repository`, returning its index.
    pub fn insert_product(&self, repository: &ProductRepository, name: &str) -> Result<usize> {
        let product = self.create(name, repository)?;
        Ok(repository.insert(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::scan::{CSV_FILE, RASTER};

    #[test]
    fn test_insert_uniquifies_names() {
        let registry = SettingsRegistry::new();
        let factory = ProductFactory::new(&registry).unwrap();
        let repository = ProductRepository::new();

        factory.insert_product(&repository, "Probe").unwrap();
        let index = factory.insert_product(&repository, "Probe").unwrap();
        assert_eq!(repository.name_of(index).as_deref(), Some("Probe-1"));
        assert_eq!(repository.index_of("Probe-1"), Some(1));
    }

    #[test]
    fn test_empty_name_uses_setting() {
        let registry = SettingsRegistry::new();
        let factory = ProductFactory::new(&registry).unwrap();
        factory.settings().product.name.set_value("Sample".into());
        let repository = ProductRepository::new();

        factory.insert_product(&repository, "").unwrap();
        assert_eq!(repository.names(), vec!["Sample"]);
    }

    #[test]
    fn test_products_start_from_settings() {
        let registry = SettingsRegistry::new();
        let factory = ProductFactory::new(&registry).unwrap();
        factory.settings().probe.width_px.set_value(128);
        factory.settings().scan.number_of_points_x.set_value(4);
        factory.settings().scan.number_of_points_y.set_value(3);

        let product = factory.create("A", &ProductRepository::new()).unwrap();
        assert_eq!(product.probe().width_px.get_value(), 128);
        assert_eq!(product.scan().builder_name(), RASTER);
        assert_eq!(product.scan().len(), 12);
    }

    #[test]
    fn test_missing_position_file_yields_empty_scan() {
        let registry = SettingsRegistry::new();
        let factory = ProductFactory::new(&registry).unwrap();
        factory.settings().scan.builder.set_value(CSV_FILE.into());

        let product = factory.create("A", &ProductRepository::new()).unwrap();
        assert_eq!(product.scan().builder_name(), CSV_FILE);
        assert!(product.scan().is_empty());
    }
}
