//! The product composite and its repository extensions.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ptyx_params::ParameterGroup;

use super::metadata::Metadata;
use super::object::Object;
use super::probe::Probe;
use super::scan::{ExplicitScanBuilder, Scan, ScanBuilderFactory};
use crate::composite::{Composite, CompositeItem, CompositeRepository};

/// Event tags for product items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductPart {
    Metadata,
    Scan,
    Probe,
    Object,
    /// The optimization cost history was replaced.
    Costs,
}

/// A reconstruction product: metadata, scan, probe and object, plus the cost
/// history of the last reconstruction, which is cleared whenever any part
/// changes.
pub struct Product {
    metadata: Metadata,
    scan: Rc<Scan>,
    probe: Probe,
    object: Object,
    costs: RefCell<Vec<f64>>,
}

impl Product {
    pub fn new(metadata: Metadata, scan: Rc<Scan>, probe: Probe, object: Object) -> Self {
        Self {
            metadata,
            scan,
            probe,
            object,
            costs: RefCell::new(Vec::new()),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn scan(&self) -> &Rc<Scan> {
        &self.scan
    }

    pub fn probe(&self) -> &Probe {
        &self.probe
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn costs(&self) -> Vec<f64> {
        self.costs.borrow().clone()
    }

    /// Write every parameter back to the settings it was copied from.
    pub fn sync_to_settings(&self) {
        self.metadata.sync_to_settings();
        self.scan.sync_to_settings();
        self.probe.sync_to_settings();
        self.object.sync_to_settings();
    }
}

impl Composite for Product {
    type Kind = ProductPart;

    fn name(&self) -> String {
        self.metadata.name()
    }

    fn sub_entities(&self) -> Vec<(ProductPart, Rc<ParameterGroup>)> {
        vec![
            (ProductPart::Metadata, Rc::clone(self.metadata.group())),
            (ProductPart::Scan, Rc::clone(self.scan.group())),
            (ProductPart::Probe, Rc::clone(self.probe.group())),
            (ProductPart::Object, Rc::clone(self.object.group())),
        ]
    }

    fn invalidate(&self) {
        self.costs.borrow_mut().clear();
    }
}

impl fmt::Debug for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Product")
            .field("name", &self.metadata.name())
            .field("scan", &self.scan)
            .field("costs", &self.costs.borrow().len())
            .finish()
    }
}

impl CompositeItem<Product> {
    /// Replace the cost history and forward a [`ProductPart::Costs`] event.
    pub fn set_costs(self: &Rc<Self>, costs: Vec<f64>) {
        self.composite().costs.replace(costs);
        self.notify(ProductPart::Costs);
    }

    /// Copy the state of `other` into this product, keeping this name.
    ///
    /// With `notify` unset no events are published; the cost history is
    /// still replaced.
    pub fn assign_item(self: &Rc<Self>, other: &Product, builders: &ScanBuilderFactory, notify: bool) {
        let product = self.composite();
        product.metadata.assign_from(&other.metadata, notify);
        product.probe.assign_from(&other.probe, notify);
        product.object.assign_from(&other.object, notify);

        match ExplicitScanBuilder::from_points(builders.settings(), &other.scan.positions()) {
            Ok(builder) => {
                if notify {
                    product.scan.set_builder(Box::new(builder));
                } else {
                    product.scan.set_builder_silently(Box::new(builder));
                }
            }
            Err(error) => tracing::warn!(%error, "scan not copied"),
        }

        product.costs.replace(other.costs());
        if notify {
            self.notify(ProductPart::Costs);
        }
    }
}

/// Repository of products.
pub type ProductRepository = CompositeRepository<Product>;

impl CompositeRepository<Product> {
    /// Rename the product at `index`, uniquifying against the other products.
    ///
    /// Returns the name it ended up with.
    pub fn rename_product(&self, index: usize, name: &str) -> Option<String> {
        let Some(item) = self.get(index) else {
            tracing::warn!(index, "no product to rename");
            return None;
        };

        if item.name() == name {
            return Some(item.name());
        }
        let unique = self.create_unique_name(name);
        item.composite().metadata.name.set_value(unique.clone());
        Some(unique)
    }

    /// Push the values of the product at `index` back to the settings.
    pub fn sync_to_settings(&self, index: usize) -> bool {
        match self.get(index) {
            Some(item) => {
                item.composite().sync_to_settings();
                true
            }
            None => {
                tracing::warn!(index, "no product to sync");
                false
            }
        }
    }
}
