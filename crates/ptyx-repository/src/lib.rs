//! Item stores built on the ptyx parameter core.
//!
//! # Repositories
//!
//! - [`ItemRepository`]: display name to item map with unique names and a
//!   guard that keeps at least one item
//! - [`SelectedItem`]: the selected entry of an `ItemRepository`, mirrored
//!   into a settings parameter
//! - [`CompositeRepository`]: ordered, index-stable items made of tagged
//!   sub-entities, forwarding sub-entity changes with the live index
//!
//! # Products
//!
//! The [`product`] module holds the concrete composite: a [`Product`] with
//! metadata, scan, probe and object sub-entities, created by a
//! [`ProductFactory`] from settings registered in a
//! [`SettingsRegistry`](ptyx_params::SettingsRegistry).
//!
//! # Example
//!
//! ```
//! use ptyx_params::SettingsRegistry;
//! use ptyx_repository::{ProductFactory, ProductRepository};
//!
//! let registry = SettingsRegistry::new();
//! let factory = ProductFactory::new(&registry).unwrap();
//! let products = ProductRepository::new();
//!
//! factory.insert_product(&products, "Probe").unwrap();
//! factory.insert_product(&products, "Probe").unwrap();
//! assert_eq!(products.names(), vec!["Probe", "Probe-1"]);
//! assert_eq!(products.info_text(), "Total: 2");
//! ```

pub mod composite;
pub mod error;
pub mod item_repository;
pub mod product;
pub mod selection;

pub use composite::{Composite, CompositeItem, CompositeRepository, RepositoryEvent, RepositoryObserver};
pub use error::{RepositoryError, Result};
pub use item_repository::{ItemRepository, NamedItem};
pub use product::{
    DetectorExtent, Product, ProductFactory, ProductPart, ProductRepository, ProductValidator,
};
pub use selection::SelectedItem;
