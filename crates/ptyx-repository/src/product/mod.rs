//! The product model: the concrete composite stored by the application.
//!
//! A [`Product`] aggregates [`Metadata`], a [`Scan`], a [`Probe`] and an
//! [`Object`]. Every per-product parameter is a copy of a settings parameter
//! from [`ProductModelSettings`], so new products start from the configured
//! defaults.

mod factory;
mod item;
mod metadata;
mod object;
mod probe;
pub mod scan;
pub mod settings;
mod validator;

use std::rc::Rc;

use ptyx_params::{Parameter, ParameterGroup, ParameterValue};

pub use factory::ProductFactory;
pub use item::{Product, ProductPart, ProductRepository};
pub use metadata::Metadata;
pub use object::Object;
pub use probe::Probe;
pub use scan::{BoundingBox, Scan, ScanBuilder, ScanBuilderFactory, ScanPoint};
pub use settings::ProductModelSettings;
pub use validator::{DetectorExtent, ProductValidator};

/// Register a copy of `source` in `group` under `name`.
pub(crate) fn adopt<T: ParameterValue>(
    group: &ParameterGroup,
    name: &str,
    source: &Rc<Parameter<T>>,
) -> crate::error::Result<Rc<Parameter<T>>> {
    Ok(group.add_parameter(name, source.copy())?)
}

/// Copy the value of `source` into `target`, publishing only when `notify`.
pub(crate) fn assign<T: ParameterValue>(target: &Parameter<T>, source: &Parameter<T>, notify: bool) {
    let value = source.get_value();
    if notify {
        target.set_value(value);
    } else {
        target.set_value_silently(value);
    }
}
