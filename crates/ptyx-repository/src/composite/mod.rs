//! Ordered, index-stable repository of composite items.
//!
//! A composite aggregates several named sub-entities, each backed by a
//! [`ParameterGroup`](ptyx_params::ParameterGroup). The repository wraps every
//! composite in a [`CompositeItem`] that carries its live index and one
//! forwarder per sub-entity kind, so change events reach repository observers
//! tagged with the kind and the index the item holds *at that moment*.

mod item;
mod observer;
mod repository;

use std::fmt;
use std::rc::Rc;

use ptyx_params::ParameterGroup;

pub use item::CompositeItem;
pub use observer::{RepositoryEvent, RepositoryObserver};
pub use repository::CompositeRepository;

/// A value made of tagged sub-entities.
pub trait Composite: 'static {
    /// Tag naming each sub-entity kind, plus any item-level event kinds.
    type Kind: Copy + Eq + fmt::Debug + 'static;

    /// Display name, used as the repository lookup key.
    fn name(&self) -> String;

    /// The observed sub-entities with their tags.
    fn sub_entities(&self) -> Vec<(Self::Kind, Rc<ParameterGroup>)>;

    /// Reset derived values after any sub-entity changed.
    fn invalidate(&self);
}
