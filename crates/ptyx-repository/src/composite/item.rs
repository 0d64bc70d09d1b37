use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use ptyx_params::{ParameterGroup, Subscriber};

use super::{Composite, CompositeRepository};

/// Subscription of an item to one of its sub-entities, tagged with the kind.
struct SubEntityForwarder<C: Composite> {
    kind: C::Kind,
    item: Weak<CompositeItem<C>>,
}

impl<C: Composite> Subscriber for SubEntityForwarder<C> {
    fn on_changed(&self) {
        if let Some(item) = self.item.upgrade() {
            item.handle_sub_entity_changed(self.kind);
        }
    }
}

/// A composite stored in a [`CompositeRepository`].
///
/// The index is written only by the owning repository. It is `None` before
/// insertion completes and after removal.
pub struct CompositeItem<C: Composite> {
    composite: C,
    index: Cell<Option<usize>>,
    repository: Weak<CompositeRepository<C>>,
    subscriptions: RefCell<Vec<(Rc<ParameterGroup>, Rc<SubEntityForwarder<C>>)>>,
}

impl<C: Composite> CompositeItem<C> {
    pub(crate) fn new(composite: C, repository: Weak<CompositeRepository<C>>) -> Rc<Self> {
        let item = Rc::new_cyclic(|weak: &Weak<Self>| {
            let subscriptions = composite
                .sub_entities()
                .into_iter()
                .map(|(kind, group)| {
                    let forwarder = Rc::new(SubEntityForwarder {
                        kind,
                        item: weak.clone(),
                    });
                    (group, forwarder)
                })
                .collect();

            Self {
                composite,
                index: Cell::new(None),
                repository,
                subscriptions: RefCell::new(subscriptions),
            }
        });

        for (group, forwarder) in item.subscriptions.borrow().iter() {
            group.publisher().add_subscriber(forwarder);
        }
        item
    }

    pub fn composite(&self) -> &C {
        &self.composite
    }

    /// Position in the owning repository, if still stored there.
    pub fn index(&self) -> Option<usize> {
        self.index.get()
    }

    pub(crate) fn set_index(&self, index: Option<usize>) {
        self.index.set(index);
    }

    pub fn name(&self) -> String {
        self.composite.name()
    }

    /// Forward a `kind` event for this item to the repository observers.
    ///
    /// Derived values are left untouched; sub-entity changes go through the
    /// forwarders, which invalidate first.
    pub fn notify(self: &Rc<Self>, kind: C::Kind) {
        match self.repository.upgrade() {
            Some(repository) => repository.forward(self, kind),
            None => tracing::debug!(?kind, "item outlived its repository"),
        }
    }

    fn handle_sub_entity_changed(self: &Rc<Self>, kind: C::Kind) {
        self.composite.invalidate();
        self.notify(kind);
    }

    /// Unsubscribe from every sub-entity.
    pub(crate) fn detach(&self) {
        for (group, forwarder) in self.subscriptions.borrow_mut().drain(..) {
            group.publisher().remove_subscriber(&forwarder);
        }
    }
}

impl<C: Composite> fmt::Debug for CompositeItem<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeItem")
            .field("name", &self.name())
            .field("index", &self.index.get())
            .finish()
    }
}
