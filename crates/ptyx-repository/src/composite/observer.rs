use std::rc::Rc;

use super::{Composite, CompositeItem};

/// Notification delivered to repository observers.
pub enum RepositoryEvent<'a, C: Composite> {
    /// `item` was appended at `index`.
    Inserted {
        index: usize,
        item: &'a Rc<CompositeItem<C>>,
    },
    /// The `kind` part of the item currently at `index` changed.
    Changed {
        index: usize,
        kind: C::Kind,
        item: &'a Rc<CompositeItem<C>>,
    },
    /// `item` was removed from `index`; later items moved down by one.
    Removed {
        index: usize,
        item: &'a Rc<CompositeItem<C>>,
    },
}

impl<C: Composite> RepositoryEvent<'_, C> {
    pub fn index(&self) -> usize {
        match self {
            Self::Inserted { index, .. } | Self::Changed { index, .. } | Self::Removed { index, .. } => {
                *index
            }
        }
    }
}

/// Receiver of repository events.
pub trait RepositoryObserver<C: Composite> {
    fn handle_event(&self, event: &RepositoryEvent<'_, C>);
}
