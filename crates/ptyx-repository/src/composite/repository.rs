use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::item_repository::unique_name;

use super::{Composite, CompositeItem, RepositoryEvent, RepositoryObserver};

const UNNAMED: &str = "Unnamed";

/// Ordered collection of composite items with a name lookup table.
///
/// After every insertion and removal each item's index equals its position
/// and the lookup table is rebuilt from scratch. The table is also rebuilt
/// before every forwarded change, since a change may rename an item. When two
/// items share a name the lower index wins.
pub struct CompositeRepository<C: Composite> {
    items: RefCell<Vec<Rc<CompositeItem<C>>>>,
    lookup: RefCell<HashMap<String, usize>>,
    observers: RefCell<Vec<Weak<dyn RepositoryObserver<C>>>>,
    self_ref: Weak<Self>,
}

impl<C: Composite> CompositeRepository<C> {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            items: RefCell::new(Vec::new()),
            lookup: RefCell::new(HashMap::new()),
            observers: RefCell::new(Vec::new()),
            self_ref: self_ref.clone(),
        })
    }

    /// Append `composite`, subscribing to its sub-entities.
    pub fn insert(&self, composite: C) -> usize {
        let item = CompositeItem::new(composite, self.self_ref.clone());
        let index = {
            let mut items = self.items.borrow_mut();
            items.push(Rc::clone(&item));
            items.len() - 1
        };
        self.reindex();

        tracing::debug!(index, name = %item.name(), "inserted item");
        self.notify(&RepositoryEvent::Inserted { index, item: &item });
        index
    }

    /// Remove the item at `index`. Out-of-range indices are logged.
    pub fn remove(&self, index: usize) -> Option<Rc<CompositeItem<C>>> {
        let removed = {
            let mut items = self.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        };
        let Some(item) = removed else {
            tracing::warn!(index, len = self.len(), "no item to remove");
            return None;
        };

        item.detach();
        item.set_index(None);
        self.reindex();

        tracing::debug!(index, name = %item.name(), "removed item");
        self.notify(&RepositoryEvent::Removed { index, item: &item });
        Some(item)
    }

    pub(crate) fn forward(&self, item: &Rc<CompositeItem<C>>, kind: C::Kind) {
        let Some(index) = item.index() else {
            tracing::warn!(name = %item.name(), ?kind, "dropping change for item without an index");
            return;
        };

        self.rebuild_lookup();
        self.notify(&RepositoryEvent::Changed { index, kind, item });
    }

    fn reindex(&self) {
        for (index, item) in self.items.borrow().iter().enumerate() {
            item.set_index(Some(index));
        }
        self.rebuild_lookup();
    }

    fn rebuild_lookup(&self) {
        let mut lookup = HashMap::new();
        for (index, item) in self.items.borrow().iter().enumerate() {
            lookup.entry(item.name()).or_insert(index);
        }
        self.lookup.replace(lookup);
    }

    fn notify(&self, event: &RepositoryEvent<'_, C>) {
        let observers: Vec<_> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|observer| observer.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in observers {
            observer.handle_event(event);
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.borrow().get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<String> {
        self.get(index).map(|item| item.name())
    }

    pub fn get(&self, index: usize) -> Option<Rc<CompositeItem<C>>> {
        self.items.borrow().get(index).cloned()
    }

    pub fn items(&self) -> Vec<Rc<CompositeItem<C>>> {
        self.items.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.items.borrow().iter().map(|item| item.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// `candidate` (or `Unnamed` when empty), suffixed `-1`, `-2`, ... until
    /// no stored item uses it.
    pub fn create_unique_name(&self, candidate: &str) -> String {
        let names = self.names();
        let base = if candidate.is_empty() { UNNAMED } else { candidate };
        unique_name(base, |name| names.iter().any(|taken| taken == name))
    }

    pub fn info_text(&self) -> String {
        format!("Total: {}", self.len())
    }

    /// Register an observer. Registering twice is a no-op.
    pub fn add_observer<O: RepositoryObserver<C> + 'static>(&self, observer: &Rc<O>) {
        let weak = Rc::downgrade(observer) as Weak<dyn RepositoryObserver<C>>;
        let mut observers = self.observers.borrow_mut();
        if !observers.iter().any(|existing| Weak::ptr_eq(existing, &weak)) {
            observers.push(weak);
        }
    }

    pub fn remove_observer<O: RepositoryObserver<C> + 'static>(&self, observer: &Rc<O>) {
        let weak = Rc::downgrade(observer) as Weak<dyn RepositoryObserver<C>>;
        self.observers
            .borrow_mut()
            .retain(|existing| !Weak::ptr_eq(existing, &weak));
    }
}

impl<C: Composite> fmt::Debug for CompositeRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeRepository")
            .field("names", &self.names())
            .finish()
    }
}
