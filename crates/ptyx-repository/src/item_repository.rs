//! Keyed store of named items with unique display names.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use ptyx_params::Publisher;

/// An item that can live in an [`ItemRepository`].
pub trait NamedItem {
    /// Preferred display name. The repository may append a numeric suffix.
    fn name_hint(&self) -> String;

    /// Drop every subscription the item holds, called when it is removed.
    fn clear_observers(&self);

    /// Whether the item may become the selected item.
    fn can_select(&self) -> bool {
        true
    }
}

/// Insertion-ordered map of unique display names to items.
///
/// The repository publishes once per insertion and once per removal request,
/// including refused requests. At least one item is always kept.
pub struct ItemRepository<T: NamedItem> {
    items: RefCell<IndexMap<String, Rc<T>>>,
    publisher: Publisher,
}

impl<T: NamedItem> Default for ItemRepository<T> {
    fn default() -> Self {
        Self {
            items: RefCell::new(IndexMap::new()),
            publisher: Publisher::new(),
        }
    }
}

impl<T: NamedItem> ItemRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Store `item` under its name hint, suffixed `-1`, `-2`, ... when taken.
    ///
    /// Returns the name it was stored under.
    pub fn insert_item(&self, item: impl Into<Rc<T>>) -> String {
        let item = item.into();
        let hint = item.name_hint();
        let name = {
            let mut items = self.items.borrow_mut();
            let name = unique_name(&hint, |candidate| items.contains_key(candidate));
            items.insert(name.clone(), item);
            name
        };

        self.publisher.publish();
        name
    }

    /// Whether a removal would keep at least one item. `name` is not checked.
    pub fn can_remove_item(&self, _name: &str) -> bool {
        self.items.borrow().len() > 1
    }

    /// Remove `name` unless that would empty the repository.
    ///
    /// Publishes whether or not anything was removed.
    pub fn remove_item(&self, name: &str) -> Option<Rc<T>> {
        let removed = if self.can_remove_item(name) {
            let removed = self.items.borrow_mut().shift_remove(name);
            match &removed {
                Some(item) => item.clear_observers(),
                None => tracing::debug!(name, "no item to remove"),
            }
            removed
        } else {
            tracing::warn!(name, "refusing to remove the last item");
            None
        };

        self.publisher.publish();
        removed
    }

    pub fn get(&self, name: &str) -> Option<Rc<T>> {
        self.items.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.borrow().contains_key(name)
    }

    /// First item in insertion order.
    pub fn first(&self) -> Option<(String, Rc<T>)> {
        self.items
            .borrow()
            .first()
            .map(|(name, item)| (name.clone(), Rc::clone(item)))
    }

    pub fn names(&self) -> Vec<String> {
        self.items.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T: NamedItem> fmt::Debug for ItemRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRepository")
            .field("names", &self.names())
            .finish()
    }
}

/// `hint`, or `hint-N` for the smallest `N >= 1` that is not taken.
pub(crate) fn unique_name(hint: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut name = hint.to_string();
    let mut suffix = 0;
    while taken(&name) {
        suffix += 1;
        name = format!("{hint}-{suffix}");
    }
    name
}
