//! Tracking of the selected entry of an [`ItemRepository`].

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ptyx_params::{Parameter, Publisher, Subscriber};

use crate::item_repository::{ItemRepository, NamedItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionSource {
    Repository,
    Settings,
}

struct SelectionForwarder<T: NamedItem + 'static> {
    source: SelectionSource,
    selection: Weak<SelectedItem<T>>,
}

impl<T: NamedItem + 'static> Subscriber for SelectionForwarder<T> {
    fn on_changed(&self) {
        if let Some(selection) = self.selection.upgrade() {
            match self.source {
                SelectionSource::Repository => selection.recover_if_removed(),
                SelectionSource::Settings => selection.sync_from_settings(),
            }
        }
    }
}

/// The currently selected item of a repository, mirrored into a string
/// parameter holding the selected name.
///
/// When the selected item leaves the repository the first remaining item is
/// selected instead. Changes to the name parameter (for example after a
/// settings file is loaded) re-select by name.
pub struct SelectedItem<T: NamedItem + 'static> {
    repository: Rc<ItemRepository<T>>,
    parameter: Rc<Parameter<String>>,
    selected: RefCell<Option<(String, Rc<T>)>>,
    forwarders: Vec<Rc<SelectionForwarder<T>>>,
    publisher: Publisher,
}

impl<T: NamedItem + 'static> SelectedItem<T> {
    /// Select the item named by `parameter`, falling back to the first item.
    pub fn new(repository: Rc<ItemRepository<T>>, parameter: Rc<Parameter<String>>) -> Rc<Self> {
        let selection = Rc::new_cyclic(|weak: &Weak<Self>| {
            let forwarders = [SelectionSource::Repository, SelectionSource::Settings]
                .into_iter()
                .map(|source| {
                    Rc::new(SelectionForwarder {
                        source,
                        selection: weak.clone(),
                    })
                })
                .collect();
            Self {
                repository,
                parameter,
                selected: RefCell::new(None),
                forwarders,
                publisher: Publisher::new(),
            }
        });

        if !selection.select_item(&selection.parameter.get_value()) {
            selection.select_first();
        }

        for forwarder in &selection.forwarders {
            match forwarder.source {
                SelectionSource::Repository => {
                    selection.repository.publisher().add_subscriber(forwarder);
                }
                SelectionSource::Settings => selection.parameter.publisher().add_subscriber(forwarder),
            }
        }

        selection
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selected.borrow().as_ref().map(|(name, _)| name.clone())
    }

    pub fn selected_item(&self) -> Option<Rc<T>> {
        self.selected
            .borrow()
            .as_ref()
            .map(|(_, item)| Rc::clone(item))
    }

    /// Whether `name` exists and its item allows selection.
    pub fn can_select_item(&self, name: &str) -> bool {
        self.repository
            .get(name)
            .is_some_and(|item| item.can_select())
    }

    /// Select `name`. Returns whether `name` is selected afterwards.
    ///
    /// Selecting the current name is a no-op; unknown or unselectable names
    /// are logged and leave the selection as it was.
    pub fn select_item(&self, name: &str) -> bool {
        if self.selected_name().as_deref() == Some(name) {
            return true;
        }

        let Some(item) = self.repository.get(name).filter(|item| item.can_select()) else {
            tracing::warn!(name, "cannot select item");
            return false;
        };

        self.selected.replace(Some((name.to_string(), item)));
        self.sync_to_settings();
        self.publisher.publish();
        true
    }

    /// Re-read the selected name from the settings parameter.
    pub fn sync_from_settings(&self) {
        let name = self.parameter.get_value();
        self.select_item(&name);
    }

    /// Write the selected name into the settings parameter.
    pub fn sync_to_settings(&self) {
        if let Some(name) = self.selected_name() {
            self.parameter.set_value(name);
        }
    }

    fn select_first(&self) {
        match self.repository.first() {
            Some((name, _)) => {
                self.select_item(&name);
            }
            None => {
                if self.selected.replace(None).is_some() {
                    self.publisher.publish();
                }
            }
        }
    }

    fn recover_if_removed(&self) {
        let still_present = self
            .selected_name()
            .is_some_and(|name| self.repository.contains(&name));
        if !still_present {
            self.select_first();
        }
    }
}

impl<T: NamedItem + 'static> fmt::Debug for SelectedItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedItem")
            .field("selected", &self.selected_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Initializer {
        hint: &'static str,
        selectable: bool,
    }

    impl NamedItem for Initializer {
        fn name_hint(&self) -> String {
            self.hint.to_string()
        }

        fn clear_observers(&self) {}

        fn can_select(&self) -> bool {
            self.selectable
        }
    }

    fn repository() -> Rc<ItemRepository<Initializer>> {
        let repository = Rc::new(ItemRepository::new());
        for (hint, selectable) in [("Raster", true), ("Spiral", true), ("Streaming", false)] {
            repository.insert_item(Initializer { hint, selectable });
        }
        repository
    }

    #[test]
    fn test_initial_selection_follows_parameter() {
        let parameter = Rc::new(Parameter::new(String::from("Spiral")));
        let selection = SelectedItem::new(repository(), parameter);
        assert_eq!(selection.selected_name().as_deref(), Some("Spiral"));
    }

    #[test]
    fn test_unknown_parameter_falls_back_to_first() {
        let parameter = Rc::new(Parameter::new(String::from("Lissajous")));
        let selection = SelectedItem::new(repository(), Rc::clone(&parameter));
        assert_eq!(selection.selected_name().as_deref(), Some("Raster"));
        assert_eq!(parameter.get_value(), "Raster");
    }

    #[test]
    fn test_unselectable_item_is_rejected() {
        let parameter = Rc::new(Parameter::new(String::from("Raster")));
        let selection = SelectedItem::new(repository(), parameter);

        assert!(!selection.can_select_item("Streaming"));
        assert!(!selection.select_item("Streaming"));
        assert_eq!(selection.selected_name().as_deref(), Some("Raster"));
    }

    #[test]
    fn test_parameter_change_reselects() {
        let parameter = Rc::new(Parameter::new(String::from("Raster")));
        let selection = SelectedItem::new(repository(), Rc::clone(&parameter));

        parameter.set_value("Spiral".into());
        assert_eq!(selection.selected_name().as_deref(), Some("Spiral"));
    }

    #[test]
    fn test_removed_selection_falls_back_to_first() {
        let repository = repository();
        let parameter = Rc::new(Parameter::new(String::from("Spiral")));
        let selection = SelectedItem::new(Rc::clone(&repository), Rc::clone(&parameter));

        repository.remove_item("Spiral");
        assert_eq!(selection.selected_name().as_deref(), Some("Raster"));
        assert_eq!(parameter.get_value(), "Raster");
    }
}
