//! Typed, observable parameter cells.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::observer::Publisher;
use crate::value::{Bounded, ParameterKind, ParameterValue};

/// A typed value cell that publishes whenever its stored value changes.
///
/// Numeric parameters may carry inclusive bounds. The raw value is stored as
/// given and only clamped when read, so change detection in
/// [`Parameter::set_value`] compares raw values.
pub struct Parameter<T: ParameterValue> {
    value: RefCell<T>,
    lower: Option<T>,
    upper: Option<T>,
    parent: Option<Weak<Parameter<T>>>,
    publisher: Publisher,
}

impl<T: ParameterValue> Parameter<T> {
    /// Create an unbounded parameter.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            lower: None,
            upper: None,
            parent: None,
            publisher: Publisher::new(),
        }
    }

    /// Current value, clamped into the bounds for numeric parameters.
    pub fn get_value(&self) -> T {
        self.value
            .borrow()
            .clone()
            .clamp_to(self.lower.as_ref(), self.upper.as_ref())
    }

    /// Stored value without clamping.
    pub fn raw_value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value` and publish if it differs from the raw stored value.
    ///
    /// Returns whether the stored value changed.
    pub fn set_value(&self, value: T) -> bool {
        self.store(value, true)
    }

    /// Store `value` without notifying subscribers.
    pub fn set_value_silently(&self, value: T) -> bool {
        self.store(value, false)
    }

    fn store(&self, value: T, notify: bool) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if current.same_value(&value) {
                return false;
            }
            *current = value;
        }

        if notify {
            self.publisher.publish();
        }
        true
    }

    /// Canonical text form of the raw stored value.
    pub fn get_value_as_string(&self) -> String {
        self.value.borrow().to_text()
    }

    /// Parse `text` and store the result, publishing on change.
    pub fn set_value_from_string(&self, text: &str) -> Result<()> {
        let value = T::from_text(text)?;
        self.set_value(value);
        Ok(())
    }

    pub fn minimum(&self) -> Option<T> {
        self.lower.clone()
    }

    pub fn maximum(&self) -> Option<T> {
        self.upper.clone()
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Create a working copy whose parent is `self`.
    ///
    /// The copy starts with the current (clamped) value and the same bounds;
    /// values only move between the two through [`Parameter::sync_to_parent`]
    /// and [`Parameter::sync_from_parent`].
    pub fn copy(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(self.get_value()),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            parent: Some(Rc::downgrade(self)),
            publisher: Publisher::new(),
        })
    }

    /// A copy with the same value and bounds but no parent and no subscribers.
    pub(crate) fn detached(&self) -> Self {
        Self {
            value: RefCell::new(self.get_value()),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            parent: None,
            publisher: Publisher::new(),
        }
    }

    pub fn has_parent(&self) -> bool {
        self.parent.as_ref().is_some_and(|p| p.strong_count() > 0)
    }

    /// Push the current value into the parent parameter.
    pub fn sync_to_parent(&self) {
        match self.parent.as_ref().and_then(Weak::upgrade) {
            Some(parent) => {
                parent.set_value(self.get_value());
            }
            None => tracing::warn!("sync_to_parent: parameter has no parent"),
        }
    }

    /// Pull the parent's current value into this parameter.
    pub fn sync_from_parent(&self) {
        match self.parent.as_ref().and_then(Weak::upgrade) {
            Some(parent) => {
                self.set_value(parent.get_value());
            }
            None => tracing::warn!("sync_from_parent: parameter has no parent"),
        }
    }
}

impl<T: Bounded> Parameter<T> {
    /// Create a parameter with optional inclusive bounds.
    pub fn bounded(value: T, minimum: Option<T>, maximum: Option<T>) -> Self {
        Self {
            lower: minimum,
            upper: maximum,
            ..Self::new(value)
        }
    }
}

impl<E> Parameter<Vec<E>>
where
    E: Clone + PartialEq,
    Vec<E>: ParameterValue,
{
    pub fn len(&self) -> usize {
        self.value.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.borrow().is_empty()
    }

    /// Element at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<E> {
        self.value.borrow().get(index).cloned()
    }

    /// Replace the element at `index`, publishing if it changed.
    ///
    /// Returns `false` (and logs) when `index` is out of range.
    pub fn set(&self, index: usize, element: E) -> bool {
        {
            let mut values = self.value.borrow_mut();
            let len = values.len();
            if index >= len {
                tracing::debug!(index, len, "sequence index out of range");
                return false;
            }
            let mut updated = values.clone();
            updated[index] = element;
            if values.same_value(&updated) {
                return true;
            }
            *values = updated;
        }

        self.publisher.publish();
        true
    }

    /// Insert before `index`; indices past the end append.
    pub fn insert(&self, index: usize, element: E) {
        {
            let mut values = self.value.borrow_mut();
            let at = index.min(values.len());
            values.insert(at, element);
        }
        self.publisher.publish();
    }

    /// Remove and return the element at `index`, publishing on success.
    pub fn remove(&self, index: usize) -> Option<E> {
        let removed = {
            let mut values = self.value.borrow_mut();
            if index < values.len() {
                Some(values.remove(index))
            } else {
                tracing::debug!(index, len = values.len(), "sequence index out of range");
                None
            }
        };

        if removed.is_some() {
            self.publisher.publish();
        }
        removed
    }
}

impl Parameter<PathBuf> {
    /// The current path with `find` replaced by `replace` when it is a prefix.
    ///
    /// The comparison is lexical; the filesystem is not consulted.
    pub fn change_path_prefix(&self, find: &Path, replace: &Path) -> PathBuf {
        let value = self.get_value();
        match value.strip_prefix(find) {
            Ok(relative) => replace.join(relative),
            Err(_) => value,
        }
    }
}

impl<T: ParameterValue> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("kind", &T::KIND)
            .field("value", &*self.value.borrow())
            .field("minimum", &self.lower)
            .field("maximum", &self.upper)
            .field("has_parent", &self.has_parent())
            .finish()
    }
}

/// Type-erased view of a [`Parameter`], as stored by groups.
pub trait AnyParameter {
    fn kind(&self) -> ParameterKind;
    fn value_as_string(&self) -> String;
    fn assign_from_string(&self, text: &str) -> Result<()>;
    fn publisher(&self) -> &Publisher;
    fn sync_to_parent(&self);
    fn sync_from_parent(&self);
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: ParameterValue> AnyParameter for Parameter<T> {
    fn kind(&self) -> ParameterKind {
        T::KIND
    }

    fn value_as_string(&self) -> String {
        self.get_value_as_string()
    }

    fn assign_from_string(&self, text: &str) -> Result<()> {
        self.set_value_from_string(text)
    }

    fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    fn sync_to_parent(&self) {
        Parameter::sync_to_parent(self);
    }

    fn sync_from_parent(&self) {
        Parameter::sync_from_parent(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl fmt::Debug for dyn AnyParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyParameter")
            .field("kind", &self.kind())
            .field("value", &self.value_as_string())
            .finish()
    }
}
