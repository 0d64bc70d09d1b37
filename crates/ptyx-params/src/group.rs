//! Named tree nodes aggregating parameters and nested groups.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::complex::Complex64;
use crate::error::{ParamsError, Result};
use crate::observer::{Publisher, Subscriber};
use crate::parameter::{AnyParameter, Parameter};
use crate::value::ParameterValue;

struct ChildGroup {
    group: Rc<ParameterGroup>,
    observed: bool,
}

/// A named node holding parameters and child groups.
///
/// The group subscribes to every parameter it registers (and to child groups
/// added with `observe`), re-publishing their changes as its own. Names are
/// unique within each of the two maps; iteration follows registration order.
pub struct ParameterGroup {
    name: String,
    parameters: RefCell<IndexMap<String, Rc<dyn AnyParameter>>>,
    groups: RefCell<IndexMap<String, ChildGroup>>,
    publisher: Publisher,
    self_ref: Weak<ParameterGroup>,
}

impl ParameterGroup {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        let name = name.into();
        Rc::new_cyclic(|self_ref| Self {
            name,
            parameters: RefCell::new(IndexMap::new()),
            groups: RefCell::new(IndexMap::new()),
            publisher: Publisher::new(),
            self_ref: self_ref.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    fn as_subscriber(&self) -> Weak<dyn Subscriber> {
        self.self_ref.clone() as Weak<dyn Subscriber>
    }

    // -------------------------------------------------------------------------
    // Parameters
    // -------------------------------------------------------------------------

    /// Register an existing parameter (typically a `copy()` of a settings
    /// parameter) under `name`.
    pub fn add_parameter<T: ParameterValue>(
        &self,
        name: &str,
        parameter: Rc<Parameter<T>>,
    ) -> Result<Rc<Parameter<T>>> {
        self.register(name, Rc::clone(&parameter) as Rc<dyn AnyParameter>)?;
        Ok(parameter)
    }

    fn register(&self, name: &str, parameter: Rc<dyn AnyParameter>) -> Result<()> {
        let mut parameters = self.parameters.borrow_mut();
        if parameters.contains_key(name) {
            return Err(ParamsError::duplicate("parameter", name));
        }
        parameter.publisher().add_subscriber_weak(self.as_subscriber());
        parameters.insert(name.to_string(), parameter);
        Ok(())
    }

    /// Unregister a parameter, returning it. Unknown names are logged.
    pub fn remove_parameter(&self, name: &str) -> Option<Rc<dyn AnyParameter>> {
        let removed = self.parameters.borrow_mut().shift_remove(name);
        match &removed {
            Some(parameter) => parameter
                .publisher()
                .remove_subscriber_weak(&self.as_subscriber()),
            None => tracing::debug!(group = %self.name, name, "no parameter to remove"),
        }
        removed
    }

    fn create<T: ParameterValue>(&self, name: &str, parameter: Parameter<T>) -> Result<Rc<Parameter<T>>> {
        self.add_parameter(name, Rc::new(parameter))
    }

    pub fn create_string_parameter(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Rc<Parameter<String>>> {
        self.create(name, Parameter::new(value.into()))
    }

    pub fn create_path_parameter(
        &self,
        name: &str,
        value: impl Into<PathBuf>,
    ) -> Result<Rc<Parameter<PathBuf>>> {
        self.create(name, Parameter::new(value.into()))
    }

    pub fn create_uuid_parameter(&self, name: &str, value: Uuid) -> Result<Rc<Parameter<Uuid>>> {
        self.create(name, Parameter::new(value))
    }

    pub fn create_boolean_parameter(&self, name: &str, value: bool) -> Result<Rc<Parameter<bool>>> {
        self.create(name, Parameter::new(value))
    }

    pub fn create_integer_parameter(
        &self,
        name: &str,
        value: i64,
        minimum: Option<i64>,
        maximum: Option<i64>,
    ) -> Result<Rc<Parameter<i64>>> {
        self.create(name, Parameter::bounded(value, minimum, maximum))
    }

    pub fn create_real_parameter(
        &self,
        name: &str,
        value: f64,
        minimum: Option<f64>,
        maximum: Option<f64>,
    ) -> Result<Rc<Parameter<f64>>> {
        self.create(name, Parameter::bounded(value, minimum, maximum))
    }

    pub fn create_integer_sequence_parameter(
        &self,
        name: &str,
        value: impl Into<Vec<i64>>,
    ) -> Result<Rc<Parameter<Vec<i64>>>> {
        self.create(name, Parameter::new(value.into()))
    }

    pub fn create_real_sequence_parameter(
        &self,
        name: &str,
        value: impl Into<Vec<f64>>,
    ) -> Result<Rc<Parameter<Vec<f64>>>> {
        self.create(name, Parameter::new(value.into()))
    }

    pub fn create_complex_sequence_parameter(
        &self,
        name: &str,
        value: impl Into<Vec<Complex64>>,
    ) -> Result<Rc<Parameter<Vec<Complex64>>>> {
        self.create(name, Parameter::new(value.into()))
    }

    /// Type-erased parameter lookup.
    pub fn parameter(&self, name: &str) -> Option<Rc<dyn AnyParameter>> {
        self.parameters.borrow().get(name).cloned()
    }

    /// Typed parameter lookup; `None` when missing or of another type.
    pub fn get_parameter<T: ParameterValue>(&self, name: &str) -> Option<Rc<Parameter<T>>> {
        let parameter = self.parameter(name)?;
        parameter.into_any().downcast::<Parameter<T>>().ok()
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.borrow().keys().cloned().collect()
    }

    /// Parameters in registration order.
    pub fn parameters(&self) -> Vec<(String, Rc<dyn AnyParameter>)> {
        self.parameters
            .borrow()
            .iter()
            .map(|(name, parameter)| (name.clone(), Rc::clone(parameter)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.parameters.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.borrow().is_empty()
    }

    /// Push every parameter's value into its parent parameter.
    pub fn sync_to_parents(&self) {
        for (_, parameter) in self.parameters() {
            parameter.sync_to_parent();
        }
    }

    // -------------------------------------------------------------------------
    // Child groups
    // -------------------------------------------------------------------------

    /// Create a child group. Its changes do not bubble up to this group.
    pub fn create_group(&self, name: &str) -> Result<Rc<ParameterGroup>> {
        let group = ParameterGroup::new(name);
        self.add_group(name, Rc::clone(&group), false)?;
        Ok(group)
    }

    /// Create a child group whose changes are re-published by this group.
    pub fn create_observed_group(&self, name: &str) -> Result<Rc<ParameterGroup>> {
        let group = ParameterGroup::new(name);
        self.add_group(name, Rc::clone(&group), true)?;
        Ok(group)
    }

    /// Register an existing group under `name`, optionally observing it.
    pub fn add_group(&self, name: &str, group: Rc<ParameterGroup>, observe: bool) -> Result<()> {
        let mut groups = self.groups.borrow_mut();
        if groups.contains_key(name) {
            return Err(ParamsError::duplicate("group", name));
        }
        if observe {
            group.publisher.add_subscriber_weak(self.as_subscriber());
        }
        groups.insert(
            name.to_string(),
            ChildGroup {
                group,
                observed: observe,
            },
        );
        Ok(())
    }

    /// Unregister a child group, returning it. Unknown names are logged.
    pub fn remove_group(&self, name: &str) -> Option<Rc<ParameterGroup>> {
        let removed = self.groups.borrow_mut().shift_remove(name);
        match removed {
            Some(child) => {
                if child.observed {
                    child
                        .group
                        .publisher
                        .remove_subscriber_weak(&self.as_subscriber());
                }
                Some(child.group)
            }
            None => {
                tracing::debug!(group = %self.name, name, "no child group to remove");
                None
            }
        }
    }

    /// Look up a child group. Unknown names are logged and yield `None`.
    pub fn get_group(&self, name: &str) -> Option<Rc<ParameterGroup>> {
        let group = self
            .groups
            .borrow()
            .get(name)
            .map(|child| Rc::clone(&child.group));
        if group.is_none() {
            tracing::debug!(group = %self.name, name, "child group not found");
        }
        group
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.borrow().keys().cloned().collect()
    }

    /// Child groups in registration order.
    pub fn groups(&self) -> Vec<(String, Rc<ParameterGroup>)> {
        self.groups
            .borrow()
            .iter()
            .map(|(name, child)| (name.clone(), Rc::clone(&child.group)))
            .collect()
    }
}

impl Subscriber for ParameterGroup {
    fn on_changed(&self) {
        self.publisher.publish();
    }
}

impl fmt::Debug for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterGroup")
            .field("name", &self.name)
            .field("parameters", &self.parameter_names())
            .field("groups", &self.group_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::CallbackSubscriber;
    use std::cell::Cell;

    fn watch(publisher: &Publisher) -> (Rc<Cell<usize>>, Rc<impl Subscriber>) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let subscriber = CallbackSubscriber::new(move || seen.set(seen.get() + 1));
        publisher.add_subscriber(&subscriber);
        (count, subscriber)
    }

    #[test]
    fn test_scenario_bounded_slice_count() {
        let object = ParameterGroup::new("Object");
        let slices = object
            .create_integer_parameter("NumberOfSlices", 1, Some(1), None)
            .unwrap();

        slices.set_value(0);
        assert_eq!(slices.get_value(), 1);
    }

    #[test]
    fn test_parameter_change_bubbles_to_group() {
        let group = ParameterGroup::new("Detector");
        let width = group
            .create_integer_parameter("WidthInPixels", 1024, Some(1), None)
            .unwrap();
        let (count, _subscriber) = watch(group.publisher());

        width.set_value(512);
        assert_eq!(count.get(), 1);

        width.set_value(512);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_duplicate_parameter_name_fails() {
        let group = ParameterGroup::new("Patterns");
        group.create_string_parameter("FileType", "NeXus").unwrap();

        let err = group.create_boolean_parameter("FileType", true).unwrap_err();
        assert!(matches!(
            err,
            ParamsError::DuplicateName {
                scope: "parameter",
                ..
            }
        ));
        let kept = group.get_parameter::<String>("FileType").unwrap();
        assert_eq!(kept.get_value(), "NeXus");
    }

    #[test]
    fn test_duplicate_group_name_fails() {
        let group = ParameterGroup::new("Scan");
        group.create_group("builder").unwrap();
        assert!(group.create_observed_group("builder").is_err());
    }

    #[test]
    fn test_unobserved_child_does_not_bubble() {
        let parent = ParameterGroup::new("Product");
        let child = parent.create_group("metadata").unwrap();
        let comments = child.create_string_parameter("comments", "").unwrap();
        let (count, _subscriber) = watch(parent.publisher());

        comments.set_value("beam dump at 12:00".into());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_observed_child_bubbles() {
        let parent = ParameterGroup::new("Scan");
        let builder = parent.create_observed_group("builder").unwrap();
        let step = builder
            .create_real_parameter("StepSizeXInMeters", 1e-6, Some(0.0), None)
            .unwrap();
        let (count, _subscriber) = watch(parent.publisher());

        step.set_value(2e-6);
        assert_eq!(count.get(), 1);

        parent.remove_group("builder");
        step.set_value(3e-6);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_get_group_missing_is_none() {
        let group = ParameterGroup::new("Probe");
        assert!(group.get_group("missing").is_none());
        assert!(group.remove_group("missing").is_none());
        assert!(group.remove_parameter("missing").is_none());
    }

    #[test]
    fn test_remove_parameter_unsubscribes() {
        let group = ParameterGroup::new("Object");
        let thickness = group
            .create_real_parameter("LayerDistanceInMeters", 1e-6, Some(0.0), None)
            .unwrap();
        let (count, _subscriber) = watch(group.publisher());

        assert!(group.remove_parameter("LayerDistanceInMeters").is_some());
        thickness.set_value(5e-6);
        assert_eq!(count.get(), 0);
        assert!(group.is_empty());
    }

    #[test]
    fn test_typed_lookup_rejects_wrong_type() {
        let group = ParameterGroup::new("Reconstructor");
        group.create_real_parameter("Alpha", 0.5, None, None).unwrap();

        assert!(group.get_parameter::<f64>("Alpha").is_some());
        assert!(group.get_parameter::<i64>("Alpha").is_none());
        assert!(group.get_parameter::<f64>("Beta").is_none());
    }

    #[test]
    fn test_names_follow_registration_order() {
        let group = ParameterGroup::new("Patterns");
        group.create_boolean_parameter("CropEnabled", true).unwrap();
        group.create_integer_parameter("CropWidthInPixels", 64, Some(1), None).unwrap();
        group.create_path_parameter("FilePath", "/path/to/data.h5").unwrap();

        assert_eq!(
            group.parameter_names(),
            vec!["CropEnabled", "CropWidthInPixels", "FilePath"]
        );
    }

    #[test]
    fn test_sync_to_parents_pushes_copies() {
        let settings = ParameterGroup::new("Product");
        let defaults = settings
            .create_real_parameter("ProbeEnergyInElectronVolts", 10_000.0, Some(0.0), None)
            .unwrap();

        let item = ParameterGroup::new("metadata");
        let energy = item
            .add_parameter("probe_energy_eV", defaults.copy())
            .unwrap();
        energy.set_value(8_000.0);
        item.sync_to_parents();

        assert_eq!(defaults.get_value(), 8_000.0);
    }
}
