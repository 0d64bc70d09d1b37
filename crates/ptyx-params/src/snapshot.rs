//! Detached editing copies of parameters.
//!
//! An editor works on a [`ParameterSnapshot`] and either writes it back with
//! [`commit`] or discards its edits with [`revert`]. Nothing flows between
//! the snapshot and the edited parameter unless one of those is called.

use crate::parameter::Parameter;
use crate::value::ParameterValue;

/// A detached working copy of a parameter plus the value it started from.
#[derive(Debug)]
pub struct ParameterSnapshot<T: ParameterValue> {
    original: T,
    working: Parameter<T>,
}

impl<T: ParameterValue> ParameterSnapshot<T> {
    /// Capture the current value and bounds of `source`.
    pub fn of(source: &Parameter<T>) -> Self {
        Self {
            original: source.get_value(),
            working: source.detached(),
        }
    }

    /// The value captured when the snapshot was taken.
    pub fn original(&self) -> &T {
        &self.original
    }

    /// The editable copy. Editors may subscribe to its publisher.
    pub fn working(&self) -> &Parameter<T> {
        &self.working
    }

    /// Whether the working copy differs from the captured value.
    pub fn is_modified(&self) -> bool {
        self.working.get_value() != self.original
    }
}

/// Write the snapshot's working value into `target`.
///
/// Returns whether `target` changed; `target` publishes as usual.
pub fn commit<T: ParameterValue>(snapshot: &ParameterSnapshot<T>, target: &Parameter<T>) -> bool {
    target.set_value(snapshot.working.get_value())
}

/// Discard edits, restoring the working copy to the captured value.
///
/// Returns whether the working copy changed.
pub fn revert<T: ParameterValue>(snapshot: &ParameterSnapshot<T>) -> bool {
    snapshot.working.set_value(snapshot.original.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_writes_back_only_on_request() {
        let target = Parameter::new(String::from("probe"));
        let snapshot = ParameterSnapshot::of(&target);

        snapshot.working().set_value("object".into());
        assert_eq!(target.get_value(), "probe");
        assert!(snapshot.is_modified());

        assert!(commit(&snapshot, &target));
        assert_eq!(target.get_value(), "object");
    }

    #[test]
    fn test_revert_restores_original() {
        let target = Parameter::new(4_i64);
        let snapshot = ParameterSnapshot::of(&target);

        snapshot.working().set_value(9);
        assert!(revert(&snapshot));
        assert_eq!(snapshot.working().get_value(), 4);
        assert!(!snapshot.is_modified());
        assert!(!commit(&snapshot, &target));
    }

    #[test]
    fn test_snapshot_keeps_bounds() {
        let target = Parameter::bounded(5_i64, Some(1), Some(8));
        let snapshot = ParameterSnapshot::of(&target);

        snapshot.working().set_value(20);
        assert_eq!(snapshot.working().get_value(), 8);
        assert_eq!(*snapshot.original(), 5);
    }
}
