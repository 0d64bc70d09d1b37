use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use ptyx_params::{
    CallbackSubscriber, Parameter, ParameterGroup, ParameterSnapshot, Subscriber, commit,
};

fn publish_counter(parameter: &Parameter<i64>) -> (Rc<Cell<usize>>, Rc<dyn Subscriber>) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let subscriber = CallbackSubscriber::new(move || seen.set(seen.get() + 1));
    parameter.publisher().add_subscriber(&subscriber);
    (count, subscriber)
}

#[test]
fn number_of_slices_reads_back_clamped() {
    let object = ParameterGroup::new("Object");
    let slices = object
        .create_integer_parameter("NumberOfSlices", 1, Some(1), None)
        .expect("create parameter");

    slices.set_value(0);

    assert_eq!(slices.get_value(), 1);
    assert_eq!(slices.raw_value(), 0);
    assert_eq!(slices.get_value_as_string(), "0");
}

#[test]
fn copy_edits_flow_back_through_snapshot_and_sync() {
    let settings = ParameterGroup::new("Probe");
    let modes = settings
        .create_integer_parameter("NumberOfModes", 1, Some(1), Some(8))
        .expect("create parameter");

    let working = modes.copy();
    let snapshot = ParameterSnapshot::of(&working);
    snapshot.working().set_value(4);
    assert_eq!(working.get_value(), 1);

    assert!(commit(&snapshot, &working));
    working.sync_to_parent();
    assert_eq!(modes.get_value(), 4);
}

proptest! {
    #[test]
    fn bounded_reads_stay_in_range(
        value in any::<i64>(),
        lower in -1_000i64..1_000,
        span in 0i64..1_000,
    ) {
        let upper = lower + span;
        let parameter = Parameter::bounded(0, Some(lower), Some(upper));
        parameter.set_value(value);

        let read = parameter.get_value();
        prop_assert!(lower <= read && read <= upper);
        prop_assert_eq!(parameter.raw_value(), value);
    }

    #[test]
    fn real_bounds_hold_for_finite_values(value in -1e12f64..1e12, lower in -10.0f64..10.0) {
        let parameter = Parameter::bounded(0.0, Some(lower), None);
        parameter.set_value(value);
        prop_assert!(parameter.get_value() >= lower);
    }

    // Writing a different out-of-range raw value publishes even though the
    // clamped reading does not move.
    #[test]
    fn change_detection_uses_raw_values(first in 10i64..1_000, second in 10i64..1_000) {
        prop_assume!(first != second);
        let parameter = Parameter::bounded(0, Some(0), Some(5));
        parameter.set_value(first);
        let (count, _guard) = publish_counter(&parameter);

        prop_assert!(parameter.set_value(second));
        prop_assert_eq!(count.get(), 1);
        prop_assert_eq!(parameter.get_value(), 5);
    }

    #[test]
    fn equal_value_is_a_no_op(value in any::<i64>()) {
        let parameter = Parameter::new(value);
        let (count, _guard) = publish_counter(&parameter);

        prop_assert!(!parameter.set_value(value));
        prop_assert_eq!(count.get(), 0);
    }

    #[test]
    fn integer_sequence_text_round_trips(values in prop::collection::vec(any::<i64>(), 0..16)) {
        let parameter = Parameter::new(values.clone());
        let copy = Parameter::new(Vec::<i64>::new());
        copy.set_value_from_string(&parameter.get_value_as_string()).unwrap();
        prop_assert_eq!(copy.get_value(), values);
    }

    #[test]
    fn real_sequence_text_round_trips(values in prop::collection::vec(-1e300f64..1e300, 0..16)) {
        let parameter = Parameter::new(values.clone());
        let copy = Parameter::new(Vec::<f64>::new());
        copy.set_value_from_string(&parameter.get_value_as_string()).unwrap();
        prop_assert_eq!(copy.get_value(), values);
    }
}
