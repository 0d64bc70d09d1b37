use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use ptyx_params::SettingsRegistry;
use ptyx_repository::product::scan::{ExplicitScanBuilder, RasterScanBuilder, ScanPoint};
use ptyx_repository::{
    Product, ProductFactory, ProductPart, ProductRepository, RepositoryEvent, RepositoryObserver,
};

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<(&'static str, usize, Option<ProductPart>)>>,
}

impl Recorder {
    fn take(&self) -> Vec<(&'static str, usize, Option<ProductPart>)> {
        self.events.take()
    }
}

impl RepositoryObserver<Product> for Recorder {
    fn handle_event(&self, event: &RepositoryEvent<'_, Product>) {
        let entry = match event {
            RepositoryEvent::Inserted { index, .. } => ("inserted", *index, None),
            RepositoryEvent::Changed { index, kind, .. } => ("changed", *index, Some(*kind)),
            RepositoryEvent::Removed { index, .. } => ("removed", *index, None),
        };
        self.events.borrow_mut().push(entry);
    }
}

struct Fixture {
    _registry: SettingsRegistry,
    factory: ProductFactory,
    products: Rc<ProductRepository>,
    recorder: Rc<Recorder>,
}

fn fixture(names: &[&str]) -> Fixture {
    let registry = SettingsRegistry::new();
    let factory = ProductFactory::new(&registry).expect("register product settings");
    let products = ProductRepository::new();
    let recorder = Rc::new(Recorder::default());
    products.add_observer(&recorder);

    for name in names {
        factory.insert_product(&products, name).expect("insert product");
    }
    recorder.take();

    Fixture {
        _registry: registry,
        factory,
        products,
        recorder,
    }
}

#[test]
fn removing_middle_product_reindexes() {
    let fixture = fixture(&["A", "B", "C"]);

    let removed = fixture.products.remove(1).expect("remove B");
    assert_eq!(removed.name(), "B");
    assert_eq!(fixture.products.names(), vec!["A", "C"]);
    assert_eq!(fixture.products.index_of("C"), Some(1));
    assert_eq!(fixture.recorder.take(), vec![("removed", 1, None)]);
}

#[test]
fn sub_entity_change_clears_costs_and_forwards_live_index() {
    let fixture = fixture(&["A", "B"]);
    let b = fixture.products.get(1).expect("product B");
    b.set_costs(vec![3.0, 2.0, 1.0]);
    fixture.products.remove(0);
    fixture.recorder.take();

    b.composite().probe().width_px.set_value(32);

    assert!(b.composite().costs().is_empty());
    assert_eq!(
        fixture.recorder.take(),
        vec![("changed", 0, Some(ProductPart::Probe))]
    );
}

#[test]
fn set_costs_forwards_costs_event() {
    let fixture = fixture(&["A"]);
    let a = fixture.products.get(0).expect("product A");

    a.set_costs(vec![1.5, 0.5]);

    assert_eq!(a.composite().costs(), vec![1.5, 0.5]);
    assert_eq!(
        fixture.recorder.take(),
        vec![("changed", 0, Some(ProductPart::Costs))]
    );
}

#[test]
fn scan_builder_change_forwards_one_scan_event() {
    let fixture = fixture(&["A"]);
    let a = fixture.products.get(0).expect("product A");
    let raster = RasterScanBuilder::new(fixture.factory.scan_builders().settings()).expect("raster");
    let points_x = Rc::clone(&raster.number_of_points_x);
    assert!(a.composite().scan().set_builder(Box::new(raster)));
    fixture.recorder.take();

    points_x.set_value(2);

    assert_eq!(a.composite().scan().len(), 20);
    assert_eq!(
        fixture.recorder.take(),
        vec![("changed", 0, Some(ProductPart::Scan))]
    );
}

#[test]
fn failing_builder_keeps_previous_scan() {
    let fixture = fixture(&["A"]);
    let a = fixture.products.get(0).expect("product A");
    let before = a.composite().scan().positions();

    let broken = ExplicitScanBuilder::new(fixture.factory.scan_builders().settings()).expect("explicit");
    broken.x_m.set_value(vec![0.0, 1.0]);

    assert!(!a.composite().scan().set_builder(Box::new(broken)));
    assert_eq!(a.composite().scan().positions(), before);
    assert!(fixture.recorder.take().is_empty());
}

#[test]
fn silent_assignment_copies_state_without_events() {
    let fixture = fixture(&["A", "B"]);
    let a = fixture.products.get(0).expect("product A");
    let b = fixture.products.get(1).expect("product B");

    let points = [
        ScanPoint { index: 0, x_m: 0.0, y_m: 0.0 },
        ScanPoint { index: 1, x_m: 1e-6, y_m: 0.0 },
    ];
    let explicit = ExplicitScanBuilder::from_points(fixture.factory.scan_builders().settings(), &points)
        .expect("explicit");
    b.composite().scan().set_builder(Box::new(explicit));
    b.composite().probe().number_of_modes.set_value(3);
    b.set_costs(vec![7.0]);
    fixture.recorder.take();

    a.assign_item(b.composite(), fixture.factory.scan_builders(), false);

    assert_eq!(a.name(), "A");
    assert_eq!(a.composite().probe().number_of_modes.get_value(), 3);
    assert_eq!(a.composite().scan().positions(), points.to_vec());
    assert_eq!(a.composite().costs(), vec![7.0]);
    assert!(fixture.recorder.take().is_empty());
}

#[test]
fn rename_uniquifies_and_updates_lookup() {
    let fixture = fixture(&["A", "B"]);

    assert_eq!(fixture.products.rename_product(1, "A").as_deref(), Some("A-1"));
    assert_eq!(fixture.products.index_of("A-1"), Some(1));
    assert_eq!(fixture.products.index_of("B"), None);
    assert_eq!(
        fixture.recorder.take(),
        vec![("changed", 1, Some(ProductPart::Metadata))]
    );
    assert_eq!(fixture.products.rename_product(5, "X"), None);
}

#[test]
fn sync_to_settings_updates_defaults() {
    let fixture = fixture(&["A"]);
    let a = fixture.products.get(0).expect("product A");
    a.composite().object().number_of_slices.set_value(4);

    assert!(fixture.products.sync_to_settings(0));
    assert_eq!(fixture.factory.settings().object.number_of_slices.get_value(), 4);
    assert_eq!(fixture.factory.settings().product.name.get_value(), "A");
    assert!(!fixture.products.sync_to_settings(3));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn removal_shifts_later_products_down((count, removed) in (1usize..8).prop_flat_map(|n| (Just(n), 0..n))) {
        let names: Vec<String> = (0..count).map(|i| format!("P{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let fixture = fixture(&name_refs);

        fixture.products.remove(removed).expect("remove product");

        let mut expected = names.clone();
        expected.remove(removed);
        prop_assert_eq!(fixture.products.names(), expected.clone());
        for (position, name) in expected.iter().enumerate() {
            prop_assert_eq!(fixture.products.index_of(name), Some(position));
            let item = fixture.products.get(position).expect("product");
            prop_assert_eq!(item.index(), Some(position));
        }
        prop_assert_eq!(fixture.products.index_of(&names[removed]), None);
        prop_assert_eq!(fixture.recorder.take(), vec![("removed", removed, None)]);
    }
}
