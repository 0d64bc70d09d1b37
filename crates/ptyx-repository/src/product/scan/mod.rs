//! Scan sub-entity: probe positions produced by a swappable builder.

pub mod builder;
mod factory;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ptyx_params::{ParameterGroup, Subscriber};

pub use builder::{
    CSV_FILE, CsvScanBuilder, EXPLICIT, ExplicitScanBuilder, RASTER, RasterScanBuilder, ScanBuilder,
    read_position_file,
};
pub use factory::ScanBuilderFactory;

const BUILDER_GROUP: &str = "builder";

/// A probe position, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    pub index: i64,
    pub x_m: f64,
    pub y_m: f64,
}

/// Axis-aligned extent of a set of scan points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub minimum_x_m: f64,
    pub maximum_x_m: f64,
    pub minimum_y_m: f64,
    pub maximum_y_m: f64,
}

impl BoundingBox {
    pub fn of(points: &[ScanPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Self {
            minimum_x_m: first.x_m,
            maximum_x_m: first.x_m,
            minimum_y_m: first.y_m,
            maximum_y_m: first.y_m,
        };
        Some(rest.iter().fold(seed, |bbox, point| Self {
            minimum_x_m: bbox.minimum_x_m.min(point.x_m),
            maximum_x_m: bbox.maximum_x_m.max(point.x_m),
            minimum_y_m: bbox.minimum_y_m.min(point.y_m),
            maximum_y_m: bbox.maximum_y_m.max(point.y_m),
        }))
    }

    pub fn width_m(&self) -> f64 {
        self.maximum_x_m - self.minimum_x_m
    }

    pub fn height_m(&self) -> f64 {
        self.maximum_y_m - self.minimum_y_m
    }
}

struct BuilderListener {
    scan: Weak<Scan>,
}

impl Subscriber for BuilderListener {
    fn on_changed(&self) {
        if let Some(scan) = self.scan.upgrade() {
            scan.rebuild();
        }
    }
}

/// Scan positions plus the builder that produced them.
///
/// The builder's group hangs under this scan's group as `builder`. Builder
/// parameter changes rebuild the positions; the scan group publishes once
/// the new positions are in place. A failing build is logged and keeps the
/// previous positions.
pub struct Scan {
    group: Rc<ParameterGroup>,
    builder: RefCell<Box<dyn ScanBuilder>>,
    positions: RefCell<Vec<ScanPoint>>,
    listener: Rc<BuilderListener>,
}

impl Scan {
    pub fn new(builder: Box<dyn ScanBuilder>) -> Rc<Self> {
        let group = ParameterGroup::new("scan");
        let positions = builder.build().unwrap_or_else(|error| {
            tracing::warn!(builder = builder.name(), %error, "initial scan build failed");
            Vec::new()
        });

        let scan = Rc::new_cyclic(|weak: &Weak<Self>| Self {
            group,
            builder: RefCell::new(builder),
            positions: RefCell::new(positions),
            listener: Rc::new(BuilderListener { scan: weak.clone() }),
        });
        scan.attach_builder();
        scan
    }

    pub fn group(&self) -> &Rc<ParameterGroup> {
        &self.group
    }

    pub fn positions(&self) -> Vec<ScanPoint> {
        self.positions.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.positions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.borrow().is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of(&self.positions.borrow())
    }

    pub fn builder_name(&self) -> &'static str {
        self.builder.borrow().name()
    }

    /// Replace the builder and its positions.
    ///
    /// The new builder is built first; on failure it is discarded and the
    /// current builder and positions stay. Returns whether the swap happened.
    pub fn set_builder(&self, builder: Box<dyn ScanBuilder>) -> bool {
        self.swap_builder(builder, true)
    }

    /// Like [`Scan::set_builder`], without publishing.
    pub fn set_builder_silently(&self, builder: Box<dyn ScanBuilder>) -> bool {
        self.swap_builder(builder, false)
    }

    fn swap_builder(&self, builder: Box<dyn ScanBuilder>, notify: bool) -> bool {
        let positions = match builder.build() {
            Ok(positions) => positions,
            Err(error) => {
                tracing::warn!(builder = builder.name(), %error, "keeping previous scan builder");
                return false;
            }
        };

        self.detach_builder();
        self.builder.replace(builder);
        self.attach_builder();
        self.positions.replace(positions);

        if notify {
            self.group.publisher().publish();
        }
        true
    }

    fn attach_builder(&self) {
        let builder_group = Rc::clone(self.builder.borrow().group());
        builder_group.publisher().add_subscriber(&self.listener);
        if let Err(error) = self.group.add_group(BUILDER_GROUP, builder_group, false) {
            tracing::warn!(%error, "scan builder group not registered");
        }
    }

    fn detach_builder(&self) {
        let builder_group = Rc::clone(self.builder.borrow().group());
        builder_group.publisher().remove_subscriber(&self.listener);
        self.group.remove_group(BUILDER_GROUP);
    }

    fn rebuild(&self) {
        let built = self.builder.borrow().build();
        match built {
            Ok(positions) => {
                self.positions.replace(positions);
                self.group.publisher().publish();
            }
            Err(error) => {
                tracing::warn!(builder = self.builder_name(), %error, "keeping previous scan positions");
            }
        }
    }

    pub fn sync_to_settings(&self) {
        self.builder.borrow().sync_to_settings();
    }
}

impl fmt::Debug for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scan")
            .field("builder", &self.builder_name())
            .field("points", &self.len())
            .finish()
    }
}
