//! Compatibility checks between a product and the measured dataset.
//!
//! Every check reads the current sub-entity state; nothing is cached.

use std::collections::HashSet;

use super::item::Product;

/// Size of the assembled diffraction patterns, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorExtent {
    pub width_px: i64,
    pub height_px: i64,
}

/// Checks a product against the dataset it will be reconstructed from.
#[derive(Debug, Clone)]
pub struct ProductValidator {
    extent: DetectorExtent,
    pattern_indices: Vec<i64>,
}

impl ProductValidator {
    pub fn new(extent: DetectorExtent, pattern_indices: Vec<i64>) -> Self {
        Self {
            extent,
            pattern_indices,
        }
    }

    /// Every assembled pattern index has a scan point.
    pub fn is_scan_compatible(&self, product: &Product) -> bool {
        let scan_indices: HashSet<i64> = product.scan().positions().iter().map(|p| p.index).collect();
        self.pattern_indices
            .iter()
            .all(|index| scan_indices.contains(index))
    }

    /// The probe is sampled on the detector grid with positive pixel sizes.
    pub fn is_probe_compatible(&self, product: &Product) -> bool {
        let probe = product.probe();
        probe.width_px.get_value() == self.extent.width_px
            && probe.height_px.get_value() == self.extent.height_px
            && probe.pixel_width_m.get_value() > 0.0
            && probe.pixel_height_m.get_value() > 0.0
    }

    /// The object covers the probe at every scan position.
    pub fn is_object_compatible(&self, product: &Product) -> bool {
        let object = product.object();
        if object.pixel_width_m.get_value() <= 0.0 || object.pixel_height_m.get_value() <= 0.0 {
            return false;
        }

        let (scan_width_m, scan_height_m) = product
            .scan()
            .bounding_box()
            .map_or((0.0, 0.0), |bbox| (bbox.width_m(), bbox.height_m()));
        let probe = product.probe();

        object.width_m() >= probe.width_m() + scan_width_m
            && object.height_m() >= probe.height_m() + scan_height_m
    }

    pub fn is_valid(&self, product: &Product) -> bool {
        let scan = self.is_scan_compatible(product);
        let probe = self.is_probe_compatible(product);
        let object = self.is_object_compatible(product);
        if !(scan && probe && object) {
            tracing::debug!(name = %product.metadata().name(), scan, probe, object, "product is not valid");
        }
        scan && probe && object
    }
}
