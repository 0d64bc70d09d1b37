//! Settings groups holding the defaults for new products.
//!
//! Every per-product parameter is a `copy()` of one of these, so
//! `sync_to_settings` on a product writes its values back here.

use std::path::PathBuf;
use std::rc::Rc;

use ptyx_params::{Parameter, ParameterGroup, SettingsRegistry};

use crate::error::Result;

pub const PRODUCT_GROUP: &str = "Product";
pub const SCAN_GROUP: &str = "Scan";
pub const PROBE_GROUP: &str = "Probe";
pub const OBJECT_GROUP: &str = "Object";

#[derive(Debug)]
pub struct ProductSettings {
    pub group: Rc<ParameterGroup>,
    pub name: Rc<Parameter<String>>,
    pub detector_distance_m: Rc<Parameter<f64>>,
    pub probe_energy_ev: Rc<Parameter<f64>>,
    pub probe_photon_count: Rc<Parameter<f64>>,
    pub exposure_time_s: Rc<Parameter<f64>>,
}

impl ProductSettings {
    pub fn new(registry: &SettingsRegistry) -> Result<Self> {
        let group = registry.create_group(PRODUCT_GROUP)?;
        Ok(Self {
            name: group.create_string_parameter("Name", "Unnamed")?,
            detector_distance_m: group.create_real_parameter(
                "DetectorDistanceInMeters",
                1.0,
                Some(0.0),
                None,
            )?,
            probe_energy_ev: group.create_real_parameter(
                "ProbeEnergyInElectronVolts",
                10_000.0,
                Some(0.0),
                None,
            )?,
            probe_photon_count: group.create_real_parameter(
                "ProbePhotonCount",
                0.0,
                Some(0.0),
                None,
            )?,
            exposure_time_s: group.create_real_parameter(
                "ExposureTimeInSeconds",
                0.0,
                Some(0.0),
                None,
            )?,
            group,
        })
    }
}

#[derive(Debug)]
pub struct ScanSettings {
    pub group: Rc<ParameterGroup>,
    pub builder: Rc<Parameter<String>>,
    pub number_of_points_x: Rc<Parameter<i64>>,
    pub number_of_points_y: Rc<Parameter<i64>>,
    pub step_size_x_m: Rc<Parameter<f64>>,
    pub step_size_y_m: Rc<Parameter<f64>>,
    pub input_file_path: Rc<Parameter<PathBuf>>,
}

impl ScanSettings {
    pub fn new(registry: &SettingsRegistry) -> Result<Self> {
        let group = registry.create_group(SCAN_GROUP)?;
        Ok(Self {
            builder: group.create_string_parameter("Builder", "raster")?,
            number_of_points_x: group.create_integer_parameter("NumberOfPointsX", 10, Some(1), None)?,
            number_of_points_y: group.create_integer_parameter("NumberOfPointsY", 10, Some(1), None)?,
            step_size_x_m: group.create_real_parameter("StepSizeXInMeters", 1e-6, Some(0.0), None)?,
            step_size_y_m: group.create_real_parameter("StepSizeYInMeters", 1e-6, Some(0.0), None)?,
            input_file_path: group.create_path_parameter("InputFilePath", "/path/to/scan.csv")?,
            group,
        })
    }
}

#[derive(Debug)]
pub struct ProbeSettings {
    pub group: Rc<ParameterGroup>,
    pub number_of_modes: Rc<Parameter<i64>>,
    pub width_px: Rc<Parameter<i64>>,
    pub height_px: Rc<Parameter<i64>>,
    pub pixel_width_m: Rc<Parameter<f64>>,
    pub pixel_height_m: Rc<Parameter<f64>>,
}

impl ProbeSettings {
    pub fn new(registry: &SettingsRegistry) -> Result<Self> {
        let group = registry.create_group(PROBE_GROUP)?;
        Ok(Self {
            number_of_modes: group.create_integer_parameter("NumberOfModes", 1, Some(1), None)?,
            width_px: group.create_integer_parameter("WidthInPixels", 64, Some(1), None)?,
            height_px: group.create_integer_parameter("HeightInPixels", 64, Some(1), None)?,
            pixel_width_m: group.create_real_parameter("PixelWidthInMeters", 1e-8, Some(0.0), None)?,
            pixel_height_m: group.create_real_parameter("PixelHeightInMeters", 1e-8, Some(0.0), None)?,
            group,
        })
    }
}

#[derive(Debug)]
pub struct ObjectSettings {
    pub group: Rc<ParameterGroup>,
    pub number_of_slices: Rc<Parameter<i64>>,
    pub layer_distance_m: Rc<Parameter<Vec<f64>>>,
    pub width_px: Rc<Parameter<i64>>,
    pub height_px: Rc<Parameter<i64>>,
    pub pixel_width_m: Rc<Parameter<f64>>,
    pub pixel_height_m: Rc<Parameter<f64>>,
}

impl ObjectSettings {
    pub fn new(registry: &SettingsRegistry) -> Result<Self> {
        let group = registry.create_group(OBJECT_GROUP)?;
        Ok(Self {
            number_of_slices: group.create_integer_parameter("NumberOfSlices", 1, Some(1), None)?,
            layer_distance_m: group.create_real_sequence_parameter("LayerDistanceInMeters", Vec::new())?,
            width_px: group.create_integer_parameter("WidthInPixels", 1024, Some(1), None)?,
            height_px: group.create_integer_parameter("HeightInPixels", 1024, Some(1), None)?,
            pixel_width_m: group.create_real_parameter("PixelWidthInMeters", 1e-8, Some(0.0), None)?,
            pixel_height_m: group.create_real_parameter("PixelHeightInMeters", 1e-8, Some(0.0), None)?,
            group,
        })
    }
}

/// All product settings groups, registered together.
#[derive(Debug, Clone)]
pub struct ProductModelSettings {
    pub product: Rc<ProductSettings>,
    pub scan: Rc<ScanSettings>,
    pub probe: Rc<ProbeSettings>,
    pub object: Rc<ObjectSettings>,
}

impl ProductModelSettings {
    pub fn register(registry: &SettingsRegistry) -> Result<Self> {
        Ok(Self {
            product: Rc::new(ProductSettings::new(registry)?),
            scan: Rc::new(ScanSettings::new(registry)?),
            probe: Rc::new(ProbeSettings::new(registry)?),
            object: Rc::new(ObjectSettings::new(registry)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_creates_groups_in_order() {
        let registry = SettingsRegistry::new();
        ProductModelSettings::register(&registry).unwrap();
        assert_eq!(
            registry.group_names(),
            vec![PRODUCT_GROUP, SCAN_GROUP, PROBE_GROUP, OBJECT_GROUP]
        );
    }

    #[test]
    fn test_register_twice_fails() {
        let registry = SettingsRegistry::new();
        ProductModelSettings::register(&registry).unwrap();
        assert!(ProductModelSettings::register(&registry).is_err());
    }

    #[test]
    fn test_slice_count_defaults_and_clamps() {
        let registry = SettingsRegistry::new();
        let settings = ObjectSettings::new(&registry).unwrap();
        settings.number_of_slices.set_value(0);
        assert_eq!(settings.number_of_slices.get_value(), 1);
    }
}
