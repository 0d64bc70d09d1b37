//! Descriptive product metadata.

use std::rc::Rc;

use ptyx_params::{Parameter, ParameterGroup};

use super::settings::ProductSettings;
use super::{adopt, assign};
use crate::error::Result;

/// Name, comments and acquisition metadata of a product.
#[derive(Debug)]
pub struct Metadata {
    group: Rc<ParameterGroup>,
    pub name: Rc<Parameter<String>>,
    pub comments: Rc<Parameter<String>>,
    pub detector_distance_m: Rc<Parameter<f64>>,
    pub probe_energy_ev: Rc<Parameter<f64>>,
    pub probe_photon_count: Rc<Parameter<f64>>,
    pub exposure_time_s: Rc<Parameter<f64>>,
}

impl Metadata {
    /// New metadata seeded from the settings, named `name`.
    pub fn new(settings: &ProductSettings, name: &str) -> Result<Self> {
        let group = ParameterGroup::new("metadata");
        let metadata = Self {
            name: adopt(&group, "name", &settings.name)?,
            comments: group.create_string_parameter("comments", "")?,
            detector_distance_m: adopt(&group, "detector_distance_m", &settings.detector_distance_m)?,
            probe_energy_ev: adopt(&group, "probe_energy_eV", &settings.probe_energy_ev)?,
            probe_photon_count: adopt(&group, "probe_photon_count", &settings.probe_photon_count)?,
            exposure_time_s: adopt(&group, "exposure_time_s", &settings.exposure_time_s)?,
            group,
        };
        metadata.name.set_value_silently(name.to_string());
        Ok(metadata)
    }

    pub fn group(&self) -> &Rc<ParameterGroup> {
        &self.group
    }

    pub fn name(&self) -> String {
        self.name.get_value()
    }

    /// Copy every value from `other`; the name is left alone.
    pub fn assign_from(&self, other: &Metadata, notify: bool) {
        let _batch = self.group.publisher().batch();
        assign(&self.comments, &other.comments, notify);
        assign(&self.detector_distance_m, &other.detector_distance_m, notify);
        assign(&self.probe_energy_ev, &other.probe_energy_ev, notify);
        assign(&self.probe_photon_count, &other.probe_photon_count, notify);
        assign(&self.exposure_time_s, &other.exposure_time_s, notify);
    }

    pub fn sync_to_settings(&self) {
        self.name.sync_to_parent();
        self.detector_distance_m.sync_to_parent();
        self.probe_energy_ev.sync_to_parent();
        self.probe_photon_count.sync_to_parent();
        self.exposure_time_s.sync_to_parent();
    }
}
