//! Probe sub-entity.

use std::rc::Rc;

use ptyx_params::{Parameter, ParameterGroup};

use super::settings::ProbeSettings;
use super::{adopt, assign};
use crate::error::Result;

/// Probe description: mode count and sampling grid.
#[derive(Debug)]
pub struct Probe {
    group: Rc<ParameterGroup>,
    pub number_of_modes: Rc<Parameter<i64>>,
    pub width_px: Rc<Parameter<i64>>,
    pub height_px: Rc<Parameter<i64>>,
    pub pixel_width_m: Rc<Parameter<f64>>,
    pub pixel_height_m: Rc<Parameter<f64>>,
}

impl Probe {
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        let group = ParameterGroup::new("probe");
        Ok(Self {
            number_of_modes: adopt(&group, "number_of_modes", &settings.number_of_modes)?,
            width_px: adopt(&group, "width_px", &settings.width_px)?,
            height_px: adopt(&group, "height_px", &settings.height_px)?,
            pixel_width_m: adopt(&group, "pixel_width_m", &settings.pixel_width_m)?,
            pixel_height_m: adopt(&group, "pixel_height_m", &settings.pixel_height_m)?,
            group,
        })
    }

    pub fn group(&self) -> &Rc<ParameterGroup> {
        &self.group
    }

    pub fn width_m(&self) -> f64 {
        self.width_px.get_value() as f64 * self.pixel_width_m.get_value()
    }

    pub fn height_m(&self) -> f64 {
        self.height_px.get_value() as f64 * self.pixel_height_m.get_value()
    }

    pub fn assign_from(&self, other: &Probe, notify: bool) {
        let _batch = self.group.publisher().batch();
        assign(&self.number_of_modes, &other.number_of_modes, notify);
        assign(&self.width_px, &other.width_px, notify);
        assign(&self.height_px, &other.height_px, notify);
        assign(&self.pixel_width_m, &other.pixel_width_m, notify);
        assign(&self.pixel_height_m, &other.pixel_height_m, notify);
    }

    pub fn sync_to_settings(&self) {
        self.group.sync_to_parents();
    }
}
