//! Object sub-entity.

use std::rc::Rc;

use ptyx_params::{Parameter, ParameterGroup};

use super::settings::ObjectSettings;
use super::{adopt, assign};
use crate::error::Result;

/// Object description: slice layout and sampling grid.
#[derive(Debug)]
pub struct Object {
    group: Rc<ParameterGroup>,
    pub number_of_slices: Rc<Parameter<i64>>,
    pub layer_distance_m: Rc<Parameter<Vec<f64>>>,
    pub width_px: Rc<Parameter<i64>>,
    pub height_px: Rc<Parameter<i64>>,
    pub pixel_width_m: Rc<Parameter<f64>>,
    pub pixel_height_m: Rc<Parameter<f64>>,
}

impl Object {
    pub fn new(settings: &ObjectSettings) -> Result<Self> {
        let group = ParameterGroup::new("object");
        Ok(Self {
            number_of_slices: adopt(&group, "number_of_slices", &settings.number_of_slices)?,
            layer_distance_m: adopt(&group, "layer_distance_m", &settings.layer_distance_m)?,
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

    pub fn assign_from(&self, other: &Object, notify: bool) {
        let _batch = self.group.publisher().batch();
        assign(&self.number_of_slices, &other.number_of_slices, notify);
        assign(&self.layer_distance_m, &other.layer_distance_m, notify);
        assign(&self.width_px, &other.width_px, notify);
        assign(&self.height_px, &other.height_px, notify);
        assign(&self.pixel_width_m, &other.pixel_width_m, notify);
        assign(&self.pixel_height_m, &other.pixel_height_m, notify);
    }

    pub fn sync_to_settings(&self) {
        self.group.sync_to_parents();
    }
}
