//! Scan position builders.

use std::path::Path;
use std::rc::Rc;

use ptyx_params::{Parameter, ParameterGroup};
use serde::Deserialize;

use super::ScanPoint;
use crate::error::{RepositoryError, Result};
use crate::product::adopt;
use crate::product::settings::ScanSettings;

pub const RASTER: &str = "raster";
pub const EXPLICIT: &str = "explicit";
pub const CSV_FILE: &str = "csv";

/// Largest grid a raster builder will generate.
pub const MAX_RASTER_POINTS: i64 = 1 << 24;

/// Produces a scan position list from its own parameter group.
pub trait ScanBuilder {
    /// Registered builder name, as stored in the `Builder` setting.
    fn name(&self) -> &'static str;

    /// Parameters the builder reads. Changes trigger a rebuild.
    fn group(&self) -> &Rc<ParameterGroup>;

    fn build(&self) -> Result<Vec<ScanPoint>>;

    /// Write the builder's parameters back to the scan settings.
    fn sync_to_settings(&self);
}

/// Rectangular raster, row-major, starting at the origin.
#[derive(Debug)]
pub struct RasterScanBuilder {
    group: Rc<ParameterGroup>,
    builder_setting: Rc<Parameter<String>>,
    pub number_of_points_x: Rc<Parameter<i64>>,
    pub number_of_points_y: Rc<Parameter<i64>>,
    pub step_size_x_m: Rc<Parameter<f64>>,
    pub step_size_y_m: Rc<Parameter<f64>>,
}

impl RasterScanBuilder {
    pub fn new(settings: &ScanSettings) -> Result<Self> {
        let group = ParameterGroup::new("builder");
        Ok(Self {
            builder_setting: Rc::clone(&settings.builder),
            number_of_points_x: adopt(&group, "number_of_points_x", &settings.number_of_points_x)?,
            number_of_points_y: adopt(&group, "number_of_points_y", &settings.number_of_points_y)?,
            step_size_x_m: adopt(&group, "step_size_x_m", &settings.step_size_x_m)?,
            step_size_y_m: adopt(&group, "step_size_y_m", &settings.step_size_y_m)?,
            group,
        })
    }
}

impl ScanBuilder for RasterScanBuilder {
    fn name(&self) -> &'static str {
        RASTER
    }

    fn group(&self) -> &Rc<ParameterGroup> {
        &self.group
    }

    fn build(&self) -> Result<Vec<ScanPoint>> {
        let nx = self.number_of_points_x.get_value();
        let ny = self.number_of_points_y.get_value();
        let dx = self.step_size_x_m.get_value();
        let dy = self.step_size_y_m.get_value();

        if !(dx.is_finite() && dy.is_finite()) {
            return Err(RepositoryError::builder(RASTER, "step sizes must be finite"));
        }
        let count = nx
            .checked_mul(ny)
            .filter(|&count| count <= MAX_RASTER_POINTS)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| RepositoryError::builder(RASTER, "too many scan points"))?;

        let mut points = Vec::with_capacity(count);
        for y in 0..ny {
            for x in 0..nx {
                points.push(ScanPoint {
                    index: y * nx + x,
                    x_m: x as f64 * dx,
                    y_m: y as f64 * dy,
                });
            }
        }
        Ok(points)
    }

    fn sync_to_settings(&self) {
        self.builder_setting.set_value(RASTER.to_string());
        self.group.sync_to_parents();
    }
}

/// Positions given directly as coordinate sequences.
#[derive(Debug)]
pub struct ExplicitScanBuilder {
    group: Rc<ParameterGroup>,
    builder_setting: Rc<Parameter<String>>,
    pub x_m: Rc<Parameter<Vec<f64>>>,
    pub y_m: Rc<Parameter<Vec<f64>>>,
}

impl ExplicitScanBuilder {
    pub fn new(settings: &ScanSettings) -> Result<Self> {
        Self::from_points(settings, &[])
    }

    /// Builder reproducing `points`; indices become positions in the list.
    pub fn from_points(settings: &ScanSettings, points: &[ScanPoint]) -> Result<Self> {
        let group = ParameterGroup::new("builder");
        Ok(Self {
            builder_setting: Rc::clone(&settings.builder),
            x_m: group.create_real_sequence_parameter(
                "x_m",
                points.iter().map(|p| p.x_m).collect::<Vec<_>>(),
            )?,
            y_m: group.create_real_sequence_parameter(
                "y_m",
                points.iter().map(|p| p.y_m).collect::<Vec<_>>(),
            )?,
            group,
        })
    }
}

impl ScanBuilder for ExplicitScanBuilder {
    fn name(&self) -> &'static str {
        EXPLICIT
    }

    fn group(&self) -> &Rc<ParameterGroup> {
        &self.group
    }

    fn build(&self) -> Result<Vec<ScanPoint>> {
        let xs = self.x_m.get_value();
        let ys = self.y_m.get_value();
        if xs.len() != ys.len() {
            return Err(RepositoryError::builder(
                EXPLICIT,
                format!("{} x coordinates but {} y coordinates", xs.len(), ys.len()),
            ));
        }

        Ok(xs
            .into_iter()
            .zip(ys)
            .zip(0_i64..)
            .map(|((x_m, y_m), index)| ScanPoint { index, x_m, y_m })
            .collect())
    }

    fn sync_to_settings(&self) {
        self.builder_setting.set_value(EXPLICIT.to_string());
    }
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    #[serde(default)]
    index: Option<i64>,
    x_m: f64,
    y_m: f64,
}

/// Positions read from a CSV file with `x_m`, `y_m` and optional `index`
/// columns.
#[derive(Debug)]
pub struct CsvScanBuilder {
    group: Rc<ParameterGroup>,
    builder_setting: Rc<Parameter<String>>,
    pub file_path: Rc<Parameter<std::path::PathBuf>>,
}

impl CsvScanBuilder {
    pub fn new(settings: &ScanSettings) -> Result<Self> {
        let group = ParameterGroup::new("builder");
        Ok(Self {
            builder_setting: Rc::clone(&settings.builder),
            file_path: adopt(&group, "file_path", &settings.input_file_path)?,
            group,
        })
    }
}

impl ScanBuilder for CsvScanBuilder {
    fn name(&self) -> &'static str {
        CSV_FILE
    }

    fn group(&self) -> &Rc<ParameterGroup> {
        &self.group
    }

    fn build(&self) -> Result<Vec<ScanPoint>> {
        read_position_file(&self.file_path.get_value())
    }

    fn sync_to_settings(&self) {
        self.builder_setting.set_value(CSV_FILE.to_string());
        self.group.sync_to_parents();
    }
}

/// Read scan positions from a CSV file.
///
/// Rows without an `index` value are numbered by their position in the file.
pub fn read_position_file(path: &Path) -> Result<Vec<ScanPoint>> {
    let position_error = |source: csv::Error| RepositoryError::PositionFile {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(position_error)?;

    let mut points = Vec::new();
    for (row_number, result) in (0_i64..).zip(reader.deserialize::<PositionRow>()) {
        let row = result.map_err(position_error)?;
        points.push(ScanPoint {
            index: row.index.unwrap_or(row_number),
            x_m: row.x_m,
            y_m: row.y_m,
        });
    }

    tracing::debug!(path = %path.display(), points = points.len(), "read position file");
    Ok(points)
}
