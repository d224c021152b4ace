//! CSV-based grading scale loader
//!
//! Loads band tables from data/scales/ (columns: grade,min_score,gpa)

use super::{GradeBand, GradingScale, ScaleId};
use crate::error::LoadError;
use log::debug;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Default path to the scales directory
pub const DEFAULT_SCALES_PATH: &str = "data/scales";

/// Raw CSV row of a band table
#[derive(Debug, Deserialize)]
struct BandRow {
    grade: String,
    min_score: u32,
    gpa: f64,
}

/// Load a scale table from any reader (e.g., string buffer, request body)
pub fn load_scale_from_reader<R: Read>(name: &str, reader: R) -> Result<GradingScale, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut bands = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: BandRow = result?;
        let grade = row.grade.parse().map_err(|err| LoadError::Row {
            row: index + 1,
            message: format!("{}", err),
        })?;
        bands.push(GradeBand::new(grade, row.min_score, row.gpa));
    }

    let scale = GradingScale::new(name, bands)?;
    debug!("loaded grading scale '{}' with {} bands", scale.name(), scale.bands().len());
    Ok(scale)
}

/// Load a scale table from a CSV file; the scale is named after the file stem
pub fn load_scale<P: AsRef<Path>>(path: P) -> Result<GradingScale, LoadError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "custom".to_string());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    load_scale_from_reader(&name, file)
}

/// Load the table for a built-in scale from a scales directory
pub fn load_scale_from_dir(dir: &Path, id: ScaleId) -> Result<GradingScale, LoadError> {
    load_scale(dir.join(id.file_name()))
}

/// Load the table for a built-in scale from the default location (data/scales/)
pub fn load_default_scale(id: ScaleId) -> Result<GradingScale, LoadError> {
    load_scale_from_dir(Path::new(DEFAULT_SCALES_PATH), id)
}
