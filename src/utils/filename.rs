use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

use crate::models::{Coordinate, RasterProduct};

/// Mock raster file name, e.g. `GC1SG1_2026010801D01D_LST_MOCK.h5`
pub fn mock_raster_filename(date: NaiveDate, product: RasterProduct) -> String {
    format!(
        "GC1SG1_{}01D01D_{}_MOCK.h5",
        date.format("%Y%m%d"),
        product.code()
    )
}

/// Default observation record path, e.g. `observation_32.8032_130.7075_20260108.json`
pub fn generate_record_filename(coordinate: &Coordinate, date: NaiveDate) -> PathBuf {
    PathBuf::from(format!(
        "observation_{:.4}_{:.4}_{}.json",
        coordinate.latitude,
        coordinate.longitude,
        date.format("%Y%m%d")
    ))
}

/// Per-run backup file: `{dir}/backup_{YYYYmmdd_HHMMSS}.csv`
pub fn generate_backup_filename(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("backup_{}.csv", timestamp))
}
