use std::path::Path;

use crate::error::Result;
use crate::models::RasterGridFile;

/// Persists a raster in the layout `RasterReader` consumes.
pub struct RasterWriter;

impl RasterWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, raster: &RasterGridFile, path: &Path) -> Result<()> {
        native::write_raster(raster, path)
    }
}

impl Default for RasterWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "hdf5")]
mod native {
    use ndarray::Array2;
    use netcdf::GroupMut;
    use std::path::Path;

    use crate::error::Result;
    use crate::models::RasterGridFile;
    use crate::utils::constants::{
        ATTR_DESCRIPTION, ATTR_UNITS, GEOMETRY_GROUP, IMAGE_GROUP, LATITUDE_DATASET,
        LONGITUDE_DATASET,
    };

    const ROW_DIM: &str = "rows";
    const COL_DIM: &str = "cols";

    pub fn write_raster(raster: &RasterGridFile, path: &Path) -> Result<()> {
        let (rows, cols) = raster.shape();
        let mut file = netcdf::create(path)?;

        {
            let mut geometry = file.add_group(GEOMETRY_GROUP)?;
            add_dimensions(&mut geometry, rows, cols)?;
            put_grid(&mut geometry, LATITUDE_DATASET, raster.latitude(), &[])?;
            put_grid(&mut geometry, LONGITUDE_DATASET, raster.longitude(), &[])?;
        }

        {
            let mut image = file.add_group(IMAGE_GROUP)?;
            add_dimensions(&mut image, rows, cols)?;
            for (name, grid) in raster.datasets() {
                put_grid(
                    &mut image,
                    name,
                    &grid.values,
                    &[
                        (ATTR_DESCRIPTION, grid.description.as_str()),
                        (ATTR_UNITS, grid.units.as_str()),
                    ],
                )?;
            }
        }

        // closed on drop
        drop(file);
        Ok(())
    }

    fn add_dimensions(group: &mut GroupMut, rows: usize, cols: usize) -> Result<()> {
        group.add_dimension(ROW_DIM, rows)?;
        group.add_dimension(COL_DIM, cols)?;
        Ok(())
    }

    fn put_grid(
        group: &mut GroupMut,
        name: &str,
        values: &Array2<f64>,
        attributes: &[(&str, &str)],
    ) -> Result<()> {
        let mut var = group.add_variable::<f64>(name, &[ROW_DIM, COL_DIM])?;
        for (key, value) in attributes {
            var.put_attribute(key, *value)?;
        }
        // row-major copy regardless of the array's memory layout
        let data: Vec<f64> = values.iter().copied().collect();
        var.put_values(&data, ..)?;
        Ok(())
    }
}

#[cfg(not(feature = "hdf5"))]
mod native {
    use std::path::Path;

    use crate::error::{ProcessingError, Result};
    use crate::models::RasterGridFile;

    pub fn write_raster(_raster: &RasterGridFile, path: &Path) -> Result<()> {
        Err(ProcessingError::MissingCapability(format!(
            "cannot write {}: built without scientific file support",
            path.display()
        )))
    }
}
