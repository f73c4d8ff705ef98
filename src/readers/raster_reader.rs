use std::path::Path;

use crate::error::Result;
use crate::models::{RasterGridFile, RasterProduct};

/// Reads `Geometry_data` / `Image_data` raster files.
///
/// Only the geolocation grids and the requested product's grid are loaded;
/// other `Image_data` layers (QA flags, error estimates) are never touched.
/// Needs the `hdf5` feature; without it every read fails with a missing
/// capability error, which callers treat like any other unreadable file.
pub struct RasterReader;

impl RasterReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path, product: RasterProduct) -> Result<RasterGridFile> {
        let mut raster = native::read_raster(path, product)?;
        raster.set_origin(path.to_path_buf());
        Ok(raster)
    }
}

impl Default for RasterReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "hdf5")]
mod native {
    use ndarray::Array2;
    use netcdf::{AttributeValue, Group, Variable};
    use std::path::Path;

    use tracing::debug;

    use crate::error::{ProcessingError, Result};
    use crate::models::{DataGrid, RasterGridFile, RasterProduct};
    use crate::utils::constants::{
        ATTR_DESCRIPTION, ATTR_ERROR_DN, ATTR_OFFSET, ATTR_SLOPE, ATTR_UNITS, GEOMETRY_GROUP,
        IMAGE_GROUP, LATITUDE_DATASET, LONGITUDE_DATASET,
    };

    pub fn read_raster(path: &Path, product: RasterProduct) -> Result<RasterGridFile> {
        let file = netcdf::open(path)?;

        let geometry = file
            .group(GEOMETRY_GROUP)?
            .ok_or_else(|| ProcessingError::DatasetNotFound(GEOMETRY_GROUP.to_string()))?;
        let latitude = read_grid(&geometry, GEOMETRY_GROUP, LATITUDE_DATASET)?;
        let longitude = read_grid(&geometry, GEOMETRY_GROUP, LONGITUDE_DATASET)?;

        let mut raster = RasterGridFile::new(latitude, longitude)?;

        // A missing product grid is not a read error; extraction reports the gap.
        let image = file.group(IMAGE_GROUP)?;
        let Some(var) = image.as_ref().and_then(|group| group.variable(product.code())) else {
            debug!("{} has no {}/{}", path.display(), IMAGE_GROUP, product.code());
            return Ok(raster);
        };

        let values = scale_values(&var, read_array(&var, IMAGE_GROUP)?);
        let grid = DataGrid {
            values,
            description: string_attr(&var, ATTR_DESCRIPTION).unwrap_or_default(),
            units: string_attr(&var, ATTR_UNITS).unwrap_or_default(),
        };
        raster.insert_dataset(product.code(), grid)?;

        Ok(raster)
    }

    fn read_grid(group: &Group, group_name: &str, name: &str) -> Result<Array2<f64>> {
        let var = group
            .variable(name)
            .ok_or_else(|| ProcessingError::DatasetNotFound(format!("{}/{}", group_name, name)))?;
        read_array(&var, group_name)
    }

    fn read_array(var: &Variable, group_name: &str) -> Result<Array2<f64>> {
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        if shape.len() != 2 {
            return Err(ProcessingError::InvalidRaster(format!(
                "{}/{} has {} dimensions, expected 2",
                group_name,
                var.name(),
                shape.len()
            )));
        }

        let values: Vec<f64> = var.get_values(..)?;
        Array2::from_shape_vec((shape[0], shape[1]), values).map_err(|e| {
            ProcessingError::InvalidRaster(format!("{}/{}: {}", group_name, var.name(), e))
        })
    }

    /// Stored digital numbers: `dn * Slope + Offset`, `Error_DN` becomes NaN.
    fn scale_values(var: &Variable, raw: Array2<f64>) -> Array2<f64> {
        let slope = f64_attr(var, ATTR_SLOPE);
        let offset = f64_attr(var, ATTR_OFFSET).unwrap_or(0.0);
        let error_dn = f64_attr(var, ATTR_ERROR_DN);

        if slope.is_none() && error_dn.is_none() {
            return raw;
        }

        let slope = slope.unwrap_or(1.0);
        raw.mapv(|dn| match error_dn {
            Some(err) if dn == err => f64::NAN,
            _ => dn * slope + offset,
        })
    }

    fn has_attr(var: &Variable, name: &str) -> bool {
        var.attributes().any(|attr| attr.name() == name)
    }

    fn f64_attr(var: &Variable, name: &str) -> Option<f64> {
        if !has_attr(var, name) {
            return None;
        }
        let value = var.attribute_value(name)?.ok()?;
        f64::try_from(value).ok()
    }

    fn string_attr(var: &Variable, name: &str) -> Option<String> {
        if !has_attr(var, name) {
            return None;
        }
        match var.attribute_value(name)?.ok()? {
            AttributeValue::Str(s) => Some(s),
            AttributeValue::Strs(mut s) if !s.is_empty() => Some(s.swap_remove(0)),
            _ => None,
        }
    }
}

#[cfg(not(feature = "hdf5"))]
mod native {
    use std::path::Path;

    use crate::error::{ProcessingError, Result};
    use crate::models::{RasterGridFile, RasterProduct};

    pub fn read_raster(path: &Path, _product: RasterProduct) -> Result<RasterGridFile> {
        Err(ProcessingError::MissingCapability(format!(
            "cannot read {}: built without scientific file support",
            path.display()
        )))
    }
}


#[cfg(all(test, feature = "hdf5"))]
mod hdf5_tests {
    use super::*;
    use crate::models::{Coordinate, DataGrid};
    use crate::processors::Extractor;
    use crate::utils::constants::IMAGE_GROUP;
    use crate::writers::RasterWriter;
    use ndarray::Array2;
    use tempfile::TempDir;

    #[test]
    fn test_unrelated_image_layers_do_not_block_product() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("granule.h5");

        let lat = Array2::from_shape_fn((4, 4), |(r, _)| 32.0 + r as f64 * 0.1);
        let lon = Array2::from_shape_fn((4, 4), |(_, c)| 130.0 + c as f64 * 0.1);
        let values = Array2::from_shape_fn((4, 4), |(r, c)| 290.0 + (r * 4 + c) as f64);
        let raster = RasterGridFile::new(lat, lon)?.with_dataset(
            RasterProduct::Lst.code(),
            DataGrid::new(values, "Land Surface Temperature", "Kelvin"),
        )?;
        RasterWriter::new().write(&raster, &path)?;

        // a 1D quality layer and a coarser 2D error layer next to LST
        {
            let mut file = netcdf::append(&path)?;
            let mut image = file
                .group_mut(IMAGE_GROUP)?
                .expect("image group written above");
            image.add_dimension("qa_len", 10)?;
            image.add_dimension("coarse", 2)?;
            let mut qa = image.add_variable::<f64>("QA_flag", &["qa_len"])?;
            qa.put_values(&[0.0; 10], ..)?;
            let mut err = image.add_variable::<f64>("LST_error", &["coarse", "coarse"])?;
            err.put_values(&[0.5; 4], ..)?;
        }

        let read = RasterReader::new().read(&path, RasterProduct::Lst)?;
        assert!(read.dataset("QA_flag").is_none());
        assert!(read.dataset("LST_error").is_none());

        let extraction =
            Extractor::new().extract(&read, &Coordinate::new(32.1, 130.2), RasterProduct::Lst)?;
        assert_eq!((extraction.pixel_location.row, extraction.pixel_location.col), (1, 2));
        assert_eq!(extraction.pixel_value, 296.0);
        Ok(())
    }

    #[test]
    fn test_missing_product_grid_reads_as_gap() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("granule.h5");

        let lat = Array2::from_shape_fn((2, 2), |(r, _)| r as f64);
        let lon = Array2::from_shape_fn((2, 2), |(_, c)| c as f64);
        let raster = RasterGridFile::new(lat, lon)?.with_dataset(
            RasterProduct::Lst.code(),
            DataGrid::new(Array2::from_elem((2, 2), 300.0), "", "Kelvin"),
        )?;
        RasterWriter::new().write(&raster, &path)?;

        let read = RasterReader::new().read(&path, RasterProduct::Ndvi)?;
        assert!(read.dataset("NDVI").is_none());
        assert!(read.dataset("LST").is_none());
        Ok(())
    }
}
