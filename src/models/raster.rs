use ndarray::Array2;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};

/// One named data grid of a raster file.
#[derive(Debug, Clone)]
pub struct DataGrid {
    pub values: Array2<f64>,
    pub description: String,
    pub units: String,
}

impl DataGrid {
    pub fn new(values: Array2<f64>, description: &str, units: &str) -> Self {
        Self {
            values,
            description: description.to_string(),
            units: units.to_string(),
        }
    }
}

/// Contents of a `Geometry_data` / `Image_data` raster file.
///
/// Latitude, longitude and every data grid share one shape; the constructors
/// reject anything else.
#[derive(Debug, Clone)]
pub struct RasterGridFile {
    latitude: Array2<f64>,
    longitude: Array2<f64>,
    datasets: BTreeMap<String, DataGrid>,
    origin: Option<PathBuf>,
}

impl RasterGridFile {
    pub fn new(latitude: Array2<f64>, longitude: Array2<f64>) -> Result<Self> {
        if latitude.dim() != longitude.dim() {
            return Err(ProcessingError::InvalidRaster(format!(
                "latitude grid {:?} and longitude grid {:?} differ in shape",
                latitude.dim(),
                longitude.dim()
            )));
        }
        if latitude.is_empty() {
            return Err(ProcessingError::InvalidRaster(
                "coordinate grids are empty".to_string(),
            ));
        }

        Ok(Self {
            latitude,
            longitude,
            datasets: BTreeMap::new(),
            origin: None,
        })
    }

    pub fn with_dataset(mut self, name: &str, grid: DataGrid) -> Result<Self> {
        self.insert_dataset(name, grid)?;
        Ok(self)
    }

    pub fn insert_dataset(&mut self, name: &str, grid: DataGrid) -> Result<()> {
        if grid.values.dim() != self.shape() {
            return Err(ProcessingError::InvalidRaster(format!(
                "dataset {} has shape {:?}, expected {:?}",
                name,
                grid.values.dim(),
                self.shape()
            )));
        }
        self.datasets.insert(name.to_string(), grid);
        Ok(())
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.latitude.dim()
    }

    pub fn latitude(&self) -> &Array2<f64> {
        &self.latitude
    }

    pub fn longitude(&self) -> &Array2<f64> {
        &self.longitude
    }

    pub fn dataset(&self, name: &str) -> Option<&DataGrid> {
        self.datasets.get(name)
    }

    pub fn datasets(&self) -> impl Iterator<Item = (&String, &DataGrid)> {
        self.datasets.iter()
    }

    /// File this raster was read from or persisted to, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn set_origin(&mut self, path: PathBuf) {
        self.origin = Some(path);
    }
}
