use serde::{Deserialize, Serialize};

use crate::utils::constants::KELVIN_OFFSET;

/// Raster products collected for every observation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RasterProduct {
    /// Land surface temperature, Kelvin
    Lst,
    /// Normalized difference vegetation index, dimensionless
    Ndvi,
}

impl RasterProduct {
    pub const ALL: [RasterProduct; 2] = [RasterProduct::Lst, RasterProduct::Ndvi];

    /// Dataset name inside the `Image_data` group.
    pub fn code(&self) -> &'static str {
        match self {
            RasterProduct::Lst => "LST",
            RasterProduct::Ndvi => "NDVI",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RasterProduct::Lst => "Land Surface Temperature",
            RasterProduct::Ndvi => "Normalized Difference Vegetation Index",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            RasterProduct::Lst => "Kelvin",
            RasterProduct::Ndvi => "dimensionless",
        }
    }

    /// Secondary unit reported next to the raw value, if the product has one.
    pub fn converted_value(&self, raw: f64) -> Option<f64> {
        match self {
            RasterProduct::Lst => Some(raw - KELVIN_OFFSET),
            RasterProduct::Ndvi => None,
        }
    }
}

impl std::fmt::Display for RasterProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
