use serde::{Deserialize, Deserializer, Serialize};

use crate::models::RasterProduct;

/// Grid cell selected for a query point, with its own coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelLocation {
    pub row: usize,
    pub col: usize,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMatch {
    pub location: PixelLocation,
    pub value: f64,
    pub converted_value: Option<f64>,
}

/// Summary of the valid cells in the window around the matched pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_celsius: Option<f64>,
}

/// Successful extraction of one product, as written to observation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductExtraction {
    pub dataset: String,

    // A NaN cell serializes as null; read it back as NaN.
    #[serde(deserialize_with = "nan_from_null")]
    pub pixel_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_value_celsius: Option<f64>,

    pub pixel_location: PixelLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_statistics: Option<WindowStatistics>,
}

impl ProductExtraction {
    pub fn new(
        product: RasterProduct,
        pixel: PixelMatch,
        window_statistics: Option<WindowStatistics>,
    ) -> Self {
        Self {
            dataset: product.code().to_string(),
            pixel_value: pixel.value,
            pixel_value_celsius: pixel.converted_value,
            pixel_location: pixel.location,
            window_statistics,
        }
    }
}

fn nan_from_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
