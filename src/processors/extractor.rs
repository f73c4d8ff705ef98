use ndarray::{s, Array2};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{
    Coordinate, PixelLocation, PixelMatch, ProductExtraction, RasterGridFile, RasterProduct,
    WindowStatistics,
};
use crate::utils::constants::{IMAGE_GROUP, WINDOW_SIZE};

/// Nearest-pixel lookup plus statistics over the surrounding window.
pub struct Extractor {
    window_size: usize,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            window_size: WINDOW_SIZE,
        }
    }

    pub fn extract(
        &self,
        raster: &RasterGridFile,
        coordinate: &Coordinate,
        product: RasterProduct,
    ) -> Result<ProductExtraction> {
        let grid = raster.dataset(product.code()).ok_or_else(|| {
            ProcessingError::DatasetNotFound(format!("{}/{}", IMAGE_GROUP, product.code()))
        })?;

        let location = nearest_pixel(raster, coordinate)?;
        let value = grid.values[(location.row, location.col)];
        debug!(
            "{} pixel ({}, {}) at ({:.4}, {:.4}) = {}",
            product, location.row, location.col, location.latitude, location.longitude, value
        );

        let pixel = PixelMatch {
            location,
            value,
            converted_value: product.converted_value(value),
        };
        let window = self.window_statistics(&grid.values, location.row, location.col, product);

        Ok(ProductExtraction::new(product, pixel, window))
    }

    /// Statistics over the window centred on (row, col), clipped at the grid
    /// edges. NaN cells are ignored; an all-NaN window yields `None`.
    pub fn window_statistics(
        &self,
        values: &Array2<f64>,
        row: usize,
        col: usize,
        product: RasterProduct,
    ) -> Option<WindowStatistics> {
        let (rows, cols) = values.dim();
        let half = self.window_size / 2;
        let row_end = (row + half + 1).min(rows);
        let col_end = (col + half + 1).min(cols);

        let window = values.slice(s![
            row.saturating_sub(half)..row_end,
            col.saturating_sub(half)..col_end
        ]);
        let valid: Vec<f64> = window.iter().copied().filter(|v| !v.is_nan()).collect();
        if valid.is_empty() {
            return None;
        }

        let n = valid.len() as f64;
        let mean = valid.iter().sum::<f64>() / n;
        let variance = valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(WindowStatistics {
            mean,
            std: variance.sqrt(),
            min,
            max,
            mean_celsius: product.converted_value(mean),
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Cell whose coordinates minimise the planar degree distance to `coordinate`.
///
/// Ties go to the first cell in row-major order. Cells with NaN coordinates never match.
pub fn nearest_pixel(raster: &RasterGridFile, coordinate: &Coordinate) -> Result<PixelLocation> {
    let latitude = raster.latitude();
    let longitude = raster.longitude();

    let mut best: Option<((usize, usize), f64)> = None;
    for ((row, col), &lat) in latitude.indexed_iter() {
        let distance = coordinate.degree_distance(lat, longitude[(row, col)]);
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some(((row, col), distance)),
        }
    }

    let ((row, col), _) = best.ok_or_else(|| {
        ProcessingError::InvalidRaster("no valid latitude/longitude cells".to_string())
    })?;

    Ok(PixelLocation {
        row,
        col,
        latitude: latitude[(row, col)],
        longitude: longitude[(row, col)],
    })
}
