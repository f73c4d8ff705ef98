use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{ProcessingError, Result};
use crate::models::{Coordinate, DataGrid, RasterGridFile, RasterProduct};
use crate::utils::constants::*;

/// Normal distribution clipped to a plausible physical range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockDistribution {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MockDistribution {
    pub fn for_product(product: RasterProduct) -> Self {
        match product {
            RasterProduct::Lst => Self {
                mean: MOCK_LST_MEAN,
                std: MOCK_LST_STD,
                min: MOCK_LST_MIN,
                max: MOCK_LST_MAX,
            },
            RasterProduct::Ndvi => Self {
                mean: MOCK_NDVI_MEAN,
                std: MOCK_NDVI_STD,
                min: MOCK_NDVI_MIN,
                max: MOCK_NDVI_MAX,
            },
        }
    }
}

/// Builds synthetic rasters centred on a point, laid out like the real product files.
pub struct MockRasterGenerator {
    rng: StdRng,
    grid_size: usize,
    half_width: f64,
}

impl MockRasterGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            grid_size: MOCK_GRID_SIZE,
            half_width: MOCK_HALF_WIDTH_DEG,
        }
    }

    /// Reproducible output for tests and benchmarks.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size.max(1);
        self
    }

    /// Rows run along latitude and columns along longitude, both spanning
    /// `center ± half_width`.
    pub fn generate(
        &mut self,
        center: Coordinate,
        product: RasterProduct,
    ) -> Result<RasterGridFile> {
        let n = self.grid_size;
        let lat_axis = Array1::linspace(
            center.latitude - self.half_width,
            center.latitude + self.half_width,
            n,
        );
        let lon_axis = Array1::linspace(
            center.longitude - self.half_width,
            center.longitude + self.half_width,
            n,
        );

        let latitude = Array2::from_shape_fn((n, n), |(row, _)| lat_axis[row]);
        let longitude = Array2::from_shape_fn((n, n), |(_, col)| lon_axis[col]);

        let dist = MockDistribution::for_product(product);
        let normal = Normal::new(dist.mean, dist.std)
            .map_err(|e| ProcessingError::InvalidRaster(format!("mock distribution: {}", e)))?;
        let rng = &mut self.rng;
        let values = Array2::from_shape_fn((n, n), |_| {
            normal.sample(&mut *rng).clamp(dist.min, dist.max)
        });

        RasterGridFile::new(latitude, longitude)?.with_dataset(
            product.code(),
            DataGrid::new(values, product.description(), product.units()),
        )
    }
}

impl Default for MockRasterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Coordinate {
        Coordinate::new(32.8032, 130.7075)
    }

    #[test]
    fn test_grid_layout() -> Result<()> {
        let mut generator = MockRasterGenerator::with_seed(7);
        let raster = generator.generate(center(), RasterProduct::Lst)?;

        assert_eq!(raster.shape(), (MOCK_GRID_SIZE, MOCK_GRID_SIZE));

        let lat = raster.latitude();
        let lon = raster.longitude();
        assert!((lat[(0, 0)] - 32.3032).abs() < 1e-9);
        assert!((lat[(MOCK_GRID_SIZE - 1, 0)] - 33.3032).abs() < 1e-9);
        assert!((lon[(0, MOCK_GRID_SIZE - 1)] - 131.2075).abs() < 1e-9);

        // latitude constant along a row, longitude constant down a column
        assert_eq!(lat[(10, 0)], lat[(10, 50)]);
        assert_eq!(lon[(0, 10)], lon[(50, 10)]);
        Ok(())
    }

    #[test]
    fn test_lst_values_within_bounds() -> Result<()> {
        let mut generator = MockRasterGenerator::with_seed(42);
        let raster = generator.generate(center(), RasterProduct::Lst)?;
        let grid = raster.dataset("LST").unwrap();

        assert_eq!(grid.units, "Kelvin");
        assert!(grid
            .values
            .iter()
            .all(|&v| (MOCK_LST_MIN..=MOCK_LST_MAX).contains(&v)));

        let mean = grid.values.mean().unwrap();
        assert!((mean - MOCK_LST_MEAN).abs() < 0.5);
        Ok(())
    }

    #[test]
    fn test_ndvi_values_within_bounds() -> Result<()> {
        let mut generator = MockRasterGenerator::with_seed(42);
        let raster = generator.generate(center(), RasterProduct::Ndvi)?;
        let grid = raster.dataset("NDVI").unwrap();

        assert!(grid.values.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(raster.dataset("LST").is_none());
        Ok(())
    }

    #[test]
    fn test_seed_is_reproducible() -> Result<()> {
        let a = MockRasterGenerator::with_seed(3).generate(center(), RasterProduct::Ndvi)?;
        let b = MockRasterGenerator::with_seed(3).generate(center(), RasterProduct::Ndvi)?;
        assert_eq!(a.dataset("NDVI").unwrap().values, b.dataset("NDVI").unwrap().values);
        Ok(())
    }
}
