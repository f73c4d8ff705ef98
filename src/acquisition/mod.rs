pub mod catalog;
pub mod mock;
pub mod scratch;

pub use catalog::{CatalogProduct, GPortalCatalog, ProductCatalog, SearchQuery};
pub use mock::{MockDistribution, MockRasterGenerator};
pub use scratch::ScratchSpace;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Coordinate, DataSource, RasterGridFile, RasterProduct};
use crate::readers::RasterReader;
use crate::utils::{mock_raster_filename, CapabilityReport};
use crate::writers::RasterWriter;

/// Where rasters come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Catalog only; no match means no file.
    Real,
    /// Synthetic rasters only; the catalog is never contacted.
    Mock,
    /// Catalog first, synthetic raster when it yields nothing.
    AutoFallback,
}

impl AcquisitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionMode::Real => "real",
            AcquisitionMode::Mock => "mock",
            AcquisitionMode::AutoFallback => "auto",
        }
    }
}

impl FromStr for AcquisitionMode {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "real" => Ok(AcquisitionMode::Real),
            "mock" => Ok(AcquisitionMode::Mock),
            "auto" | "auto-fallback" => Ok(AcquisitionMode::AutoFallback),
            other => Err(ProcessingError::Config(format!(
                "Unknown acquisition mode '{}' (expected real, mock or auto)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raster ready for extraction, tagged with how it was obtained.
#[derive(Debug, Clone)]
pub struct AcquiredRaster {
    pub raster: RasterGridFile,
    pub source: DataSource,
}

/// Obtains one raster per (coordinate, date, product).
///
/// Failures never escape `acquire`: they are logged and reported as `None`.
pub struct Acquirer {
    mode: AcquisitionMode,
    catalog: Option<Box<dyn ProductCatalog>>,
    dataset_ids: HashMap<RasterProduct, String>,
    scientific_files: bool,
    generator: MockRasterGenerator,
    scratch: ScratchSpace,
    reader: RasterReader,
    writer: RasterWriter,
}

impl Acquirer {
    pub fn new(mode: AcquisitionMode, scratch: ScratchSpace) -> Self {
        Self {
            mode,
            catalog: None,
            dataset_ids: HashMap::new(),
            scientific_files: cfg!(feature = "hdf5"),
            generator: MockRasterGenerator::new(),
            scratch,
            reader: RasterReader::new(),
            writer: RasterWriter::new(),
        }
    }

    /// Wires the G-Portal catalog when credentials are configured.
    pub fn from_config(
        mode: AcquisitionMode,
        config: &AppConfig,
        capabilities: &CapabilityReport,
    ) -> Result<Self> {
        let mut acquirer =
            Self::new(mode, ScratchSpace::new()?).with_scientific_files(capabilities.scientific_files);

        if let Some(catalog) = GPortalCatalog::from_config(config) {
            let dataset_ids = RasterProduct::ALL
                .iter()
                .filter_map(|&p| config.dataset_id(p).map(|id| (p, id.to_string())))
                .collect();
            acquirer = acquirer.with_catalog(Box::new(catalog), dataset_ids);
        }

        if mode != AcquisitionMode::Mock && !capabilities.can_acquire_remote() {
            warn!(
                "Real acquisition unavailable ({}); mode is {}",
                capabilities.diagnostic(),
                mode
            );
        }

        Ok(acquirer)
    }

    pub fn with_catalog(
        mut self,
        catalog: Box<dyn ProductCatalog>,
        dataset_ids: HashMap<RasterProduct, String>,
    ) -> Self {
        self.catalog = Some(catalog);
        self.dataset_ids = dataset_ids;
        self
    }

    pub fn with_generator(mut self, generator: MockRasterGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_scientific_files(mut self, enabled: bool) -> Self {
        self.scientific_files = enabled;
        self
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    pub async fn acquire(
        &mut self,
        coordinate: &Coordinate,
        date: NaiveDate,
        product: RasterProduct,
    ) -> Option<AcquiredRaster> {
        if self.mode == AcquisitionMode::Mock {
            return self.generate_mock(coordinate, date, product);
        }

        match self.acquire_remote(coordinate, date, product).await {
            Ok(Some(raster)) => {
                return Some(AcquiredRaster {
                    raster,
                    source: DataSource::Remote,
                })
            }
            Ok(None) => warn!("No {} product found for {} on {}", product, coordinate, date),
            Err(e) => warn!("{} acquisition failed: {}", product, e),
        }

        if self.mode == AcquisitionMode::AutoFallback {
            warn!("Substituting mock {} data for {} on {}", product, coordinate, date);
            return self.generate_mock(coordinate, date, product);
        }
        None
    }

    async fn acquire_remote(
        &mut self,
        coordinate: &Coordinate,
        date: NaiveDate,
        product: RasterProduct,
    ) -> Result<Option<RasterGridFile>> {
        let catalog = self.catalog.as_ref().ok_or_else(|| {
            ProcessingError::Config("catalog credentials are not configured".to_string())
        })?;
        let dataset_id = self.dataset_ids.get(&product).ok_or_else(|| {
            ProcessingError::Config(format!("no catalog dataset id configured for {}", product))
        })?;
        if !self.scientific_files {
            return Err(ProcessingError::MissingCapability(
                "scientific file support (rebuild with --features hdf5)".to_string(),
            ));
        }

        let query = SearchQuery::around(dataset_id, coordinate, date);
        let products = catalog.search(&query).await?;
        let Some(first) = products.first() else {
            return Ok(None);
        };
        info!(
            "{} {} product(s) found, using {}",
            products.len(),
            product,
            first.id
        );

        let dest = self.scratch.reserve(&first.file_name())?;
        catalog.download(first, &dest).await?;
        let raster = self.reader.read(&dest, product)?;
        Ok(Some(raster))
    }

    fn generate_mock(
        &mut self,
        coordinate: &Coordinate,
        date: NaiveDate,
        product: RasterProduct,
    ) -> Option<AcquiredRaster> {
        let mut raster = match self.generator.generate(*coordinate, product) {
            Ok(raster) => raster,
            Err(e) => {
                warn!("Mock {} generation failed: {}", product, e);
                return None;
            }
        };

        if self.scientific_files {
            match self.persist_mock(&raster, date, product) {
                Ok(path) => {
                    debug!("Mock {} written to {}", product, path.display());
                    raster.set_origin(path);
                }
                Err(e) => warn!("Mock {} kept in memory only: {}", product, e),
            }
        }

        Some(AcquiredRaster {
            raster,
            source: DataSource::Mock,
        })
    }

    fn persist_mock(
        &mut self,
        raster: &RasterGridFile,
        date: NaiveDate,
        product: RasterProduct,
    ) -> Result<std::path::PathBuf> {
        let path = self.scratch.reserve(&mock_raster_filename(date, product))?;
        self.writer.write(raster, &path)?;
        Ok(path)
    }
}
