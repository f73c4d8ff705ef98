use chrono::NaiveDate;
use tracing::{info, warn};
use validator::Validate;

use crate::acquisition::{AcquisitionMode, Acquirer};
use crate::models::{
    Coordinate, DataSource, Location, ObservationRecord, ProductObservation, RasterProduct,
};
use crate::processors::Extractor;
use crate::utils::constants::ACQUISITION_FAILED;
use crate::utils::ProgressReporter;

/// Builds one observation record per (coordinate, date): LST first, then NDVI.
///
/// A product that cannot be acquired or extracted is recorded with its error;
/// it never aborts the other product.
pub struct Collector {
    acquirer: Acquirer,
    extractor: Extractor,
    location_name: Option<String>,
    show_progress: bool,
}

impl Collector {
    pub fn new(acquirer: Acquirer) -> Self {
        Self {
            acquirer,
            extractor: Extractor::new(),
            location_name: None,
            show_progress: false,
        }
    }

    pub fn with_location_name(mut self, name: Option<String>) -> Self {
        self.location_name = name;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn collect(&mut self, coordinate: Coordinate, date: NaiveDate) -> ObservationRecord {
        if let Err(e) = coordinate.validate() {
            warn!("Coordinate {} is out of range: {}", coordinate, e);
        }

        info!("Collecting observations for {} on {}", coordinate, date);
        let mut record = ObservationRecord::new(
            Location::new(coordinate, self.location_name.as_deref()),
            date,
            DataSource::Remote,
        );
        let mut used_mock = self.acquirer.mode() == AcquisitionMode::Mock;

        for product in RasterProduct::ALL {
            let progress = ProgressReporter::new_spinner(
                &format!("Acquiring {} for {}", product, date),
                !self.show_progress,
            );

            let observation = match self.acquirer.acquire(&coordinate, date, product).await {
                Some(acquired) => {
                    used_mock |= acquired.source == DataSource::Mock;
                    progress.set_message(&format!("Extracting {}", product));
                    match self.extractor.extract(&acquired.raster, &coordinate, product) {
                        Ok(extraction) => ProductObservation::Extracted(extraction),
                        Err(e) => {
                            warn!("{} extraction failed: {}", product, e);
                            ProductObservation::failed(e.to_string())
                        }
                    }
                }
                None => ProductObservation::failed(ACQUISITION_FAILED),
            };

            progress.finish_with_message(&format!(
                "{}: {}",
                product,
                observation.error().unwrap_or("ok")
            ));
            record.observations.set(product, observation);
        }

        if used_mock {
            record.data_source = DataSource::Mock;
        }

        info!(
            "Collected {}/{} products ({})",
            record.successful_products(),
            RasterProduct::ALL.len(),
            record.data_source
        );
        record
    }
}
