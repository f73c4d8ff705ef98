use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, ProductExtraction, RasterProduct};
use crate::utils::constants::DEFAULT_LOCATION_NAME;

/// Provenance of the rasters behind a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Mock,
    Remote,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Mock => write!(f, "mock"),
            DataSource::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl Location {
    pub fn new(coordinate: Coordinate, name: Option<&str>) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            name: name.unwrap_or(DEFAULT_LOCATION_NAME).to_string(),
        }
    }
}

/// Per-product result: either an extraction or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductObservation {
    Failed { error: String },
    Extracted(ProductExtraction),
}

impl ProductObservation {
    pub fn failed(error: impl Into<String>) -> Self {
        ProductObservation::Failed {
            error: error.into(),
        }
    }

    pub fn extraction(&self) -> Option<&ProductExtraction> {
        match self {
            ProductObservation::Extracted(extraction) => Some(extraction),
            ProductObservation::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProductObservation::Failed { error } => Some(error),
            ProductObservation::Extracted(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lst: Option<ProductObservation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndvi: Option<ProductObservation>,
}

impl Observations {
    pub fn get(&self, product: RasterProduct) -> Option<&ProductObservation> {
        match product {
            RasterProduct::Lst => self.lst.as_ref(),
            RasterProduct::Ndvi => self.ndvi.as_ref(),
        }
    }

    pub fn set(&mut self, product: RasterProduct, observation: ProductObservation) {
        match product {
            RasterProduct::Lst => self.lst = Some(observation),
            RasterProduct::Ndvi => self.ndvi = Some(observation),
        }
    }
}

/// One collection run for one point and date; the unit of work handed to ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub location: Location,
    pub observation_date: NaiveDate,
    pub processing_time: DateTime<Local>,
    pub data_source: DataSource,
    pub observations: Observations,
}

impl ObservationRecord {
    pub fn new(location: Location, observation_date: NaiveDate, data_source: DataSource) -> Self {
        Self {
            location,
            observation_date,
            processing_time: Local::now(),
            data_source,
            observations: Observations::default(),
        }
    }

    pub fn observation(&self, product: RasterProduct) -> Option<&ProductObservation> {
        self.observations.get(product)
    }

    /// Extraction for `product`, if it succeeded.
    pub fn extraction(&self, product: RasterProduct) -> Option<&ProductExtraction> {
        self.observation(product).and_then(ProductObservation::extraction)
    }

    pub fn successful_products(&self) -> usize {
        RasterProduct::ALL
            .iter()
            .filter(|p| self.extraction(**p).is_some())
            .count()
    }
}
