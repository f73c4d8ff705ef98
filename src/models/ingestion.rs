use chrono::NaiveDate;
use std::path::PathBuf;

use crate::models::{ObservationRecord, RasterProduct};
use crate::utils::{round_to, LST_DECIMALS, NDVI_DECIMALS};

/// Values persisted for one record: LST in Celsius (2 dp) and NDVI (3 dp).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationValues {
    pub observation_date: NaiveDate,
    pub lst: Option<f64>,
    pub ndvi: Option<f64>,
}

impl ObservationValues {
    /// Failed products, and non-finite pixel values, become nulls.
    pub fn from_record(record: &ObservationRecord) -> Self {
        let lst = record
            .extraction(RasterProduct::Lst)
            .and_then(|e| e.pixel_value_celsius)
            .filter(|v| v.is_finite())
            .map(|v| round_to(v, LST_DECIMALS));

        let ndvi = record
            .extraction(RasterProduct::Ndvi)
            .map(|e| e.pixel_value)
            .filter(|v| v.is_finite())
            .map(|v| round_to(v, NDVI_DECIMALS));

        Self {
            observation_date: record.observation_date,
            lst,
            ndvi,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestionOutcome {
    Inserted,
    Updated,
    Unchanged,
    /// Backup-only run; the store was not contacted.
    BackedUp { backup_file: PathBuf },
    Failed {
        reason: String,
        backup_file: Option<PathBuf>,
    },
}

impl IngestionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, IngestionOutcome::Failed { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            IngestionOutcome::Inserted => "inserted new observation".to_string(),
            IngestionOutcome::Updated => "updated existing observation".to_string(),
            IngestionOutcome::Unchanged => "observation unchanged".to_string(),
            IngestionOutcome::BackedUp { backup_file } => {
                format!("saved to backup {}", backup_file.display())
            }
            IngestionOutcome::Failed {
                reason,
                backup_file: Some(path),
            } => format!("failed ({}), backup saved to {}", reason, path.display()),
            IngestionOutcome::Failed {
                reason,
                backup_file: None,
            } => format!("failed ({}), backup could not be written", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Coordinate, DataSource, Location, PixelLocation, PixelMatch, ProductExtraction,
        ProductObservation,
    };

    fn extracted(product: RasterProduct, value: f64) -> ProductObservation {
        ProductObservation::Extracted(ProductExtraction::new(
            product,
            PixelMatch {
                location: PixelLocation {
                    row: 0,
                    col: 0,
                    latitude: 0.0,
                    longitude: 0.0,
                },
                value,
                converted_value: product.converted_value(value),
            },
            None,
        ))
    }

    fn record() -> ObservationRecord {
        ObservationRecord::new(
            Location::new(Coordinate::new(32.8, 130.7), None),
            NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            DataSource::Mock,
        )
    }

    #[test]
    fn test_values_are_rounded() {
        let mut record = record();
        record
            .observations
            .set(RasterProduct::Lst, extracted(RasterProduct::Lst, 291.5678));
        record
            .observations
            .set(RasterProduct::Ndvi, extracted(RasterProduct::Ndvi, 0.71234));

        let values = ObservationValues::from_record(&record);
        assert_eq!(values.lst, Some(18.42));
        assert_eq!(values.ndvi, Some(0.712));
    }

    #[test]
    fn test_errors_map_to_nulls() {
        let mut record = record();
        record
            .observations
            .set(RasterProduct::Lst, ProductObservation::failed("file acquisition failed"));
        record
            .observations
            .set(RasterProduct::Ndvi, extracted(RasterProduct::Ndvi, f64::NAN));

        let values = ObservationValues::from_record(&record);
        assert_eq!(values.lst, None);
        assert_eq!(values.ndvi, None);
        assert_eq!(values.observation_date, record.observation_date);
    }

    #[test]
    fn test_outcome_success() {
        assert!(IngestionOutcome::Inserted.is_success());
        assert!(IngestionOutcome::Unchanged.is_success());
        assert!(!IngestionOutcome::Failed {
            reason: "boom".to_string(),
            backup_file: None
        }
        .is_success());
    }
}
