pub mod coordinate;
pub mod extraction;
pub mod ingestion;
pub mod observation;
pub mod product;
pub mod raster;

pub use coordinate::{BoundingBox, Coordinate};
pub use extraction::{PixelLocation, PixelMatch, ProductExtraction, WindowStatistics};
pub use ingestion::{IngestionOutcome, ObservationValues};
pub use observation::{DataSource, Location, ObservationRecord, Observations, ProductObservation};
pub use product::RasterProduct;
pub use raster::{DataGrid, RasterGridFile};
