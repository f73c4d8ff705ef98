pub mod collector;
pub mod extractor;
pub mod ingestor;

pub use collector::Collector;
pub use extractor::{nearest_pixel, Extractor};
pub use ingestor::Ingestor;
