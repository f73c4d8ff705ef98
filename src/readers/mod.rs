pub mod raster_reader;
pub mod record_reader;

pub use raster_reader::RasterReader;
pub use record_reader::read_observation_record;
