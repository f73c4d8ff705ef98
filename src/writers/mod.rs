pub mod backup_writer;
pub mod raster_writer;
pub mod record_writer;

pub use backup_writer::{BackupRow, BackupWriter};
pub use raster_writer::RasterWriter;
pub use record_writer::write_observation_record;
