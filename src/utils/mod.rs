pub mod capabilities;
pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;

pub use capabilities::CapabilityReport;
pub use constants::*;
pub use filename::{generate_backup_filename, generate_record_filename, mock_raster_filename};
pub use progress::ProgressReporter;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
