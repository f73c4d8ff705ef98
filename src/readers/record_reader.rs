use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::models::ObservationRecord;

/// Load an observation record written by the collect stage.
pub fn read_observation_record(path: &Path) -> Result<ObservationRecord> {
    let file = File::open(path)?;
    let record = serde_json::from_reader(BufReader::new(file))?;
    Ok(record)
}
