use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{ProcessingError, Result};

/// Per-run scratch directory for downloaded and generated rasters.
///
/// Every file name can be reserved once; the directory and its contents go away
/// when the space is dropped.
pub struct ScratchSpace {
    temp_dir: TempDir,
    reserved: HashMap<String, PathBuf>,
}

impl ScratchSpace {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().map_err(|e| {
            ProcessingError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create scratch directory: {}", e),
            ))
        })?;

        Ok(Self {
            temp_dir,
            reserved: HashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Claim `file_name` for a single write.
    pub fn reserve(&mut self, file_name: &str) -> Result<PathBuf> {
        let dest_path = self.temp_dir.path().join(file_name);
        if self.reserved.contains_key(file_name) || dest_path.exists() {
            return Err(ProcessingError::ScratchConflict(file_name.to_string()));
        }

        self.reserved
            .insert(file_name.to_string(), dest_path.clone());
        Ok(dest_path)
    }

    pub fn reserved_files(&self) -> Vec<&PathBuf> {
        self.reserved.values().collect()
    }
}
