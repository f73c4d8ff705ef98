use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog request failed: {0}")]
    Catalog(String),

    #[error("Dataset {0} not found")]
    DatasetNotFound(String),

    #[error("Invalid raster data: {0}")]
    InvalidRaster(String),

    #[error("Location id {location_id} does not exist")]
    LocationNotFound { location_id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unsupported database url: {0}")]
    UnsupportedStore(String),

    #[error("Scratch file already written: {0}")]
    ScratchConflict(String),

    #[error("Ingestion failed: {0}")]
    IngestionFailed(String),

    #[cfg(feature = "hdf5")]
    #[error("Scientific file error: {0}")]
    ScientificFile(#[from] netcdf::Error),
}
