/// Raster file layout
pub const GEOMETRY_GROUP: &str = "Geometry_data";
pub const IMAGE_GROUP: &str = "Image_data";
pub const LATITUDE_DATASET: &str = "Latitude";
pub const LONGITUDE_DATASET: &str = "Longitude";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_UNITS: &str = "units";

/// Optional SGLI scaling attributes on stored digital numbers
pub const ATTR_SLOPE: &str = "Slope";
pub const ATTR_OFFSET: &str = "Offset";
pub const ATTR_ERROR_DN: &str = "Error_DN";

/// Unit conversion
pub const KELVIN_OFFSET: f64 = 273.15;

/// Acquisition geometry
pub const SEARCH_HALF_WIDTH_DEG: f64 = 0.5;
pub const SEARCH_DAY_MARGIN: i64 = 1;

/// Mock raster generation
pub const MOCK_GRID_SIZE: usize = 100;
pub const MOCK_HALF_WIDTH_DEG: f64 = 0.5;
pub const MOCK_LST_MEAN: f64 = 291.5;
pub const MOCK_LST_STD: f64 = 3.0;
pub const MOCK_LST_MIN: f64 = 273.0;
pub const MOCK_LST_MAX: f64 = 320.0;
pub const MOCK_NDVI_MEAN: f64 = 0.75;
pub const MOCK_NDVI_STD: f64 = 0.08;
pub const MOCK_NDVI_MIN: f64 = 0.0;
pub const MOCK_NDVI_MAX: f64 = 1.0;

/// Extraction
pub const WINDOW_SIZE: usize = 5;

/// Ingestion rounding (decimal places)
pub const LST_DECIMALS: i32 = 2;
pub const NDVI_DECIMALS: i32 = 3;

/// Record defaults
pub const DEFAULT_LOCATION_NAME: &str = "Observation Point";
pub const ACQUISITION_FAILED: &str = "file acquisition failed";

/// Catalog defaults
pub const DEFAULT_GPORTAL_SEARCH_URL: &str = "https://gportal.jaxa.jp/csw/csw";
pub const CATALOG_RESULT_LIMIT: usize = 100;

/// Store defaults
pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "root";
pub const DEFAULT_MYSQL_DATABASE: &str = "satellite_viewer";

/// Directories and files
pub const DEFAULT_BACKUP_DIR: &str = "data/backup";
pub const DEFAULT_CONFIG_FILE: &str = "sgli.toml";
