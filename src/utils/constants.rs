/// WGS84 ellipsoid
pub const WGS84_A: f64 = 6_378_137.0;
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// UTM projection parameters
pub const UTM_K0: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
pub const UTM_FALSE_NORTHING: f64 = 10_000_000.0;
pub const UTM_MIN_LAT: f64 = -80.0;
pub const UTM_MAX_LAT: f64 = 84.0;

/// Grid values a zone can actually produce
pub const UTM_MIN_EASTING: f64 = 100_000.0;
pub const UTM_MAX_EASTING: f64 = 900_000.0;
pub const UTM_MAX_NORTHING_NORTH: f64 = 9_400_000.0;
pub const UTM_MIN_NORTHING_SOUTH: f64 = 1_100_000.0;
/// Widest zone reach, Norway and Svalbard included, is 6°
pub const UTM_MAX_MERIDIAN_OFFSET: f64 = 9.0;
/// Slack at band edges for positions truncated to the metre
pub const UTM_BAND_TOLERANCE: f64 = 0.5;

/// Latitude band letters, 8° each from 80°S (X covers 72°N to 84°N)
pub const LATITUDE_BANDS: &str = "CDEFGHJKLMNPQRSTUVWX";

/// MGRS 100 km square letters
pub const MGRS_COLUMN_SETS: [&str; 3] = ["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
pub const MGRS_ROW_SETS: [&str; 2] = ["ABCDEFGHJKLMNPQRSTUV", "FGHJKLMNPQRSTUVABCDE"];

/// Rendering defaults
pub const CUSTOM_COORD_FORMAT: &str = "{degree}º{minutes}'{seconds}\"";
pub const SINGLE_FIELD_COORD_FORMAT: &str = "{X} {Y}";
pub const FIELD_LENGTH: usize = 10;
pub const FIELD_PRECISION: usize = 3;
pub const XY_FIELD_LENGTH: usize = 20;
pub const DECIMAL_PRECISION: usize = 8;
pub const MGRS_PRECISION: usize = 5;

/// Settings
pub const ENV_PREFIX: &str = "COORDCONV";
pub const DEFAULT_DELIMITER: char = ',';
