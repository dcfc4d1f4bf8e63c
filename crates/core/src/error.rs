//! Error types for TerraDiff

use thiserror::Error;

/// Main error type for TerraDiff operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("area of interest needs at least 3 distinct vertices, got {0}")]
    DegenerateArea(usize),

    #[error("inverted bounding box: [{min_lon}, {min_lat}, {max_lon}, {max_lat}]")]
    InvertedBounds {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },

    #[error("date range start {start} is after end {end}")]
    InvertedDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch {
        er: usize,
        ec: usize,
        ar: usize,
        ac: usize,
    },

    #[error("band {0:?} not present")]
    MissingBand(String),

    #[error("imagery service error: {0}")]
    Service(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for TerraDiff operations
pub type Result<T> = std::result::Result<T, Error>;
