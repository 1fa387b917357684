//! Error types for classification.

use thiserror::Error;

/// Errors that can occur while classifying an entry.
///
/// In the default (non-strict) mode most of these are logged and absorbed;
/// strict mode propagates the first failure to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// I/O error reading the file or its metadata.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag container reading or interpretation failed.
    #[error("Metadata error: {0}")]
    Metadata(#[from] aerodex_exif::ExifError),

    /// Projection or footprint geometry failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] aerodex_geo::GeoError),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The classified path is not inside the dataset root.
    #[error("Path {path} is outside the dataset root {root}")]
    OutsideRoot {
        /// Offending path.
        path: String,
        /// Dataset root.
        root: String,
    },
}
