//! Error types for the geo crate.

use thiserror::Error;

/// Errors that can occur during coordinate transforms.
#[derive(Debug, Error)]
pub enum GeoError {
    /// EPSG code missing from the crs-definitions database.
    #[error("EPSG:{0} is not in the crs-definitions database")]
    UnknownEpsg(u16),

    /// Projection definition could not be parsed.
    #[error("Invalid projection for EPSG:{epsg}: {reason}")]
    InvalidProjection {
        /// EPSG code of the offending definition.
        epsg: u16,
        /// Parser error description.
        reason: String,
    },

    /// Coordinate transform failed.
    #[error("Transform failed for EPSG:{epsg}: {reason}")]
    TransformFailed {
        /// EPSG code of the projected CRS involved.
        epsg: u16,
        /// Transform error description.
        reason: String,
    },

    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("Coordinate ({lat}, {lon}) is not a valid geographic position")]
    InvalidCoordinate {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
}
