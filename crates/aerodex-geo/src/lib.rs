//! # aerodex-geo
//!
//! Coordinate transforms and footprint geometry for aerodex.
//!
//! This crate provides:
//! - UTM zone selection and forward/inverse projection between WGS84
//!   geographic coordinates and UTM meters (through proj4rs, with EPSG
//!   definitions from crs-definitions)
//! - Plane helpers: point rotation about a center and 6-parameter affine
//!   geotransform application
//! - Ground footprint computation for a camera position and pose
//!
//! ## Example
//!
//! ```
//! use aerodex_geo::{to_projected, from_projected, UtmZone};
//!
//! let zone = UtmZone::from_lat_lon(45.0, 9.0);
//! let (x, y) = to_projected(45.0, 9.0, zone)?;
//! let (lat, lon) = from_projected(x, y, zone)?;
//! assert!((lat - 45.0).abs() < 1e-6 && (lon - 9.0).abs() < 1e-6);
//! # Ok::<(), aerodex_geo::GeoError>(())
//! ```

mod error;
mod footprint;
mod utm;

pub use error::GeoError;
pub use footprint::{compute_footprint, Footprint, FootprintInput, GeoPoint3};
pub use utm::{apply_affine, from_projected, rotate, to_projected, UtmZone};

/// Result type for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;
