//! # aerodex-exif
//!
//! Camera metadata extraction for aerodex.
//!
//! The entry point is [`TagSet`], a parsed tag container assembled from a
//! file's EXIF directory and XMP packet. Extraction functions in
//! [`extract`] read make/model/sensor, image size, focal length, physical
//! sensor size, geolocation, gimbal pose, capture time, and panorama
//! parameters out of it. Vendor tag-name differences are absorbed by one
//! declarative alias table in [`aliases`].
//!
//! ## Example
//!
//! ```no_run
//! use aerodex_exif::{extract, TagSet, TimezoneResolver};
//!
//! let tags = TagSet::from_path("DJI_0042.JPG")?;
//! let resolver = TimezoneResolver::new();
//!
//! if let Some(geo) = extract::extract_geo(&tags)? {
//!     let captured = extract::extract_capture_time(&tags, &resolver, Some(&geo));
//!     println!("({}, {}) at {:?}", geo.latitude, geo.longitude, captured);
//! }
//! # Ok::<(), aerodex_exif::ExifError>(())
//! ```

pub mod aliases;
mod error;
pub mod extract;
mod sensor_db;
mod tags;
mod timezone;
mod xmp;

pub use error::ExifError;
pub use extract::{
    CameraOrientation, Focal, GeoLocation, ImageSize, PanoramaInfo, SensorSize,
};
pub use sensor_db::sensor_width_mm;
pub use tags::{TagSet, TagValue};
pub use timezone::TimezoneResolver;
pub use xmp::scan_xmp_attributes;

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, ExifError>;
