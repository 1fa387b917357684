//! # aerodex-core
//!
//! Entry model and classification engine for aerodex.
//!
//! One [`EntryClassifier::classify`] call turns a filesystem path into a
//! typed [`Entry`]: directories (and nested dataset roots), georeferenced
//! rasters, plain and geolocated images, point clouds, models, and generic
//! files. For geolocated images the classifier extracts camera metadata,
//! resolves the height above ground against the elevation cache, and
//! attaches the computed ground footprint.
//!
//! ## Example
//!
//! ```no_run
//! use aerodex_core::{ClassifierConfig, EntryClassifier};
//! use aerodex_dsm::DsmCache;
//! use aerodex_exif::TimezoneResolver;
//! use std::path::Path;
//!
//! let config = ClassifierConfig::default();
//! let dsm = DsmCache::new(config.dsm.clone())?;
//! let timezones = TimezoneResolver::new();
//!
//! let classifier = EntryClassifier::new("/data/flight1", &config, &dsm, &timezones);
//! let entry = classifier.classify(Path::new("/data/flight1/DJI_0042.JPG"))?;
//! println!("{:?}: {} attributes", entry.entry_type, entry.attributes.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod classify;
mod config;
mod entry;
mod error;
mod geometry;
mod hash;
mod raster;

pub use classify::EntryClassifier;
pub use config::{ClassifierConfig, DEFAULT_DATASET_MARKER};
pub use entry::{Entry, EntryType};
pub use error::CoreError;
pub use geometry::{Geometry, Point3, PointGeometry, PolygonGeometry, WGS84_SRID};
pub use hash::compute_file_digest;
pub use raster::{probe_geotiff, RasterInfo};

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, CoreError>;
