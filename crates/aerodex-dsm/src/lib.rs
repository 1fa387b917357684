//! # aerodex-dsm
//!
//! Digital surface model (DSM) elevation cache for aerodex.
//!
//! Elevation queries are answered from three layers, cheapest first:
//! tiles already registered in memory, tiles present in the on-disk cache
//! directory, and finally a templated remote elevation service. Downloads
//! land in the cache directory so later queries (and other processes) skip
//! the network; a cross-process file lock keeps concurrent invocations from
//! fetching the same area twice.
//!
//! ## Example
//!
//! ```no_run
//! use aerodex_dsm::{DsmCache, DsmSettings};
//!
//! let cache = DsmCache::new(DsmSettings::with_cache_dir("/var/cache/aerodex"))?;
//! let elevation = cache.get_altitude(45.0, 9.0);
//! println!("ground elevation: {elevation} m");
//! # Ok::<(), aerodex_dsm::DsmError>(())
//! ```

mod cache;
mod error;
mod lock;
mod settings;
mod tile;

pub use cache::{DownloadStats, DsmCache, CACHE_SUBDIR, LOCK_FILE};
pub use error::DsmError;
pub use lock::CacheLock;
pub use settings::{DsmSettings, DEFAULT_FETCH_RADIUS_M, DEFAULT_TIMEOUT_SECS};
pub use tile::{DsmTile, TileBounds};

/// Result type for DSM operations.
pub type Result<T> = std::result::Result<T, DsmError>;

/// Elevation reported when a query samples a tile's no-data sentinel.
///
/// Whether callers should instead see "elevation unknown" is an open
/// policy question; keeping the value behind one named function makes the
/// behavior easy to revisit.
pub fn nodata_fallback_elevation() -> f64 {
    0.0
}
