//! Error types for the DSM cache.

use thiserror::Error;

/// Errors that can occur when working with elevation tiles.
#[derive(Debug, Error)]
pub enum DsmError {
    /// I/O error reading or writing a cache file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// The file decodes but is not a usable elevation tile.
    #[error("Invalid DSM tile {path}: {reason}")]
    InvalidTile {
        /// Path of the offending file.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A query mapped to a pixel outside the tile's raster.
    #[error("Pixel ({px}, {py}) is outside tile {filename} ({width}x{height})")]
    PixelOutOfRange {
        /// Tile cache key.
        filename: String,
        /// Computed pixel column.
        px: i64,
        /// Computed pixel row.
        py: i64,
        /// Tile width.
        width: u32,
        /// Tile height.
        height: u32,
    },

    /// Projection failure while computing a fetch bounding box.
    #[error("Projection error: {0}")]
    Projection(#[from] aerodex_geo::GeoError),

    /// HTTP request error when fetching tiles.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The elevation service answered, but not with a usable tile.
    #[error("Failed to download DSM tile from {url}: {reason}")]
    TileDownloadFailed {
        /// Request URL.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The in-memory cache lock was poisoned.
    #[error("DSM cache lock was poisoned")]
    CacheLockPoisoned,
}
