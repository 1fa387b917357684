//! Error types for metadata extraction.

use thiserror::Error;

/// Errors that can occur while reading or interpreting tag containers.
///
/// Absent tags are not errors; extraction functions signal them with
/// `Option::None`. These variants cover data that is present but malformed.
#[derive(Debug, Error)]
pub enum ExifError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The EXIF container could not be parsed.
    #[error("EXIF parse error: {0}")]
    Parse(#[from] exif::Error),

    /// A GPS value was present but could not be interpreted.
    #[error("Malformed GPS value: {raw}")]
    MalformedGps {
        /// The offending raw value.
        raw: String,
    },

    /// A date/time value was present but could not be interpreted.
    #[error("Malformed date value: {raw}")]
    MalformedDate {
        /// The offending raw value.
        raw: String,
    },
}
