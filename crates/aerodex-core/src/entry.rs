//! The persistent entry record.

use crate::geometry::{PointGeometry, PolygonGeometry};
use serde_json::{Map, Value};

/// Semantic type of a classified entry.
///
/// The integer codes are stable and stored in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EntryType {
    /// Path could not be classified (typically missing).
    Undefined = 0,
    /// A plain directory.
    Directory = 1,
    /// A file with no recognized structure.
    Generic = 2,
    /// A georeferenced raster.
    GeoRaster = 3,
    /// A point cloud file.
    PointCloud = 4,
    /// An image without a capture position.
    Image = 5,
    /// An image with a capture position.
    GeoImage = 6,
    /// A 3D model file.
    Model = 7,
    /// A directory containing another dataset root.
    NestedDataset = 8,
}

impl EntryType {
    /// The stable integer code.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Decode a stored integer code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(EntryType::Undefined),
            1 => Some(EntryType::Directory),
            2 => Some(EntryType::Generic),
            3 => Some(EntryType::GeoRaster),
            4 => Some(EntryType::PointCloud),
            5 => Some(EntryType::Image),
            6 => Some(EntryType::GeoImage),
            7 => Some(EntryType::Model),
            8 => Some(EntryType::NestedDataset),
            _ => None,
        }
    }
}

/// One classified filesystem entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Dataset-root-relative path, forward-slash normalized.
    pub path: String,
    /// Content digest, when computed.
    pub hash: Option<String>,
    /// Semantic type.
    pub entry_type: EntryType,
    /// Extracted scalar attributes. Absent fields are omitted, never null.
    pub attributes: Map<String, Value>,
    /// Modification time, Unix seconds.
    pub modified_time: i64,
    /// Size in bytes; 0 for directories.
    pub size: u64,
    /// Path component count from the dataset root.
    pub depth: u32,
    /// Capture position, when known.
    pub point_geometry: Option<PointGeometry>,
    /// Ground footprint; present only for geolocated images.
    pub polygon_geometry: Option<PolygonGeometry>,
}

impl Entry {
    /// An empty entry of a given type at a path.
    pub fn new(path: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            path: path.into(),
            hash: None,
            entry_type,
            attributes: Map::new(),
            modified_time: 0,
            size: 0,
            depth: 0,
            point_geometry: None,
            polygon_geometry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_roundtrip() {
        let all = [
            EntryType::Undefined,
            EntryType::Directory,
            EntryType::Generic,
            EntryType::GeoRaster,
            EntryType::PointCloud,
            EntryType::Image,
            EntryType::GeoImage,
            EntryType::Model,
            EntryType::NestedDataset,
        ];
        for t in all {
            assert_eq!(EntryType::from_code(t.code()), Some(t));
        }
        assert_eq!(EntryType::from_code(99), None);
    }
}
