//! GeoTIFF probing for raster classification.
//!
//! A TIFF counts as a georeferenced raster only when it carries a defined
//! geotransform (ModelTiepoint + ModelPixelScale). Plain photographic TIFFs
//! fail the probe and fall through to image classification.

use std::path::Path;
use tiff::decoder::Decoder;
use tiff::tags::Tag;

/// GeoTIFF ModelPixelScale tag.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepoint tag.
const TAG_MODEL_TIEPOINT: u16 = 33922;

/// Header information of a georeferenced raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterInfo {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Affine geotransform.
    pub geotransform: [f64; 6],
}

/// Probe a file for a georeferenced raster header.
///
/// Returns `None` for files that do not open as TIFF or lack a defined
/// spatial projection; probing never fails hard.
pub fn probe_geotiff<P: AsRef<Path>>(path: P) -> Option<RasterInfo> {
    let file = std::fs::File::open(path).ok()?;
    let mut decoder = Decoder::new(file).ok()?;
    let (width, height) = decoder.dimensions().ok()?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))
        .ok()?;
    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
        .ok()?;
    if tiepoint.len() < 6 || scale.len() < 2 {
        return None;
    }

    Some(RasterInfo {
        width,
        height,
        geotransform: [tiepoint[3], scale[0], 0.0, tiepoint[4], 0.0, -scale[1]],
    })
}
