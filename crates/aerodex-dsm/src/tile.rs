//! Single DSM tile representation.
//!
//! A tile is a single-band georeferenced raster of surface elevations. The
//! header (dimensions, geotransform, no-data sentinel) is read when the
//! tile is registered; the sample buffer stays empty until a query actually
//! lands inside the tile's bounds.

use crate::{nodata_fallback_elevation, DsmError, Result};
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::warn;

/// GeoTIFF ModelPixelScale tag.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepoint tag.
const TAG_MODEL_TIEPOINT: u16 = 33922;
/// GDAL no-data value tag, stored as an ASCII string.
const TAG_GDAL_NODATA: u16 = 42113;

/// Bounding box of a tile in world coordinates (longitude/latitude for
/// geographic tiles).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// West edge.
    pub min_x: f64,
    /// South edge.
    pub min_y: f64,
    /// East edge.
    pub max_x: f64,
    /// North edge.
    pub max_y: f64,
}

impl TileBounds {
    /// Check whether a world coordinate falls within the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// A registered elevation tile.
#[derive(Debug)]
pub struct DsmTile {
    /// Source filename, used as the cache key.
    filename: String,
    /// Full path for lazy decoding.
    path: PathBuf,
    /// Affine geotransform: `x = a0 + px*a1 + py*a2`, `y = a3 + px*a4 + py*a5`.
    geotransform: [f64; 6],
    width: u32,
    height: u32,
    /// Declared no-data sentinel, if any.
    nodata: Option<f64>,
    /// Elevation samples in row-major order; empty until first use.
    data: Vec<f32>,
}

/// Decoder limits sized for service tiles (a few thousand pixels square).
fn decoder_limits() -> Limits {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 512 * 1024 * 1024;
    limits.intermediate_buffer_size = 512 * 1024 * 1024;
    limits.ifd_value_size = 64 * 1024 * 1024;
    limits
}

impl DsmTile {
    /// Open a tile file and read its header without decoding the raster.
    ///
    /// Validates that the file is a single-band GeoTIFF with a defined
    /// geotransform.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DsmError::InvalidTile {
                path: path.display().to_string(),
                reason: "path has no filename".to_string(),
            })?
            .to_string();

        let file = std::fs::File::open(path)?;
        let mut decoder = Decoder::new(file)?.with_limits(decoder_limits());

        let (width, height) = decoder.dimensions()?;
        if width == 0 || height == 0 {
            return Err(DsmError::InvalidTile {
                path: path.display().to_string(),
                reason: "zero-sized raster".to_string(),
            });
        }

        let samples = decoder
            .get_tag_u32(Tag::SamplesPerPixel)
            .unwrap_or(1);
        if samples != 1 {
            return Err(DsmError::InvalidTile {
                path: path.display().to_string(),
                reason: format!("expected a single band, found {samples}"),
            });
        }

        let tiepoint = decoder
            .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))
            .map_err(|_| DsmError::InvalidTile {
                path: path.display().to_string(),
                reason: "missing ModelTiepoint tag".to_string(),
            })?;
        let scale = decoder
            .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
            .map_err(|_| DsmError::InvalidTile {
                path: path.display().to_string(),
                reason: "missing ModelPixelScale tag".to_string(),
            })?;
        if tiepoint.len() < 6 || scale.len() < 2 {
            return Err(DsmError::InvalidTile {
                path: path.display().to_string(),
                reason: "truncated geotransform tags".to_string(),
            });
        }

        // Tiepoint [i, j, k, x, y, z] anchors pixel (i, j) at world (x, y);
        // service tiles anchor the top-left pixel.
        let geotransform = [
            tiepoint[3],
            scale[0],
            0.0,
            tiepoint[4],
            0.0,
            -scale[1],
        ];

        let nodata = decoder
            .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Ok(Self {
            filename,
            path: path.to_path_buf(),
            geotransform,
            width,
            height,
            nodata,
            data: Vec::new(),
        })
    }

    /// Build a tile from already-known parts. Intended for synthesized
    /// tiles in tests and for callers that decode rasters elsewhere.
    pub fn from_parts(
        filename: impl Into<String>,
        geotransform: [f64; 6],
        width: u32,
        height: u32,
        nodata: Option<f64>,
        data: Vec<f32>,
    ) -> Self {
        Self {
            filename: filename.into(),
            path: PathBuf::new(),
            geotransform,
            width,
            height,
            nodata,
            data,
        }
    }

    /// The tile's cache key.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The tile's affine geotransform.
    pub fn geotransform(&self) -> &[f64; 6] {
        &self.geotransform
    }

    /// Pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// World-coordinate bounding box derived from the geotransform.
    pub fn bounds(&self) -> TileBounds {
        let gt = &self.geotransform;
        let x0 = gt[0];
        let x1 = gt[0] + self.width as f64 * gt[1];
        let y0 = gt[3];
        let y1 = gt[3] + self.height as f64 * gt[5];
        TileBounds {
            min_x: x0.min(x1),
            max_x: x0.max(x1),
            min_y: y0.min(y1),
            max_y: y0.max(y1),
        }
    }

    /// True once the sample buffer has been decoded.
    pub fn is_loaded(&self) -> bool {
        !self.data.is_empty()
    }

    /// Decode the raster into memory if it has not been decoded yet.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        let file = std::fs::File::open(&self.path)?;
        let mut decoder = Decoder::new(file)?.with_limits(decoder_limits());
        let image = decoder.read_image()?;

        self.data = match image {
            DecodingResult::F32(data) => data,
            DecodingResult::F16(data) => data.into_iter().map(f32::from).collect(),
            DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        };

        Ok(())
    }

    /// Sample the elevation at a world coordinate using the nearest pixel.
    ///
    /// Decodes the raster on first use. A coordinate that maps to a pixel
    /// outside the raster is an error; a no-data sample degrades to the
    /// fallback elevation with a warning.
    pub fn sample(&mut self, x: f64, y: f64) -> Result<f64> {
        self.ensure_loaded()?;

        let gt = &self.geotransform;
        let px = ((x - gt[0]) / gt[1]).floor() as i64;
        let py = ((y - gt[3]) / gt[5]).floor() as i64;

        if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
            return Err(DsmError::PixelOutOfRange {
                filename: self.filename.clone(),
                px,
                py,
                width: self.width,
                height: self.height,
            });
        }

        let value = self.data[(py as u64 * self.width as u64 + px as u64) as usize] as f64;
        if let Some(nodata) = self.nodata {
            if (value - nodata).abs() < 0.001 {
                warn!(
                    tile = %self.filename,
                    x, y, "sampled no-data pixel, using fallback elevation"
                );
                return Ok(nodata_fallback_elevation());
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A 10x10 tile over lon 9..9.01, lat 44.99..45.0, 0.001 deg pixels
    fn test_tile(nodata: Option<f64>, data: Vec<f32>) -> DsmTile {
        DsmTile::from_parts(
            "test.tif",
            [9.0, 0.001, 0.0, 45.0, 0.0, -0.001],
            10,
            10,
            nodata,
            data,
        )
    }

    #[test]
    fn test_bounds_from_geotransform() {
        let tile = test_tile(None, vec![0.0; 100]);
        let bounds = tile.bounds();
        assert!((bounds.min_x - 9.0).abs() < 1e-12);
        assert!((bounds.max_x - 9.01).abs() < 1e-12);
        assert!((bounds.min_y - 44.99).abs() < 1e-12);
        assert!((bounds.max_y - 45.0).abs() < 1e-12);

        assert!(bounds.contains(9.005, 44.995));
        assert!(!bounds.contains(9.02, 44.995));
        assert!(!bounds.contains(9.005, 45.01));
    }

    #[test]
    fn test_sample_nearest_pixel() {
        let mut data = vec![0.0f32; 100];
        data[5 * 10 + 3] = 123.5; // pixel (3, 5)
        let mut tile = test_tile(None, data);

        // World coordinate inside pixel (3, 5)
        let elevation = tile.sample(9.0035, 45.0 - 0.0055).unwrap();
        assert!((elevation - 123.5).abs() < 1e-9);
    }

    #[test]
    fn test_sample_out_of_range_pixel() {
        let mut tile = test_tile(None, vec![0.0; 100]);
        let err = tile.sample(9.5, 44.995).unwrap_err();
        assert!(matches!(err, DsmError::PixelOutOfRange { .. }));
    }

    #[test]
    fn test_sample_nodata_falls_back() {
        let mut tile = test_tile(Some(-9999.0), vec![-9999.0; 100]);
        let elevation = tile.sample(9.005, 44.995).unwrap();
        assert_eq!(elevation, 0.0);
    }
}
