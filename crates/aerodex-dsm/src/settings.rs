//! DSM cache configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default bounding-box radius around a query point, in meters.
pub const DEFAULT_FETCH_RADIUS_M: f64 = 5000.0;

/// Default network timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("aerodex")
}

fn default_url_template() -> String {
    // Copernicus GLO-30 through the OpenTopography raster API
    "https://portal.opentopography.org/API/globaldem?demtype=COP30\
     &west={west}&south={south}&east={east}&north={north}&outputFormat=GTiff"
        .to_string()
}

fn default_fetch_radius_m() -> f64 {
    DEFAULT_FETCH_RADIUS_M
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for a [`crate::DsmCache`].
///
/// The URL template is parameterized by `{west}`, `{south}`, `{east}`, and
/// `{north}` bounding-box placeholders; the service must answer with a
/// single-band georeferenced raster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DsmSettings {
    /// Root directory for the tile cache and lock file.
    pub cache_dir: PathBuf,
    /// Templated elevation service request URL.
    pub url_template: String,
    /// Half-size of the requested bounding box, in meters.
    pub fetch_radius_m: f64,
    /// Network timeout for tile downloads, in seconds.
    pub timeout_secs: u64,
}

impl Default for DsmSettings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            url_template: default_url_template(),
            fetch_radius_m: default_fetch_radius_m(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DsmSettings {
    /// Settings pointing at a specific cache directory, defaults otherwise.
    pub fn with_cache_dir<P: Into<PathBuf>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ..Self::default()
        }
    }

    /// Substitute a bounding box into the URL template.
    pub fn request_url(&self, west: f64, south: f64, east: f64, north: f64) -> String {
        self.url_template
            .replace("{west}", &west.to_string())
            .replace("{south}", &south.to_string())
            .replace("{east}", &east.to_string())
            .replace("{north}", &north.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_substitution() {
        let settings = DsmSettings {
            url_template: "http://dsm.test/{west}/{south}/{east}/{north}".to_string(),
            ..DsmSettings::default()
        };
        assert_eq!(
            settings.request_url(8.9, 44.9, 9.1, 45.1),
            "http://dsm.test/8.9/44.9/9.1/45.1"
        );
    }

    #[test]
    fn test_defaults() {
        let settings = DsmSettings::default();
        assert_eq!(settings.fetch_radius_m, DEFAULT_FETCH_RADIUS_M);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.url_template.contains("{west}"));
    }
}
