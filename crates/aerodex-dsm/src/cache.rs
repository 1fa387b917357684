//! The elevation-lookup cache.
//!
//! `DsmCache` answers best-effort elevation queries out of a growing set of
//! previously fetched tiles: an in-memory index first, then the on-disk
//! cache directory, then the remote elevation service. The disk/network
//! path is serialized across processes with a file lock so concurrent
//! invocations over the same unindexed area do not download duplicate
//! tiles.

use crate::lock::CacheLock;
use crate::settings::DsmSettings;
use crate::tile::DsmTile;
use crate::{DsmError, Result};
use aerodex_geo::{from_projected, to_projected, UtmZone};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Subdirectory of the cache root holding downloaded tiles.
pub const CACHE_SUBDIR: &str = "dsm_service_cache";

/// Lock file colocated with the cache.
pub const LOCK_FILE: &str = "dsm_service.lock";

/// Download statistics for one cache instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadStats {
    /// Number of tiles downloaded.
    pub tiles_downloaded: usize,
    /// Total bytes downloaded.
    pub bytes_downloaded: u64,
}

/// Process-wide elevation cache.
///
/// Construct one per process and pass it by reference; the in-memory tile
/// map is never evicted, which is fine for CLI-scoped lifetimes but grows
/// without bound if embedded in a long-running service.
pub struct DsmCache {
    settings: DsmSettings,
    /// Registered tiles keyed by source filename.
    entries: Mutex<HashMap<String, DsmTile>>,
    client: reqwest::blocking::Client,
    tiles_downloaded: AtomicUsize,
    bytes_downloaded: AtomicU64,
}

impl std::fmt::Debug for DsmCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DsmCache")
            .field("cache_dir", &self.settings.cache_dir)
            .finish()
    }
}

impl DsmCache {
    /// Create a cache over the configured directory, creating it if needed.
    pub fn new(settings: DsmSettings) -> Result<Self> {
        std::fs::create_dir_all(settings.cache_dir.join(CACHE_SUBDIR))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            settings,
            entries: Mutex::new(HashMap::new()),
            client,
            tiles_downloaded: AtomicUsize::new(0),
            bytes_downloaded: AtomicU64::new(0),
        })
    }

    /// The directory downloaded tiles land in.
    pub fn tile_dir(&self) -> PathBuf {
        self.settings.cache_dir.join(CACHE_SUBDIR)
    }

    /// Download statistics for this instance.
    pub fn download_stats(&self) -> DownloadStats {
        DownloadStats {
            tiles_downloaded: self.tiles_downloaded.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
        }
    }

    /// Number of tiles currently registered in memory.
    pub fn registered_tiles(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Best-effort ground elevation at a coordinate.
    ///
    /// Never fails and never blocks classification on elevation problems:
    /// lookup errors and network failures are logged and degrade to 0.
    pub fn get_altitude(&self, lat: f64, lon: f64) -> f64 {
        match self.try_get_altitude(lat, lon) {
            Ok(Some(elevation)) => elevation,
            Ok(None) => {
                debug!(lat, lon, "no DSM coverage for coordinate, using 0");
                0.0
            }
            Err(err) => {
                warn!(lat, lon, %err, "DSM lookup failed, using 0");
                0.0
            }
        }
    }

    fn try_get_altitude(&self, lat: f64, lon: f64) -> Result<Option<f64>> {
        if let Some(elevation) = self.sample_from_memory(lat, lon)? {
            return Ok(Some(elevation));
        }

        // Serialize the disk/network path across processes. Held to the end
        // of this attempt; drop releases it on every exit path.
        let _guard = CacheLock::acquire(self.settings.cache_dir.join(LOCK_FILE))?;

        if self.register_disk_tiles(lat, lon)? {
            if let Some(elevation) = self.sample_from_memory(lat, lon)? {
                return Ok(Some(elevation));
            }
        }

        match self.fetch_tile(lat, lon) {
            Ok(()) => {
                if self.register_disk_tiles(lat, lon)? {
                    if let Some(elevation) = self.sample_from_memory(lat, lon)? {
                        return Ok(Some(elevation));
                    }
                }
            }
            Err(err) => {
                warn!(lat, lon, %err, "DSM tile fetch failed");
            }
        }

        Ok(None)
    }

    /// Sample the first registered tile whose bounds contain the point.
    fn sample_from_memory(&self, lat: f64, lon: f64) -> Result<Option<f64>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DsmError::CacheLockPoisoned)?;

        for tile in entries.values_mut() {
            if tile.bounds().contains(lon, lat) {
                return tile.sample(lon, lat).map(Some);
            }
        }
        Ok(None)
    }

    /// Register on-disk tiles that are not yet in memory.
    ///
    /// Tiles that fail to open are deleted from disk and not retried this
    /// run. Returns true when a newly registered tile contains the query
    /// point (its raster is decoded eagerly in that case).
    fn register_disk_tiles(&self, lat: f64, lon: f64) -> Result<bool> {
        let mut hit = false;

        for entry in std::fs::read_dir(self.tile_dir())? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "tif") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            {
                let entries = self
                    .entries
                    .lock()
                    .map_err(|_| DsmError::CacheLockPoisoned)?;
                if entries.contains_key(filename) {
                    continue;
                }
            }

            let mut tile = match DsmTile::open(&path) {
                Ok(tile) => tile,
                Err(err) => {
                    warn!(path = %path.display(), %err, "removing unreadable DSM tile");
                    let _ = std::fs::remove_file(&path);
                    continue;
                }
            };

            if tile.bounds().contains(lon, lat) {
                match tile.ensure_loaded() {
                    Ok(()) => hit = true,
                    Err(err) => {
                        warn!(path = %path.display(), %err, "removing undecodable DSM tile");
                        let _ = std::fs::remove_file(&path);
                        continue;
                    }
                }
            }

            let mut entries = self
                .entries
                .lock()
                .map_err(|_| DsmError::CacheLockPoisoned)?;
            entries.insert(tile.filename().to_string(), tile);
        }

        Ok(hit)
    }

    /// Request a tile covering the point from the elevation service.
    fn fetch_tile(&self, lat: f64, lon: f64) -> Result<()> {
        let radius = self.settings.fetch_radius_m;
        let zone = UtmZone::from_lat_lon(lat, lon);
        let (x, y) = to_projected(lat, lon, zone)?;
        let (south, west) = from_projected(x - radius, y - radius, zone)?;
        let (north, east) = from_projected(x + radius, y + radius, zone)?;

        let url = self.settings.request_url(west, south, east, north);
        debug!(%url, "fetching DSM tile");

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(DsmError::TileDownloadFailed {
                url,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(DsmError::TileDownloadFailed {
                url,
                reason: "empty response body".to_string(),
            });
        }

        // Projected coordinate plus timestamp keeps concurrent downloads
        // from colliding on a name.
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let dest = self.tile_dir().join(format!(
            "dsm_{}_{}_{}.tif",
            x.round() as i64,
            y.round() as i64,
            timestamp
        ));

        let mut file = std::fs::File::create(&dest)?;
        file.write_all(&bytes)?;

        self.tiles_downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_downloaded
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);

        Ok(())
    }
}
