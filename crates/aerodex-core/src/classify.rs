//! Entry classification.
//!
//! Turns one filesystem path into a typed, geolocated [`Entry`]. The
//! classifier owns no state of its own; the elevation cache and timezone
//! resolver are constructed once at process start and passed in by
//! reference.

use crate::config::ClassifierConfig;
use crate::entry::{Entry, EntryType};
use crate::geometry::{Point3, PointGeometry, PolygonGeometry};
use crate::hash::compute_file_digest;
use crate::raster::probe_geotiff;
use crate::Result;
use aerodex_dsm::DsmCache;
use aerodex_exif::{extract, TagSet, TimezoneResolver};
use aerodex_geo::{compute_footprint, FootprintInput};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

/// Extensions probed for a georeferenced raster before image handling.
const RASTER_EXTENSIONS: &[&str] = &["tif", "tiff"];
/// Extensions classified as images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];
/// Extensions classified as point clouds.
const POINT_CLOUD_EXTENSIONS: &[&str] = &["las", "laz", "ply"];
/// Extensions classified as 3D models.
const MODEL_EXTENSIONS: &[&str] = &["obj", "gltf", "glb"];

/// Classifies paths under one dataset root.
pub struct EntryClassifier<'a> {
    root: PathBuf,
    config: &'a ClassifierConfig,
    dsm: &'a DsmCache,
    timezones: &'a TimezoneResolver,
}

impl<'a> EntryClassifier<'a> {
    /// Create a classifier for a dataset root.
    pub fn new(
        root: impl Into<PathBuf>,
        config: &'a ClassifierConfig,
        dsm: &'a DsmCache,
        timezones: &'a TimezoneResolver,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            dsm,
            timezones,
        }
    }

    /// Classify one path into an entry.
    ///
    /// Per-file metadata failures are logged and the entry keeps whatever
    /// was extracted before the failure; strict mode propagates the first
    /// failure instead.
    pub fn classify(&self, path: &Path) -> Result<Entry> {
        let (relative, depth) = self.relative_path(path)?;

        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                if self.config.strict {
                    return Err(err.into());
                }
                warn!(path = %path.display(), %err, "path not readable, classifying as undefined");
                let mut entry = Entry::new(relative, EntryType::Undefined);
                entry.depth = depth;
                return Ok(entry);
            }
        };

        let mut entry = Entry::new(relative, EntryType::Generic);
        entry.depth = depth;
        entry.modified_time = modified_seconds(&metadata);

        if metadata.is_dir() {
            entry.entry_type = if path.join(self.config.dataset_marker()).is_dir() {
                EntryType::NestedDataset
            } else {
                EntryType::Directory
            };
            return Ok(entry);
        }

        entry.size = metadata.len();
        entry.hash = match compute_file_digest(path) {
            Ok(digest) => Some(digest),
            Err(err) => {
                if self.config.strict {
                    return Err(err.into());
                }
                warn!(path = %path.display(), %err, "could not hash file");
                None
            }
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        // Georeferenced TIFFs must win over plain image classification
        if RASTER_EXTENSIONS.contains(&extension.as_str()) {
            if let Some(info) = probe_geotiff(path) {
                debug!(path = %path.display(), width = info.width, height = info.height,
                       "classified as georeferenced raster");
                entry.entry_type = EntryType::GeoRaster;
                return Ok(entry);
            }
        }

        if POINT_CLOUD_EXTENSIONS.contains(&extension.as_str()) {
            entry.entry_type = EntryType::PointCloud;
            return Ok(entry);
        }

        if MODEL_EXTENSIONS.contains(&extension.as_str()) {
            entry.entry_type = EntryType::Model;
            return Ok(entry);
        }

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            entry.entry_type = EntryType::Image;

            let tags = match TagSet::from_path(path) {
                Ok(tags) => tags,
                Err(err) => {
                    if self.config.strict {
                        return Err(err.into());
                    }
                    debug!(path = %path.display(), %err, "no readable tags, keeping plain image");
                    return Ok(entry);
                }
            };
            self.apply_image_tags(&mut entry, &tags)?;
        }

        Ok(entry)
    }

    /// Merge extracted image metadata into the entry, upgrading it to a
    /// geolocated image when a capture position is present.
    fn apply_image_tags(&self, entry: &mut Entry, tags: &TagSet) -> Result<()> {
        let image_size = extract::extract_image_size(tags);
        if let Some(size) = image_size {
            entry.attributes.insert("imageWidth".into(), json!(size.width));
            entry.attributes.insert("imageHeight".into(), json!(size.height));
        }
        entry.attributes.insert(
            "imageOrientation".into(),
            json!(extract::extract_image_orientation(tags)),
        );

        let make = extract::extract_make(tags);
        let model = extract::extract_model(tags);
        let sensor = extract::extract_sensor(tags);
        entry.attributes.insert("make".into(), json!(make));
        entry.attributes.insert("model".into(), json!(model));
        entry.attributes.insert("sensor".into(), json!(sensor));

        let sensor_size = image_size.and_then(|size| extract::extract_sensor_size(tags, size));
        if let Some(size) = sensor_size {
            entry.attributes.insert("sensorWidth".into(), json!(size.width_mm));
            entry.attributes.insert("sensorHeight".into(), json!(size.height_mm));
        }

        let focal = sensor_size.and_then(|size| extract::extract_focal(tags, size));
        if let Some(focal) = focal {
            entry.attributes.insert("focalLength".into(), json!(focal.length_mm));
            entry.attributes.insert("focalLength35".into(), json!(focal.length_35mm));
        }

        let geo = match extract::extract_geo(tags) {
            Ok(geo) => geo,
            Err(err) => {
                if self.config.strict {
                    return Err(err.into());
                }
                warn!(path = %entry.path, %err, "unreadable geolocation tags");
                None
            }
        };

        let orientation = extract::extract_camera_orientation(tags);
        if orientation.available {
            entry.attributes.insert("cameraPitch".into(), json!(orientation.pitch));
            entry.attributes.insert("cameraYaw".into(), json!(orientation.yaw));
            entry.attributes.insert("cameraRoll".into(), json!(orientation.roll));
        }

        if let Some(capture_time) =
            extract::extract_capture_time(tags, self.timezones, geo.as_ref())
        {
            entry.attributes.insert("captureTime".into(), json!(capture_time));
        }

        if let Some(size) = image_size {
            let pano = extract::extract_panorama_info(tags, size);
            if let Some(projection) = &pano.projection_type {
                entry.attributes.insert("projectionType".into(), json!(projection));
                entry.attributes.insert("croppedWidth".into(), json!(pano.cropped_width));
                entry.attributes.insert("croppedHeight".into(), json!(pano.cropped_height));
                entry.attributes.insert("croppedLeft".into(), json!(pano.cropped_left));
                entry.attributes.insert("croppedTop".into(), json!(pano.cropped_top));
                entry.attributes.insert("fullWidth".into(), json!(pano.full_width));
                entry.attributes.insert("fullHeight".into(), json!(pano.full_height));
                entry.attributes.insert("poseHeading".into(), json!(pano.pose_heading));
                entry.attributes.insert("posePitch".into(), json!(pano.pose_pitch));
                entry.attributes.insert("poseRoll".into(), json!(pano.pose_roll));
            }
        }

        let Some(geo) = geo else {
            return Ok(());
        };

        entry.entry_type = EntryType::GeoImage;
        entry.point_geometry = Some(PointGeometry::new(
            geo.longitude,
            geo.latitude,
            geo.altitude,
        ));

        // Height above ground: the vendor tag when present, otherwise
        // derived from the absolute altitude and the terrain under the
        // camera. Best effort; without it there is no footprint.
        let relative_altitude = extract::extract_relative_altitude(tags).or_else(|| {
            if geo.altitude > 0.0 {
                Some(geo.altitude - self.dsm.get_altitude(geo.latitude, geo.longitude))
            } else {
                None
            }
        });

        let (Some(sensor_size), Some(focal), Some(relative_altitude)) =
            (sensor_size, focal, relative_altitude)
        else {
            debug!(path = %entry.path, "footprint not computable, missing camera parameters");
            return Ok(());
        };

        let input = FootprintInput {
            sensor_width_mm: sensor_size.width_mm,
            sensor_height_mm: sensor_size.height_mm,
            focal_length_mm: focal.length_mm,
            latitude: geo.latitude,
            longitude: geo.longitude,
            absolute_altitude_m: geo.altitude,
            relative_altitude_m: relative_altitude,
            pitch_deg: orientation.pitch,
            yaw_deg: orientation.yaw,
            roll_deg: orientation.roll,
        };

        match compute_footprint(&input) {
            Ok(footprint) => {
                let ring = footprint
                    .ring
                    .iter()
                    .map(|p| Point3::new(p.lon, p.lat, p.elevation))
                    .collect();
                entry.polygon_geometry = Some(PolygonGeometry::new(ring));
            }
            Err(err) => {
                warn!(path = %entry.path, %err, "footprint computation failed");
            }
        }

        Ok(())
    }

    fn relative_path(&self, path: &Path) -> Result<(String, u32)> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| crate::CoreError::OutsideRoot {
                path: path.display().to_string(),
                root: self.root.display().to_string(),
            })?;

        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let depth = components.len().saturating_sub(1) as u32;
        Ok((components.join("/"), depth))
    }
}

fn modified_seconds(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
