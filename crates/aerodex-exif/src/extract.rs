//! Metadata extraction from a parsed tag container.
//!
//! Every function here is a pure read over a [`TagSet`]. Absent tags yield
//! `None` (or a documented default); only data that is present but
//! malformed produces an error.

use crate::aliases;
use crate::sensor_db;
use crate::tags::{TagSet, TagValue};
use crate::timezone::TimezoneResolver;
use crate::{ExifError, Result};
use chrono::NaiveDateTime;
use tracing::warn;

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Absolute altitude in meters; 0.0 when unknown.
    pub altitude: f64,
}

/// Camera pose at capture time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrientation {
    /// Pitch in degrees, -90 is straight down.
    pub pitch: f64,
    /// Yaw in degrees, 0 is north.
    pub yaw: f64,
    /// Roll in degrees.
    pub roll: f64,
    /// False when the pose is the nadir sentinel rather than telemetry.
    pub available: bool,
}

impl CameraOrientation {
    /// The sentinel pose used when gimbal telemetry is absent.
    pub fn unavailable() -> Self {
        Self {
            pitch: -90.0,
            yaw: 0.0,
            roll: 0.0,
            available: false,
        }
    }
}

/// Focal length pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Focal {
    /// Physical focal length in millimeters.
    pub length_mm: f64,
    /// 35mm-equivalent focal length.
    pub length_35mm: f64,
}

/// Physical sensor dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSize {
    /// Sensor width.
    pub width_mm: f64,
    /// Sensor height.
    pub height_mm: f64,
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Panorama crop and pose parameters.
///
/// Every field is individually optional in the container; absent crop
/// fields default to the full image, absent pose fields to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaInfo {
    /// Cropped area width in pixels.
    pub cropped_width: u32,
    /// Cropped area height in pixels.
    pub cropped_height: u32,
    /// Cropped area left offset.
    pub cropped_left: u32,
    /// Cropped area top offset.
    pub cropped_top: u32,
    /// Full panorama width.
    pub full_width: u32,
    /// Full panorama height.
    pub full_height: u32,
    /// Pose heading in degrees.
    pub pose_heading: f64,
    /// Pose pitch in degrees.
    pub pose_pitch: f64,
    /// Pose roll in degrees.
    pub pose_roll: f64,
    /// Projection type, when declared.
    pub projection_type: Option<String>,
}

/// Extract the image pixel dimensions.
pub fn extract_image_size(tags: &TagSet) -> Option<ImageSize> {
    let width = tags.first(aliases::IMAGE_WIDTH)?.as_int()?;
    let height = tags.first(aliases::IMAGE_HEIGHT)?.as_int()?;
    if width <= 0 || height <= 0 {
        return None;
    }
    Some(ImageSize {
        width: width as u32,
        height: height as u32,
    })
}

/// Extract the camera make, defaulting to `"unknown"`.
pub fn extract_make(tags: &TagSet) -> String {
    tags.first(aliases::MAKE)
        .and_then(|v| v.as_text())
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Extract the camera model, defaulting to `"unknown"`.
pub fn extract_model(tags: &TagSet) -> String {
    tags.first(aliases::MODEL)
        .and_then(|v| v.as_text())
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the normalized sensor name: lowercase `"make model"`, with the
/// make token removed from the model when vendors duplicate it.
pub fn extract_sensor(tags: &TagSet) -> String {
    let make = extract_make(tags).to_lowercase();
    let model = extract_model(tags).to_lowercase();
    let model = model.replace(&make, "");
    format!("{} {}", make, model.trim()).trim().to_string()
}

/// Millimeters per focal-plane resolution unit, by EXIF unit code.
fn mm_per_resolution_unit(code: i64) -> Option<f64> {
    match code {
        2 => Some(25.4),  // inch
        3 => Some(10.0),  // centimeter
        4 => Some(1.0),   // millimeter
        5 => Some(0.001), // micrometer
        _ => None,
    }
}

/// Extract the physical sensor size.
///
/// The preferred path derives it from the focal-plane resolution tags; the
/// fallback looks the normalized sensor name up in the static database and
/// derives the height from the image aspect ratio.
pub fn extract_sensor_size(tags: &TagSet, image_size: ImageSize) -> Option<SensorSize> {
    if let (Some(x_res), Some(unit)) = (
        tags.first(aliases::FOCAL_PLANE_X_RES).and_then(|v| v.as_real()),
        tags.first(aliases::FOCAL_PLANE_UNIT).and_then(|v| v.as_int()),
    ) {
        let mm_per_unit = mm_per_resolution_unit(unit)?;
        if x_res > 0.0 {
            let width_mm = image_size.width as f64 / x_res * mm_per_unit;
            let height_mm = match tags
                .first(aliases::FOCAL_PLANE_Y_RES)
                .and_then(|v| v.as_real())
                .filter(|y| *y > 0.0)
            {
                Some(y_res) => image_size.height as f64 / y_res * mm_per_unit,
                None => width_mm * image_size.height as f64 / image_size.width as f64,
            };
            return Some(SensorSize { width_mm, height_mm });
        }
    }

    let width_mm = sensor_db::sensor_width_mm(&extract_sensor(tags))?;
    Some(SensorSize {
        width_mm,
        height_mm: width_mm * image_size.height as f64 / image_size.width as f64,
    })
}

/// Extract the focal length pair.
///
/// Requires a known sensor size. Prefers the 35mm-equivalent tag and
/// derives the physical length from it; otherwise derives the equivalent
/// from the physical tag.
pub fn extract_focal(tags: &TagSet, sensor: SensorSize) -> Option<Focal> {
    if let Some(f35) = tags
        .first(aliases::FOCAL_LENGTH_35MM)
        .and_then(|v| v.as_real())
        .filter(|f| *f > 0.0)
    {
        return Some(Focal {
            length_mm: f35 / 36.0 * sensor.width_mm,
            length_35mm: f35,
        });
    }

    let focal = tags
        .first(aliases::FOCAL_LENGTH)
        .and_then(|v| v.as_real())
        .filter(|f| *f > 0.0)?;
    Some(Focal {
        length_mm: focal,
        length_35mm: 36.0 * focal / sensor.width_mm,
    })
}

/// Convert a degrees/minutes/seconds component list to decimal degrees.
fn dms_to_decimal(components: &[f64]) -> Option<f64> {
    match components {
        [d, m, s, ..] => Some(d + m / 60.0 + s / 3600.0),
        [d, m] => Some(d + m / 60.0),
        [d] => Some(*d),
        _ => None,
    }
}

/// True when a hemisphere reference negates the coordinate.
fn negated_by_ref(tags: &TagSet, ref_aliases: &[&str]) -> bool {
    tags.first(ref_aliases)
        .and_then(|v| v.as_text())
        .map(|s| matches!(s.trim().to_ascii_uppercase().as_str(), "S" | "W"))
        .unwrap_or(false)
}

/// Extract the capture position.
///
/// Standard GPS tags come first (hemisphere-corrected); vendor
/// high-precision tags override them; the vendor absolute-altitude tag
/// overrides the GPS altitude. Without standard tags, the sign-delimited
/// `±lat±lon±alt` form used by some video containers is attempted.
///
/// Returns `Ok(None)` when the container carries no position at all;
/// malformed encoded strings are an error.
pub fn extract_geo(tags: &TagSet) -> Result<Option<GeoLocation>> {
    let mut latitude = tags
        .first(aliases::GPS_LATITUDE)
        .and_then(|v| v.as_real_vec().and_then(dms_to_decimal).or_else(|| v.as_real()))
        .map(|lat| {
            if negated_by_ref(tags, aliases::GPS_LATITUDE_REF) {
                -lat
            } else {
                lat
            }
        });
    let mut longitude = tags
        .first(aliases::GPS_LONGITUDE)
        .and_then(|v| v.as_real_vec().and_then(dms_to_decimal).or_else(|| v.as_real()))
        .map(|lon| {
            if negated_by_ref(tags, aliases::GPS_LONGITUDE_REF) {
                -lon
            } else {
                lon
            }
        });
    let mut altitude = tags
        .first(aliases::GPS_ALTITUDE)
        .and_then(|v| v.as_real())
        .map(|alt| {
            // Altitude reference 1 means below sea level
            if tags
                .first(aliases::GPS_ALTITUDE_REF)
                .and_then(|v| v.as_int())
                == Some(1)
            {
                -alt
            } else {
                alt
            }
        });

    // Vendor tags carry more precision than the rounded standard GPS block
    if let Some(lat) = tags.first(aliases::VENDOR_LATITUDE).and_then(|v| v.as_real()) {
        latitude = Some(lat);
    }
    if let Some(lon) = tags.first(aliases::VENDOR_LONGITUDE).and_then(|v| v.as_real()) {
        longitude = Some(lon);
    }
    if let Some(alt) = tags
        .first(aliases::VENDOR_ABSOLUTE_ALTITUDE)
        .and_then(|v| v.as_real())
    {
        let below = tags
            .first(aliases::GPS_ALTITUDE_REF)
            .and_then(|v| v.as_int())
            == Some(1);
        altitude = Some(if below { -alt } else { alt });
    }

    if let (Some(lat), Some(lon)) = (latitude, longitude) {
        return Ok(Some(GeoLocation {
            latitude: lat,
            longitude: lon,
            altitude: altitude.unwrap_or(0.0),
        }));
    }

    if let Some(encoded) = tags
        .first(aliases::ENCODED_LOCATION)
        .and_then(|v| v.as_text())
    {
        return parse_encoded_location(encoded).map(Some);
    }

    Ok(None)
}

/// Parse a sign-delimited `±lat±lon±alt` location string.
///
/// Components accumulate digit by digit and finalize on the next sign or
/// at end of string. Latitude and longitude are required.
fn parse_encoded_location(raw: &str) -> Result<GeoLocation> {
    let mut components: Vec<f64> = Vec::new();
    let mut buffer = String::new();

    for c in raw.trim().trim_end_matches('/').chars() {
        match c {
            '+' | '-' => {
                if !buffer.is_empty() {
                    let value = buffer.parse::<f64>().map_err(|_| ExifError::MalformedGps {
                        raw: raw.to_string(),
                    })?;
                    components.push(value);
                }
                buffer.clear();
                if c == '-' {
                    buffer.push('-');
                }
            }
            '0'..='9' | '.' => buffer.push(c),
            _ => {
                return Err(ExifError::MalformedGps {
                    raw: raw.to_string(),
                })
            }
        }
    }
    if !buffer.is_empty() && buffer != "-" {
        let value = buffer.parse::<f64>().map_err(|_| ExifError::MalformedGps {
            raw: raw.to_string(),
        })?;
        components.push(value);
    }

    if components.len() < 2 {
        return Err(ExifError::MalformedGps {
            raw: raw.to_string(),
        });
    }

    Ok(GeoLocation {
        latitude: components[0],
        longitude: components[1],
        altitude: components.get(2).copied().unwrap_or(0.0),
    })
}

/// Extract the vendor relative altitude (height above ground), when the
/// container declares one. The fallback against a ground elevation source
/// belongs to the caller that owns that service.
pub fn extract_relative_altitude(tags: &TagSet) -> Option<f64> {
    tags.first(aliases::VENDOR_RELATIVE_ALTITUDE)
        .and_then(|v| v.as_real())
}

/// Extract the EXIF orientation code, defaulting to 1 (no rotation).
pub fn extract_image_orientation(tags: &TagSet) -> i64 {
    tags.first(aliases::ORIENTATION)
        .and_then(|v| v.as_int())
        .unwrap_or(1)
}

/// Extract the gimbal pose.
///
/// All-or-nothing: a missing axis yields the nadir sentinel rather than a
/// partial pose. One vendor stores pitch relative to the horizon with the
/// roll sign flipped; its values are normalized here.
pub fn extract_camera_orientation(tags: &TagSet) -> CameraOrientation {
    let pitch = tags.first(aliases::CAMERA_PITCH).and_then(|v| v.as_real());
    let yaw = tags.first(aliases::CAMERA_YAW).and_then(|v| v.as_real());
    let roll = tags.first(aliases::CAMERA_ROLL).and_then(|v| v.as_real());

    let (Some(mut pitch), Some(yaw), Some(mut roll)) = (pitch, yaw, roll) else {
        return CameraOrientation::unavailable();
    };

    if extract_make(tags).eq_ignore_ascii_case("sentera") {
        pitch -= 90.0;
        roll = -roll;
    }

    CameraOrientation {
        pitch,
        yaw,
        roll,
        available: true,
    }
}

/// Normalize a sub-second fraction string to milliseconds.
///
/// The digit count defines the fraction's scale: `"5"` is 500 ms,
/// `"059"` is 59 ms, `"12345"` truncates to 123 ms.
fn subsec_to_millis(raw: &str) -> u32 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    let mut padded = digits;
    while padded.len() < 3 {
        padded.push('0');
    }
    padded[..3].parse().unwrap_or(0)
}

/// Extract the capture time as Unix epoch milliseconds.
///
/// Prefers a vendor timestamp that is already UTC (seconds since the
/// epoch). Otherwise parses the local `YYYY:MM:DD HH:MM:SS` tag plus the
/// optional sub-second fraction and corrects it to UTC with the timezone
/// at the capture position (UTC when no position is known). Malformed
/// dates are logged and yield `None`.
pub fn extract_capture_time(
    tags: &TagSet,
    resolver: &TimezoneResolver,
    geo: Option<&GeoLocation>,
) -> Option<i64> {
    if let Some(utc_seconds) = tags
        .first(aliases::CAPTURE_UTC_SECONDS)
        .and_then(|v| v.as_real())
        .filter(|s| *s > 0.0)
    {
        return Some((utc_seconds * 1000.0) as i64);
    }

    let raw = tags
        .first(aliases::CAPTURE_DATETIME)
        .and_then(|v| v.as_text())?;
    let local = match NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S") {
        Ok(dt) => dt,
        Err(err) => {
            warn!(raw, %err, "malformed capture date");
            return None;
        }
    };

    let millis = tags
        .first(aliases::CAPTURE_SUBSEC)
        .and_then(|v| v.as_text())
        .map(subsec_to_millis)
        .unwrap_or(0);

    let tz = match geo {
        Some(geo) => resolver.lookup(geo.latitude, geo.longitude),
        None => chrono_tz::Tz::UTC,
    };

    resolver.to_utc_epoch_millis(local, millis, tz)
}

/// Extract panorama parameters with their documented defaults.
pub fn extract_panorama_info(tags: &TagSet, image_size: ImageSize) -> PanoramaInfo {
    let uint = |keys: &[&str], default: u32| {
        tags.first(keys)
            .and_then(|v| v.as_int())
            .filter(|v| *v >= 0)
            .map(|v| v as u32)
            .unwrap_or(default)
    };
    let real = |keys: &[&str]| tags.first(keys).and_then(|v| v.as_real()).unwrap_or(0.0);

    PanoramaInfo {
        cropped_width: uint(aliases::PANO_CROPPED_WIDTH, image_size.width),
        cropped_height: uint(aliases::PANO_CROPPED_HEIGHT, image_size.height),
        cropped_left: uint(aliases::PANO_CROPPED_LEFT, 0),
        cropped_top: uint(aliases::PANO_CROPPED_TOP, 0),
        full_width: uint(aliases::PANO_FULL_WIDTH, image_size.width),
        full_height: uint(aliases::PANO_FULL_HEIGHT, image_size.height),
        pose_heading: real(aliases::PANO_POSE_HEADING),
        pose_pitch: real(aliases::PANO_POSE_PITCH),
        pose_roll: real(aliases::PANO_POSE_ROLL),
        projection_type: tags
            .first(aliases::PANO_PROJECTION_TYPE)
            .and_then(|v| v.as_text())
            .map(str::to_string),
    }
}
