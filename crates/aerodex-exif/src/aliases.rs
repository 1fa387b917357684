//! Tag alias tables.
//!
//! Each canonical field maps to an ordered list of source tag keys, most
//! preferred first. EXIF keys use the tag's standard name; XMP keys keep
//! their `prefix:Name` form. `TagSet::first` consults these lists.

/// Camera manufacturer.
pub const MAKE: &[&str] = &["Make"];

/// Camera model.
pub const MODEL: &[&str] = &["Model"];

/// Image pixel width.
pub const IMAGE_WIDTH: &[&str] = &["PixelXDimension", "ImageWidth"];

/// Image pixel height.
pub const IMAGE_HEIGHT: &[&str] = &["PixelYDimension", "ImageLength"];

/// EXIF orientation code.
pub const ORIENTATION: &[&str] = &["Orientation"];

/// Physical focal length in millimeters.
pub const FOCAL_LENGTH: &[&str] = &["FocalLength"];

/// 35mm-equivalent focal length.
pub const FOCAL_LENGTH_35MM: &[&str] = &["FocalLengthIn35mmFilm"];

/// Focal plane resolution, pixels per unit.
pub const FOCAL_PLANE_X_RES: &[&str] = &["FocalPlaneXResolution"];
/// Focal plane resolution, pixels per unit.
pub const FOCAL_PLANE_Y_RES: &[&str] = &["FocalPlaneYResolution"];
/// Focal plane resolution unit code.
pub const FOCAL_PLANE_UNIT: &[&str] = &["FocalPlaneResolutionUnit"];

/// Standard GPS latitude (degrees/minutes/seconds).
pub const GPS_LATITUDE: &[&str] = &["GPSLatitude"];
/// Standard GPS latitude hemisphere reference.
pub const GPS_LATITUDE_REF: &[&str] = &["GPSLatitudeRef"];
/// Standard GPS longitude (degrees/minutes/seconds).
pub const GPS_LONGITUDE: &[&str] = &["GPSLongitude"];
/// Standard GPS longitude hemisphere reference.
pub const GPS_LONGITUDE_REF: &[&str] = &["GPSLongitudeRef"];
/// Standard GPS altitude.
pub const GPS_ALTITUDE: &[&str] = &["GPSAltitude"];
/// Standard GPS altitude reference (1 = below sea level).
pub const GPS_ALTITUDE_REF: &[&str] = &["GPSAltitudeRef"];

/// Vendor high-precision latitude. Standard EXIF GPS on some drones is
/// rounded; the XMP block carries the full-precision value.
pub const VENDOR_LATITUDE: &[&str] = &["drone-dji:GpsLatitude", "Camera:Latitude"];

/// Vendor high-precision longitude. The misspelled DJI key is real and
/// present on several firmware generations.
pub const VENDOR_LONGITUDE: &[&str] = &[
    "drone-dji:GpsLongitude",
    "drone-dji:GpsLongtitude",
    "Camera:Longitude",
];

/// Vendor absolute altitude above mean sea level.
pub const VENDOR_ABSOLUTE_ALTITUDE: &[&str] =
    &["drone-dji:AbsoluteAltitude", "Camera:AboveSeaLevel"];

/// Vendor height above the takeoff/ground point.
pub const VENDOR_RELATIVE_ALTITUDE: &[&str] =
    &["drone-dji:RelativeAltitude", "Camera:AboveGroundAltitude"];

/// Gimbal pitch in degrees, -90 is straight down.
pub const CAMERA_PITCH: &[&str] = &["drone-dji:GimbalPitchDegree", "Camera:Pitch"];
/// Gimbal yaw in degrees, 0 is north.
pub const CAMERA_YAW: &[&str] = &["drone-dji:GimbalYawDegree", "Camera:Yaw"];
/// Gimbal roll in degrees.
pub const CAMERA_ROLL: &[&str] = &["drone-dji:GimbalRollDegree", "Camera:Roll"];

/// Vendor capture timestamp already in UTC, seconds since the Unix epoch.
pub const CAPTURE_UTC_SECONDS: &[&str] = &["Camera:EpochTimeUtc", "drone-dji:UtcAtExposure"];

/// Local capture date/time, `YYYY:MM:DD HH:MM:SS`.
pub const CAPTURE_DATETIME: &[&str] = &["DateTimeOriginal", "DateTimeDigitized", "DateTime"];

/// Sub-second fraction of the capture time.
pub const CAPTURE_SUBSEC: &[&str] = &["SubSecTimeOriginal", "SubSecTime"];

/// Sign-delimited `±lat±lon±alt` location string written by some video
/// containers.
pub const ENCODED_LOCATION: &[&str] = &[
    "QuickTime:GPSCoordinates",
    "com.apple.quicktime.location.ISO6709",
];

/// Panorama cropped-area and pose fields.
pub const PANO_CROPPED_WIDTH: &[&str] = &["GPano:CroppedAreaImageWidthPixels"];
/// Panorama cropped-area height.
pub const PANO_CROPPED_HEIGHT: &[&str] = &["GPano:CroppedAreaImageHeightPixels"];
/// Panorama cropped-area left offset.
pub const PANO_CROPPED_LEFT: &[&str] = &["GPano:CroppedAreaLeftPixels"];
/// Panorama cropped-area top offset.
pub const PANO_CROPPED_TOP: &[&str] = &["GPano:CroppedAreaTopPixels"];
/// Full panorama width.
pub const PANO_FULL_WIDTH: &[&str] = &["GPano:FullPanoWidthPixels"];
/// Full panorama height.
pub const PANO_FULL_HEIGHT: &[&str] = &["GPano:FullPanoHeightPixels"];
/// Panorama pose heading.
pub const PANO_POSE_HEADING: &[&str] = &["GPano:PoseHeadingDegrees"];
/// Panorama pose pitch.
pub const PANO_POSE_PITCH: &[&str] = &["GPano:PosePitchDegrees"];
/// Panorama pose roll.
pub const PANO_POSE_ROLL: &[&str] = &["GPano:PoseRollDegrees"];
/// Panorama projection type.
pub const PANO_PROJECTION_TYPE: &[&str] = &["GPano:ProjectionType"];
